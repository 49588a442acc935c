use thiserror::Error;

use crate::core::types::AgentId;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Squad not found: {0}")]
    SquadNotFound(String),

    #[error("Squad already exists: {0}")]
    DuplicateSquad(String),

    #[error("Agent {agent:?} cannot be assigned to squad {squad}")]
    IllegalAssignment { agent: AgentId, squad: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
