pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, CommanderConfig};
pub use error::{CommandError, Result};
