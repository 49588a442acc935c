//! Unit catalogue and per-tick unit snapshots

pub mod agent;
pub mod unit_type;

pub use agent::{Agent, EnemyUnit, UnitInfo};
pub use unit_type::{UnitProperties, UnitTraits, UnitType};

use ahash::AHashMap;

use crate::core::types::AgentId;

/// This tick's own agents by id
pub type AgentRoster = AHashMap<AgentId, Agent>;
