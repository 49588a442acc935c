//! Per-tick snapshots of own and enemy units
//!
//! The squad layer never owns units. Each tick the host hands over fresh
//! snapshots and the layer only remembers which squad holds which id.

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, Position};
use crate::units::unit_type::UnitType;

fn default_true() -> bool {
    true
}

/// One of our own units or structures as seen this tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub unit_type: UnitType,
    pub position: Position,
    #[serde(default)]
    pub hit_points: Option<u32>,
    #[serde(default)]
    pub shields: Option<u32>,
    #[serde(default = "default_true")]
    pub completed: bool,
    #[serde(default = "default_true")]
    pub powered: bool,
    /// Lifted buildings fly even though their type does not
    #[serde(default)]
    pub lifted: bool,
    /// Inside a transport or bunker
    #[serde(default)]
    pub loaded: bool,
    #[serde(default)]
    pub carrying_minerals: bool,
    #[serde(default)]
    pub carrying_gas: bool,
    #[serde(default)]
    pub under_attack: bool,
    #[serde(default)]
    pub remaining_build_time: u32,
    /// Transport slots currently in use
    #[serde(default)]
    pub cargo: u8,
}

impl Agent {
    pub fn new(id: AgentId, unit_type: UnitType, position: Position) -> Self {
        Self {
            id,
            unit_type,
            position,
            hit_points: None,
            shields: None,
            completed: true,
            powered: true,
            lifted: false,
            loaded: false,
            carrying_minerals: false,
            carrying_gas: false,
            under_attack: false,
            remaining_build_time: 0,
            cargo: 0,
        }
    }

    pub fn with_hit_points(mut self, hit_points: u32) -> Self {
        self.hit_points = Some(hit_points);
        self
    }

    pub fn with_shields(mut self, shields: u32) -> Self {
        self.shields = Some(shields);
        self
    }

    pub fn incomplete(mut self, remaining_build_time: u32) -> Self {
        self.completed = false;
        self.remaining_build_time = remaining_build_time;
        self
    }

    /// Current hit points; missing values mean full health
    pub fn hit_points(&self) -> u32 {
        self.hit_points
            .unwrap_or_else(|| self.unit_type.max_hit_points())
    }

    pub fn shields(&self) -> u32 {
        self.shields.unwrap_or_else(|| self.unit_type.max_shields())
    }

    pub fn is_flying(&self) -> bool {
        self.unit_type.is_flyer() || self.lifted
    }

    pub fn can_attack_ground(&self) -> bool {
        self.unit_type.can_attack_ground()
    }

    pub fn can_attack_air(&self) -> bool {
        self.unit_type.can_attack_air()
    }

    pub fn is_flying_transport(&self) -> bool {
        self.is_flying() && self.unit_type.space_provided() > 0
    }

    pub fn space_remaining(&self) -> u8 {
        self.unit_type.space_provided().saturating_sub(self.cargo)
    }

    pub fn distance_to(&self, pos: Position) -> f32 {
        self.position.distance(&pos)
    }
}

/// An enemy unit currently in sight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyUnit {
    pub id: AgentId,
    pub unit_type: UnitType,
    pub position: Position,
    #[serde(default)]
    pub lifted: bool,
    /// Cloaked or burrowed units are visible but undetected until revealed
    #[serde(default = "default_true")]
    pub detected: bool,
    #[serde(default)]
    pub burrowing: bool,
}

impl EnemyUnit {
    pub fn new(id: AgentId, unit_type: UnitType, position: Position) -> Self {
        Self {
            id,
            unit_type,
            position,
            lifted: false,
            detected: true,
            burrowing: false,
        }
    }

    pub fn is_flying(&self) -> bool {
        self.unit_type.is_flyer() || self.lifted
    }
}

/// Remembered enemy unit, possibly out of sight and stale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitInfo {
    pub id: AgentId,
    pub unit_type: UnitType,
    pub last_position: Position,
    /// Seen to have left `last_position` since it was recorded
    #[serde(default)]
    pub gone_from_last_position: bool,
    /// Known lifted right now (only knowable while in sight)
    #[serde(default)]
    pub lifted: bool,
}

impl UnitInfo {
    pub fn new(id: AgentId, unit_type: UnitType, last_position: Position) -> Self {
        Self {
            id,
            unit_type,
            last_position,
            gone_from_last_position: false,
            lifted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults_to_full_health() {
        let agent = Agent::new(AgentId(1), UnitType::Marine, Position::new(0, 0));
        assert_eq!(agent.hit_points(), 40);
        let hurt = agent.with_hit_points(12);
        assert_eq!(hurt.hit_points(), 12);
    }

    #[test]
    fn test_lifted_building_flies() {
        let mut barracks = Agent::new(AgentId(2), UnitType::Barracks, Position::new(0, 0));
        assert!(!barracks.is_flying());
        barracks.lifted = true;
        assert!(barracks.is_flying());
        assert!(!barracks.is_flying_transport());
    }

    #[test]
    fn test_space_remaining() {
        let mut bunker = Agent::new(AgentId(3), UnitType::Bunker, Position::new(0, 0));
        assert_eq!(bunker.space_remaining(), 4);
        bunker.cargo = 4;
        assert_eq!(bunker.space_remaining(), 0);
    }

    #[test]
    fn test_agent_deserializes_with_defaults() {
        let json = r#"{"id": 7, "unit_type": "Zealot", "position": {"x": 10, "y": 20}}"#;
        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.id, AgentId(7));
        assert!(agent.completed);
        assert!(agent.powered);
        assert!(!agent.loaded);
        assert_eq!(agent.hit_points(), 100);
    }
}
