//! Squad orders: what a squad is trying to do this tick

use serde::{Deserialize, Serialize};

use crate::core::types::Position;

/// Kind of goal given to a squad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquadOrderKind {
    Idle,
    Attack,
    Defend,
    Hold,
    Load,
    Drop,
    DestroyNeutral,
}

/// A goal for a squad. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadOrder {
    kind: SquadOrderKind,
    position: Position,
    radius: i32,
    label: String,
}

impl SquadOrder {
    pub fn new(kind: SquadOrderKind, position: Position, radius: i32, label: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            radius,
            label: label.into(),
        }
    }

    pub fn idle(position: Position) -> Self {
        Self::new(SquadOrderKind::Idle, position, 100, "Chill out")
    }

    pub fn kind(&self) -> SquadOrderKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether a point lies strictly inside the order's radius of relevance
    pub fn covers(&self, pos: Position) -> bool {
        self.position.distance(&pos) < self.radius as f32
    }
}
