//! What the commander changed during a tick, for host diagnostics

use serde::{Deserialize, Serialize};

use crate::commander::drop::DropPhase;
use crate::core::types::{AgentId, Position, Tick};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommanderEvent {
    SquadCreated { squad: String },
    SquadCleared { squad: String, released: usize },
    SquadRemoved { squad: String },
    ReconTargetChanged { target: Option<Position> },
    DropPhaseChanged { from: DropPhase, to: DropPhase },
    WorkerPulled { worker: AgentId, squad: String },
    WorkerReleased { worker: AgentId },
    ScanIssued { target: Position },
    ItemCanceled { agent: AgentId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedEvent {
    pub tick: Tick,
    pub event: CommanderEvent,
}

/// Events for one tick, in the order they happened
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommanderEventLog {
    events: Vec<TimedEvent>,
}

impl CommanderEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: Tick, event: CommanderEvent) {
        self.events.push(TimedEvent { tick, event });
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, event: &CommanderEvent) -> bool {
        self.events.iter().any(|e| &e.event == event)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommanderEvent> {
        self.events.iter().map(|e| &e.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_order() {
        let mut log = CommanderEventLog::new();
        log.push(3, CommanderEvent::SquadCreated { squad: "Base 1".into() });
        log.push(3, CommanderEvent::ScanIssued { target: Position::new(1, 2) });

        assert_eq!(log.len(), 2);
        assert!(log.contains(&CommanderEvent::ScanIssued { target: Position::new(1, 2) }));
        assert!(matches!(log.iter().next(), Some(CommanderEvent::SquadCreated { .. })));
    }
}
