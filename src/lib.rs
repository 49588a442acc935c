//! Squad Commander - tactical squad layer for an RTS combat bot
//!
//! Agents are grouped into named, priority-ranked squads that each carry one
//! order. A `CombatCommander` rebuilds the squads every few ticks from the
//! host's unit snapshots and decides where each squad should go.

pub mod battlefield;
pub mod commander;
pub mod core;
pub mod squad;
pub mod units;
