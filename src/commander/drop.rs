//! Drop squad: collect a transport and its cargo, load up, go drop
//!
//! Supports one squad with one transport. Once the squad has been sent to
//! drop it stays in that phase; there is no retry.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::battlefield::Battlefield;
use crate::commander::constants::{ATTACK_RADIUS, DROP_RADIUS, DROP_SQUAD, TRANSPORT_CAPACITY};
use crate::commander::events::CommanderEvent;
use crate::commander::targeting::drop_location;
use crate::commander::CombatCommander;
use crate::core::error::Result;
use crate::core::types::{AgentId, Position};
use crate::squad::{SquadOrder, SquadOrderKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropPhase {
    /// Holding at home until a transport and a full load are claimed
    Collecting,
    /// Squad complete, members boarding the transport
    Loading,
    /// Sent to the target. Terminal.
    Dropped,
}

impl DropPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DropPhase::Dropped)
    }
}

/// Drop squad composition as of this tick
struct DropManifest {
    transport: Option<(AgentId, Position)>,
    spots_remaining: i32,
    unloaded: Vec<AgentId>,
}

impl<B: Battlefield> CombatCommander<B> {
    pub(super) fn update_drop_squad(&mut self) -> Result<()> {
        let Some(phase) = self.drop_phase else {
            return Ok(());
        };
        if phase.is_terminal() {
            return Ok(());
        }

        let manifest = self.drop_manifest()?;

        match manifest.transport {
            Some((carrier, carrier_pos)) if manifest.spots_remaining == 0 => {
                if manifest.unloaded.is_empty() {
                    let target = drop_location(&self.battlefield);
                    let order = SquadOrder::new(SquadOrderKind::Drop, target, DROP_RADIUS, "Go drop!");
                    self.squads.squad_mut(DROP_SQUAD)?.set_order(order);
                    info!(x = target.x, y = target.y, "Drop launched");
                    self.set_drop_phase(DropPhase::Dropped);
                } else {
                    let order = SquadOrder::new(SquadOrderKind::Load, carrier_pos, ATTACK_RADIUS, "Load up");
                    self.squads.squad_mut(DROP_SQUAD)?.set_order(order);
                    for passenger in &manifest.unloaded {
                        self.battlefield.load(carrier, *passenger);
                    }
                    self.set_drop_phase(DropPhase::Loading);
                }
            }
            _ => self.collect_drop_units(manifest)?,
        }
        Ok(())
    }

    fn drop_manifest(&self) -> Result<DropManifest> {
        let mut manifest = DropManifest {
            transport: None,
            spots_remaining: TRANSPORT_CAPACITY,
            unloaded: Vec::new(),
        };
        for agent in self.squads.squad(DROP_SQUAD)?.agents(&self.roster) {
            if agent.is_flying_transport() {
                manifest.transport = Some((agent.id, agent.position));
            } else {
                manifest.spots_remaining -= agent.unit_type.space_required() as i32;
                if !agent.loaded {
                    manifest.unloaded.push(agent.id);
                }
            }
        }
        Ok(manifest)
    }

    /// Claim a transport if we have none, and cargo that still fits
    fn collect_drop_units(&mut self, manifest: DropManifest) -> Result<()> {
        let mut transport = manifest.transport.map(|(id, _)| id);
        let mut spots_remaining = manifest.spots_remaining;

        for agent in &self.combat_units {
            if !self.squads.can_assign_unit_to_squad(agent.id, DROP_SQUAD) {
                continue;
            }
            if transport.is_none() && agent.is_flying_transport() {
                self.squads.assign_unit_to_squad(agent.id, DROP_SQUAD)?;
                transport = Some(agent.id);
            } else {
                let space = agent.unit_type.space_required() as i32;
                if space <= spots_remaining && self.config.drop_unit_types.contains(&agent.unit_type) {
                    self.squads.assign_unit_to_squad(agent.id, DROP_SQUAD)?;
                    spots_remaining -= space;
                }
            }
        }
        Ok(())
    }

    fn set_drop_phase(&mut self, next: DropPhase) {
        let Some(current) = self.drop_phase else {
            return;
        };
        if current == next {
            return;
        }
        debug!(from = ?current, to = ?next, "Drop phase changed");
        self.events.push(self.tick, CommanderEvent::DropPhaseChanged { from: current, to: next });
        self.drop_phase = Some(next);
    }
}
