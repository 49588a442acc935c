//! Recon squad: a small, cheap detachment that visits neutral bases to deny
//! and scout them. Size is governed by a weight budget.

use rand::seq::SliceRandom;
use tracing::debug;

use crate::battlefield::Battlefield;
use crate::commander::constants::{
    RECON_BASE_WEIGHT, RECON_MAX_SUPPORT, RECON_MAX_WEIGHT, RECON_MIN_AVAILABLE_WEIGHT, RECON_RADIUS,
    RECON_SQUAD, RECON_TARGET_TIMEOUT, RECON_WEIGHT_STEP,
};
use crate::commander::events::CommanderEvent;
use crate::commander::targeting::recon_candidates;
use crate::commander::CombatCommander;
use crate::core::error::Result;
use crate::core::types::Position;
use crate::squad::routing::{recon_weight, RECON_ESCORTED, RECON_SUPPORT};
use crate::squad::{SquadOrder, SquadOrderKind};

/// Recon budget for a given total of available weight.
///
/// Zero below the minimum, then one unit of weight per step, capped.
pub fn recon_weight_limit(available_weight: i32) -> i32 {
    if available_weight < RECON_MIN_AVAILABLE_WEIGHT {
        return 0;
    }
    let limit = RECON_BASE_WEIGHT + (available_weight - RECON_MIN_AVAILABLE_WEIGHT) / RECON_WEIGHT_STEP;
    limit.min(RECON_MAX_WEIGHT)
}

impl<B: Battlefield> CombatCommander<B> {
    pub(super) fn update_recon_squad(&mut self) -> Result<()> {
        self.choose_recon_target();

        let Some(target) = self.recon_target else {
            return self.clear_squad(RECON_SQUAD);
        };

        let order = SquadOrder::new(SquadOrderKind::Attack, target, RECON_RADIUS, "Reconnaissance in force");
        self.squads.squad_mut(RECON_SQUAD)?.set_order(order);

        // from an island only a flying detector can get anywhere
        if self.battlefield.is_island_start() {
            if self.squads.squad(RECON_SQUAD)?.is_empty() {
                let detector = self
                    .combat_units
                    .iter()
                    .find(|a| {
                        a.unit_type.is_detector() && self.squads.can_assign_unit_to_squad(a.id, RECON_SQUAD)
                    })
                    .map(|a| a.id);
                if let Some(id) = detector {
                    self.squads.assign_unit_to_squad(id, RECON_SQUAD)?;
                }
            }
            return Ok(());
        }

        let (mut squad_weight, mut n_escorted, mut n_support) = {
            let squad = self.squads.squad(RECON_SQUAD)?;
            squad.agents(&self.roster).fold((0, 0, 0), |(w, e, s), a| {
                (
                    w + recon_weight(a.unit_type),
                    e + i32::from(a.unit_type == RECON_ESCORTED),
                    s + usize::from(a.unit_type == RECON_SUPPORT),
                )
            })
        };

        // a lone detector cannot reconnoiter in force
        if squad_weight == 0 && !self.squads.squad(RECON_SQUAD)?.is_empty() {
            self.clear_squad(RECON_SQUAD)?;
        }

        let available_weight: i32 = {
            let recon = self.squads.squad(RECON_SQUAD)?;
            self.combat_units
                .iter()
                .filter(|a| recon.contains(a.id) || self.squads.can_assign_unit_to_squad(a.id, RECON_SQUAD))
                .map(|a| recon_weight(a.unit_type))
                .sum()
        };
        let weight_limit = recon_weight_limit(available_weight);

        if squad_weight > weight_limit || (n_escorted == 0 && n_support > 0) {
            self.clear_squad(RECON_SQUAD)?;
            squad_weight = 0;
            n_escorted = 0;
            n_support = 0;
        }

        let want_detector = self.want_squad_detectors();
        let mut has_detector = self.squads.squad(RECON_SQUAD)?.has_detector(&self.roster);
        if has_detector && !want_detector {
            self.remove_detector(RECON_SQUAD)?;
            has_detector = false;
        }

        // first pass: no support units, and leave room for two of them
        let support_weight = recon_weight(RECON_SUPPORT);
        let escorted_cap = RECON_MAX_WEIGHT - RECON_MAX_SUPPORT as i32 * support_weight;
        for agent in &self.combat_units {
            if squad_weight >= weight_limit {
                break;
            }
            let weight = recon_weight(agent.unit_type);
            let assignable = self.squads.can_assign_unit_to_squad(agent.id, RECON_SQUAD);

            if weight > 0 && squad_weight + weight <= weight_limit && assignable {
                if agent.unit_type == RECON_ESCORTED {
                    if n_escorted * weight < escorted_cap {
                        self.squads.assign_unit_to_squad(agent.id, RECON_SQUAD)?;
                        squad_weight += weight;
                        n_escorted += 1;
                    }
                } else if agent.unit_type != RECON_SUPPORT {
                    self.squads.assign_unit_to_squad(agent.id, RECON_SQUAD)?;
                    squad_weight += weight;
                }
            } else if agent.unit_type.is_detector() && want_detector && !has_detector && assignable {
                self.squads.assign_unit_to_squad(agent.id, RECON_SQUAD)?;
                has_detector = true;
            }
        }

        if n_escorted > 0 && n_support < RECON_MAX_SUPPORT {
            for agent in &self.combat_units {
                if squad_weight >= weight_limit || n_support >= RECON_MAX_SUPPORT {
                    break;
                }
                if agent.unit_type == RECON_SUPPORT
                    && self.squads.can_assign_unit_to_squad(agent.id, RECON_SQUAD)
                {
                    self.squads.assign_unit_to_squad(agent.id, RECON_SQUAD)?;
                    squad_weight += support_weight;
                    n_support += 1;
                }
            }
        }

        Ok(())
    }

    /// Keep the current target or switch to a random candidate
    fn choose_recon_target(&mut self) {
        let candidates = recon_candidates(&self.battlefield);
        let next = candidates.choose(&mut self.rng).copied();

        let change = match (next, self.recon_target) {
            (None, _) | (_, None) => true,
            (Some(_), Some(current)) => {
                self.tick.saturating_sub(self.last_recon_target_change) >= RECON_TARGET_TIMEOUT
                    || self.recon_target_cleared(current)
            }
        };

        if change {
            if next != self.recon_target {
                debug!(target = ?next, "Recon target changed");
                self.events
                    .push(self.tick, CommanderEvent::ReconTargetChanged { target: next });
            }
            self.recon_target = next;
            self.last_recon_target_change = self.tick;
        }
    }

    /// In sight and free of ground enemies: nothing more to do there
    fn recon_target_cleared(&self, target: Position) -> bool {
        self.battlefield.is_visible(target)
            && !self
                .battlefield
                .enemy_units()
                .iter()
                .any(|e| !e.is_flying() && e.position.distance(&target) <= RECON_RADIUS as f32)
    }
}
