//! Main attack squads: Ground and Flying
//!
//! Every agent not claimed by a higher-priority squad is routed by the
//! ordered rule table in `squad::routing`, then both squads get a fresh
//! order computed from their own composition.

use crate::battlefield::Battlefield;
use crate::commander::constants::{FLYING_SQUAD, GROUND_SQUAD};
use crate::commander::targeting::{attack_order, SquadProfile};
use crate::commander::CombatCommander;
use crate::core::error::Result;
use crate::squad::routing::{attack_route, is_flying_squad_unit, AttackRoute};

impl<B: Battlefield> CombatCommander<B> {
    pub(super) fn update_attack_squads(&mut self) -> Result<()> {
        let ground = self.squads.squad(GROUND_SQUAD)?;
        let mut ground_detector = ground.has_detector(&self.roster);
        let ground_exists = ground.has_combat_units(&self.roster);

        let flying = self.squads.squad(FLYING_SQUAD)?;
        let mut flying_detector = flying.has_detector(&self.roster);
        let flying_exists = flying
            .agents(&self.roster)
            .any(|a| is_flying_squad_unit(a.unit_type));

        let want_detector = self.want_squad_detectors();
        if !want_detector {
            // detectors become squadless and are picked up again later
            if ground_detector {
                self.remove_detector(GROUND_SQUAD)?;
                ground_detector = false;
            }
            if flying_detector {
                self.remove_detector(FLYING_SQUAD)?;
                flying_detector = false;
            }
        }

        for agent in &self.combat_units {
            let id = agent.id;
            match attack_route(agent.unit_type) {
                Some(AttackRoute::Detector) => {
                    if !want_detector {
                        continue;
                    }
                    // ground squad first: it cannot see uphill otherwise
                    if ground_exists
                        && !ground_detector
                        && self.squads.can_assign_unit_to_squad(id, GROUND_SQUAD)
                    {
                        self.squads.assign_unit_to_squad(id, GROUND_SQUAD)?;
                        ground_detector = true;
                    } else if flying_exists
                        && !flying_detector
                        && self.squads.can_assign_unit_to_squad(id, FLYING_SQUAD)
                    {
                        self.squads.assign_unit_to_squad(id, FLYING_SQUAD)?;
                        flying_detector = true;
                    }
                }
                Some(AttackRoute::Flying) => {
                    if self.squads.can_assign_unit_to_squad(id, FLYING_SQUAD) {
                        self.squads.assign_unit_to_squad(id, FLYING_SQUAD)?;
                    }
                }
                Some(AttackRoute::OptionalFlying) => {
                    let (from, to) = if flying_exists {
                        (GROUND_SQUAD, FLYING_SQUAD)
                    } else {
                        (FLYING_SQUAD, GROUND_SQUAD)
                    };
                    // same priority, so migrate by hand rather than steal
                    if self.squads.squad(from)?.contains(id) {
                        self.squads.remove_unit(id);
                    }
                    if self.squads.can_assign_unit_to_squad(id, to) {
                        self.squads.assign_unit_to_squad(id, to)?;
                    }
                }
                Some(AttackRoute::Ground) => {
                    if self.squads.can_assign_unit_to_squad(id, GROUND_SQUAD) {
                        self.squads.assign_unit_to_squad(id, GROUND_SQUAD)?;
                    }
                }
                None => {}
            }
        }

        for name in [GROUND_SQUAD, FLYING_SQUAD] {
            let profile = SquadProfile::of(self.squads.squad(name)?, &self.roster, &self.battlefield);
            let order = attack_order(&self.battlefield, &profile, self.aggressive);
            self.squads.squad_mut(name)?.set_order(order);
        }

        Ok(())
    }
}
