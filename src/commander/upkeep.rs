//! Every-tick housekeeping outside the squad model: canceling doomed
//! construction, comsat scans and bunker loading.

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::battlefield::Battlefield;
use crate::commander::constants::*;
use crate::commander::events::CommanderEvent;
use crate::commander::CombatCommander;
use crate::core::types::Race;
use crate::squad::routing::is_fast_raider;
use crate::units::{Agent, UnitType};

/// An in-progress building or morph that is about to die under fire
pub fn is_dying_item(agent: &Agent) -> bool {
    if !agent.under_attack {
        return false;
    }
    let in_progress = (agent.unit_type.is_building() && !agent.completed)
        || matches!(agent.unit_type, UnitType::Egg | UnitType::LurkerEgg | UnitType::Cocoon);
    if !in_progress {
        return false;
    }

    let hp = agent.hit_points();
    hp < CANCEL_HIT_POINTS
        || (agent.unit_type == UnitType::SunkenColony
            && hp < CANCEL_SUNKEN_HIT_POINTS
            && agent.remaining_build_time < CANCEL_SUNKEN_BUILD_TIME)
}

impl<B: Battlefield> CombatCommander<B> {
    pub(super) fn cancel_dying_items(&mut self) {
        for agent in self.battlefield.own_units() {
            if !is_dying_item(&agent) {
                continue;
            }
            if agent.unit_type.is_morph() {
                self.battlefield.cancel_morph(agent.id);
            } else {
                self.battlefield.cancel_construction(agent.id);
            }
            debug!(agent = agent.id.0, unit_type = ?agent.unit_type, "Canceled dying item");
            self.events.push(self.tick, CommanderEvent::ItemCanceled { agent: agent.id });
        }
    }

    /// Scan the first enemy we can see but cannot hit. One scan per sweep.
    pub(super) fn do_comsat_scan(&mut self) {
        if self.battlefield.my_race() != Race::Terran {
            return;
        }
        let have_comsat = self
            .battlefield
            .own_units()
            .iter()
            .any(|a| a.unit_type == UnitType::ComsatStation && a.completed);
        if !have_comsat {
            return;
        }

        let target = self
            .battlefield
            .enemy_units()
            .into_iter()
            .find(|e| !e.detected || e.burrowing);
        let Some(enemy) = target else {
            return;
        };

        self.battlefield.scan(enemy.position);
        self.battlefield.enemy_seen_burrowing();
        debug!(x = enemy.position.x, y = enemy.position.y, unit_type = ?enemy.unit_type, "Comsat scan");
        self.events.push(self.tick, CommanderEvent::ScanIssued { target: enemy.position });
    }

    /// Marines duck into bunkers when enemies come close and pop out again
    /// once the area is quiet.
    pub(super) fn load_or_unload_bunkers(&mut self) {
        if self.battlefield.my_race() != Race::Terran {
            return;
        }

        let own_units = self.battlefield.own_units();
        let enemies = self.battlefield.enemy_units();

        for bunker in own_units.iter().filter(|a| a.unit_type == UnitType::Bunker && a.completed) {
            let danger = enemies.iter().any(|e| {
                let dist = bunker.distance_to(e.position);
                dist <= BUNKER_ALERT_RADIUS || (is_fast_raider(e.unit_type) && dist <= BUNKER_RAIDER_ALERT_RADIUS)
            });

            if danger {
                if bunker.space_remaining() == 0 {
                    continue;
                }
                let marine = own_units
                    .iter()
                    .filter(|a| a.unit_type == UnitType::Marine && a.completed && !a.loaded)
                    .map(|a| (a.id, bunker.distance_to(a.position)))
                    .filter(|(_, dist)| *dist <= BUNKER_ALERT_RADIUS)
                    .min_by_key(|(_, dist)| OrderedFloat(*dist));
                if let Some((marine, _)) = marine {
                    self.battlefield.load(bunker.id, marine);
                }
            } else if bunker.cargo > 0 {
                self.battlefield.unload_all(bunker.id);
            }
        }
    }
}
