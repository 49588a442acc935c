//! Base defense and scout defense
//!
//! Base-defense squads are spun up per occupied region when enemies walk in,
//! sized from the intruders minus our static defense, and emptied again once
//! the region is quiet. The scout-defense squad chases a lone enemy worker
//! out of the main with one of our own workers.

use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::battlefield::Battlefield;
use crate::commander::constants::*;
use crate::commander::events::CommanderEvent;
use crate::commander::{defense_squad_name, CombatCommander};
use crate::core::error::Result;
use crate::core::types::{AgentId, Position, RegionId};
use crate::squad::routing::{is_air_static_defense, is_ground_static_defense, is_harmless_flyer};
use crate::squad::{Squad, SquadOrder, SquadOrderKind, SquadPriority};
use crate::units::{Agent, EnemyUnit, UnitType};

/// Defenders wanted against `enemies` intruders when `statics` friendly
/// static defenses, each worth `static_value`, already cover the region.
/// Never fewer than the minimum.
pub fn defenders_needed(enemies: i32, statics: i32, static_value: i32) -> i32 {
    (DEFENDERS_PER_ENEMY * enemies - static_value * statics).max(MIN_DEFENDERS)
}

/// What one region needs from its defense squad this tick
#[derive(Debug, Clone, Copy)]
struct DefenseQuota {
    air: i32,
    ground: i32,
    pull_workers: bool,
    /// Intruders can shoot up, so flying defenders get no preference
    hostile_anti_air: bool,
}

impl<B: Battlefield> CombatCommander<B> {
    pub(super) fn update_base_defense_squads(&mut self) -> Result<()> {
        if self.combat_units.is_empty() {
            return Ok(());
        }

        let enemy_region = self
            .battlefield
            .enemy_main_base()
            .and_then(|pos| self.battlefield.region_of(pos));
        // a forward position inside the enemy main is never defended
        let occupied: Vec<RegionId> = self
            .battlefield
            .occupied_regions()
            .into_iter()
            .filter(|r| Some(*r) != enemy_region)
            .collect();
        let enemies = self.battlefield.enemy_units();
        let own_units = self.battlefield.own_units();

        self.retire_defense_squads(&occupied)?;

        for region in occupied {
            let Some(center) = self.battlefield.region_center(region) else {
                continue;
            };

            let mut hostiles: Vec<&EnemyUnit> = enemies
                .iter()
                .filter(|e| !is_harmless_flyer(e.unit_type) && !e.lifted)
                .filter(|e| self.battlefield.region_of(e.position) == Some(region))
                .collect();
            // the first worker is presumed to be a scout
            if let Some(scout) = hostiles.iter().position(|e| e.unit_type.is_worker()) {
                hostiles.remove(scout);
            }

            let name = defense_squad_name(region);
            if hostiles.is_empty() {
                if self.squads.squad_exists(&name) {
                    self.clear_squad(&name)?;
                }
                continue;
            }

            if !self.squads.squad_exists(&name) {
                let order = SquadOrder::new(SquadOrderKind::Defend, center, BASE_DEFENSE_RADIUS, "Defend region");
                self.squads.add_squad(Squad::new(name.clone(), order, SquadPriority::BaseDefense))?;
                self.defended_regions.insert(region);
                debug!(squad = %name, region = region.0, "Base defense squad created");
                self.events.push(self.tick, CommanderEvent::SquadCreated { squad: name.clone() });
            }

            let quota = self.defense_quota(region, &hostiles, &own_units, &enemies);
            self.update_defense_squad_units(&name, quota)?;
        }

        // any defend squad with nothing left in range stands down
        for name in self.squads.squad_names() {
            let squad = self.squads.squad(&name)?;
            if squad.order().kind() != SquadOrderKind::Defend || squad.is_empty() {
                continue;
            }
            let order = squad.order();
            if !enemies.iter().any(|e| order.covers(e.position)) {
                self.clear_squad(&name)?;
            }
        }

        Ok(())
    }

    /// Forget defense squads whose region we no longer hold
    fn retire_defense_squads(&mut self, occupied: &[RegionId]) -> Result<()> {
        let retired: Vec<RegionId> = self
            .defended_regions
            .iter()
            .filter(|r| !occupied.contains(r))
            .copied()
            .collect();

        for region in retired {
            let name = defense_squad_name(region);
            self.clear_squad(&name)?;
            self.squads.remove_squad(&name)?;
            self.defended_regions.remove(&region);
            debug!(squad = %name, "Base defense squad removed");
            self.events.push(self.tick, CommanderEvent::SquadRemoved { squad: name });
        }
        Ok(())
    }

    fn defense_quota(
        &self,
        region: RegionId,
        hostiles: &[&EnemyUnit],
        own_units: &[Agent],
        enemies: &[EnemyUnit],
    ) -> DefenseQuota {
        let air_enemies = hostiles.iter().filter(|e| e.is_flying()).count() as i32;
        let ground_enemies = hostiles.len() as i32 - air_enemies;

        // bunkers are ignored; cannons count toward both quotas
        let statics: Vec<&Agent> = own_units
            .iter()
            .filter(|a| a.completed && a.powered)
            .filter(|a| self.battlefield.region_of(a.position) == Some(region))
            .collect();
        let air_statics = statics.iter().filter(|a| is_air_static_defense(a.unit_type)).count() as i32;
        let ground_statics = statics.iter().filter(|a| is_ground_static_defense(a.unit_type)).count() as i32;

        let pull_workers = self.config.workers_defend_rush
            && ((ground_statics == 0 && self.zerglings_near_main(enemies) > 0) || self.building_rush(enemies));

        DefenseQuota {
            air: defenders_needed(air_enemies, air_statics, AIR_STATIC_DEFENSE_VALUE),
            ground: defenders_needed(ground_enemies, ground_statics, GROUND_STATIC_DEFENSE_VALUE),
            pull_workers,
            hostile_anti_air: hostiles.iter().any(|e| e.unit_type.can_attack_air()),
        }
    }

    fn zerglings_near_main(&self, enemies: &[EnemyUnit]) -> usize {
        let main = self.battlefield.my_main_base();
        enemies
            .iter()
            .filter(|e| e.unit_type == UnitType::Zergling && e.position.distance(&main) < LIGHT_MELEE_CONCERN_RADIUS)
            .count()
    }

    /// An enemy building near our main while we have no army
    fn building_rush(&self, enemies: &[EnemyUnit]) -> bool {
        if self.battlefield.we_have_combat_units() {
            return false;
        }
        let main = self.battlefield.my_main_base();
        enemies
            .iter()
            .any(|e| e.unit_type.is_building() && e.position.distance(&main) < BUILDING_RUSH_RADIUS)
    }

    fn update_defense_squad_units(&mut self, name: &str, quota: DefenseQuota) -> Result<()> {
        let want_detector = self.want_squad_detectors();
        let has_detector = self.squads.squad(name)?.has_detector(&self.roster);
        if has_detector && !want_detector {
            self.remove_detector(name)?;
        } else if !has_detector && want_detector {
            let detector = self
                .combat_units
                .iter()
                .find(|a| a.unit_type.is_detector() && self.squads.can_assign_unit_to_squad(a.id, name))
                .map(|a| a.id);
            if let Some(id) = detector {
                self.squads.assign_unit_to_squad(id, name)?;
            }
        }

        let squad = self.squads.squad(name)?;
        let position = squad.order().position();
        // members with both weapons count toward both quotas
        let air_defenders = squad.agents(&self.roster).filter(|a| a.can_attack_air()).count() as i32;
        let ground_defenders = squad.agents(&self.roster).filter(|a| a.can_attack_ground()).count() as i32;

        let mut added = 0;
        while quota.air > air_defenders + added {
            let Some(id) = self.find_closest_defender(name, position, true, false, quota.hostile_anti_air) else {
                break;
            };
            self.squads.assign_unit_to_squad(id, name)?;
            added += 1;
        }

        let mut added = 0;
        while quota.ground > ground_defenders + added {
            let Some(id) =
                self.find_closest_defender(name, position, false, quota.pull_workers, quota.hostile_anti_air)
            else {
                break;
            };
            let is_worker = self.roster.get(&id).is_some_and(|a| a.unit_type.is_worker());
            if is_worker {
                self.pull_worker_into(id, name)?;
            } else {
                self.squads.assign_unit_to_squad(id, name)?;
            }
            added += 1;
        }

        Ok(())
    }

    fn find_closest_defender(
        &self,
        squad: &str,
        position: Position,
        flying_defender: bool,
        pull_workers: bool,
        hostile_anti_air: bool,
    ) -> Option<AgentId> {
        self.combat_units
            .iter()
            .filter(|a| {
                if flying_defender {
                    a.can_attack_air()
                } else {
                    a.can_attack_ground()
                }
            })
            .filter(|a| self.squads.can_assign_unit_to_squad(a.id, squad))
            .filter_map(|a| {
                let dist = a.distance_to(position);
                // workers only when allowed, and never from distant bases
                if a.unit_type.is_worker() && (!pull_workers || dist > WORKER_PULL_RANGE) {
                    return None;
                }
                let dist = if !hostile_anti_air && a.is_flying() {
                    dist - FLYING_DEFENDER_BONUS
                } else {
                    dist
                };
                Some((a.id, dist))
            })
            .min_by_key(|(_, dist)| OrderedFloat(*dist))
            .map(|(id, _)| id)
    }

    pub(super) fn update_scout_defense_squad(&mut self) -> Result<()> {
        if self.config.scout_defense_radius == 0 || self.combat_units.is_empty() {
            return Ok(());
        }
        if !self.squads.squad_exists(SCOUT_DEFENSE_SQUAD) {
            return Ok(());
        }

        let start = self.battlefield.starting_base().position;
        let Some(home) = self.battlefield.region_of(start) else {
            warn!(x = start.x, y = start.y, "Starting base has no region; scout defense skipped");
            return Ok(());
        };

        let intruders: Vec<EnemyUnit> = self
            .battlefield
            .enemy_units()
            .into_iter()
            .filter(|e| self.battlefield.region_of(e.position) == Some(home))
            .collect();

        let lone_scout = match intruders.as_slice() {
            [only] if only.unit_type.is_worker() => Some(only.position),
            _ => None,
        };

        match lone_scout {
            Some(scout) => {
                if self.squads.squad(SCOUT_DEFENSE_SQUAD)?.is_empty() {
                    if let Some(worker) = self.closest_worker_to(scout) {
                        if self.squads.can_assign_unit_to_squad(worker, SCOUT_DEFENSE_SQUAD) {
                            self.pull_worker_into(worker, SCOUT_DEFENSE_SQUAD)?;
                        }
                    }
                }
            }
            None => {
                if !self.squads.squad(SCOUT_DEFENSE_SQUAD)?.is_empty() {
                    self.clear_squad(SCOUT_DEFENSE_SQUAD)?;
                }
            }
        }
        Ok(())
    }

    /// Closest free worker to the enemy scout, penalizing mineral carriers.
    /// Workers further than the defense radius plus a margin are not pulled.
    fn closest_worker_to(&self, target: Position) -> Option<AgentId> {
        let cutoff = self.config.scout_defense_radius as f32 + SCOUT_DEFENSE_EXTRA_RANGE;
        self.combat_units
            .iter()
            .filter(|a| a.unit_type.is_worker() && self.battlefield.is_free(a.id))
            .map(|a| {
                let penalty = if a.carrying_minerals { MINERAL_CARRIER_PENALTY } else { 0.0 };
                (a.id, a.distance_to(target) + penalty)
            })
            .filter(|(_, dist)| *dist < cutoff)
            .min_by_key(|(_, dist)| OrderedFloat(*dist))
            .map(|(id, _)| id)
    }
}
