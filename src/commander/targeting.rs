//! Attack, defense and drop target selection
//!
//! Pure functions of the battlefield and a squad's composition. Nothing here
//! is random, so identical inputs always produce the same point.

use crate::battlefield::{BaseOwner, Intel, Terrain};
use crate::commander::constants::{
    ATTACK_RADIUS, BASE_SCORING_RADIUS, DEFEND_FRONT_RADIUS, UNREACHABLE_TARGET_OVERRIDE,
};
use crate::core::types::{PartitionId, Position, Race};
use crate::squad::routing::is_slow_defender;
use crate::squad::{Squad, SquadOrder, SquadOrderKind};
use crate::units::{AgentRoster, UnitInfo, UnitType};

/// What a squad can reach and hit, summarized for target selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquadProfile {
    pub has_ground: bool,
    pub has_air: bool,
    pub can_attack_ground: bool,
    pub can_attack_air: bool,
    pub center: Position,
    pub partition: PartitionId,
}

impl SquadProfile {
    /// Profile of a squad that has no members yet: assumed to be a ground
    /// force standing at the starting base.
    pub fn unformed<T: Terrain + ?Sized>(terrain: &T) -> Self {
        let center = terrain.starting_base().position;
        Self {
            has_ground: true,
            has_air: false,
            can_attack_ground: true,
            can_attack_air: false,
            center,
            partition: terrain.partition_of(center),
        }
    }

    pub fn of<T: Terrain + ?Sized>(squad: &Squad, roster: &AgentRoster, terrain: &T) -> Self {
        let Some(center) = squad.calc_center(roster) else {
            return Self::unformed(terrain);
        };
        Self {
            has_ground: squad.has_ground(roster),
            has_air: squad.has_air(roster),
            can_attack_ground: squad.can_attack_ground(roster),
            can_attack_air: squad.can_attack_air(roster),
            center,
            partition: terrain.partition_of(center),
        }
    }

    /// Could this enemy type shoot at some member of the squad?
    fn threatened_by(&self, enemy: UnitType) -> bool {
        (self.has_ground && enemy.can_attack_ground())
            || (self.has_air && enemy.can_attack_air())
            || enemy == UnitType::HighTemplar
    }

    /// Ground squads only chase what they can walk to
    fn reaches(&self, partition: PartitionId) -> bool {
        !self.has_ground || self.partition == partition
    }
}

/// The front line: our natural if we own it, else the starting base
pub fn defense_location<T: Terrain + ?Sized>(terrain: &T) -> Position {
    match terrain.natural_base() {
        Some(natural) if natural.owner == BaseOwner::Me => natural.position,
        _ => terrain.starting_base().position,
    }
}

/// Order for a main attack squad. Defensive posture holds the front line.
pub fn attack_order<B: Intel + Terrain + ?Sized>(
    battlefield: &B,
    profile: &SquadProfile,
    aggressive: bool,
) -> SquadOrder {
    if !aggressive {
        return SquadOrder::new(
            SquadOrderKind::Attack,
            defense_location(battlefield),
            DEFEND_FRONT_RADIUS,
            "Defend front",
        );
    }

    SquadOrder::new(
        SquadOrderKind::Attack,
        attack_location(battlefield, profile),
        ATTACK_RADIUS,
        "Attack enemy",
    )
}

/// Choose a point of attack. First applicable rule wins:
/// the least defended reachable enemy base, a remembered enemy building,
/// a visible enemy unit, and finally the least explored area.
pub fn attack_location<B: Intel + Terrain + ?Sized>(battlefield: &B, profile: &SquadProfile) -> Position {
    if profile.can_attack_ground {
        if let Some(base) = weakest_enemy_base(battlefield, profile) {
            return base;
        }
    }

    if profile.can_attack_ground || battlefield.enemy_race() == Race::Terran {
        if let Some(building) = remembered_building_target(battlefield, profile) {
            return building;
        }
    }

    if let Some(unit) = visible_unit_target(battlefield, profile) {
        return unit;
    }

    battlefield.least_explored(profile.has_ground && !profile.has_air, profile.partition)
}

fn weakest_enemy_base<B: Intel + Terrain + ?Sized>(battlefield: &B, profile: &SquadProfile) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;

    for base in battlefield.bases() {
        if base.owner != BaseOwner::Enemy || !profile.reaches(battlefield.partition_of(base.position)) {
            continue;
        }

        let score = -(battlefield
            .nearby_enemy_force(base.position, BASE_SCORING_RADIUS)
            .iter()
            .filter(|enemy| is_static_threat(enemy) && profile.threatened_by(enemy.unit_type))
            .count() as i32);

        // strict comparison: the first of equally defended bases wins
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((base.position, score));
        }
    }

    best.map(|(position, _)| position)
}

fn is_static_threat(enemy: &UnitInfo) -> bool {
    enemy.unit_type.is_building() || is_slow_defender(enemy.unit_type)
}

fn remembered_building_target<B: Intel + Terrain + ?Sized>(
    battlefield: &B,
    profile: &SquadProfile,
) -> Option<Position> {
    battlefield
        .enemy_unit_memory()
        .into_iter()
        .filter(|ui| ui.unit_type.is_building() && !ui.gone_from_last_position)
        .filter(|ui| {
            !profile.has_ground
                || (!ui.unit_type.is_refinery()
                    && profile.partition == battlefield.partition_of(ui.last_position))
        })
        // lifted buildings are only a target for squads that can shoot air
        .find(|ui| !ui.lifted || profile.can_attack_air)
        .map(|ui| ui.last_position)
}

fn visible_unit_target<B: Intel + Terrain + ?Sized>(battlefield: &B, profile: &SquadProfile) -> Option<Position> {
    battlefield
        .enemy_units()
        .into_iter()
        .filter(|unit| unit.unit_type != UnitType::Larva && unit.detected)
        .filter(|unit| {
            profile.reaches(battlefield.partition_of(unit.position))
                || unit.position.distance(&profile.center) <= UNREACHABLE_TARGET_OVERRIDE
        })
        .find(|unit| {
            if unit.is_flying() {
                profile.can_attack_air
            } else {
                profile.can_attack_ground
            }
        })
        .map(|unit| unit.position)
}

/// Where the drop squad goes once loaded
pub fn drop_location<B: Intel + Terrain + ?Sized>(battlefield: &B) -> Position {
    if let Some(main) = battlefield.enemy_main_base() {
        return main;
    }

    battlefield
        .enemy_unit_memory()
        .into_iter()
        .find(|ui| ui.unit_type.is_building() && !ui.gone_from_last_position)
        .map(|ui| ui.last_position)
        .unwrap_or_else(|| {
            let start = battlefield.partition_of(battlefield.starting_base().position);
            battlefield.least_explored(false, start)
        })
}

/// Neutral bases the recon squad may visit. An island start can only fly,
/// so every neutral base is fair game.
pub fn recon_candidates<T: Terrain + ?Sized>(terrain: &T) -> Vec<Position> {
    let island = terrain.is_island_start();
    terrain
        .bases()
        .into_iter()
        .filter(|base| base.owner == BaseOwner::Neutral)
        .filter(|base| island || terrain.connected_to_start(base.position))
        .map(|base| base.position)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::{BaseLocation, BattlefieldSnapshot, MapArea};
    use crate::core::types::AgentId;
    use crate::units::EnemyUnit;

    fn snapshot() -> BattlefieldSnapshot {
        let mut snap = BattlefieldSnapshot::new(Race::Protoss, Position::new(100, 100));
        snap.least_explored = Position::new(2000, 2000);
        snap
    }

    fn ground_profile() -> SquadProfile {
        SquadProfile {
            has_ground: true,
            has_air: false,
            can_attack_ground: true,
            can_attack_air: false,
            center: Position::new(100, 100),
            partition: PartitionId(0),
        }
    }

    #[test]
    fn test_defensive_posture_holds_front() {
        let mut snap = snapshot();
        snap.natural = Some(Position::new(400, 400));
        let order = attack_order(&snap, &ground_profile(), false);
        assert_eq!(order.position(), Position::new(100, 100));
        assert_eq!(order.radius(), DEFEND_FRONT_RADIUS);
        assert_eq!(order.label(), "Defend front");

        snap.bases.push(BaseLocation::new(Position::new(400, 400), BaseOwner::Me));
        let order = attack_order(&snap, &ground_profile(), false);
        assert_eq!(order.position(), Position::new(400, 400));
    }

    #[test]
    fn test_weakest_enemy_base_chosen() {
        let mut snap = snapshot();
        snap.bases.push(BaseLocation::new(Position::new(3000, 0), BaseOwner::Enemy));
        snap.bases.push(BaseLocation::new(Position::new(0, 3000), BaseOwner::Enemy));
        snap.enemy_memory.push(UnitInfo::new(AgentId(1), UnitType::PhotonCannon, Position::new(3100, 0)));

        let order = attack_order(&snap, &ground_profile(), true);
        assert_eq!(order.position(), Position::new(0, 3000));
        assert_eq!(order.radius(), ATTACK_RADIUS);
        assert_eq!(order.label(), "Attack enemy");
    }

    #[test]
    fn test_equal_scores_keep_first_base() {
        let mut snap = snapshot();
        snap.bases.push(BaseLocation::new(Position::new(3000, 0), BaseOwner::Enemy));
        snap.bases.push(BaseLocation::new(Position::new(0, 3000), BaseOwner::Enemy));
        assert_eq!(attack_location(&snap, &ground_profile()), Position::new(3000, 0));
    }

    #[test]
    fn test_harmless_buildings_do_not_lower_score() {
        let mut snap = snapshot();
        snap.bases.push(BaseLocation::new(Position::new(3000, 0), BaseOwner::Enemy));
        snap.bases.push(BaseLocation::new(Position::new(0, 3000), BaseOwner::Enemy));
        // a pylon cannot shoot, so the first base is still as good as the second
        snap.enemy_memory.push(UnitInfo::new(AgentId(1), UnitType::Pylon, Position::new(3100, 0)));
        assert_eq!(attack_location(&snap, &ground_profile()), Position::new(3000, 0));
    }

    #[test]
    fn test_unreachable_base_skipped_by_ground_squad() {
        let mut snap = snapshot();
        snap.add_partition(PartitionId(1), MapArea::new(2500, 0, 4000, 1000));
        snap.bases.push(BaseLocation::new(Position::new(3000, 0), BaseOwner::Enemy));

        assert_eq!(attack_location(&snap, &ground_profile()), Position::new(2000, 2000));

        let air = SquadProfile {
            has_ground: false,
            has_air: true,
            can_attack_air: true,
            ..ground_profile()
        };
        assert_eq!(attack_location(&snap, &air), Position::new(3000, 0));
    }

    #[test]
    fn test_remembered_building_skips_gone_and_refinery() {
        let mut snap = snapshot();
        let mut gone = UnitInfo::new(AgentId(1), UnitType::Gateway, Position::new(500, 500));
        gone.gone_from_last_position = true;
        snap.enemy_memory.push(gone);
        snap.enemy_memory.push(UnitInfo::new(AgentId(2), UnitType::Assimilator, Position::new(600, 600)));
        snap.enemy_memory.push(UnitInfo::new(AgentId(3), UnitType::Pylon, Position::new(700, 700)));

        assert_eq!(attack_location(&snap, &ground_profile()), Position::new(700, 700));
    }

    #[test]
    fn test_lifted_building_needs_anti_air() {
        let mut snap = snapshot();
        snap.enemy_race = Race::Terran;
        let mut barracks = UnitInfo::new(AgentId(1), UnitType::Barracks, Position::new(500, 500));
        barracks.lifted = true;
        snap.enemy_memory.push(barracks);

        assert_eq!(attack_location(&snap, &ground_profile()), Position::new(2000, 2000));

        let mixed = SquadProfile { can_attack_air: true, ..ground_profile() };
        assert_eq!(attack_location(&snap, &mixed), Position::new(500, 500));
    }

    #[test]
    fn test_visible_units_skip_larva_and_undetected() {
        let mut snap = snapshot();
        snap.enemy_units.push(EnemyUnit::new(AgentId(1), UnitType::Larva, Position::new(300, 300)));
        let mut dark = EnemyUnit::new(AgentId(2), UnitType::DarkTemplar, Position::new(310, 310));
        dark.detected = false;
        snap.enemy_units.push(dark);
        snap.enemy_units.push(EnemyUnit::new(AgentId(3), UnitType::Zealot, Position::new(320, 320)));

        assert_eq!(attack_location(&snap, &ground_profile()), Position::new(320, 320));
    }

    #[test]
    fn test_nearby_unreachable_unit_allowed() {
        let mut snap = snapshot();
        snap.add_partition(PartitionId(1), MapArea::new(250, 0, 1000, 1000));
        snap.enemy_units.push(EnemyUnit::new(AgentId(1), UnitType::Zealot, Position::new(900, 100)));
        snap.enemy_units.push(EnemyUnit::new(AgentId(2), UnitType::Zealot, Position::new(300, 100)));

        assert_eq!(attack_location(&snap, &ground_profile()), Position::new(300, 100));
    }

    #[test]
    fn test_flying_units_need_anti_air() {
        let mut snap = snapshot();
        snap.enemy_units.push(EnemyUnit::new(AgentId(1), UnitType::Mutalisk, Position::new(300, 300)));
        assert_eq!(attack_location(&snap, &ground_profile()), Position::new(2000, 2000));
    }

    #[test]
    fn test_target_selection_is_deterministic() {
        let mut snap = snapshot();
        snap.bases.push(BaseLocation::new(Position::new(3000, 0), BaseOwner::Enemy));
        snap.enemy_units.push(EnemyUnit::new(AgentId(1), UnitType::Zealot, Position::new(320, 320)));
        let profile = ground_profile();
        assert_eq!(attack_location(&snap, &profile), attack_location(&snap, &profile));
    }

    #[test]
    fn test_drop_location_prefers_enemy_main() {
        let mut snap = snapshot();
        snap.enemy_memory.push(UnitInfo::new(AgentId(3), UnitType::Pylon, Position::new(700, 700)));
        assert_eq!(drop_location(&snap), Position::new(700, 700));

        snap.enemy_main_base = Some(Position::new(3500, 3500));
        assert_eq!(drop_location(&snap), Position::new(3500, 3500));
    }

    #[test]
    fn test_drop_location_falls_back_to_exploration() {
        let snap = snapshot();
        assert_eq!(drop_location(&snap), Position::new(2000, 2000));
    }

    #[test]
    fn test_recon_candidates_connected_neutral_only() {
        let mut snap = snapshot();
        snap.add_partition(PartitionId(1), MapArea::new(5000, 0, 6000, 1000));
        snap.bases.push(BaseLocation::new(Position::new(1000, 1000), BaseOwner::Neutral));
        snap.bases.push(BaseLocation::new(Position::new(5500, 500), BaseOwner::Neutral));
        snap.bases.push(BaseLocation::new(Position::new(3000, 0), BaseOwner::Enemy));

        assert_eq!(recon_candidates(&snap), vec![Position::new(1000, 1000)]);

        snap.island_start = true;
        assert_eq!(
            recon_candidates(&snap),
            vec![Position::new(1000, 1000), Position::new(5500, 500)]
        );
    }
}
