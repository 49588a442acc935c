//! In-memory battlefield
//!
//! A plain-data implementation of every collaborator trait. Hosts can fill it
//! each tick from their own state; tests and the headless runner load it
//! directly. Commands sent to the execution layer are recorded, not executed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::battlefield::{Actions, BaseLocation, BaseOwner, Intel, Terrain, WorkerPool};
use crate::core::types::{AgentId, PartitionId, Position, Race, RegionId};
use crate::units::{Agent, EnemyUnit, UnitInfo};

/// Axis-aligned rectangle, left/top inclusive, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl MapArea {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.left && pos.x < self.right && pos.y >= self.top && pos.y < self.bottom
    }

    pub fn center(&self) -> Position {
        Position::new((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionArea {
    pub id: RegionId,
    pub area: MapArea,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionArea {
    pub id: PartitionId,
    pub area: MapArea,
}

/// A command the commander sent to the execution layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionRecord {
    Load { carrier: AgentId, passenger: AgentId },
    UnloadAll { carrier: AgentId },
    Scan { target: Position },
    CancelMorph { agent: AgentId },
    CancelConstruction { agent: AgentId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattlefieldSnapshot {
    #[serde(default)]
    pub my_race: Race,
    #[serde(default)]
    pub enemy_race: Race,
    pub my_main_base: Position,
    #[serde(default)]
    pub enemy_main_base: Option<Position>,
    #[serde(default)]
    pub natural: Option<Position>,
    #[serde(default)]
    pub island_start: bool,

    #[serde(default)]
    pub own_units: Vec<Agent>,
    #[serde(default)]
    pub enemy_units: Vec<EnemyUnit>,
    #[serde(default)]
    pub enemy_memory: Vec<UnitInfo>,

    /// First matching area wins
    #[serde(default)]
    pub regions: Vec<RegionArea>,
    /// Positions outside every listed area are in partition 0
    #[serde(default)]
    pub partitions: Vec<PartitionArea>,
    #[serde(default)]
    pub bases: Vec<BaseLocation>,
    #[serde(default)]
    pub occupied_regions: Vec<RegionId>,
    #[serde(default)]
    pub visible_areas: Vec<MapArea>,
    #[serde(default)]
    pub least_explored: Position,

    #[serde(default)]
    pub enemy_has_anti_air: bool,
    #[serde(default)]
    pub enemy_cloaked_units_seen: bool,
    #[serde(default)]
    pub we_have_combat_units: bool,
    #[serde(default)]
    pub enemy_burrowing_seen: bool,

    /// Workers busy with economy jobs
    #[serde(default)]
    pub reserved_workers: BTreeSet<AgentId>,
    #[serde(default)]
    pub combat_workers: BTreeSet<AgentId>,
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

impl BattlefieldSnapshot {
    pub fn new(my_race: Race, my_main_base: Position) -> Self {
        Self {
            my_race,
            enemy_race: Race::Unknown,
            my_main_base,
            enemy_main_base: None,
            natural: None,
            island_start: false,
            own_units: Vec::new(),
            enemy_units: Vec::new(),
            enemy_memory: Vec::new(),
            regions: Vec::new(),
            partitions: Vec::new(),
            bases: vec![BaseLocation::new(my_main_base, BaseOwner::Me)],
            occupied_regions: Vec::new(),
            visible_areas: Vec::new(),
            least_explored: Position::default(),
            enemy_has_anti_air: false,
            enemy_cloaked_units_seen: false,
            we_have_combat_units: false,
            enemy_burrowing_seen: false,
            reserved_workers: BTreeSet::new(),
            combat_workers: BTreeSet::new(),
            actions: Vec::new(),
        }
    }

    pub fn add_region(&mut self, id: RegionId, area: MapArea) {
        self.regions.push(RegionArea { id, area });
    }

    pub fn add_partition(&mut self, id: PartitionId, area: MapArea) {
        self.partitions.push(PartitionArea { id, area });
    }

    /// Take the recorded actions, leaving the log empty
    pub fn drain_actions(&mut self) -> Vec<ActionRecord> {
        std::mem::take(&mut self.actions)
    }

    fn base_at(&self, pos: Position) -> Option<BaseLocation> {
        self.bases.iter().find(|b| b.position == pos).copied()
    }
}

impl Intel for BattlefieldSnapshot {
    fn my_race(&self) -> Race {
        self.my_race
    }

    fn enemy_race(&self) -> Race {
        self.enemy_race
    }

    fn my_main_base(&self) -> Position {
        self.my_main_base
    }

    fn enemy_main_base(&self) -> Option<Position> {
        self.enemy_main_base
    }

    fn occupied_regions(&self) -> Vec<RegionId> {
        self.occupied_regions.clone()
    }

    fn own_units(&self) -> Vec<Agent> {
        self.own_units.clone()
    }

    fn enemy_units(&self) -> Vec<EnemyUnit> {
        self.enemy_units.clone()
    }

    fn enemy_unit_memory(&self) -> Vec<UnitInfo> {
        self.enemy_memory.clone()
    }

    fn is_visible(&self, pos: Position) -> bool {
        self.visible_areas.iter().any(|a| a.contains(pos))
    }

    fn enemy_has_anti_air(&self) -> bool {
        self.enemy_has_anti_air
    }

    fn enemy_cloaked_units_seen(&self) -> bool {
        self.enemy_cloaked_units_seen
    }

    fn we_have_combat_units(&self) -> bool {
        self.we_have_combat_units
    }

    fn enemy_seen_burrowing(&mut self) {
        self.enemy_burrowing_seen = true;
    }
}

impl Terrain for BattlefieldSnapshot {
    fn region_of(&self, pos: Position) -> Option<RegionId> {
        self.regions
            .iter()
            .find(|r| r.area.contains(pos))
            .map(|r| r.id)
    }

    fn region_center(&self, region: RegionId) -> Option<Position> {
        self.regions
            .iter()
            .find(|r| r.id == region)
            .map(|r| r.area.center())
    }

    fn partition_of(&self, pos: Position) -> PartitionId {
        self.partitions
            .iter()
            .find(|p| p.area.contains(pos))
            .map(|p| p.id)
            .unwrap_or_default()
    }

    fn least_explored(&self, _ground_only: bool, _partition: PartitionId) -> Position {
        self.least_explored
    }

    fn bases(&self) -> Vec<BaseLocation> {
        self.bases.clone()
    }

    fn starting_base(&self) -> BaseLocation {
        self.base_at(self.my_main_base)
            .unwrap_or_else(|| BaseLocation::new(self.my_main_base, BaseOwner::Me))
    }

    fn natural_base(&self) -> Option<BaseLocation> {
        self.natural.map(|pos| {
            self.base_at(pos)
                .unwrap_or_else(|| BaseLocation::new(pos, BaseOwner::Neutral))
        })
    }

    fn is_island_start(&self) -> bool {
        self.island_start
    }
}

impl WorkerPool for BattlefieldSnapshot {
    fn is_free(&self, worker: AgentId) -> bool {
        !self.reserved_workers.contains(&worker)
    }

    fn set_combat_worker(&mut self, worker: AgentId) {
        self.combat_workers.insert(worker);
    }

    fn release_worker(&mut self, worker: AgentId) {
        self.combat_workers.remove(&worker);
    }
}

impl Actions for BattlefieldSnapshot {
    fn load(&mut self, carrier: AgentId, passenger: AgentId) {
        self.actions.push(ActionRecord::Load { carrier, passenger });
    }

    fn unload_all(&mut self, carrier: AgentId) {
        self.actions.push(ActionRecord::UnloadAll { carrier });
    }

    fn scan(&mut self, target: Position) {
        self.actions.push(ActionRecord::Scan { target });
    }

    fn cancel_morph(&mut self, agent: AgentId) {
        self.actions.push(ActionRecord::CancelMorph { agent });
    }

    fn cancel_construction(&mut self, agent: AgentId) {
        self.actions.push(ActionRecord::CancelConstruction { agent });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitType;

    #[test]
    fn test_region_lookup_first_match() {
        let mut snap = BattlefieldSnapshot::new(Race::Protoss, Position::new(100, 100));
        snap.add_region(RegionId(1), MapArea::new(0, 0, 200, 200));
        snap.add_region(RegionId(2), MapArea::new(0, 0, 400, 400));

        assert_eq!(snap.region_of(Position::new(50, 50)), Some(RegionId(1)));
        assert_eq!(snap.region_of(Position::new(300, 300)), Some(RegionId(2)));
        assert_eq!(snap.region_of(Position::new(500, 500)), None);
        assert_eq!(snap.region_center(RegionId(2)), Some(Position::new(200, 200)));
    }

    #[test]
    fn test_partitions_default_to_zero() {
        let mut snap = BattlefieldSnapshot::new(Race::Terran, Position::new(0, 0));
        snap.add_partition(PartitionId(3), MapArea::new(1000, 0, 2000, 1000));

        assert_eq!(snap.partition_of(Position::new(10, 10)), PartitionId(0));
        assert_eq!(snap.partition_of(Position::new(1500, 10)), PartitionId(3));
        assert!(snap.connected_to_start(Position::new(500, 500)));
        assert!(!snap.connected_to_start(Position::new(1500, 500)));
    }

    #[test]
    fn test_nearby_enemy_force_filters_by_radius() {
        let mut snap = BattlefieldSnapshot::new(Race::Zerg, Position::new(0, 0));
        snap.enemy_memory.push(UnitInfo::new(AgentId(1), UnitType::PhotonCannon, Position::new(100, 0)));
        snap.enemy_memory.push(UnitInfo::new(AgentId(2), UnitType::PhotonCannon, Position::new(900, 0)));

        let near = snap.nearby_enemy_force(Position::new(0, 0), 600.0);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].id, AgentId(1));
    }

    #[test]
    fn test_actions_are_recorded() {
        let mut snap = BattlefieldSnapshot::new(Race::Terran, Position::new(0, 0));
        snap.load(AgentId(1), AgentId(2));
        snap.scan(Position::new(5, 5));
        let actions = snap.drain_actions();
        assert_eq!(
            actions,
            vec![
                ActionRecord::Load { carrier: AgentId(1), passenger: AgentId(2) },
                ActionRecord::Scan { target: Position::new(5, 5) },
            ]
        );
        assert!(snap.actions.is_empty());
    }

    #[test]
    fn test_natural_owner_follows_bases() {
        let mut snap = BattlefieldSnapshot::new(Race::Protoss, Position::new(0, 0));
        snap.natural = Some(Position::new(500, 500));
        assert_eq!(snap.natural_base().map(|b| b.owner), Some(BaseOwner::Neutral));
        snap.bases.push(BaseLocation::new(Position::new(500, 500), BaseOwner::Me));
        assert_eq!(snap.natural_base().map(|b| b.owner), Some(BaseOwner::Me));
    }
}
