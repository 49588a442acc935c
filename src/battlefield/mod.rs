//! Narrow interfaces to the systems the squad layer consults
//!
//! Perception, terrain, the worker pool and the execution layer all live
//! outside this crate. The commander is handed one value implementing all
//! four traits at construction and queries it synchronously; every answer is
//! best-known data, possibly stale.

pub mod snapshot;

pub use snapshot::{ActionRecord, BattlefieldSnapshot, MapArea};

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, PartitionId, Position, Race, RegionId};
use crate::units::{Agent, EnemyUnit, UnitInfo};

/// Who holds a base location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseOwner {
    Me,
    Enemy,
    Neutral,
}

/// A resource location where a base can stand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseLocation {
    pub position: Position,
    pub owner: BaseOwner,
}

impl BaseLocation {
    pub fn new(position: Position, owner: BaseOwner) -> Self {
        Self { position, owner }
    }
}

/// Perception and memory of the battlefield
pub trait Intel {
    fn my_race(&self) -> Race;

    fn enemy_race(&self) -> Race;

    /// Our main base, guaranteed even if it has been destroyed
    fn my_main_base(&self) -> Position;

    fn enemy_main_base(&self) -> Option<Position>;

    /// Regions holding at least one of our buildings
    fn occupied_regions(&self) -> Vec<RegionId>;

    /// All our units and structures, completed or not
    fn own_units(&self) -> Vec<Agent>;

    /// Enemy units currently in sight
    fn enemy_units(&self) -> Vec<EnemyUnit>;

    /// Every enemy unit ever seen and not known dead
    fn enemy_unit_memory(&self) -> Vec<UnitInfo>;

    /// Remembered enemies whose last position is within `radius` of `center`
    fn nearby_enemy_force(&self, center: Position, radius: f32) -> Vec<UnitInfo> {
        self.enemy_unit_memory()
            .into_iter()
            .filter(|ui| ui.last_position.distance(&center) <= radius)
            .collect()
    }

    fn is_visible(&self, pos: Position) -> bool;

    fn enemy_has_anti_air(&self) -> bool;

    fn enemy_cloaked_units_seen(&self) -> bool;

    fn we_have_combat_units(&self) -> bool;

    /// The one write: tell perception the enemy is able to burrow
    fn enemy_seen_burrowing(&mut self);
}

/// Static map analysis: regions, ground connectivity, bases, exploration
pub trait Terrain {
    fn region_of(&self, pos: Position) -> Option<RegionId>;

    fn region_center(&self, region: RegionId) -> Option<Position>;

    fn partition_of(&self, pos: Position) -> PartitionId;

    /// Least explored location. When `ground_only` is set the search is
    /// restricted to `partition`.
    fn least_explored(&self, ground_only: bool, partition: PartitionId) -> Position;

    fn bases(&self) -> Vec<BaseLocation>;

    fn starting_base(&self) -> BaseLocation;

    fn natural_base(&self) -> Option<BaseLocation>;

    /// Home base reachable only by air
    fn is_island_start(&self) -> bool;

    fn connected_to_start(&self, pos: Position) -> bool {
        self.partition_of(pos) == self.partition_of(self.starting_base().position)
    }
}

/// Economy-side view of workers
pub trait WorkerPool {
    /// Not reserved for building, scouting or other economy jobs
    fn is_free(&self, worker: AgentId) -> bool;

    /// Worker has been pulled into combat
    fn set_combat_worker(&mut self, worker: AgentId);

    /// Worker is back under economy control
    fn release_worker(&mut self, worker: AgentId);
}

/// Fire-and-forget commands to the execution layer
pub trait Actions {
    fn load(&mut self, carrier: AgentId, passenger: AgentId);

    fn unload_all(&mut self, carrier: AgentId);

    fn scan(&mut self, target: Position);

    fn cancel_morph(&mut self, agent: AgentId);

    fn cancel_construction(&mut self, agent: AgentId);
}

/// Everything the commander needs from the outside world
pub trait Battlefield: Intel + Terrain + WorkerPool + Actions {}

impl<T: Intel + Terrain + WorkerPool + Actions> Battlefield for T {}
