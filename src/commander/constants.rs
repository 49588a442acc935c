//! Commander constants - tactical tuning in one place
//!
//! Distances are in pixels (32 per tile), times in ticks (24 per second).

use crate::core::types::TILE_SIZE;

// Fixed squad names
pub const IDLE_SQUAD: &str = "Idle";
pub const OVERLORD_SQUAD: &str = "Overlord";
pub const GROUND_SQUAD: &str = "Ground";
pub const FLYING_SQUAD: &str = "Flying";
pub const RECON_SQUAD: &str = "Recon";
pub const SCOUT_DEFENSE_SQUAD: &str = "ScoutDefense";
pub const DROP_SQUAD: &str = "Drop";
/// Base-defense squads are named with this prefix plus the region id
pub const BASE_DEFENSE_PREFIX: &str = "Base ";

// Attack squads
pub const DEFEND_FRONT_RADIUS: i32 = 400;
pub const ATTACK_RADIUS: i32 = 800;
/// Radius around an enemy base in which its defenders are counted
pub const BASE_SCORING_RADIUS: f32 = 600.0;
/// Ground squads may chase an unreachable enemy this close to their center
pub const UNREACHABLE_TARGET_OVERRIDE: f32 = 300.0;

// Recon squad
pub const RECON_TARGET_TIMEOUT: u64 = 40 * 24;
pub const RECON_RADIUS: i32 = 400;
pub const RECON_COMBAT_SIM_RADIUS: i32 = 200;
pub const RECON_MAX_WEIGHT: i32 = 12;
/// Below this much available weight the recon squad stays empty
pub const RECON_MIN_AVAILABLE_WEIGHT: i32 = 24;
pub const RECON_BASE_WEIGHT: i32 = 2;
/// One more unit of budget per this much available weight over the minimum
pub const RECON_WEIGHT_STEP: i32 = 6;
pub const RECON_MAX_SUPPORT: usize = 2;

// Base defense
pub const BASE_DEFENSE_RADIUS: i32 = 25 * TILE_SIZE;
pub const DEFENDERS_PER_ENEMY: i32 = 2;
pub const AIR_STATIC_DEFENSE_VALUE: i32 = 3;
pub const GROUND_STATIC_DEFENSE_VALUE: i32 = 4;
pub const MIN_DEFENDERS: i32 = 2;
pub const WORKER_PULL_RANGE: f32 = (24 * TILE_SIZE) as f32;
/// Distance credit for flying defenders when the enemy cannot shoot up
pub const FLYING_DEFENDER_BONUS: f32 = (12 * TILE_SIZE) as f32;
/// Light melee this close to the main base justifies pulling workers
pub const LIGHT_MELEE_CONCERN_RADIUS: f32 = 300.0;
pub const BUILDING_RUSH_RADIUS: f32 = 1200.0;

// Scout defense
pub const SCOUT_DEFENSE_EXTRA_RANGE: f32 = 128.0;
pub const MINERAL_CARRIER_PENALTY: f32 = 96.0;

// Drop squad
pub const TRANSPORT_CAPACITY: i32 = 8;
pub const DROP_RADIUS: i32 = 300;

// Bunkers
pub const BUNKER_ALERT_RADIUS: f32 = (12 * TILE_SIZE) as f32;
pub const BUNKER_RAIDER_ALERT_RADIUS: f32 = (18 * TILE_SIZE) as f32;

// Cancellation sweep
pub const CANCEL_HIT_POINTS: u32 = 30;
/// Morphing sunkens lose hit points when they finish, so cancel earlier
pub const CANCEL_SUNKEN_HIT_POINTS: u32 = 130;
pub const CANCEL_SUNKEN_BUILD_TIME: u32 = 24;
