//! Squads, their orders, and the registry that enforces single ownership

pub mod order;
pub mod registry;
pub mod routing;
#[allow(clippy::module_inception)]
pub mod squad;

pub use order::{SquadOrder, SquadOrderKind};
pub use registry::SquadRegistry;
pub use routing::{attack_route, recon_weight, AttackRoute};
pub use squad::{Squad, SquadPriority, DEFAULT_COMBAT_SIM_RADIUS};
