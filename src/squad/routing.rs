//! Ordered unit classification tables
//!
//! Each table is evaluated first-match-wins so the rules can be tested on
//! their own, apart from the commander loop.

use crate::units::UnitType;

/// Where the main-army sweep sends an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackRoute {
    /// At most one per attack squad, Ground first
    Detector,
    /// Always the Flying squad
    Flying,
    /// Flying squad only while it holds committed flyers, else Ground
    OptionalFlying,
    /// Catch-all for non-workers
    Ground,
}

type Rule = (fn(UnitType) -> bool, AttackRoute);

fn is_detector(unit_type: UnitType) -> bool {
    unit_type.is_detector()
}

/// Unit definitely belongs in the Flying squad
pub fn is_flying_squad_unit(unit_type: UnitType) -> bool {
    matches!(
        unit_type,
        UnitType::Mutalisk
            | UnitType::Wraith
            | UnitType::Valkyrie
            | UnitType::Battlecruiser
            | UnitType::Corsair
            | UnitType::Scout
    )
}

/// Unit joins the Flying squad only if that squad already has flyers
pub fn is_optional_flying_squad_unit(unit_type: UnitType) -> bool {
    matches!(
        unit_type,
        UnitType::Scourge | UnitType::Devourer | UnitType::Carrier
    )
}

/// Everything that is not a worker. Must be checked last.
pub fn is_ground_squad_unit(unit_type: UnitType) -> bool {
    !unit_type.is_worker()
}

const ATTACK_RULES: [Rule; 4] = [
    (is_detector, AttackRoute::Detector),
    (is_flying_squad_unit, AttackRoute::Flying),
    (is_optional_flying_squad_unit, AttackRoute::OptionalFlying),
    (is_ground_squad_unit, AttackRoute::Ground),
];

/// Route for the attack-squad sweep; None for workers
pub fn attack_route(unit_type: UnitType) -> Option<AttackRoute> {
    ATTACK_RULES
        .iter()
        .find(|(applies, _)| applies(unit_type))
        .map(|(_, route)| *route)
}

const RECON_WEIGHTS: [(UnitType, i32); 10] = [
    (UnitType::Zergling, 2),
    (UnitType::Hydralisk, 3),
    (UnitType::Marine, 2),
    (UnitType::Medic, 2),
    (UnitType::Vulture, 4),
    (UnitType::SiegeTankTankMode, 6),
    (UnitType::SiegeTankSiegeMode, 6),
    (UnitType::Zealot, 4),
    (UnitType::Dragoon, 4),
    (UnitType::DarkTemplar, 4),
];

/// Recon budget cost of a unit type; 0 means not eligible
pub fn recon_weight(unit_type: UnitType) -> i32 {
    RECON_WEIGHTS
        .iter()
        .find(|(t, _)| *t == unit_type)
        .map(|(_, w)| *w)
        .unwrap_or(0)
}

/// Support unit that is only useful alongside `RECON_ESCORTED`
pub const RECON_SUPPORT: UnitType = UnitType::Medic;
/// Unit the recon support type heals
pub const RECON_ESCORTED: UnitType = UnitType::Marine;

/// Default drop allowlist
pub const DEFAULT_DROP_UNIT_TYPES: [UnitType; 2] = [UnitType::DarkTemplar, UnitType::Vulture];

/// Flyers base defense never reacts to
pub fn is_harmless_flyer(unit_type: UnitType) -> bool {
    matches!(unit_type, UnitType::Overlord | UnitType::Observer)
}

/// Static defense that counts against the air-defender quota
pub fn is_air_static_defense(unit_type: UnitType) -> bool {
    matches!(
        unit_type,
        UnitType::MissileTurret | UnitType::PhotonCannon | UnitType::SporeColony
    )
}

/// Static defense that counts against the ground-defender quota.
/// Cannons appear in both lists.
pub fn is_ground_static_defense(unit_type: UnitType) -> bool {
    matches!(unit_type, UnitType::PhotonCannon | UnitType::SunkenColony)
}

/// Slow mobile units that defend a base about as well as a building does
pub fn is_slow_defender(unit_type: UnitType) -> bool {
    matches!(
        unit_type,
        UnitType::SiegeTankTankMode
            | UnitType::SiegeTankSiegeMode
            | UnitType::Reaver
            | UnitType::Lurker
            | UnitType::Guardian
    )
}

/// Fast raiders that make a bunker load up from further out
pub fn is_fast_raider(unit_type: UnitType) -> bool {
    matches!(unit_type, UnitType::Vulture | UnitType::Mutalisk)
}
