//! Unit types and their static properties
//!
//! Only the properties the squad layer reasons about are modelled: weapons,
//! movement class, role flags and transport slots.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Role and capability flags of a unit type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UnitTraits: u16 {
        const FLYER = 1 << 0;
        const WORKER = 1 << 1;
        const BUILDING = 1 << 2;
        const DETECTOR = 1 << 3;
        const REFINERY = 1 << 4;
        const GROUND_WEAPON = 1 << 5;
        const AIR_WEAPON = 1 << 6;
        const SPELLCASTER = 1 << 7;
        /// Building produced by morphing another building rather than by construction
        const MORPHED_BUILDING = 1 << 8;
        /// Non-building that is a morph in progress (eggs, cocoons)
        const MORPHING = 1 << 9;
    }
}

/// Type of a unit or structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    // Terran
    Scv,
    Marine,
    Medic,
    Firebat,
    Ghost,
    Vulture,
    SiegeTankTankMode,
    SiegeTankSiegeMode,
    Goliath,
    Wraith,
    Dropship,
    ScienceVessel,
    Battlecruiser,
    Valkyrie,
    CommandCenter,
    SupplyDepot,
    Refinery,
    Barracks,
    Bunker,
    MissileTurret,
    ComsatStation,

    // Zerg
    Drone,
    Larva,
    Egg,
    LurkerEgg,
    Cocoon,
    Zergling,
    Hydralisk,
    Lurker,
    Ultralisk,
    Defiler,
    Overlord,
    Mutalisk,
    Scourge,
    Guardian,
    Devourer,
    Queen,
    Hatchery,
    Lair,
    Hive,
    Extractor,
    CreepColony,
    SunkenColony,
    SporeColony,
    Spire,
    GreaterSpire,

    // Protoss
    Probe,
    Zealot,
    Dragoon,
    DarkTemplar,
    HighTemplar,
    Archon,
    Reaver,
    Observer,
    Shuttle,
    Scout,
    Corsair,
    Carrier,
    Arbiter,
    Nexus,
    Pylon,
    Assimilator,
    Gateway,
    PhotonCannon,
}

/// Static properties of a unit type
#[derive(Debug, Clone, Copy)]
pub struct UnitProperties {
    pub traits: UnitTraits,
    /// Transport slots occupied when loaded (0 = cannot be loaded)
    pub space_required: u8,
    /// Transport slots offered to passengers (0 = not a transport)
    pub space_provided: u8,
    pub max_hit_points: u32,
}

const fn props(traits: UnitTraits, space_required: u8, space_provided: u8, max_hit_points: u32) -> UnitProperties {
    UnitProperties {
        traits,
        space_required,
        space_provided,
        max_hit_points,
    }
}

const NONE: UnitTraits = UnitTraits::empty();
const G: UnitTraits = UnitTraits::GROUND_WEAPON;
const A: UnitTraits = UnitTraits::AIR_WEAPON;
const GA: UnitTraits = G.union(A);
const FLY: UnitTraits = UnitTraits::FLYER;
const WORKER: UnitTraits = UnitTraits::WORKER.union(G);
const BLD: UnitTraits = UnitTraits::BUILDING;
const DET: UnitTraits = UnitTraits::DETECTOR;
const REF: UnitTraits = UnitTraits::BUILDING.union(UnitTraits::REFINERY);
const MORPH_BLD: UnitTraits = UnitTraits::BUILDING.union(UnitTraits::MORPHED_BUILDING);
const MORPH: UnitTraits = UnitTraits::MORPHING;
const CASTER: UnitTraits = UnitTraits::SPELLCASTER;

impl UnitType {
    /// Get the static properties of this unit type
    pub const fn properties(&self) -> UnitProperties {
        match self {
            UnitType::Scv => props(WORKER, 1, 0, 60),
            UnitType::Marine => props(GA, 1, 0, 40),
            UnitType::Medic => props(CASTER, 1, 0, 60),
            UnitType::Firebat => props(G, 1, 0, 50),
            UnitType::Ghost => props(GA.union(CASTER), 1, 0, 45),
            UnitType::Vulture => props(G, 2, 0, 80),
            UnitType::SiegeTankTankMode => props(G, 4, 0, 150),
            UnitType::SiegeTankSiegeMode => props(G, 4, 0, 150),
            UnitType::Goliath => props(GA, 2, 0, 125),
            UnitType::Wraith => props(GA.union(FLY), 0, 0, 120),
            UnitType::Dropship => props(FLY, 0, 8, 150),
            UnitType::ScienceVessel => props(FLY.union(DET).union(CASTER), 0, 0, 200),
            UnitType::Battlecruiser => props(GA.union(FLY), 0, 0, 500),
            UnitType::Valkyrie => props(A.union(FLY), 0, 0, 200),
            UnitType::CommandCenter => props(BLD, 0, 0, 1500),
            UnitType::SupplyDepot => props(BLD, 0, 0, 500),
            UnitType::Refinery => props(REF, 0, 0, 750),
            UnitType::Barracks => props(BLD, 0, 0, 1000),
            UnitType::Bunker => props(BLD, 0, 4, 350),
            UnitType::MissileTurret => props(BLD.union(A).union(DET), 0, 0, 200),
            UnitType::ComsatStation => props(BLD, 0, 0, 500),

            UnitType::Drone => props(WORKER, 1, 0, 40),
            UnitType::Larva => props(NONE, 0, 0, 25),
            UnitType::Egg => props(MORPH, 0, 0, 200),
            UnitType::LurkerEgg => props(MORPH, 0, 0, 200),
            UnitType::Cocoon => props(MORPH.union(FLY), 0, 0, 200),
            UnitType::Zergling => props(G, 1, 0, 35),
            UnitType::Hydralisk => props(GA, 2, 0, 80),
            UnitType::Lurker => props(G, 4, 0, 125),
            UnitType::Ultralisk => props(G, 4, 0, 400),
            UnitType::Defiler => props(CASTER, 2, 0, 80),
            UnitType::Overlord => props(FLY.union(DET), 0, 8, 200),
            UnitType::Mutalisk => props(GA.union(FLY), 0, 0, 120),
            UnitType::Scourge => props(A.union(FLY), 0, 0, 25),
            UnitType::Guardian => props(G.union(FLY), 0, 0, 150),
            UnitType::Devourer => props(A.union(FLY), 0, 0, 250),
            UnitType::Queen => props(FLY.union(CASTER), 0, 0, 120),
            UnitType::Hatchery => props(BLD, 0, 0, 1250),
            UnitType::Lair => props(MORPH_BLD, 0, 0, 1800),
            UnitType::Hive => props(MORPH_BLD, 0, 0, 2500),
            UnitType::Extractor => props(REF, 0, 0, 750),
            UnitType::CreepColony => props(BLD, 0, 0, 400),
            UnitType::SunkenColony => props(MORPH_BLD.union(G), 0, 0, 300),
            UnitType::SporeColony => props(MORPH_BLD.union(A).union(DET), 0, 0, 400),
            UnitType::Spire => props(BLD, 0, 0, 600),
            UnitType::GreaterSpire => props(MORPH_BLD, 0, 0, 1000),

            UnitType::Probe => props(WORKER, 1, 0, 20),
            UnitType::Zealot => props(G, 2, 0, 100),
            UnitType::Dragoon => props(GA, 4, 0, 100),
            UnitType::DarkTemplar => props(G, 2, 0, 80),
            UnitType::HighTemplar => props(CASTER, 2, 0, 40),
            UnitType::Archon => props(GA, 4, 0, 10),
            UnitType::Reaver => props(G, 4, 0, 100),
            UnitType::Observer => props(FLY.union(DET), 0, 0, 40),
            UnitType::Shuttle => props(FLY, 0, 8, 80),
            UnitType::Scout => props(GA.union(FLY), 0, 0, 150),
            UnitType::Corsair => props(A.union(FLY), 0, 0, 100),
            UnitType::Carrier => props(GA.union(FLY), 0, 0, 300),
            UnitType::Arbiter => props(GA.union(FLY), 0, 0, 200),
            UnitType::Nexus => props(BLD, 0, 0, 750),
            UnitType::Pylon => props(BLD, 0, 0, 300),
            UnitType::Assimilator => props(REF, 0, 0, 450),
            UnitType::Gateway => props(BLD, 0, 0, 500),
            UnitType::PhotonCannon => props(BLD.union(GA).union(DET), 0, 0, 100),
        }
    }

    pub fn traits(&self) -> UnitTraits {
        self.properties().traits
    }

    pub fn is_worker(&self) -> bool {
        self.traits().contains(UnitTraits::WORKER)
    }

    pub fn is_building(&self) -> bool {
        self.traits().contains(UnitTraits::BUILDING)
    }

    pub fn is_refinery(&self) -> bool {
        self.traits().contains(UnitTraits::REFINERY)
    }

    pub fn is_detector(&self) -> bool {
        self.traits().contains(UnitTraits::DETECTOR)
    }

    pub fn is_flyer(&self) -> bool {
        self.traits().contains(UnitTraits::FLYER)
    }

    pub fn can_attack_ground(&self) -> bool {
        self.traits().contains(UnitTraits::GROUND_WEAPON)
    }

    pub fn can_attack_air(&self) -> bool {
        self.traits().contains(UnitTraits::AIR_WEAPON)
    }

    pub fn is_spellcaster(&self) -> bool {
        self.traits().contains(UnitTraits::SPELLCASTER)
    }

    /// Eggs, cocoons and buildings that are morphed from another building
    pub fn is_morph(&self) -> bool {
        self.traits()
            .intersects(UnitTraits::MORPHING | UnitTraits::MORPHED_BUILDING)
    }

    pub fn space_required(&self) -> u8 {
        self.properties().space_required
    }

    pub fn space_provided(&self) -> u8 {
        self.properties().space_provided
    }

    pub fn max_hit_points(&self) -> u32 {
        self.properties().max_hit_points
    }

    /// Plasma shields; zero for everything but Protoss
    pub fn max_shields(&self) -> u32 {
        match self {
            UnitType::Probe | UnitType::Observer => 20,
            UnitType::HighTemplar => 40,
            UnitType::Zealot | UnitType::Shuttle => 60,
            UnitType::Dragoon | UnitType::DarkTemplar | UnitType::Reaver | UnitType::Corsair => 80,
            UnitType::Scout | UnitType::PhotonCannon => 100,
            UnitType::Carrier | UnitType::Arbiter => 150,
            UnitType::Pylon => 300,
            UnitType::Archon => 350,
            UnitType::Assimilator => 450,
            UnitType::Gateway => 500,
            UnitType::Nexus => 750,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_protoss_have_shields() {
        assert_eq!(UnitType::Probe.max_shields(), 20);
        assert_eq!(UnitType::Zealot.max_shields(), 60);
        assert_eq!(UnitType::Nexus.max_shields(), 750);
        assert_eq!(UnitType::Scv.max_shields(), 0);
        assert_eq!(UnitType::Drone.max_shields(), 0);
    }

    #[test]
    fn test_workers_can_fight_ground_only() {
        for worker in [UnitType::Scv, UnitType::Drone, UnitType::Probe] {
            assert!(worker.is_worker());
            assert!(worker.can_attack_ground());
            assert!(!worker.can_attack_air());
            assert_eq!(worker.space_required(), 1);
        }
    }

    #[test]
    fn test_transports_provide_eight_slots() {
        for transport in [UnitType::Dropship, UnitType::Shuttle, UnitType::Overlord] {
            assert!(transport.is_flyer());
            assert_eq!(transport.space_provided(), 8);
        }
    }

    #[test]
    fn test_static_defense_weapons() {
        assert!(UnitType::PhotonCannon.can_attack_ground());
        assert!(UnitType::PhotonCannon.can_attack_air());
        assert!(UnitType::SunkenColony.can_attack_ground());
        assert!(!UnitType::SunkenColony.can_attack_air());
        assert!(UnitType::SporeColony.can_attack_air());
        assert!(UnitType::MissileTurret.is_detector());
    }

    #[test]
    fn test_morph_classification() {
        assert!(UnitType::Egg.is_morph());
        assert!(UnitType::SunkenColony.is_morph());
        assert!(!UnitType::Barracks.is_morph());
        assert!(!UnitType::Egg.is_building());
    }

    #[test]
    fn test_refineries_are_buildings() {
        for refinery in [UnitType::Refinery, UnitType::Extractor, UnitType::Assimilator] {
            assert!(refinery.is_building());
            assert!(refinery.is_refinery());
        }
    }
}
