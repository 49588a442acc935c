//! Commander integration tests
//!
//! Drive the full per-tick pipeline through the public API with an
//! in-memory battlefield and check the squads it produces.

use serde::Deserialize;
use squad_commander::battlefield::{BaseLocation, BaseOwner, BattlefieldSnapshot, MapArea};
use squad_commander::commander::{CombatCommander, CommanderEvent, DropPhase};
use squad_commander::core::types::{AgentId, Position, Race, RegionId};
use squad_commander::core::{load_config, CommanderConfig};
use squad_commander::squad::{recon_weight, SquadOrderKind};
use squad_commander::units::{Agent, EnemyUnit, UnitType};

#[derive(Deserialize)]
struct Scenario {
    #[serde(default)]
    config: CommanderConfig,
    battlefield: BattlefieldSnapshot,
    combat_units: Vec<Agent>,
}

fn load_skirmish() -> Scenario {
    let json = include_str!("../data/scenarios/skirmish.json");
    serde_json::from_str(json).expect("skirmish scenario parses")
}

fn owner(cmd: &CombatCommander<BattlefieldSnapshot>, id: u32) -> Option<String> {
    cmd.squads().owner_of(AgentId(id)).map(|s| s.name().to_string())
}

#[test]
fn test_skirmish_scenario() {
    let scenario = load_skirmish();
    let units = scenario.combat_units.clone();
    let mut cmd = CombatCommander::new(scenario.battlefield, scenario.config).unwrap();

    let mut created = Vec::new();
    for tick in 0..10 {
        let log = cmd.update(tick, &units).unwrap();
        created.extend(log.iter().filter_map(|e| match e {
            CommanderEvent::SquadCreated { squad } => Some(squad.clone()),
            _ => None,
        }));
        assert!(cmd.squads().is_consistent());
    }

    // every offered agent ended up somewhere
    for agent in &units {
        assert!(owner(&cmd, agent.id.0).is_some(), "agent {} is squadless", agent.id.0);
    }

    // shuttle plus four dark templar fill the drop; the second pass starts loading
    let drop = cmd.squad("Drop").unwrap();
    assert_eq!(drop.len(), 5);
    assert!(drop.contains(AgentId(13)));
    assert_eq!(cmd.drop_phase(), Some(DropPhase::Loading));

    // the lone drone in the main is chased by the nearest idle probe
    let scout_defense = cmd.squad("ScoutDefense").unwrap();
    assert_eq!(scout_defense.len(), 1);
    assert!(scout_defense.contains(AgentId(22)));
    assert!(cmd.battlefield().combat_workers.contains(&AgentId(22)));

    // zerglings at the natural get a defense squad; the drone is not a threat
    assert_eq!(created, vec!["Base 2".to_string()]);
    assert!(!cmd.squad("Base 2").unwrap().is_empty());
    assert!(!cmd.squads().squad_exists("Base 1"));
    assert_eq!(cmd.defended_regions().collect::<Vec<_>>(), vec![RegionId(2)]);

    assert!(cmd.recon_target().is_some());
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/commander/default.toml");
    let loaded = load_config(path).unwrap();
    let defaults = CommanderConfig::default();

    assert_eq!(loaded.scout_defense_radius, defaults.scout_defense_radius);
    assert_eq!(loaded.squad_update_period, defaults.squad_update_period);
    assert_eq!(loaded.squad_update_phase, defaults.squad_update_phase);
    assert_eq!(loaded.scan_period, defaults.scan_period);
    assert_eq!(loaded.scan_phase, defaults.scan_phase);
    assert_eq!(loaded.drop_unit_types, defaults.drop_unit_types);
}

fn home_battlefield(race: Race) -> BattlefieldSnapshot {
    let mut snap = BattlefieldSnapshot::new(race, Position::new(500, 500));
    snap.add_region(RegionId(1), MapArea::new(0, 0, 1000, 1000));
    snap.occupied_regions = vec![RegionId(1)];
    snap.we_have_combat_units = true;
    snap
}

#[test]
fn test_defense_borrows_from_attack_and_gives_back() {
    let mut cmd = CombatCommander::new(home_battlefield(Race::Protoss), CommanderConfig::every_tick()).unwrap();
    let units: Vec<Agent> = (1..=4)
        .map(|i| Agent::new(AgentId(i), UnitType::Zealot, Position::new(400 + 20 * i as i32, 900)))
        .collect();

    cmd.update(0, &units).unwrap();
    assert_eq!(cmd.squad("Ground").unwrap().len(), 4);

    cmd.battlefield_mut().enemy_units = vec![EnemyUnit::new(AgentId(900), UnitType::Zealot, Position::new(400, 400))];
    cmd.update(1, &units).unwrap();
    assert_eq!(cmd.squad("Base 1").unwrap().len(), 2);
    assert_eq!(cmd.squad("Ground").unwrap().len(), 2);

    cmd.battlefield_mut().enemy_units.clear();
    let log = cmd.update(2, &units).unwrap();
    assert!(log.contains(&CommanderEvent::SquadCleared { squad: "Base 1".into(), released: 2 }));
    assert_eq!(cmd.squad("Ground").unwrap().len(), 4);
    assert!(cmd.squads().is_consistent());
}

#[test]
fn test_recon_heads_for_neutral_base() {
    let mut snap = home_battlefield(Race::Terran);
    snap.bases.push(BaseLocation::new(Position::new(2000, 2000), BaseOwner::Neutral));
    let mut cmd = CombatCommander::new(snap, CommanderConfig::every_tick()).unwrap();

    let mut units: Vec<Agent> = (1..=20)
        .map(|i| Agent::new(AgentId(i), UnitType::Marine, Position::new(300, 300)))
        .collect();
    units.extend((21..=24).map(|i| Agent::new(AgentId(i), UnitType::Medic, Position::new(300, 300))));

    let log = cmd.update(0, &units).unwrap();
    assert!(log.contains(&CommanderEvent::ReconTargetChanged { target: Some(Position::new(2000, 2000)) }));
    assert_eq!(cmd.recon_target(), Some(Position::new(2000, 2000)));

    let recon = cmd.squad("Recon").unwrap();
    assert_eq!(recon.order().kind(), SquadOrderKind::Attack);
    assert_eq!(recon.order().position(), Position::new(2000, 2000));

    // 48 weight on offer buys a budget of 6: three marines
    let weight: i32 = recon
        .members()
        .iter()
        .filter_map(|id| units.iter().find(|a| a.id == *id))
        .map(|a| recon_weight(a.unit_type))
        .sum();
    assert_eq!(weight, 6);
    assert_eq!(recon.len(), 3);

    // the rest goes to the main army
    assert_eq!(cmd.squad("Ground").unwrap().len(), 21);
}

#[test]
fn test_dead_agents_are_pruned() {
    let mut cmd = CombatCommander::new(home_battlefield(Race::Protoss), CommanderConfig::every_tick()).unwrap();
    let units: Vec<Agent> = (1..=3)
        .map(|i| Agent::new(AgentId(i), UnitType::Dragoon, Position::new(300, 300)))
        .collect();
    cmd.update(0, &units).unwrap();
    assert_eq!(cmd.squad("Ground").unwrap().len(), 3);

    cmd.update(1, &units[..1]).unwrap();
    assert_eq!(cmd.squad("Ground").unwrap().len(), 1);
    assert!(owner(&cmd, 2).is_none());
    assert!(cmd.squads().is_consistent());
}

#[test]
fn test_worker_rush_pulls_and_releases_probes() {
    let mut cmd = CombatCommander::new(home_battlefield(Race::Protoss), CommanderConfig::every_tick()).unwrap();
    cmd.battlefield_mut().we_have_combat_units = false;
    cmd.battlefield_mut().enemy_units = vec![
        EnemyUnit::new(AgentId(900), UnitType::Zergling, Position::new(480, 480)),
        EnemyUnit::new(AgentId(901), UnitType::Zergling, Position::new(490, 480)),
        EnemyUnit::new(AgentId(902), UnitType::Zergling, Position::new(500, 480)),
    ];
    let units: Vec<Agent> = (1..=8)
        .map(|i| Agent::new(AgentId(i), UnitType::Probe, Position::new(450 + 10 * i as i32, 560)))
        .collect();

    let log = cmd.update(0, &units).unwrap();
    let pulled = log
        .iter()
        .filter(|e| matches!(e, CommanderEvent::WorkerPulled { squad, .. } if squad == "Base 1"))
        .count();
    assert_eq!(pulled, 6);
    assert_eq!(cmd.battlefield().combat_workers.len(), 6);

    cmd.battlefield_mut().enemy_units.clear();
    let log = cmd.update(1, &units).unwrap();
    let released = log
        .iter()
        .filter(|e| matches!(e, CommanderEvent::WorkerReleased { .. }))
        .count();
    assert_eq!(released, 6);
    assert!(cmd.battlefield().combat_workers.is_empty());
}
