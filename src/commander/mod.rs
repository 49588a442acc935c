//! Combat commander - per-tick squad orchestration
//!
//! Owns the squad registry and runs the fixed pipeline each tick:
//! idle/overlord sweep, drop, scout defense, base defense, recon, then the
//! main attack squads. Bunkers, squad upkeep and the cancellation sweep run
//! every tick regardless of the pipeline phase.

pub mod attack;
pub mod constants;
pub mod defense;
pub mod drop;
pub mod events;
pub mod recon;
pub mod targeting;
pub mod upkeep;

pub use drop::DropPhase;
pub use events::{CommanderEvent, CommanderEventLog, TimedEvent};
pub use recon::recon_weight_limit;
pub use targeting::SquadProfile;

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::battlefield::Battlefield;
use crate::commander::constants::*;
use crate::core::config::CommanderConfig;
use crate::core::error::Result;
use crate::core::types::{AgentId, Position, Race, RegionId, Tick};
use crate::squad::{Squad, SquadOrder, SquadOrderKind, SquadPriority, SquadRegistry};
use crate::units::{Agent, AgentRoster, UnitType};

/// Tactical command layer. Generic over the collaborator bundle so tests can
/// hand in a `BattlefieldSnapshot` and a host can hand in its live game state.
pub struct CombatCommander<B: Battlefield> {
    battlefield: B,
    config: CommanderConfig,
    squads: SquadRegistry,
    rng: ChaCha8Rng,
    aggressive: bool,
    recon_target: Option<Position>,
    last_recon_target_change: Tick,
    /// None when no drop is planned
    drop_phase: Option<DropPhase>,
    defended_regions: BTreeSet<RegionId>,
    /// This tick's combat-eligible agents in host order, and the same by id
    combat_units: Vec<Agent>,
    roster: AgentRoster,
    tick: Tick,
    events: CommanderEventLog,
}

impl<B: Battlefield> CombatCommander<B> {
    /// Validate the config and create the fixed squads
    pub fn new(battlefield: B, config: CommanderConfig) -> Result<Self> {
        config.validate()?;

        let start = battlefield.starting_base().position;
        let idle_order = SquadOrder::idle(start);
        let mut squads = SquadRegistry::new();

        squads.add_squad(Squad::new(IDLE_SQUAD, idle_order.clone(), SquadPriority::Idle))?;

        if battlefield.my_race() == Race::Zerg {
            // overlords decide for themselves; the order is a placeholder
            let react = SquadOrder::new(SquadOrderKind::Idle, Position::default(), 0, "React");
            squads.add_squad(Squad::new(OVERLORD_SQUAD, react, SquadPriority::Overlord))?;
        }

        let attack_order = targeting::attack_order(
            &battlefield,
            &SquadProfile::unformed(&battlefield),
            config.go_aggressive,
        );
        squads.add_squad(Squad::new(GROUND_SQUAD, attack_order.clone(), SquadPriority::Attack))?;
        squads.add_squad(Squad::new(FLYING_SQUAD, attack_order, SquadPriority::Attack))?;

        let mut recon = Squad::new(RECON_SQUAD, idle_order, SquadPriority::Recon);
        recon.set_combat_sim_radius(RECON_COMBAT_SIM_RADIUS);
        recon.set_fight_visible_only(true);
        squads.add_squad(recon)?;

        if config.scout_defense_radius > 0 {
            let order = SquadOrder::new(
                SquadOrderKind::Defend,
                start,
                config.scout_defense_radius,
                "Get the scout",
            );
            squads.add_squad(Squad::new(SCOUT_DEFENSE_SQUAD, order, SquadPriority::ScoutDefense))?;
        }

        let drop_phase = if config.drop_planned {
            let order = SquadOrder::new(SquadOrderKind::Hold, start, ATTACK_RADIUS, "Wait for transport");
            squads.add_squad(Squad::new(DROP_SQUAD, order, SquadPriority::Drop))?;
            Some(DropPhase::Collecting)
        } else {
            None
        };

        debug!(squads = squads.len(), race = ?battlefield.my_race(), "Combat commander initialized");

        Ok(Self {
            battlefield,
            rng: ChaCha8Rng::seed_from_u64(config.recon_seed),
            aggressive: config.go_aggressive,
            config,
            squads,
            recon_target: None,
            last_recon_target_change: 0,
            drop_phase,
            defended_regions: BTreeSet::new(),
            combat_units: Vec::new(),
            roster: AgentRoster::default(),
            tick: 0,
            events: CommanderEventLog::new(),
        })
    }

    /// Run one tick. `combat_units` is every agent the host offers to the
    /// squad layer this tick, workers included.
    ///
    /// Returns everything that changed since the previous call, including
    /// changes made by `pull_workers` / `release_workers` in between.
    pub fn update(&mut self, tick: Tick, combat_units: &[Agent]) -> Result<CommanderEventLog> {
        self.tick = tick;
        self.combat_units = combat_units.to_vec();
        self.roster = combat_units.iter().map(|a| (a.id, a.clone())).collect();

        if tick % self.config.squad_update_period == self.config.squad_update_phase {
            self.update_squads()?;
        }
        if tick % self.config.scan_period == self.config.scan_phase {
            self.do_comsat_scan();
        }

        self.load_or_unload_bunkers();

        let pruned = self.squads.update(&self.roster);
        if !pruned.is_empty() {
            debug!(count = pruned.len(), "Pruned agents missing from roster");
        }

        self.cancel_dying_items();

        Ok(std::mem::take(&mut self.events))
    }

    fn update_squads(&mut self) -> Result<()> {
        self.update_idle_squad()?;
        self.update_overlord_squad()?;
        self.update_drop_squad()?;
        self.update_scout_defense_squad()?;
        self.update_base_defense_squads()?;
        self.update_recon_squad()?;
        self.update_attack_squads()?;
        Ok(())
    }

    /// Every agent nobody has claimed waits in Idle
    fn update_idle_squad(&mut self) -> Result<()> {
        for agent in &self.combat_units {
            if self.squads.can_assign_unit_to_squad(agent.id, IDLE_SQUAD) {
                self.squads.assign_unit_to_squad(agent.id, IDLE_SQUAD)?;
            }
        }
        Ok(())
    }

    fn update_overlord_squad(&mut self) -> Result<()> {
        if !self.squads.squad_exists(OVERLORD_SQUAD) {
            return Ok(());
        }
        for agent in &self.combat_units {
            if agent.unit_type == UnitType::Overlord
                && self.squads.can_assign_unit_to_squad(agent.id, OVERLORD_SQUAD)
            {
                self.squads.assign_unit_to_squad(agent.id, OVERLORD_SQUAD)?;
            }
        }
        Ok(())
    }

    /// Detectors ride with squads when the enemy cannot easily shoot them
    /// down, or when there is cloak to counter. Observers are always safe.
    fn want_squad_detectors(&self) -> bool {
        self.battlefield.my_race() == Race::Protoss
            || !self.battlefield.enemy_has_anti_air()
            || self.battlefield.enemy_cloaked_units_seen()
    }

    /// Empty a squad and hand any workers it held back to the economy
    fn clear_squad(&mut self, name: &str) -> Result<()> {
        let workers = self.squads.squad(name)?.workers(&self.roster);
        let released = self.squads.clear_squad(name)?;
        if released.is_empty() {
            return Ok(());
        }

        for worker in workers {
            self.battlefield.release_worker(worker);
            self.events.push(self.tick, CommanderEvent::WorkerReleased { worker });
        }

        debug!(squad = name, released = released.len(), "Squad cleared");
        self.events.push(
            self.tick,
            CommanderEvent::SquadCleared {
                squad: name.to_string(),
                released: released.len(),
            },
        );
        Ok(())
    }

    /// Drop the squad's first detector back to the unowned pool
    fn remove_detector(&mut self, name: &str) -> Result<Option<AgentId>> {
        let detector = self.squads.squad(name)?.detector(&self.roster);
        if let Some(id) = detector {
            self.squads.remove_unit(id);
        }
        Ok(detector)
    }

    /// Claim a worker for combat in `squad`
    fn pull_worker_into(&mut self, worker: AgentId, squad: &str) -> Result<()> {
        self.squads.assign_unit_to_squad(worker, squad)?;
        self.battlefield.set_combat_worker(worker);
        debug!(worker = worker.0, squad, "Worker pulled");
        self.events.push(
            self.tick,
            CommanderEvent::WorkerPulled {
                worker,
                squad: squad.to_string(),
            },
        );
        Ok(())
    }

    /// Pull up to `n` free workers into the Ground squad, best-suited first.
    /// Returns how many were pulled.
    pub fn pull_workers(&mut self, n: usize) -> Result<usize> {
        let mut candidates: Vec<&Agent> = self
            .combat_units
            .iter()
            .filter(|a| {
                a.unit_type.is_worker()
                    && self.battlefield.is_free(a.id)
                    && self.squads.can_assign_unit_to_squad(a.id, GROUND_SQUAD)
            })
            .collect();
        // stable sort: equal scores keep host order
        candidates.sort_by_key(|a| std::cmp::Reverse(worker_pull_score(a)));
        let chosen: Vec<AgentId> = candidates.into_iter().take(n).map(|a| a.id).collect();

        for worker in &chosen {
            self.pull_worker_into(*worker, GROUND_SQUAD)?;
        }
        Ok(chosen.len())
    }

    /// Send every worker in the Ground squad back to the economy
    pub fn release_workers(&mut self) -> Result<usize> {
        let workers = self.squads.squad(GROUND_SQUAD)?.workers(&self.roster);
        for worker in &workers {
            self.squads.remove_unit(*worker);
            self.battlefield.release_worker(*worker);
            self.events.push(self.tick, CommanderEvent::WorkerReleased { worker: *worker });
        }
        Ok(workers.len())
    }

    /// Switch the main attack squads between attacking and holding the front
    pub fn set_aggression(&mut self, aggressive: bool) {
        if self.aggressive != aggressive {
            debug!(aggressive, "Aggression changed");
        }
        self.aggressive = aggressive;
    }

    pub fn is_aggressive(&self) -> bool {
        self.aggressive
    }

    pub fn squads(&self) -> &SquadRegistry {
        &self.squads
    }

    pub fn squad(&self, name: &str) -> Result<&Squad> {
        self.squads.squad(name)
    }

    pub fn battlefield(&self) -> &B {
        &self.battlefield
    }

    /// Hosts refresh perception through this between ticks
    pub fn battlefield_mut(&mut self) -> &mut B {
        &mut self.battlefield
    }

    pub fn config(&self) -> &CommanderConfig {
        &self.config
    }

    pub fn recon_target(&self) -> Option<Position> {
        self.recon_target
    }

    pub fn drop_phase(&self) -> Option<DropPhase> {
        self.drop_phase
    }

    /// Regions that currently have a base-defense squad
    pub fn defended_regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.defended_regions.iter().copied()
    }
}

/// How good a worker is to pull for combat. Higher is better.
pub fn worker_pull_score(worker: &Agent) -> i32 {
    let mut score = 0;
    if worker.hit_points() == worker.unit_type.max_hit_points() {
        score += 10;
    }
    if worker.shields() == worker.unit_type.max_shields() {
        score += 4;
    }
    if worker.carrying_gas {
        score -= 3;
    }
    if worker.carrying_minerals {
        score -= 2;
    }
    score
}

/// Base-defense squad name for a region
pub fn defense_squad_name(region: RegionId) -> String {
    format!("{}{}", BASE_DEFENSE_PREFIX, region.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::BattlefieldSnapshot;
    use crate::core::error::CommandError;

    fn commander(race: Race, config: CommanderConfig) -> CombatCommander<BattlefieldSnapshot> {
        let snap = BattlefieldSnapshot::new(race, Position::new(100, 100));
        CombatCommander::new(snap, config).unwrap()
    }

    #[test]
    fn test_fixed_squads_created() {
        let cmd = commander(Race::Protoss, CommanderConfig::every_tick());
        let names = cmd.squads().squad_names();
        assert_eq!(names, vec!["Flying", "Ground", "Idle", "Recon", "ScoutDefense"]);

        let recon = cmd.squad(RECON_SQUAD).unwrap();
        assert_eq!(recon.combat_sim_radius(), RECON_COMBAT_SIM_RADIUS);
        assert!(recon.fight_visible_only());
        assert_eq!(cmd.squad(IDLE_SQUAD).unwrap().order().label(), "Chill out");
        assert_eq!(cmd.squad(SCOUT_DEFENSE_SQUAD).unwrap().order().radius(), 600);
        assert_eq!(cmd.drop_phase(), None);
    }

    #[test]
    fn test_conditional_squads() {
        let config = CommanderConfig {
            scout_defense_radius: 0,
            drop_planned: true,
            ..CommanderConfig::every_tick()
        };
        let cmd = commander(Race::Zerg, config);
        assert!(cmd.squads().squad_exists(OVERLORD_SQUAD));
        assert!(cmd.squads().squad_exists(DROP_SQUAD));
        assert!(!cmd.squads().squad_exists(SCOUT_DEFENSE_SQUAD));
        assert_eq!(cmd.drop_phase(), Some(DropPhase::Collecting));
        assert_eq!(cmd.squad(DROP_SQUAD).unwrap().order().label(), "Wait for transport");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CommanderConfig {
            scan_period: 0,
            ..CommanderConfig::default()
        };
        let snap = BattlefieldSnapshot::new(Race::Terran, Position::new(0, 0));
        assert!(matches!(CombatCommander::new(snap, config), Err(CommandError::Config(_))));
    }

    #[test]
    fn test_pipeline_is_phase_gated() {
        let mut cmd = commander(Race::Protoss, CommanderConfig::default());
        let units = vec![Agent::new(AgentId(1), UnitType::Zealot, Position::new(100, 100))];

        cmd.update(0, &units).unwrap();
        assert!(cmd.squads().owner_of(AgentId(1)).is_none());

        cmd.update(1, &units).unwrap();
        assert_eq!(cmd.squads().owner_of(AgentId(1)).map(|s| s.name()), Some(GROUND_SQUAD));
    }

    #[test]
    fn test_overlords_collect_in_overlord_squad() {
        let mut cmd = commander(Race::Zerg, CommanderConfig::every_tick());
        cmd.battlefield_mut().enemy_has_anti_air = true;
        let units = vec![
            Agent::new(AgentId(1), UnitType::Overlord, Position::new(100, 100)),
            Agent::new(AgentId(2), UnitType::Drone, Position::new(100, 100)),
        ];
        cmd.update(0, &units).unwrap();
        assert_eq!(cmd.squads().owner_of(AgentId(1)).map(|s| s.name()), Some(OVERLORD_SQUAD));
        assert_eq!(cmd.squads().owner_of(AgentId(2)).map(|s| s.name()), Some(IDLE_SQUAD));
    }

    #[test]
    fn test_worker_pull_score() {
        let healthy = Agent::new(AgentId(1), UnitType::Probe, Position::default());
        let mut hurt_gas = Agent::new(AgentId(2), UnitType::Probe, Position::default()).with_hit_points(5);
        hurt_gas.carrying_gas = true;
        let mut miner = Agent::new(AgentId(3), UnitType::Probe, Position::default());
        miner.carrying_minerals = true;

        assert_eq!(worker_pull_score(&healthy), 14);
        assert_eq!(worker_pull_score(&hurt_gas), 1);
        assert_eq!(worker_pull_score(&miner), 12);

        // shields are scored apart from hit points
        let drained = Agent::new(AgentId(4), UnitType::Probe, Position::default()).with_shields(5);
        assert_eq!(worker_pull_score(&drained), 10);
        assert!(worker_pull_score(&drained) < worker_pull_score(&healthy));
        let scv = Agent::new(AgentId(5), UnitType::Scv, Position::default());
        assert_eq!(worker_pull_score(&scv), 14);
    }

    #[test]
    fn test_pull_and_release_workers() {
        let mut cmd = commander(Race::Protoss, CommanderConfig::every_tick());
        let mut miner = Agent::new(AgentId(1), UnitType::Probe, Position::new(100, 100));
        miner.carrying_minerals = true;
        let units = vec![
            miner,
            Agent::new(AgentId(2), UnitType::Probe, Position::new(100, 100)),
            Agent::new(AgentId(3), UnitType::Probe, Position::new(100, 100)),
        ];
        cmd.battlefield_mut().reserved_workers.insert(AgentId(3));
        cmd.update(0, &units).unwrap();

        assert_eq!(cmd.pull_workers(1).unwrap(), 1);
        let ground = cmd.squad(GROUND_SQUAD).unwrap();
        assert!(ground.contains(AgentId(2)));
        assert!(cmd.battlefield().combat_workers.contains(&AgentId(2)));

        // the reserved worker is never pulled
        assert_eq!(cmd.pull_workers(5).unwrap(), 1);
        assert!(!cmd.squad(GROUND_SQUAD).unwrap().contains(AgentId(3)));

        assert_eq!(cmd.release_workers().unwrap(), 2);
        assert!(cmd.squad(GROUND_SQUAD).unwrap().is_empty());
        assert!(cmd.battlefield().combat_workers.is_empty());
        assert!(cmd.squads().is_consistent());
    }

    #[test]
    fn test_pull_events_reported_by_next_update() {
        let mut cmd = commander(Race::Protoss, CommanderConfig::every_tick());
        let units = vec![Agent::new(AgentId(1), UnitType::Probe, Position::new(100, 100))];
        cmd.update(0, &units).unwrap();
        cmd.pull_workers(1).unwrap();

        let log = cmd.update(1, &units).unwrap();
        assert!(log.contains(&CommanderEvent::WorkerPulled {
            worker: AgentId(1),
            squad: GROUND_SQUAD.to_string(),
        }));
    }

    #[test]
    fn test_defense_squad_name() {
        assert_eq!(defense_squad_name(RegionId(7)), "Base 7");
    }
}
