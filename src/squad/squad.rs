//! A named, priority-tagged group of agents sharing one order

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, Position};
use crate::squad::order::SquadOrder;
use crate::units::{Agent, AgentRoster};

/// Ownership priority. A squad may take agents only from squads ranked below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SquadPriority {
    Idle = 0,
    Overlord = 1,
    Attack = 2,
    Recon = 3,
    BaseDefense = 4,
    ScoutDefense = 5,
    /// Nothing else steals from the drop squad
    Drop = 6,
}

impl SquadPriority {
    /// Returns true if this priority may take agents held at `other`
    pub fn outranks(&self, other: &SquadPriority) -> bool {
        (*self as u8) > (*other as u8)
    }
}

/// Default radius for the combat simulation run around a squad
pub const DEFAULT_COMBAT_SIM_RADIUS: i32 = 400;

#[derive(Debug, Clone)]
pub struct Squad {
    name: String,
    priority: SquadPriority,
    order: SquadOrder,
    members: BTreeSet<AgentId>,
    combat_sim_radius: i32,
    fight_visible_only: bool,
}

impl Squad {
    pub fn new(name: impl Into<String>, order: SquadOrder, priority: SquadPriority) -> Self {
        Self {
            name: name.into(),
            priority,
            order,
            members: BTreeSet::new(),
            combat_sim_radius: DEFAULT_COMBAT_SIM_RADIUS,
            fight_visible_only: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> SquadPriority {
        self.priority
    }

    pub fn order(&self) -> &SquadOrder {
        &self.order
    }

    pub fn set_order(&mut self, order: SquadOrder) {
        self.order = order;
    }

    pub fn combat_sim_radius(&self) -> i32 {
        self.combat_sim_radius
    }

    pub fn set_combat_sim_radius(&mut self, radius: i32) {
        self.combat_sim_radius = radius;
    }

    /// Combat simulation considers only enemies currently in sight
    pub fn fight_visible_only(&self) -> bool {
        self.fight_visible_only
    }

    pub fn set_fight_visible_only(&mut self, visible_only: bool) {
        self.fight_visible_only = visible_only;
    }

    pub fn members(&self) -> &BTreeSet<AgentId> {
        &self.members
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    // Membership changes go through SquadRegistry so the owner index stays exact.

    pub(crate) fn insert(&mut self, agent: AgentId) -> bool {
        self.members.insert(agent)
    }

    pub(crate) fn remove(&mut self, agent: AgentId) -> bool {
        self.members.remove(&agent)
    }

    pub(crate) fn take_members(&mut self) -> BTreeSet<AgentId> {
        std::mem::take(&mut self.members)
    }

    /// Members present in this tick's roster, in id order
    pub fn agents<'r>(&'r self, roster: &'r AgentRoster) -> impl Iterator<Item = &'r Agent> + 'r {
        self.members.iter().filter_map(move |id| roster.get(id))
    }

    pub fn has_detector(&self, roster: &AgentRoster) -> bool {
        self.agents(roster).any(|a| a.unit_type.is_detector())
    }

    /// First detector member, if any
    pub fn detector(&self, roster: &AgentRoster) -> Option<AgentId> {
        self.agents(roster)
            .find(|a| a.unit_type.is_detector())
            .map(|a| a.id)
    }

    /// Anything other than detectors
    pub fn has_combat_units(&self, roster: &AgentRoster) -> bool {
        self.agents(roster).any(|a| !a.unit_type.is_detector())
    }

    pub fn has_ground(&self, roster: &AgentRoster) -> bool {
        self.agents(roster).any(|a| !a.is_flying())
    }

    pub fn has_air(&self, roster: &AgentRoster) -> bool {
        self.agents(roster).any(|a| a.is_flying())
    }

    pub fn can_attack_ground(&self, roster: &AgentRoster) -> bool {
        self.agents(roster).any(|a| a.can_attack_ground())
    }

    pub fn can_attack_air(&self, roster: &AgentRoster) -> bool {
        self.agents(roster).any(|a| a.can_attack_air())
    }

    pub fn workers(&self, roster: &AgentRoster) -> Vec<AgentId> {
        self.agents(roster)
            .filter(|a| a.unit_type.is_worker())
            .map(|a| a.id)
            .collect()
    }

    /// Mean position of the members, or None when no member is in the roster
    pub fn calc_center(&self, roster: &AgentRoster) -> Option<Position> {
        let (sum_x, sum_y, count) = self
            .agents(roster)
            .fold((0i64, 0i64, 0i64), |(x, y, n), a| {
                (x + a.position.x as i64, y + a.position.y as i64, n + 1)
            });
        if count == 0 {
            return None;
        }
        Some(Position::new((sum_x / count) as i32, (sum_y / count) as i32))
    }
}
