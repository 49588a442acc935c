//! Squad registry: owns every squad and the agent -> squad index
//!
//! All membership changes funnel through here, so an agent is in at most
//! one squad at any time and only moves upward in priority.

use ahash::AHashMap;

use crate::core::error::{CommandError, Result};
use crate::core::types::AgentId;
use crate::squad::squad::Squad;
use crate::units::AgentRoster;

#[derive(Debug, Default)]
pub struct SquadRegistry {
    squads: AHashMap<String, Squad>,
    owners: AHashMap<AgentId, String>,
}

impl SquadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a squad. Names are unique; the squad must start empty.
    pub fn add_squad(&mut self, squad: Squad) -> Result<()> {
        if self.squads.contains_key(squad.name()) {
            return Err(CommandError::DuplicateSquad(squad.name().to_string()));
        }
        debug_assert!(squad.is_empty(), "new squads start without members");
        self.squads.insert(squad.name().to_string(), squad);
        Ok(())
    }

    /// Forget a squad entirely, releasing its members
    pub fn remove_squad(&mut self, name: &str) -> Result<Vec<AgentId>> {
        let released = self.clear_squad(name)?;
        self.squads.remove(name);
        Ok(released)
    }

    pub fn squad_exists(&self, name: &str) -> bool {
        self.squads.contains_key(name)
    }

    pub fn squad(&self, name: &str) -> Result<&Squad> {
        self.squads
            .get(name)
            .ok_or_else(|| CommandError::SquadNotFound(name.to_string()))
    }

    /// Mutable access for orders and tuning. Membership is not editable this way.
    pub fn squad_mut(&mut self, name: &str) -> Result<&mut Squad> {
        self.squads
            .get_mut(name)
            .ok_or_else(|| CommandError::SquadNotFound(name.to_string()))
    }

    pub fn squads(&self) -> impl Iterator<Item = &Squad> {
        self.squads.values()
    }

    /// Squad names in sorted order, for deterministic sweeps
    pub fn squad_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.squads.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }

    /// The squad currently holding an agent
    pub fn owner_of(&self, agent: AgentId) -> Option<&Squad> {
        self.owners.get(&agent).and_then(|name| self.squads.get(name))
    }

    /// True iff the target exists, does not already hold the agent, and the
    /// agent is either unowned or held by a strictly lower-priority squad.
    pub fn can_assign_unit_to_squad(&self, agent: AgentId, target: &str) -> bool {
        let Some(target_squad) = self.squads.get(target) else {
            return false;
        };
        if target_squad.contains(agent) {
            return false;
        }
        match self.owner_of(agent) {
            Some(current) => target_squad.priority().outranks(&current.priority()),
            None => true,
        }
    }

    /// Move an agent into `target`, removing it from its current squad
    pub fn assign_unit_to_squad(&mut self, agent: AgentId, target: &str) -> Result<()> {
        if !self.can_assign_unit_to_squad(agent, target) {
            return Err(CommandError::IllegalAssignment {
                agent,
                squad: target.to_string(),
            });
        }
        self.remove_unit(agent);
        if let Some(squad) = self.squads.get_mut(target) {
            squad.insert(agent);
            self.owners.insert(agent, target.to_string());
        }
        Ok(())
    }

    /// Drop an agent from whatever squad holds it. Returns the former squad's name.
    pub fn remove_unit(&mut self, agent: AgentId) -> Option<String> {
        let name = self.owners.remove(&agent)?;
        if let Some(squad) = self.squads.get_mut(&name) {
            squad.remove(agent);
        }
        Some(name)
    }

    /// Empty a squad, leaving its agents unowned. Clearing an empty squad is a no-op.
    pub fn clear_squad(&mut self, name: &str) -> Result<Vec<AgentId>> {
        let squad = self
            .squads
            .get_mut(name)
            .ok_or_else(|| CommandError::SquadNotFound(name.to_string()))?;
        let released: Vec<AgentId> = squad.take_members().into_iter().collect();
        for agent in &released {
            self.owners.remove(agent);
        }
        Ok(released)
    }

    /// Per-tick upkeep: prune members that are no longer in the roster.
    /// Returns the pruned ids.
    pub fn update(&mut self, roster: &AgentRoster) -> Vec<AgentId> {
        let mut stale: Vec<AgentId> = self
            .owners
            .keys()
            .filter(|id| !roster.contains_key(id))
            .copied()
            .collect();
        stale.sort();
        for agent in &stale {
            self.remove_unit(*agent);
        }
        stale
    }

    /// Owner index and squad memberships agree exactly
    pub fn is_consistent(&self) -> bool {
        let member_count: usize = self.squads.values().map(|s| s.len()).sum();
        member_count == self.owners.len()
            && self.owners.iter().all(|(agent, name)| {
                self.squads
                    .get(name)
                    .map(|s| s.contains(*agent))
                    .unwrap_or(false)
            })
    }
}
