//! Ownership of agents, packs and boss encounters

use crate::agent::Agent;
use dino_ai::SpatialGrid;
use dino_core::{AgentId, IdGenerator, PackId, Vec3};
use std::collections::{BTreeMap, VecDeque};

/// A leader/follower group of one species
#[derive(Debug, Clone)]
pub struct Pack {
    pub id: PackId,
    pub species: String,
    /// `None` only while the pack is being torn down
    pub leader: Option<AgentId>,
    /// Members in join order
    pub members: Vec<AgentId>,
}

impl Pack {
    /// Position of `agent` in the member list
    pub fn member_index(&self, agent: AgentId) -> Option<usize> {
        self.members.iter().position(|&m| m == agent)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Phase tracking for a live boss
#[derive(Debug, Clone)]
pub struct BossEncounter {
    pub agent: AgentId,
    pub boss_id: String,
    /// 1-based, never decreases
    pub phase: u32,
    pub spawned_at: f64,
}

/// Every agent, pack and boss encounter of one simulation
#[derive(Debug)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentId, Agent>,
    packs: BTreeMap<PackId, Pack>,
    bosses: BTreeMap<AgentId, BossEncounter>,
    corpses: VecDeque<(f64, AgentId)>,
    agent_ids: IdGenerator,
    pack_ids: IdGenerator,
    grid: SpatialGrid<AgentId>,
}

impl AgentRegistry {
    pub fn new(cell_size: f32) -> Self {
        Self {
            agents: BTreeMap::new(),
            packs: BTreeMap::new(),
            bosses: BTreeMap::new(),
            corpses: VecDeque::new(),
            agent_ids: IdGenerator::new(),
            pack_ids: IdGenerator::new(),
            grid: SpatialGrid::new(cell_size),
        }
    }

    // Agents

    pub fn next_agent_id(&self) -> AgentId {
        self.agent_ids.next()
    }

    pub fn insert(&mut self, agent: Agent) {
        self.grid.insert(agent.id, agent.position);
        self.agents.insert(agent.id, agent);
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Temporarily remove an agent so it can be stepped against the rest
    pub(crate) fn take(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    /// Return an agent removed with `take`
    pub(crate) fn put_back(&mut self, agent: Agent) {
        self.agents.insert(agent.id, agent);
    }

    /// Remove an agent for good, dropping it from its pack and boss encounter
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        if let Some(pack) = agent.pack {
            self.leave_pack(pack, id);
        }
        self.bosses.remove(&id);
        self.corpses.retain(|(_, corpse)| *corpse != id);
        Some(agent)
    }

    /// Agent ids in ascending order
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.values_mut()
    }

    /// Agents that are not dead
    pub fn active_count(&self) -> usize {
        self.agents.values().filter(|a| a.is_alive()).count()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    // Spatial

    /// Re-index every agent's current position
    pub fn rebuild_grid(&mut self) {
        self.grid
            .rebuild(self.agents.values().map(|a| (a.id, a.position)));
    }

    /// Agent ids within `radius` of `center`, as of the last grid rebuild
    pub fn agents_near(&self, center: Vec3, radius: f32) -> Vec<AgentId> {
        self.grid
            .query_radius(center, radius)
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    // Packs

    /// Create a pack led by `leader`
    pub fn create_pack(&mut self, species: &str, leader: AgentId) -> PackId {
        let id: PackId = self.pack_ids.next();
        self.packs.insert(
            id,
            Pack {
                id,
                species: species.to_string(),
                leader: Some(leader),
                members: vec![leader],
            },
        );
        if let Some(agent) = self.agents.get_mut(&leader) {
            agent.pack = Some(id);
            agent.is_leader = true;
        }
        id
    }

    /// Add `agent` as a follower
    pub fn join_pack(&mut self, pack: PackId, agent: AgentId) -> bool {
        let Some(group) = self.packs.get_mut(&pack) else {
            return false;
        };
        if !group.members.contains(&agent) {
            group.members.push(agent);
        }
        if let Some(member) = self.agents.get_mut(&agent) {
            member.pack = Some(pack);
            member.is_leader = false;
        }
        true
    }

    /// Drop `agent` from `pack`; an emptied pack is deleted
    ///
    /// Returns `true` if the pack still exists afterwards.
    pub fn leave_pack(&mut self, pack: PackId, agent: AgentId) -> bool {
        let Some(group) = self.packs.get_mut(&pack) else {
            return false;
        };
        group.members.retain(|&m| m != agent);
        if group.leader == Some(agent) {
            group.leader = None;
        }
        if let Some(member) = self.agents.get_mut(&agent) {
            member.pack = None;
            member.is_leader = false;
        }
        if group.members.is_empty() {
            self.packs.remove(&pack);
            log::debug!("{} disbanded", pack);
            return false;
        }
        true
    }

    /// Make `agent` the leader of `pack`
    pub fn promote(&mut self, pack: PackId, agent: AgentId) {
        let Some(group) = self.packs.get_mut(&pack) else {
            return;
        };
        if let Some(old) = group.leader.replace(agent) {
            if let Some(previous) = self.agents.get_mut(&old) {
                previous.is_leader = false;
            }
        }
        if let Some(leader) = self.agents.get_mut(&agent) {
            leader.is_leader = true;
        }
    }

    pub fn pack(&self, id: PackId) -> Option<&Pack> {
        self.packs.get(&id)
    }

    pub fn packs(&self) -> impl Iterator<Item = &Pack> {
        self.packs.values()
    }

    pub fn pack_ids(&self) -> Vec<PackId> {
        self.packs.keys().copied().collect()
    }

    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    // Bosses

    pub fn insert_boss(&mut self, encounter: BossEncounter) {
        self.bosses.insert(encounter.agent, encounter);
    }

    pub fn boss(&self, agent: AgentId) -> Option<&BossEncounter> {
        self.bosses.get(&agent)
    }

    pub(crate) fn boss_mut(&mut self, agent: AgentId) -> Option<&mut BossEncounter> {
        self.bosses.get_mut(&agent)
    }

    pub(crate) fn remove_boss(&mut self, agent: AgentId) -> Option<BossEncounter> {
        self.bosses.remove(&agent)
    }

    pub fn bosses(&self) -> impl Iterator<Item = &BossEncounter> {
        self.bosses.values()
    }

    // Corpses

    /// Queue a dead agent for removal at `at`
    pub(crate) fn schedule_corpse(&mut self, agent: AgentId, at: f64) {
        self.corpses.push_back((at, agent));
    }

    /// Corpses whose grace period has ended
    pub(crate) fn expired_corpses(&mut self, now: f64) -> Vec<AgentId> {
        let mut expired = Vec::new();
        self.corpses.retain(|&(at, agent)| {
            if at <= now {
                expired.push(agent);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn pending_corpses(&self) -> usize {
        self.corpses.len()
    }

    /// Drop every agent, pack, boss encounter and corpse; returns removed agent ids
    pub fn clear(&mut self) -> Vec<AgentId> {
        let ids = self.agent_ids();
        self.agents.clear();
        self.packs.clear();
        self.bosses.clear();
        self.corpses.clear();
        self.grid.clear();
        ids
    }
}
