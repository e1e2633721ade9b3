//! Live creature agents

use crate::events::{DomainEvent, EventSink};
use dino_ai::{AgentState, AgentStateMachine};
use dino_combat::{CooldownTracker, HealthPool, StatusTimers, ThreatTable};
use dino_core::{AgentId, PackId, PlayerId, Vec3};
use dino_defs::{AbilityDefinition, BossDefinition, SpeciesDefinition};
use std::sync::Arc;

/// One live creature
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub species: Arc<SpeciesDefinition>,
    /// Set for boss agents
    pub boss: Option<Arc<BossDefinition>>,
    pub health: HealthPool,
    /// Current basic attack damage (phase and rage bonuses included)
    pub damage: f32,
    /// Current move speed
    pub speed: f32,
    pub aggression_radius: f32,
    /// Size multiplier for presentation
    pub size: f32,
    pub position: Vec3,
    /// Spawn position; wandering stays around it
    pub home: Vec3,
    state: AgentStateMachine,
    pub target: Option<PlayerId>,
    pub threat: ThreatTable,
    pub cooldowns: CooldownTracker,
    pub status: StatusTimers,
    /// Damage multiplier for the next basic attack
    pub ambush_multiplier: Option<f32>,
    pub enraged: bool,
    pub pack: Option<PackId>,
    pub is_leader: bool,
    pub last_attack: Option<f64>,
    pub last_search: Option<f64>,
    /// Point an idle agent is walking to
    pub wander_target: Option<Vec3>,
    /// Fallback flee heading when attackers give no direction
    pub flee_heading: Option<Vec3>,
    pub spawned_at: f64,
    pub died_at: Option<f64>,
}

impl Agent {
    /// Create an agent with the species' base stats
    pub fn new(id: AgentId, species: Arc<SpeciesDefinition>, position: Vec3, now: f64) -> Self {
        let stats = &species.stats;
        Self {
            id,
            health: HealthPool::new(stats.health).with_armor(stats.armor),
            damage: stats.damage,
            speed: stats.move_speed,
            aggression_radius: species.aggression_radius,
            size: 1.0,
            position,
            home: position,
            state: AgentStateMachine::new(now),
            target: None,
            threat: ThreatTable::new(),
            cooldowns: CooldownTracker::new(),
            status: StatusTimers::new(),
            ambush_multiplier: None,
            enraged: false,
            pack: None,
            is_leader: false,
            last_attack: None,
            last_search: None,
            wander_target: None,
            flee_heading: None,
            spawned_at: now,
            died_at: None,
            boss: None,
            species,
        }
    }

    /// Create a boss agent: base species stats scaled by the boss multipliers
    pub fn new_boss(
        id: AgentId,
        boss: Arc<BossDefinition>,
        species: Arc<SpeciesDefinition>,
        position: Vec3,
        now: f64,
    ) -> Self {
        let mut agent = Self::new(id, species, position, now);
        let m = &boss.multipliers;
        let stats = &agent.species.stats;
        agent.health = HealthPool::new(stats.health * m.health).with_armor(stats.armor);
        agent.damage = stats.damage * m.damage;
        agent.speed = stats.move_speed * m.speed;
        agent.size = m.size;
        agent.boss = Some(boss);
        agent
    }

    pub fn state(&self) -> AgentState {
        self.state.current()
    }

    pub fn time_in_state(&self, now: f64) -> f64 {
        self.state.time_in_state(now)
    }

    /// The only way to change state: resets time-in-state and emits `StateChanged`
    pub fn set_state(&mut self, to: AgentState, now: f64, events: &mut dyn EventSink) -> bool {
        match self.state.transition(to, now) {
            Some(change) => {
                log::debug!("{} ({}) {} -> {}", self.id, self.species.id, change.from, change.to);
                events.emit(DomainEvent::StateChanged {
                    agent: self.id,
                    from: change.from,
                    to: change.to,
                });
                true
            }
            None => false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state() == AgentState::Dead
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn is_camouflaged(&self) -> bool {
        self.status.is_camouflaged()
    }

    pub fn is_stunned(&self) -> bool {
        self.status.is_stunned()
    }

    pub fn health_fraction(&self) -> f32 {
        self.health.fraction()
    }

    /// Low enough on health to be forced into fleeing (bosses never flee)
    pub fn should_flee(&self) -> bool {
        let threshold = self.species.flee_health_fraction;
        !self.is_boss() && threshold > 0.0 && self.health_fraction() <= threshold
    }

    /// Ability by name: boss abilities shadow the base species'
    pub fn ability(&self, name: &str) -> Option<&AbilityDefinition> {
        self.boss
            .as_ref()
            .and_then(|b| b.ability(name))
            .or_else(|| self.species.ability(name))
    }

    /// Every ability the agent owns: species first, then boss-exclusive
    pub fn abilities(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.species
            .abilities
            .iter()
            .chain(self.boss.iter().flat_map(|b| b.abilities.iter()))
    }

    /// Current damage relative to the species base, applied to ability magnitudes
    pub fn damage_scale(&self) -> f32 {
        let base = self.species.stats.damage;
        if base > 0.0 {
            self.damage / base
        } else {
            1.0
        }
    }

    pub fn attack_range(&self) -> f32 {
        self.species.stats.attack_range
    }

    /// Whether the basic attack cooldown has elapsed
    pub fn attack_ready(&self, now: f64) -> bool {
        self.last_attack
            .map_or(true, |last| now - last >= self.species.stats.attack_cooldown as f64)
    }

    /// Display name (boss name for bosses)
    pub fn display_name(&self) -> &str {
        match &self.boss {
            Some(boss) => &boss.display_name,
            None => &self.species.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use dino_defs::DefinitionRegistry;

    fn raptor() -> Agent {
        let defs = DefinitionRegistry::load_builtin().unwrap();
        let species = defs.species("velociraptor").unwrap().clone();
        Agent::new(AgentId(1), species, Vec3::ZERO, 0.0)
    }

    #[test]
    fn test_new_agent_uses_base_stats() {
        let agent = raptor();
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(agent.health.current(), agent.species.stats.health);
        assert_eq!(agent.damage_scale(), 1.0);
        assert!(agent.attack_ready(0.0));
    }

    #[test]
    fn test_set_state_emits_once() {
        let mut agent = raptor();
        let mut events = EventLog::new();
        assert!(agent.set_state(AgentState::Alert, 1.0, &mut events));
        assert!(!agent.set_state(AgentState::Alert, 2.0, &mut events));
        assert_eq!(events.count("state_changed"), 1);
        assert_eq!(agent.time_in_state(1.5), 0.5);
    }

    #[test]
    fn test_should_flee_threshold() {
        let mut agent = raptor();
        assert!(!agent.should_flee());
        let max = agent.health.max();
        agent.health.set_health(max * agent.species.flee_health_fraction * 0.9);
        assert!(agent.should_flee());
    }

    #[test]
    fn test_boss_scaling_and_abilities() {
        let defs = DefinitionRegistry::load_builtin().unwrap();
        let boss = defs.boss("alpha_rex").unwrap().clone();
        let species = defs.species(&boss.base_species).unwrap().clone();
        let agent = Agent::new_boss(AgentId(2), boss.clone(), species.clone(), Vec3::ZERO, 0.0);

        assert_eq!(agent.health.max(), species.stats.health * boss.multipliers.health);
        assert_eq!(agent.size, boss.multipliers.size);
        assert!(agent.ability("earthquake").is_some());
        assert!(agent.ability("roar").is_some());
        assert_eq!(
            agent.abilities().count(),
            species.abilities.len() + boss.abilities.len()
        );

        // Bosses never flee
        let mut low = agent;
        low.health.set_health(1.0);
        assert!(!low.should_flee());
    }
}
