//! Encounter simulation
//!
//! [`Simulation`] owns every agent, pack and boss encounter of one match and
//! advances them on a fixed tick. It never touches the outside world except
//! through the [`EncounterWorld`] and [`EventSink`] passed into each call, so
//! any number of simulations can run side by side.

use crate::abilities;
use crate::agent::Agent;
use crate::boss;
use crate::brain;
use crate::combat;
use crate::config::EncounterConfig;
use crate::context::StepContext;
use crate::error::{EncounterError, Result};
use crate::events::{DomainEvent, EventSink};
use crate::pack;
use crate::players::PlayerView;
use crate::registry::{AgentRegistry, Pack};
use crate::spawn;
use crate::world::EncounterWorld;
use dino_combat::DotTracker;
use dino_core::{AgentId, PackId, PlayerId, Vec3};
use dino_defs::DefinitionRegistry;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;

/// Running totals of a simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimulationStats {
    pub ticks: u64,
    pub waves: u64,
    pub spawned: u64,
    pub despawned: u64,
    /// Agent steps that failed and were skipped
    pub step_errors: u64,
}

/// One match worth of creatures
pub struct Simulation {
    config: EncounterConfig,
    definitions: Arc<DefinitionRegistry>,
    registry: AgentRegistry,
    players: PlayerView,
    dots: DotTracker,
    rng: ChaCha8Rng,
    now: f64,
    stats: SimulationStats,
}

impl Simulation {
    /// Create a simulation; fails on an invalid config
    pub fn new(definitions: Arc<DefinitionRegistry>, config: EncounterConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            registry: AgentRegistry::new(config.grid_cell_size),
            players: PlayerView::new(config.grid_cell_size),
            dots: DotTracker::new(),
            rng,
            now: 0.0,
            stats: SimulationStats::default(),
            definitions,
            config,
        })
    }

    /// Split into the registry and a step context borrowing everything else
    fn split<'a>(
        &'a mut self,
        world: &'a mut dyn EncounterWorld,
        events: &'a mut dyn EventSink,
        dt: f32,
    ) -> (&'a mut AgentRegistry, StepContext<'a>) {
        let Self {
            config,
            definitions,
            registry,
            players,
            dots,
            rng,
            now,
            ..
        } = self;
        let ctx = StepContext {
            world,
            events,
            config,
            definitions: &**definitions,
            rng,
            players,
            dots,
            now: *now,
            dt,
        };
        (registry, ctx)
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Order: clock, threat decay, player snapshot, agent grid, player
    /// damage-over-time, every live agent in id order, pack pass, corpse
    /// removal.
    pub fn tick(&mut self, world: &mut dyn EncounterWorld, events: &mut dyn EventSink, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.now += dt as f64;
        self.stats.ticks += 1;

        let decay = self.config.threat_decay_per_second * dt;
        if decay > 0.0 {
            for agent in self.registry.agents_mut() {
                agent.threat.decay(decay);
            }
        }

        self.players.refresh(&*world);
        self.registry.rebuild_grid();

        let mut step_errors = 0;
        let mut despawned = 0;
        {
            let (registry, mut ctx) = self.split(world, events, dt);

            for (player, amount) in ctx.dots.tick(dt) {
                ctx.damage_player(player, amount);
            }

            for id in registry.agent_ids() {
                let Some(mut agent) = registry.take(id) else {
                    continue;
                };
                if let Err(e) = brain::step_agent(&mut agent, registry, &mut ctx) {
                    log::warn!("{} ({}) step failed: {}", id, agent.species.id, e);
                    step_errors += 1;
                }
                registry.put_back(agent);
            }

            pack::pack_pass(registry, &mut ctx);

            for id in registry.expired_corpses(ctx.now) {
                if registry.remove(id).is_some() {
                    ctx.events.emit(DomainEvent::AgentDespawned { agent: id });
                    despawned += 1;
                }
            }
        }
        self.stats.step_errors += step_errors;
        self.stats.despawned += despawned;
    }

    /// Spawn a wave sized by the world's severity level; returns the number spawned
    pub fn spawn_wave(&mut self, world: &mut dyn EncounterWorld, events: &mut dyn EventSink) -> usize {
        let (registry, mut ctx) = self.split(world, events, 0.0);
        let spawned = spawn::spawn_wave(registry, &mut ctx);
        self.stats.waves += 1;
        self.stats.spawned += spawned as u64;
        spawned
    }

    /// Spawn a single agent of `species_id` at `position`
    pub fn spawn_agent(
        &mut self,
        world: &mut dyn EncounterWorld,
        events: &mut dyn EventSink,
        species_id: &str,
        position: Vec3,
    ) -> Result<AgentId> {
        let (registry, mut ctx) = self.split(world, events, 0.0);
        let id = spawn::spawn_agent(species_id, position, registry, &mut ctx)?;
        self.stats.spawned += 1;
        Ok(id)
    }

    /// Spawn a boss (and its escort) at `position`
    pub fn spawn_boss(
        &mut self,
        world: &mut dyn EncounterWorld,
        events: &mut dyn EventSink,
        boss_id: &str,
        position: Vec3,
    ) -> Result<AgentId> {
        let before = self.registry.len();
        let (registry, mut ctx) = self.split(world, events, 0.0);
        let id = boss::spawn_boss(boss_id, position, registry, &mut ctx)?;
        self.stats.spawned += (self.registry.len() - before) as u64;
        Ok(id)
    }

    /// Damage an agent, crediting `attacker` with threat
    ///
    /// Returns `true` iff the agent exists, was alive and `amount` is positive.
    pub fn damage_agent(
        &mut self,
        world: &mut dyn EncounterWorld,
        events: &mut dyn EventSink,
        agent: AgentId,
        amount: f32,
        attacker: Option<PlayerId>,
    ) -> bool {
        let (registry, mut ctx) = self.split(world, events, 0.0);
        combat::damage_agent(agent, amount, attacker, registry, &mut ctx)
    }

    /// Heal an agent; returns the amount healed
    pub fn heal_agent(&mut self, agent: AgentId, amount: f32) -> Result<f32> {
        combat::heal_agent(&mut self.registry, agent, amount)
    }

    /// Stun an agent for `duration` seconds
    pub fn stun_agent(&mut self, agent: AgentId, duration: f32) -> Result<()> {
        combat::stun_agent(&mut self.registry, agent, duration, self.now)
    }

    /// Remove every agent, pack and boss encounter at once
    pub fn despawn_all(&mut self, events: &mut dyn EventSink) -> usize {
        let removed = self.registry.clear();
        self.dots.clear();
        for &agent in &removed {
            events.emit(DomainEvent::AgentDespawned { agent });
        }
        if !removed.is_empty() {
            log::info!("Despawned {} agents", removed.len());
        }
        self.stats.despawned += removed.len() as u64;
        removed.len()
    }

    /// Whether the agent could use `ability` right now
    pub fn can_use_ability(&self, agent: AgentId, ability: &str) -> bool {
        self.registry
            .agent(agent)
            .map_or(false, |a| abilities::can_use(a, ability, self.now))
    }

    /// Make an agent use an ability immediately
    ///
    /// Returns `Ok(false)` with no side effects when the ability cannot be
    /// used (unknown, disabled, cooling down or no valid target).
    pub fn try_use_ability(
        &mut self,
        world: &mut dyn EncounterWorld,
        events: &mut dyn EventSink,
        agent: AgentId,
        ability: &str,
    ) -> Result<bool> {
        self.players.refresh(&*world);
        let (registry, mut ctx) = self.split(world, events, 0.0);
        let mut taken = registry
            .take(agent)
            .ok_or(EncounterError::UnknownAgent(agent))?;
        let used = taken.is_alive() && abilities::try_use(&mut taken, ability, &mut ctx);
        registry.put_back(taken);
        Ok(used)
    }

    /// Aim an agent at a player (used by scripted encounters and tests)
    pub fn set_target(&mut self, agent: AgentId, player: Option<PlayerId>) -> Result<()> {
        let agent = self
            .registry
            .agent_mut(agent)
            .ok_or(EncounterError::UnknownAgent(agent))?;
        agent.target = player;
        Ok(())
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.registry.agent(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.registry.agents()
    }

    pub fn pack(&self, id: PackId) -> Option<&Pack> {
        self.registry.pack(id)
    }

    pub fn packs(&self) -> impl Iterator<Item = &Pack> {
        self.registry.packs()
    }

    /// Current phase of a live boss
    pub fn boss_phase(&self, agent: AgentId) -> Option<u32> {
        self.registry.boss(agent).map(|b| b.phase)
    }

    /// Agents that are not dead
    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Simulation clock (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn definitions(&self) -> &Arc<DefinitionRegistry> {
        &self.definitions
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }
}
