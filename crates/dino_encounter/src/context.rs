//! Borrowed view of the simulation handed to every step

use crate::config::EncounterConfig;
use crate::error::{EncounterError, Result};
use crate::events::EventSink;
use crate::players::PlayerView;
use crate::world::{EncounterWorld, PlayerEffect};
use dino_combat::DotTracker;
use dino_core::{AgentId, PlayerId, Vec3};
use dino_defs::DefinitionRegistry;
use rand_chacha::ChaCha8Rng;

/// Everything a step needs besides the agent registry
pub(crate) struct StepContext<'a> {
    pub world: &'a mut dyn EncounterWorld,
    pub events: &'a mut dyn EventSink,
    pub config: &'a EncounterConfig,
    pub definitions: &'a DefinitionRegistry,
    pub rng: &'a mut ChaCha8Rng,
    pub players: &'a mut PlayerView,
    pub dots: &'a mut DotTracker,
    /// Simulation time (seconds)
    pub now: f64,
    /// Length of the current tick (seconds)
    pub dt: f32,
}

impl StepContext<'_> {
    /// Damage a player and refresh their snapshot
    pub fn damage_player(&mut self, player: PlayerId, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.world.apply_damage_to_player(player, amount);
        self.players.refresh_player(&*self.world, player);
    }

    pub fn apply_effect(&mut self, player: PlayerId, effect: PlayerEffect) {
        self.world.apply_player_effect(player, effect);
    }

    /// Ask the world to move an agent; rejects non-finite results
    pub fn move_agent(&mut self, agent: AgentId, from: Vec3, goal: Vec3, max_step: f32) -> Result<Vec3> {
        if max_step <= 0.0 || !goal.is_finite() {
            return Ok(from);
        }
        let next = self.world.move_agent_toward(agent, from, goal, max_step);
        if next.is_finite() {
            Ok(next)
        } else {
            Err(EncounterError::InvalidPosition(agent))
        }
    }
}
