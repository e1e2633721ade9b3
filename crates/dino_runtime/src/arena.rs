//! Scripted arena world
//!
//! A circular map with a shrinking safe zone and players that wander inside
//! it and shoot the closest creature in range. Good enough to exercise every
//! engine capability without a real game attached.

use crate::config::RuntimeConfig;
use dino_core::consts::TAU;
use dino_core::{AgentId, PlayerId, Vec3};
use dino_encounter::{Agent, EncounterWorld, LootDrop, PlayerEffect};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;

/// Chance per second that a wandering player picks a new heading
const TURN_RATE: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct ArenaPlayer {
    pub id: PlayerId,
    pub position: Vec3,
    pub health: f32,
    heading: Vec3,
    stunned_until: f32,
    blinded_until: f32,
}

impl ArenaPlayer {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Counters of what the engine did to the arena
#[derive(Debug, Default, Clone, Serialize)]
pub struct ArenaTally {
    pub damage_to_players: f32,
    pub stuns: u32,
    pub blinds: u32,
    pub knockbacks: u32,
    /// Dropped item id to total quantity
    pub loot: BTreeMap<String, u32>,
}

pub struct ArenaWorld {
    players: Vec<ArenaPlayer>,
    spawn_points: Vec<Vec3>,
    arena_radius: f32,
    final_zone_radius: f32,
    zone_radius: f32,
    severity_levels: usize,
    severity: usize,
    match_secs: f32,
    player_speed: f32,
    time: f32,
    rng: ChaCha8Rng,
    tally: ArenaTally,
}

impl ArenaWorld {
    pub fn new(config: &RuntimeConfig, seed: u64) -> Self {
        // Player placement gets its own stream so it does not shift the engine's rolls
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed_a7e7a);
        let players = (1..=config.players as u64)
            .map(|id| {
                let angle = rng.gen::<f32>() * TAU;
                let distance = config.arena_radius * 0.8 * rng.gen::<f32>().sqrt();
                ArenaPlayer {
                    id: PlayerId(id),
                    position: Vec3::ground(angle.cos() * distance, angle.sin() * distance),
                    health: config.player_health,
                    heading: Vec3::ground(angle.sin(), -angle.cos()),
                    stunned_until: 0.0,
                    blinded_until: 0.0,
                }
            })
            .collect();
        let spawn_points = (0..config.spawn_points)
            .map(|i| {
                let angle = TAU * i as f32 / config.spawn_points as f32;
                let radius = config.arena_radius * 0.6;
                Vec3::ground(angle.cos() * radius, angle.sin() * radius)
            })
            .collect();

        Self {
            players,
            spawn_points,
            arena_radius: config.arena_radius,
            final_zone_radius: config.final_zone_radius,
            zone_radius: config.arena_radius,
            severity_levels: config.severity_levels,
            severity: 0,
            match_secs: config.match_secs,
            player_speed: config.player_speed,
            time: 0.0,
            rng,
            tally: ArenaTally::default(),
        }
    }

    /// Shrink the zone and move the players to `time`
    pub fn advance(&mut self, time: f32, dt: f32) {
        self.time = time;
        let progress = (time / self.match_secs).clamp(0.0, 1.0);
        self.zone_radius = self.arena_radius + (self.final_zone_radius - self.arena_radius) * progress;
        let level = ((progress * self.severity_levels as f32) as usize).min(self.severity_levels - 1);
        if level != self.severity {
            log::info!("Zone severity {} (radius {:.0})", level, self.zone_radius);
            self.severity = level;
        }

        let zone_radius = self.zone_radius;
        let step = self.player_speed * dt;
        for player in self.players.iter_mut().filter(|p| p.is_alive()) {
            if player.stunned_until > time {
                continue;
            }
            if player.position.horizontal().length() > zone_radius {
                // Run for the zone
                player.heading = (-player.position).horizontal().normalize_or_zero();
            } else if self.rng.gen::<f32>() < TURN_RATE * dt {
                let angle = self.rng.gen::<f32>() * TAU;
                player.heading = Vec3::ground(angle.cos(), angle.sin());
            }
            player.position = player.position + player.heading * step;
        }
    }

    /// For every player able to shoot, the closest live agent within `range`
    pub fn player_attacks<'a>(
        &self,
        agents: impl Iterator<Item = &'a Agent>,
        range: f32,
    ) -> Vec<(PlayerId, AgentId)> {
        let targets: Vec<(AgentId, Vec3)> = agents
            .filter(|a| a.is_alive() && !a.is_camouflaged())
            .map(|a| (a.id, a.position))
            .collect();
        self.players
            .iter()
            .filter(|p| p.is_alive() && p.stunned_until <= self.time && p.blinded_until <= self.time)
            .filter_map(|p| {
                targets
                    .iter()
                    .map(|&(id, position)| (id, p.position.distance(position)))
                    .filter(|&(_, distance)| distance <= range)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(id, _)| (p.id, id))
            })
            .collect()
    }

    /// Somewhere inside the current zone, away from its center
    pub fn boss_spawn_point(&mut self) -> Vec3 {
        let angle = self.rng.gen::<f32>() * TAU;
        let distance = self.zone_radius * 0.5;
        Vec3::ground(angle.cos() * distance, angle.sin() * distance)
    }

    pub fn alive_players(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    pub fn players(&self) -> &[ArenaPlayer] {
        &self.players
    }

    pub fn zone_radius(&self) -> f32 {
        self.zone_radius
    }

    pub fn tally(&self) -> &ArenaTally {
        &self.tally
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut ArenaPlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }
}

impl EncounterWorld for ArenaWorld {
    fn is_inside_safe_zone(&self, position: Vec3) -> bool {
        position.horizontal().length() <= self.zone_radius
    }

    fn current_severity_level(&self) -> usize {
        self.severity
    }

    fn encounter_spawn_points(&self) -> Vec<Vec3> {
        self.spawn_points.clone()
    }

    fn live_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.id)
            .collect()
    }

    fn player_position(&self, player: PlayerId) -> Option<Vec3> {
        self.players.iter().find(|p| p.id == player).map(|p| p.position)
    }

    fn player_health(&self, player: PlayerId) -> Option<f32> {
        self.players.iter().find(|p| p.id == player).map(|p| p.health)
    }

    fn apply_damage_to_player(&mut self, player: PlayerId, amount: f32) {
        let Some(target) = self.player_mut(player) else {
            return;
        };
        if !target.is_alive() {
            return;
        }
        let dealt = amount.min(target.health);
        target.health -= dealt;
        let eliminated = !target.is_alive();
        self.tally.damage_to_players += dealt;
        if eliminated {
            log::info!("{} was eliminated by a creature", player);
        }
    }

    fn apply_player_effect(&mut self, player: PlayerId, effect: PlayerEffect) {
        let time = self.time;
        let Some(target) = self.players.iter_mut().find(|p| p.id == player) else {
            return;
        };
        match effect {
            PlayerEffect::Stun { duration } => {
                target.stunned_until = target.stunned_until.max(time + duration);
                self.tally.stuns += 1;
            }
            PlayerEffect::Blind { duration } => {
                target.blinded_until = target.blinded_until.max(time + duration);
                self.tally.blinds += 1;
            }
            PlayerEffect::Knockback { direction, strength } => {
                target.position = target.position + direction * strength;
                self.tally.knockbacks += 1;
            }
        }
    }

    fn spawn_loot_item(&mut self, item: &str, _position: Vec3, drop: &LootDrop) -> bool {
        *self.tally.loot.entry(item.to_string()).or_insert(0) += drop.count;
        true
    }
}
