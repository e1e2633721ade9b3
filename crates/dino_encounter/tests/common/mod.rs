//! Scripted world shared by the integration tests

#![allow(dead_code)]

use dino_encounter::prelude::*;

/// Fixed simulation step used by the tests (seconds)
pub const DT: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct MockPlayer {
    pub id: PlayerId,
    pub position: Vec3,
    pub health: f32,
}

/// In-memory world: players are points with health, the safe zone is a circle
#[derive(Debug, Default)]
pub struct MockWorld {
    pub players: Vec<MockPlayer>,
    pub spawn_points: Vec<Vec3>,
    /// `None` means everywhere is safe
    pub safe_zone: Option<(Vec3, f32)>,
    pub severity: usize,
    /// Accept loot requests (otherwise they are only logged)
    pub accept_loot: bool,
    /// Terrain blocks every path
    pub blocked: bool,
    pub damage_taken: Vec<(PlayerId, f32)>,
    pub effects: Vec<(PlayerId, PlayerEffect)>,
    pub loot: Vec<(String, Vec3, LootDrop)>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, id: u64, position: Vec3, health: f32) -> Self {
        self.players.push(MockPlayer {
            id: PlayerId(id),
            position,
            health,
        });
        self
    }

    pub fn with_spawn_points(mut self, points: Vec<Vec3>) -> Self {
        self.spawn_points = points;
        self
    }

    pub fn with_safe_zone(mut self, center: Vec3, radius: f32) -> Self {
        self.safe_zone = Some((center, radius));
        self
    }

    pub fn with_severity(mut self, level: usize) -> Self {
        self.severity = level;
        self
    }

    pub fn accepting_loot(mut self) -> Self {
        self.accept_loot = true;
        self
    }

    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }

    pub fn player(&self, id: u64) -> &MockPlayer {
        self.players.iter().find(|p| p.id == PlayerId(id)).unwrap()
    }

    pub fn move_player(&mut self, id: u64, position: Vec3) {
        if let Some(player) = self.players.iter_mut().find(|p| p.id == PlayerId(id)) {
            player.position = position;
        }
    }

    pub fn total_damage_to(&self, id: u64) -> f32 {
        self.damage_taken
            .iter()
            .filter(|(p, _)| *p == PlayerId(id))
            .map(|(_, amount)| amount)
            .sum()
    }

    pub fn stuns(&self) -> usize {
        self.effects
            .iter()
            .filter(|(_, e)| matches!(e, PlayerEffect::Stun { .. }))
            .count()
    }
}

impl EncounterWorld for MockWorld {
    fn is_inside_safe_zone(&self, position: Vec3) -> bool {
        match self.safe_zone {
            Some((center, radius)) => position.horizontal().distance(center.horizontal()) <= radius,
            None => true,
        }
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
            .filter(|p| p.health > 0.0)
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
        if let Some(p) = self.players.iter_mut().find(|p| p.id == player) {
            p.health = (p.health - amount).max(0.0);
        }
        self.damage_taken.push((player, amount));
    }

    fn apply_player_effect(&mut self, player: PlayerId, effect: PlayerEffect) {
        self.effects.push((player, effect));
    }

    fn can_reach(&self, _from: Vec3, _to: Vec3) -> bool {
        !self.blocked
    }

    fn spawn_loot_item(&mut self, item: &str, position: Vec3, drop: &LootDrop) -> bool {
        if self.accept_loot {
            self.loot.push((item.to_string(), position, drop.clone()));
        }
        self.accept_loot
    }
}

pub fn definitions() -> Arc<DefinitionRegistry> {
    Arc::new(DefinitionRegistry::load_builtin().unwrap())
}

/// Seeded config that never wanders, so idle agents stay put
pub fn quiet_config(seed: u64) -> EncounterConfig {
    let mut config = EncounterConfig::seeded(seed);
    config.wander_chance = 0.0;
    config
}

pub fn simulation(config: EncounterConfig) -> Simulation {
    Simulation::new(definitions(), config).unwrap()
}

/// Tick `count` times at `DT`
pub fn run(sim: &mut Simulation, world: &mut MockWorld, events: &mut EventLog, count: usize) {
    for _ in 0..count {
        sim.tick(world, events, DT);
    }
}

pub fn state_of(sim: &Simulation, agent: AgentId) -> AgentState {
    sim.agent(agent).unwrap().state()
}
