//! Per-tick snapshot of the players

use crate::world::EncounterWorld;
use dino_ai::{SpatialGrid, TargetCandidate};
use dino_combat::ThreatTable;
use dino_core::{PlayerId, Vec3};

/// A player as seen at the start of the tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub position: Vec3,
    pub health: f32,
}

impl PlayerSnapshot {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Live players in `live_players()` order plus a grid over them
#[derive(Debug, Clone)]
pub struct PlayerView {
    players: Vec<PlayerSnapshot>,
    grid: SpatialGrid<usize>,
}

impl PlayerView {
    pub fn new(cell_size: f32) -> Self {
        Self {
            players: Vec::new(),
            grid: SpatialGrid::new(cell_size),
        }
    }

    /// Re-read every player from the world
    pub fn refresh(&mut self, world: &dyn EncounterWorld) {
        self.players.clear();
        for id in world.live_players() {
            let (Some(position), Some(health)) = (world.player_position(id), world.player_health(id))
            else {
                continue;
            };
            if !position.is_finite() {
                continue;
            }
            self.players.push(PlayerSnapshot { id, position, health });
        }
        self.grid.rebuild(
            self.players
                .iter()
                .enumerate()
                .map(|(i, p)| (i, p.position)),
        );
    }

    /// Re-read one player after the engine changed it
    pub fn refresh_player(&mut self, world: &dyn EncounterWorld, player: PlayerId) {
        if let Some(snapshot) = self.players.iter_mut().find(|p| p.id == player) {
            snapshot.health = world.player_health(player).unwrap_or(0.0);
        }
    }

    pub fn get(&self, player: PlayerId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.id == player)
    }

    /// A target is valid iff it still exists and has health left
    pub fn is_valid_target(&self, player: PlayerId) -> bool {
        self.get(player).map_or(false, PlayerSnapshot::is_alive)
    }

    pub fn position(&self, player: PlayerId) -> Option<Vec3> {
        self.get(player).map(|p| p.position)
    }

    /// Living players within `radius` of `center`, in world order
    pub fn within(&self, center: Vec3, radius: f32) -> Vec<PlayerSnapshot> {
        self.grid
            .query_radius(center, radius)
            .into_iter()
            .map(|(i, _)| self.players[i])
            .filter(PlayerSnapshot::is_alive)
            .collect()
    }

    /// Targeting candidates within `radius`, carrying the agent's threat
    pub fn candidates(&self, center: Vec3, radius: f32, threat: &ThreatTable) -> Vec<TargetCandidate> {
        self.within(center, radius)
            .into_iter()
            .map(|p| TargetCandidate {
                player: p.id,
                position: p.position,
                threat: threat.get(p.id),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerSnapshot> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
