//! The world as seen by the encounter engine
//!
//! The engine never owns players, the safe zone, the map or the loot
//! economy. It reads and mutates them through [`EncounterWorld`], which the
//! host game implements once.

use dino_core::{AgentId, PlayerId, Vec3};
use serde::{Deserialize, Serialize};

/// Status applied to a player by an ability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerEffect {
    /// Player cannot act for `duration` seconds
    Stun { duration: f32 },
    /// Player's vision is impaired for `duration` seconds
    Blind { duration: f32 },
    /// Player is pushed along `direction` (unit, horizontal)
    Knockback { direction: Vec3, strength: f32 },
}

/// A loot drop request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub rarity: Option<String>,
    pub count: u32,
}

/// Capabilities the host world provides to the engine
pub trait EncounterWorld {
    // Zone

    /// Whether `position` is inside the current safe zone
    fn is_inside_safe_zone(&self, position: Vec3) -> bool;

    /// Current zone severity level (0-based)
    fn current_severity_level(&self) -> usize;

    // Map

    /// Designated encounter spawn points (may be empty)
    fn encounter_spawn_points(&self) -> Vec<Vec3>;

    // Players

    /// Players still in the match, in a stable order
    fn live_players(&self) -> Vec<PlayerId>;

    fn player_position(&self, player: PlayerId) -> Option<Vec3>;

    fn player_health(&self, player: PlayerId) -> Option<f32>;

    fn apply_damage_to_player(&mut self, player: PlayerId, amount: f32);

    /// Deliver a status effect; ignored by default
    fn apply_player_effect(&mut self, _player: PlayerId, _effect: PlayerEffect) {}

    // Loot

    /// Spawn a loot item; `false` means the world cannot spawn loot
    fn spawn_loot_item(&mut self, _item: &str, _position: Vec3, _drop: &LootDrop) -> bool {
        false
    }

    // Locomotion

    /// Move an agent at most `max_step` toward `point` and return where it ends up
    fn move_agent_toward(&mut self, _agent: AgentId, from: Vec3, point: Vec3, max_step: f32) -> Vec3 {
        from.move_towards(point, max_step)
    }

    /// Whether `to` can be reached from `from`
    fn can_reach(&self, _from: Vec3, _to: Vec3) -> bool {
        true
    }
}
