//! Species definitions

use crate::ability::AbilityDefinition;
use crate::loot::LootEntry;
use serde::{Deserialize, Serialize};

/// Behavior category of a species
///
/// Drives ability priority and a few category-specific reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorCategory {
    PackHunter,
    SoloPredator,
    AerialDiver,
    DefensiveCharger,
    RangedSpitter,
    AmbushPredator,
    Swarm,
}

impl BehaviorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PackHunter => "pack_hunter",
            Self::SoloPredator => "solo_predator",
            Self::AerialDiver => "aerial_diver",
            Self::DefensiveCharger => "defensive_charger",
            Self::RangedSpitter => "ranged_spitter",
            Self::AmbushPredator => "ambush_predator",
            Self::Swarm => "swarm",
        }
    }
}

impl std::fmt::Display for BehaviorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base combat statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStats {
    /// Maximum health
    pub health: f32,
    /// Movement speed (units per second)
    pub move_speed: f32,
    /// Contact damage per basic attack
    pub damage: f32,
    /// Basic attack reach
    pub attack_range: f32,
    /// Seconds between basic attacks
    pub attack_cooldown: f32,
    /// Fraction of incoming damage absorbed (0.0 - 1.0)
    #[serde(default)]
    pub armor: f32,
}

/// Inclusive group size range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

/// Pack coordination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackBehavior {
    /// Followers approach at an angle instead of head-on
    #[serde(default)]
    pub flanking: bool,
    /// Bonus damage fraction while the pack leader lives
    #[serde(default)]
    pub leader_damage_bonus: f32,
    /// Distance at which followers hear the leader's alert
    pub call_range: f32,
    /// Probability that a member scatters when the leader dies
    #[serde(default = "default_scatter_chance")]
    pub scatter_chance: f32,
}

/// Documented default scatter probability on leader death
pub const DEFAULT_SCATTER_CHANCE: f32 = 0.7;

fn default_scatter_chance() -> f32 {
    DEFAULT_SCATTER_CHANCE
}

/// Swarm damage scaling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmBehavior {
    /// Bonus damage fraction per nearby ally
    pub bonus_per_ally: f32,
    /// Cap on the total bonus fraction
    pub max_bonus: f32,
    /// Radius in which allies count
    #[serde(default = "default_swarm_radius")]
    pub radius: f32,
}

fn default_swarm_radius() -> f32 {
    15.0
}

impl SwarmBehavior {
    /// Damage multiplier for `allies` nearby allies
    pub fn multiplier(&self, allies: usize) -> f32 {
        1.0 + (self.bonus_per_ally * allies as f32).min(self.max_bonus)
    }
}

/// Immutable definition of a creature species
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesDefinition {
    pub id: String,
    pub display_name: String,
    pub category: BehaviorCategory,
    pub stats: BaseStats,
    /// Relative weight in the wave roll
    pub spawn_weight: f32,
    #[serde(default)]
    pub pack_size: SizeRange,
    /// Radius in which targets are noticed
    pub aggression_radius: f32,
    /// Health fraction at or below which the agent flees (0 disables)
    #[serde(default)]
    pub flee_health_fraction: f32,
    /// Passive species only react once attacked
    #[serde(default)]
    pub passive: bool,
    /// Ordered abilities
    #[serde(default)]
    pub abilities: Vec<AbilityDefinition>,
    #[serde(default)]
    pub pack: Option<PackBehavior>,
    #[serde(default)]
    pub swarm: Option<SwarmBehavior>,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

impl SpeciesDefinition {
    /// Look up an ability by name
    pub fn ability(&self, name: &str) -> Option<&AbilityDefinition> {
        self.abilities.iter().find(|a| a.name == name)
    }

    /// Scatter probability used when this species' pack leader dies
    pub fn scatter_chance(&self) -> f32 {
        self.pack
            .as_ref()
            .map(|p| p.scatter_chance)
            .unwrap_or(DEFAULT_SCATTER_CHANCE)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let s = &self.stats;
        if self.display_name.trim().is_empty() {
            return Err("missing display name".into());
        }
        for (name, value) in [
            ("health", s.health),
            ("move_speed", s.move_speed),
            ("attack_range", s.attack_range),
            ("attack_cooldown", s.attack_cooldown),
            ("aggression_radius", self.aggression_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }
        if !s.damage.is_finite() || s.damage < 0.0 {
            return Err(format!("damage must be non-negative, got {}", s.damage));
        }
        if !(0.0..1.0).contains(&s.armor) {
            return Err(format!("armor {} outside [0, 1)", s.armor));
        }
        if !(0.0..1.0).contains(&self.flee_health_fraction) {
            return Err(format!(
                "flee_health_fraction {} outside [0, 1)",
                self.flee_health_fraction
            ));
        }
        if !self.spawn_weight.is_finite() || self.spawn_weight < 0.0 {
            return Err(format!("spawn_weight {} is negative", self.spawn_weight));
        }
        if self.pack_size.min == 0 || self.pack_size.min > self.pack_size.max {
            return Err(format!(
                "pack_size {}..{} is invalid",
                self.pack_size.min, self.pack_size.max
            ));
        }
        for (i, ability) in self.abilities.iter().enumerate() {
            ability.validate()?;
            if self.abilities[..i].iter().any(|a| a.name == ability.name) {
                return Err(format!("duplicate ability '{}'", ability.name));
            }
        }
        if let Some(pack) = &self.pack {
            if !(0.0..=1.0).contains(&pack.scatter_chance) {
                return Err(format!("scatter_chance {} outside [0, 1]", pack.scatter_chance));
            }
            if pack.call_range < 0.0 || pack.leader_damage_bonus < 0.0 {
                return Err("pack parameters must be non-negative".into());
            }
        }
        if let Some(swarm) = &self.swarm {
            if swarm.bonus_per_ally < 0.0 || swarm.max_bonus < 0.0 || swarm.radius <= 0.0 {
                return Err("swarm parameters must be non-negative with a positive radius".into());
            }
        }
        for entry in &self.loot {
            entry.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raptor_json() -> &'static str {
        r#"{
            "id": "raptor",
            "display_name": "Raptor",
            "category": "pack_hunter",
            "stats": { "health": 90, "move_speed": 22, "damage": 12, "attack_range": 4, "attack_cooldown": 1 },
            "spawn_weight": 10,
            "pack_size": { "min": 2, "max": 4 },
            "aggression_radius": 80,
            "flee_health_fraction": 0.15,
            "pack": { "flanking": true, "leader_damage_bonus": 0.2, "call_range": 60 }
        }"#
    }

    #[test]
    fn test_parse_and_validate() {
        let species: SpeciesDefinition = serde_json::from_str(raptor_json()).unwrap();
        assert_eq!(species.category, BehaviorCategory::PackHunter);
        assert_eq!(species.stats.armor, 0.0);
        assert_eq!(species.scatter_chance(), DEFAULT_SCATTER_CHANCE);
        assert!(species.validate().is_ok());
    }

    #[test]
    fn test_invalid_pack_size() {
        let mut species: SpeciesDefinition = serde_json::from_str(raptor_json()).unwrap();
        species.pack_size = SizeRange { min: 3, max: 2 };
        assert!(species.validate().is_err());
    }

    #[test]
    fn test_swarm_bonus_is_capped() {
        let swarm = SwarmBehavior {
            bonus_per_ally: 0.1,
            max_bonus: 0.5,
            radius: 15.0,
        };
        assert!((swarm.multiplier(0) - 1.0).abs() < 1e-6);
        assert!((swarm.multiplier(3) - 1.3).abs() < 1e-6);
        assert!((swarm.multiplier(20) - 1.5).abs() < 1e-6);
    }
}
