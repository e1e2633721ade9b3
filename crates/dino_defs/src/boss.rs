//! Boss definitions and phases

use crate::ability::AbilityDefinition;
use crate::loot::LootEntry;
use serde::{Deserialize, Serialize};

/// Multipliers applied to the base species' stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatMultipliers {
    #[serde(default = "one")]
    pub health: f32,
    #[serde(default = "one")]
    pub damage: f32,
    #[serde(default = "one")]
    pub speed: f32,
    #[serde(default = "one")]
    pub size: f32,
}

fn one() -> f32 {
    1.0
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            health: 1.0,
            damage: 1.0,
            speed: 1.0,
            size: 1.0,
        }
    }
}

/// Escort pack spawned alongside the boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscortSpec {
    pub species: String,
    pub count: u32,
}

/// One behavioral tier of a boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossPhase {
    /// Health fraction at or below which the phase begins
    pub threshold: f32,
    /// Ability names the phase prefers, in order
    #[serde(default)]
    pub attack_pattern: Vec<String>,
    /// Speed increment (fraction) unlocked by this phase
    #[serde(default)]
    pub speed_bonus: f32,
    /// Damage increment (fraction) unlocked by this phase
    #[serde(default)]
    pub damage_bonus: f32,
    /// Aggression radius increment (fraction) unlocked by this phase
    #[serde(default)]
    pub aggression_bonus: f32,
}

fn default_tint() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Boss variant of a species
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossDefinition {
    pub id: String,
    pub display_name: String,
    /// Species the boss is built on
    pub base_species: String,
    #[serde(default)]
    pub multipliers: StatMultipliers,
    /// RGB tint for presentation
    #[serde(default = "default_tint")]
    pub tint: [f32; 3],
    #[serde(default)]
    pub escort: Option<EscortSpec>,
    /// Boss-exclusive abilities (in addition to the base species')
    #[serde(default)]
    pub abilities: Vec<AbilityDefinition>,
    /// Phases ordered from first (threshold 1.0) to last
    pub phases: Vec<BossPhase>,
    /// Boss loot table; the base species' table is used when empty
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

impl BossDefinition {
    /// Phase by 1-based number
    pub fn phase(&self, number: u32) -> Option<&BossPhase> {
        if number == 0 {
            return None;
        }
        self.phases.get(number as usize - 1)
    }

    /// Number of phases
    pub fn phase_count(&self) -> u32 {
        self.phases.len() as u32
    }

    /// Deepest phase whose threshold is at or above `health_fraction`
    pub fn phase_for_fraction(&self, health_fraction: f32) -> u32 {
        let reached = self
            .phases
            .iter()
            .take_while(|p| health_fraction <= p.threshold)
            .count() as u32;
        reached.max(1)
    }

    /// Look up a boss-exclusive ability by name
    pub fn ability(&self, name: &str) -> Option<&AbilityDefinition> {
        self.abilities.iter().find(|a| a.name == name)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let m = &self.multipliers;
        for (name, value) in [
            ("health", m.health),
            ("damage", m.damage),
            ("speed", m.speed),
            ("size", m.size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} multiplier must be positive, got {}", name, value));
            }
        }
        if self.phases.is_empty() {
            return Err("boss has no phases".into());
        }
        if (self.phases[0].threshold - 1.0).abs() > f32::EPSILON {
            return Err("first phase threshold must be 1.0".into());
        }
        for pair in self.phases.windows(2) {
            if pair[1].threshold >= pair[0].threshold || pair[1].threshold <= 0.0 {
                return Err("phase thresholds must strictly descend within (0, 1]".into());
            }
        }
        for phase in &self.phases {
            if phase.speed_bonus < 0.0 || phase.damage_bonus < 0.0 || phase.aggression_bonus < 0.0 {
                return Err("phase bonuses must be non-negative".into());
            }
        }
        for ability in &self.abilities {
            ability.validate()?;
        }
        if let Some(escort) = &self.escort {
            if escort.species.trim().is_empty() {
                return Err("escort with empty species".into());
            }
        }
        for entry in &self.loot {
            entry.validate()?;
        }
        Ok(())
    }
}
