//! Ability definitions

use serde::{Deserialize, Serialize};

/// The fixed set of effect routines an ability can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Fear pulse: stuns every player in `radius`
    Roar,
    /// Dash at the target with damage and knockback
    Charge,
    /// Short-range leap onto the target
    Pounce,
    /// Ranged hit that blinds and applies damage over time
    Spit,
    /// Area knockback with linear falloff
    TailSweep,
    /// Area stun with linear falloff
    GroundPound,
    /// Transparency toggle that arms an ambush multiplier
    Camouflage,
}

impl AbilityEffect {
    /// Whether the effect needs a valid target to execute
    pub fn is_targeted(&self) -> bool {
        matches!(self, Self::Charge | Self::Pounce | Self::Spit)
    }

    /// Whether the effect hits everything inside a radius around the agent
    pub fn is_area(&self) -> bool {
        matches!(self, Self::Roar | Self::TailSweep | Self::GroundPound)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roar => "roar",
            Self::Charge => "charge",
            Self::Pounce => "pounce",
            Self::Spit => "spit",
            Self::TailSweep => "tail_sweep",
            Self::GroundPound => "ground_pound",
            Self::Camouflage => "camouflage",
        }
    }
}

impl std::fmt::Display for AbilityEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

fn default_multiplier() -> f32 {
    1.0
}

/// A named special action owned by a species or boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityDefinition {
    /// Unique name within the owner (used for cooldowns and attack patterns)
    pub name: String,
    /// Disabled abilities are never selected
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Effect routine
    pub effect: AbilityEffect,
    /// Damage (or primary strength) of the effect
    #[serde(default)]
    pub magnitude: f32,
    /// Maximum distance to the target for targeted effects
    #[serde(default)]
    pub range: f32,
    /// Minimum distance to the target for targeted effects
    #[serde(default)]
    pub min_range: f32,
    /// Radius for area effects
    #[serde(default)]
    pub radius: f32,
    /// Seconds between uses
    pub cooldown: f32,
    /// Stun applied to players (seconds)
    #[serde(default)]
    pub stun_duration: f32,
    /// Blind applied to players (seconds)
    #[serde(default)]
    pub blind_duration: f32,
    /// Damage per second of the damage-over-time
    #[serde(default)]
    pub dot_damage: f32,
    /// Length of the damage-over-time (seconds)
    #[serde(default)]
    pub dot_duration: f32,
    /// Knockback strength
    #[serde(default)]
    pub knockback: f32,
    /// Effect duration for toggles (camouflage)
    #[serde(default)]
    pub duration: f32,
    /// Damage multiplier armed by the effect (ambush)
    #[serde(default = "default_multiplier")]
    pub multiplier: f32,
}

impl AbilityDefinition {
    /// Create an ability with every optional field at its default
    pub fn new(name: impl Into<String>, effect: AbilityEffect, cooldown: f32) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            effect,
            magnitude: 0.0,
            range: 0.0,
            min_range: 0.0,
            radius: 0.0,
            cooldown,
            stun_duration: 0.0,
            blind_duration: 0.0,
            dot_damage: 0.0,
            dot_duration: 0.0,
            knockback: 0.0,
            duration: 0.0,
            multiplier: 1.0,
        }
    }

    /// Set the targeting window
    pub fn with_range(mut self, min_range: f32, range: f32) -> Self {
        self.min_range = min_range;
        self.range = range;
        self
    }

    /// Set the area radius
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Whether a target at `distance` is inside the ability's reach
    pub fn in_reach(&self, distance: f32) -> bool {
        if self.effect.is_area() {
            distance <= self.radius
        } else if self.effect.is_targeted() {
            distance >= self.min_range && distance <= self.range
        } else {
            true
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("ability with empty name".into());
        }
        if !self.cooldown.is_finite() || self.cooldown < 0.0 {
            return Err(format!("ability '{}' has invalid cooldown {}", self.name, self.cooldown));
        }
        if self.magnitude < 0.0 || self.knockback < 0.0 {
            return Err(format!("ability '{}' has negative magnitude", self.name));
        }
        if self.effect.is_targeted() && (self.range <= 0.0 || self.min_range > self.range) {
            return Err(format!(
                "ability '{}' needs 0 <= min_range <= range and range > 0",
                self.name
            ));
        }
        if self.effect.is_area() && self.radius <= 0.0 {
            return Err(format!("ability '{}' needs a positive radius", self.name));
        }
        if self.effect == AbilityEffect::Camouflage && self.duration <= 0.0 {
            return Err(format!("ability '{}' needs a positive duration", self.name));
        }
        if self.multiplier <= 0.0 {
            return Err(format!("ability '{}' has non-positive multiplier", self.name));
        }
        Ok(())
    }
}
