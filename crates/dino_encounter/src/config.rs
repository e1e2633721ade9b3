//! Encounter configuration
//!
//! Every tunable of the engine lives here. All fields have defaults, so a
//! TOML file only needs the values it changes:
//!
//! ```toml
//! max_active = 40
//! wave_interval = 20.0
//! severity_scaling = [0.5, 1.0, 1.5]
//! seed = 1234
//! ```

use crate::error::{EncounterError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables of the encounter engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Seconds between AI ticks
    pub ai_tick_interval: f32,
    /// Seconds between waves while spawning is enabled
    pub wave_interval: f32,
    /// Active agent cap before severity scaling
    pub max_active: u32,
    /// Cap multiplier per severity level; levels past the end use the last entry
    pub severity_scaling: Vec<f32>,

    /// Seconds between target searches of an idle agent
    pub idle_search_interval: f32,
    /// Seconds a hunting agent searches before giving up
    pub hunting_timeout: f32,
    /// Seconds spent in the ability state after using an ability
    pub ability_state_duration: f32,
    /// Seconds an agent flees before calming down
    pub flee_duration: f32,
    /// Distance of the flee goal ahead of the agent
    pub flee_distance: f32,
    /// Chasing gives up beyond `aggression_radius * deaggro_multiplier`
    pub deaggro_multiplier: f32,
    /// Attacking falls back to chasing beyond `attack_range * attack_exit_multiplier`
    pub attack_exit_multiplier: f32,
    /// Probability an idle agent starts wandering after a failed search
    pub wander_chance: f32,
    /// Wander points are picked within this radius of home
    pub wander_radius: f32,

    /// Flank rotation in degrees
    pub flank_angle_deg: f32,
    /// Distance of the flank point from the target
    pub flank_distance: f32,
    /// Idle followers farther than this from the leader regroup
    pub pack_cohesion_radius: f32,
    /// Forces the scatter probability on leader death for every species
    pub scatter_chance_override: Option<f32>,
    /// Damage multiplier of pack members enraged by their leader's death
    pub enrage_damage_multiplier: f32,

    /// Fraction of basic attack damage added as threat against the victim
    pub threat_from_attack_fraction: f32,
    /// Linear threat decay per second (0 disables decay)
    pub threat_decay_per_second: f32,

    /// Maximum random offset of group members around their spawn point
    pub spawn_jitter: f32,
    /// Points on the generated ring used when the world has no spawn points
    pub fallback_ring_points: u32,
    /// Radius of the generated ring around the origin
    pub fallback_ring_radius: f32,

    /// Seconds a corpse stays before it is despawned
    pub corpse_grace_secs: f32,
    /// Boss phase from which the boss is marked enraged
    pub boss_enrage_phase: u32,

    /// Cell size of the spatial grids
    pub grid_cell_size: f32,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            ai_tick_interval: 0.2,
            wave_interval: 30.0,
            max_active: 30,
            severity_scaling: vec![0.5, 0.75, 1.0, 1.25, 1.5],
            idle_search_interval: 2.0,
            hunting_timeout: 5.0,
            ability_state_duration: 1.0,
            flee_duration: 10.0,
            flee_distance: 30.0,
            deaggro_multiplier: 1.5,
            attack_exit_multiplier: 1.2,
            wander_chance: 0.3,
            wander_radius: 20.0,
            flank_angle_deg: 45.0,
            flank_distance: 10.0,
            pack_cohesion_radius: 25.0,
            scatter_chance_override: None,
            enrage_damage_multiplier: 1.5,
            threat_from_attack_fraction: 0.5,
            threat_decay_per_second: 0.0,
            spawn_jitter: 5.0,
            fallback_ring_points: 16,
            fallback_ring_radius: 150.0,
            corpse_grace_secs: 5.0,
            boss_enrage_phase: 3,
            grid_cell_size: 32.0,
            seed: None,
        }
    }
}

impl EncounterConfig {
    /// Deterministic config for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Set the agent cap
    pub fn with_max_active(mut self, max_active: u32) -> Self {
        self.max_active = max_active;
        self
    }

    /// Force the leader-death scatter probability
    pub fn with_scatter_chance(mut self, chance: f32) -> Self {
        self.scatter_chance_override = Some(chance);
        self
    }

    /// Parse from TOML
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Cap multiplier for a severity level
    pub fn scaling_for(&self, level: usize) -> f32 {
        self.severity_scaling
            .get(level)
            .or_else(|| self.severity_scaling.last())
            .copied()
            .unwrap_or(1.0)
    }

    /// Flank rotation in radians
    pub fn flank_angle(&self) -> f32 {
        dino_core::radians(self.flank_angle_deg)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("ai_tick_interval", self.ai_tick_interval),
            ("wave_interval", self.wave_interval),
            ("grid_cell_size", self.grid_cell_size),
            ("idle_search_interval", self.idle_search_interval),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        let non_negative = [
            ("hunting_timeout", self.hunting_timeout),
            ("ability_state_duration", self.ability_state_duration),
            ("flee_duration", self.flee_duration),
            ("flee_distance", self.flee_distance),
            ("wander_radius", self.wander_radius),
            ("flank_distance", self.flank_distance),
            ("pack_cohesion_radius", self.pack_cohesion_radius),
            ("threat_from_attack_fraction", self.threat_from_attack_fraction),
            ("threat_decay_per_second", self.threat_decay_per_second),
            ("spawn_jitter", self.spawn_jitter),
            ("fallback_ring_radius", self.fallback_ring_radius),
            ("corpse_grace_secs", self.corpse_grace_secs),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be non-negative, got {}", name, value)));
            }
        }

        if self.severity_scaling.is_empty() {
            return Err(invalid("severity_scaling must not be empty"));
        }
        if self.severity_scaling.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(invalid("severity_scaling entries must be non-negative"));
        }
        if self.deaggro_multiplier < 1.0 || self.attack_exit_multiplier < 1.0 {
            return Err(invalid("deaggro and attack exit multipliers must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.wander_chance) {
            return Err(invalid(format!("wander_chance {} outside [0, 1]", self.wander_chance)));
        }
        if let Some(chance) = self.scatter_chance_override {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(format!("scatter_chance_override {} outside [0, 1]", chance)));
            }
        }
        if self.enrage_damage_multiplier <= 0.0 {
            return Err(invalid("enrage_damage_multiplier must be positive"));
        }
        if self.fallback_ring_points == 0 {
            return Err(invalid("fallback_ring_points must be at least 1"));
        }
        if self.boss_enrage_phase == 0 {
            return Err(invalid("boss_enrage_phase is 1-based"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> EncounterError {
    EncounterError::InvalidConfig(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EncounterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_active, 30);
        assert_eq!(config.ai_tick_interval, 0.2);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config = EncounterConfig::from_toml_str(
            r#"
            max_active = 12
            severity_scaling = [1.0, 2.0]
            seed = 99
            "#,
        )
        .unwrap();
        assert_eq!(config.max_active, 12);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.wave_interval, 30.0);
    }

    #[test]
    fn test_scaling_clamps_to_last_level() {
        let config = EncounterConfig::default();
        assert_eq!(config.scaling_for(0), 0.5);
        assert_eq!(config.scaling_for(4), 1.5);
        assert_eq!(config.scaling_for(40), 1.5);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = EncounterConfig::default();
        config.severity_scaling.clear();
        assert!(matches!(config.validate(), Err(EncounterError::InvalidConfig(_))));

        let config = EncounterConfig::default().with_scatter_chance(1.5);
        assert!(config.validate().is_err());

        let err = EncounterConfig::from_toml_str("ai_tick_interval = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EncounterConfig::from_toml_str("max_active = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EncounterConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
