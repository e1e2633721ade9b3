//! Match configuration
//!
//! Loaded from a TOML file. Match settings sit at the top level and the
//! engine tunables live in an `[encounter]` table:
//!
//! ```toml
//! match_secs = 300.0
//! players = 12
//! boss = "alpha_rex"
//! boss_at_secs = 120.0
//!
//! [encounter]
//! max_active = 40
//! seed = 7
//! ```

use dino_encounter::EncounterConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "encounter.toml";

#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid match configuration: {0}")]
    Invalid(String),
}

/// Settings of one scripted arena match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Simulated match length (seconds)
    pub match_secs: f32,
    /// Number of scripted players
    pub players: u32,
    /// Radius of the arena and the initial safe zone
    pub arena_radius: f32,
    /// Safe zone radius at the end of the match
    pub final_zone_radius: f32,
    /// Number of severity levels the zone goes through
    pub severity_levels: usize,
    /// Starting health of every player
    pub player_health: f32,
    /// Player movement speed (units per second)
    pub player_speed: f32,
    /// Damage per second a player deals to the closest agent in range
    pub player_dps: f32,
    /// Range of player weapons
    pub player_range: f32,
    /// Number of designated encounter spawn points around the arena
    pub spawn_points: u32,
    /// Boss to spawn during the match; an empty string disables it
    pub boss: Option<String>,
    /// When the boss spawns (seconds into the match)
    pub boss_at_secs: f32,
    /// Real-time speed-up; 0 runs as fast as possible
    pub time_scale: f32,
    /// Directory with `species.json` and `bosses.json`; built-in data otherwise
    pub definitions_dir: Option<PathBuf>,
    /// Engine tunables
    pub encounter: EncounterConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            match_secs: 300.0,
            players: 12,
            arena_radius: 400.0,
            final_zone_radius: 60.0,
            severity_levels: 5,
            player_health: 250.0,
            player_speed: 6.0,
            player_dps: 30.0,
            player_range: 40.0,
            spawn_points: 8,
            boss: Some("alpha_rex".to_string()),
            boss_at_secs: 150.0,
            time_scale: 0.0,
            definitions_dir: None,
            encounter: EncounterConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse from TOML and validate both halves
    pub fn from_toml_str(content: &str) -> Result<Self, RuntimeConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path`, or `encounter.toml` when no path is given
    ///
    /// A missing default file falls back to defaults; an explicitly named
    /// file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, RuntimeConfigError> {
        match path {
            Some(path) => {
                let config = Self::load_from_file(path)?;
                log::info!("Loaded match config from {}", path.display());
                Ok(config)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                let config = Self::load_from_file(DEFAULT_CONFIG_FILE)?;
                log::info!("Loaded match config from {}", DEFAULT_CONFIG_FILE);
                Ok(config)
            }
            None => {
                log::info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        let positive = [
            ("match_secs", self.match_secs),
            ("arena_radius", self.arena_radius),
            ("player_health", self.player_health),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(RuntimeConfigError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.final_zone_radius < 0.0 || self.final_zone_radius > self.arena_radius {
            return Err(RuntimeConfigError::Invalid(
                "final_zone_radius must be within [0, arena_radius]".into(),
            ));
        }
        if self.severity_levels == 0 {
            return Err(RuntimeConfigError::Invalid("severity_levels must be at least 1".into()));
        }
        if self.time_scale < 0.0 || !self.time_scale.is_finite() {
            return Err(RuntimeConfigError::Invalid("time_scale must be non-negative".into()));
        }
        self.encounter
            .validate()
            .map_err(|e| RuntimeConfigError::Invalid(e.to_string()))
    }
}
