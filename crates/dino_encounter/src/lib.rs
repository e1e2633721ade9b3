//! Dino Encounter - Creature Encounter Engine
//!
//! Spawns and drives AI-controlled creatures in a battle-royale match:
//! individual agents running a state machine, packs that coordinate, bosses
//! that change phase as they lose health, and a wave director that keeps the
//! number of creatures in line with the zone severity.
//!
//! # Features
//!
//! - Per-agent state machine (idle, alert, hunting, chasing, attacking,
//!   ability, fleeing, dead) with stun and forced-flee overrides
//! - Threat + proximity targeting over a per-tick player snapshot
//! - Packs with leader alerts, flanking and leader succession
//! - Category-driven ability selection with cooldowns
//! - Boss phases with cumulative stat bonuses
//! - Severity-scaled waves with fallback spawn positions
//! - Seeded randomness for reproducible simulations
//! - Background service driven by `crossbeam_channel` timers
//!
//! # Example
//!
//! ```ignore
//! use dino_encounter::prelude::*;
//!
//! let definitions = Arc::new(DefinitionRegistry::load_builtin()?);
//! let mut sim = Simulation::new(definitions, EncounterConfig::seeded(7))?;
//! let mut events = EventLog::new();
//!
//! sim.spawn_wave(&mut world, &mut events);
//! for _ in 0..50 {
//!     sim.tick(&mut world, &mut events, 0.2);
//! }
//! ```

pub mod abilities;
pub mod agent;
mod boss;
mod brain;
mod combat;
pub mod config;
mod context;
pub mod error;
pub mod events;
pub mod loot;
mod pack;
pub mod players;
pub mod registry;
pub mod service;
pub mod simulation;
pub mod spawn;
pub mod world;

pub mod prelude {
    pub use crate::abilities::{can_use, category_priority};
    pub use crate::agent::Agent;
    pub use crate::config::{ConfigError, EncounterConfig};
    pub use crate::error::{EncounterError, Result};
    pub use crate::events::{ChannelSink, DomainEvent, EventLog, EventSink, NullSink};
    pub use crate::players::{PlayerSnapshot, PlayerView};
    pub use crate::registry::{AgentRegistry, BossEncounter, Pack};
    pub use crate::service::{EncounterService, ServiceState, ServiceStatus};
    pub use crate::simulation::{Simulation, SimulationStats};
    pub use crate::world::{EncounterWorld, LootDrop, PlayerEffect};

    pub use dino_ai::AgentState;
    pub use dino_core::{AgentId, PackId, PlayerId, Vec3};
    pub use dino_defs::DefinitionRegistry;
    pub use std::sync::Arc;
}

pub use prelude::*;
