//! Dino Combat - Health, Damage, Threat and Cooldowns
//!
//! Per-agent combat bookkeeping for the encounter engine. Nothing in this
//! crate knows about species or behavior; it only tracks numbers over time.
//!
//! # Features
//!
//! - Health pool clamped to `[0, max]` with flat armor reduction
//! - Damage info carrying the attacking player
//! - Add-only threat table with optional linear decay
//! - Named ability cooldowns on the simulation clock
//! - Stun / camouflage timers and player damage-over-time
//!
//! # Example
//!
//! ```ignore
//! use dino_combat::prelude::*;
//!
//! let mut health = HealthPool::new(150.0).with_armor(0.2);
//! let hit = DamageInfo::new(50.0).with_source(PlayerId(7));
//! let (dealt, died) = health.apply_damage(&hit);
//! ```

pub mod cooldown;
pub mod damage;
pub mod health;
pub mod status;
pub mod threat;

pub mod prelude {
    pub use crate::cooldown::CooldownTracker;
    pub use crate::damage::DamageInfo;
    pub use crate::health::HealthPool;
    pub use crate::status::{DamageOverTime, DotTracker, StatusTimers};
    pub use crate::threat::ThreatTable;
}

pub use prelude::*;
