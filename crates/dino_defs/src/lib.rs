//! Dino Defs - Definition Registry
//!
//! Static, data-driven catalog of creature species and boss variants. The
//! registry is loaded once at startup, validated, and then shared read-only
//! (behind `Arc`) by every system of the encounter engine.
//!
//! # Example
//!
//! ```ignore
//! use dino_defs::prelude::*;
//!
//! let registry = DefinitionRegistry::load_builtin()?;
//! let raptor = registry.require_species("velociraptor")?;
//! assert_eq!(raptor.category, BehaviorCategory::PackHunter);
//! ```

pub mod ability;
pub mod boss;
pub mod error;
pub mod loot;
pub mod registry;
pub mod species;

pub mod prelude {
    pub use crate::ability::{AbilityDefinition, AbilityEffect};
    pub use crate::boss::{BossDefinition, BossPhase, EscortSpec, StatMultipliers};
    pub use crate::error::{DefinitionError, Result};
    pub use crate::loot::LootEntry;
    pub use crate::registry::DefinitionRegistry;
    pub use crate::species::{
        BaseStats, BehaviorCategory, PackBehavior, SizeRange, SpeciesDefinition, SwarmBehavior,
    };
}

pub use prelude::*;
