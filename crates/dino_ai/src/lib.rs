//! Dino AI - Agent Decision Primitives
//!
//! Building blocks the encounter brain is assembled from. Everything here is
//! pure: functions take positions and numbers and return decisions, so the
//! same inputs always produce the same outputs.
//!
//! # Features
//!
//! - Agent state enum and state record with time-in-state
//! - Threat + proximity target scoring
//! - Steering helpers (flee, flank, wander)
//! - Uniform spatial grid with scan-order results
//!
//! # Example
//!
//! ```ignore
//! use dino_ai::prelude::*;
//!
//! let mut fsm = AgentStateMachine::new(0.0);
//! if let Some(change) = fsm.transition(AgentState::Alert, 1.5) {
//!     log::debug!("{} -> {}", change.from, change.to);
//! }
//! ```

pub mod spatial;
pub mod state_machine;
pub mod steering;
pub mod targeting;

pub mod prelude {
    pub use crate::spatial::SpatialGrid;
    pub use crate::state_machine::{AgentState, AgentStateMachine, StateTransition};
    pub use crate::steering::{
        flank_position, flee_direction, flee_point, random_horizontal_direction,
        wander_point,
    };
    pub use crate::targeting::{find_best_target, target_score, TargetCandidate};
}

pub use prelude::*;
