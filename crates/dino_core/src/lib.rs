//! # dino_core - Encounter Engine Core
//!
//! Small, dependency-light primitives shared by every crate of the
//! encounter engine:
//! - **Ids**: typed identifiers for agents, packs and players
//! - **Vectors**: the `Vec3` type used for world positions and directions
//!
//! Serialization is opt-in through the `serde` feature.

pub mod id;
pub mod vector;

pub use id::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_4: f32 = PI / 4.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{AgentId, IdGenerator, PackId, PlayerId};
    pub use crate::vector::Vec3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radians() {
        assert!((radians(180.0) - consts::PI).abs() < consts::EPSILON);
        assert!((radians(45.0) - consts::FRAC_PI_4).abs() < consts::EPSILON);
    }
}
