//! Steering helpers
//!
//! All movement is resolved on the horizontal (XZ) plane; the world's
//! locomotion capability decides the final height.

use dino_core::consts::TAU;
use dino_core::Vec3;
use rand::Rng;

/// Direction away from the summed direction toward every threat
///
/// Returns `None` when the threats cancel out (or there are none).
pub fn flee_direction<I>(position: Vec3, threats: I) -> Option<Vec3>
where
    I: IntoIterator<Item = Vec3>,
{
    let mut toward = Vec3::ZERO;
    for threat in threats {
        toward += (threat - position).horizontal().normalize_or_zero();
    }
    let away = (-toward).normalize_or_zero();
    if away == Vec3::ZERO {
        None
    } else {
        Some(away)
    }
}

/// Uniformly random unit direction on the ground plane
pub fn random_horizontal_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    Vec3::ground(angle.cos(), angle.sin())
}

/// Point `distance` along `direction` from `position`
pub fn flee_point(position: Vec3, direction: Vec3, distance: f32) -> Vec3 {
    position + direction.horizontal().normalize_or_zero() * distance
}

/// Approach point for a flanking pack member
///
/// The horizontal leader-to-target direction is rotated by `+angle` for even
/// member indices and `-angle` for odd ones; the result is `distance` past
/// the target along that rotated direction.
pub fn flank_position(
    member_index: usize,
    leader_position: Vec3,
    target_position: Vec3,
    angle: f32,
    distance: f32,
) -> Vec3 {
    let direction = (target_position - leader_position)
        .horizontal()
        .normalize_or_zero();
    let side = if member_index % 2 == 0 { angle } else { -angle };
    target_position + direction.rotate_y(side) * distance
}

/// Random point within `radius` of `home` (uniform over the disc)
pub fn wander_point<R: Rng + ?Sized>(rng: &mut R, home: Vec3, radius: f32) -> Vec3 {
    if radius <= 0.0 {
        return home;
    }
    let distance = radius * rng.gen::<f32>().sqrt();
    home + random_horizontal_direction(rng) * distance
}
