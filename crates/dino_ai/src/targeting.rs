//! Target scoring and selection

use dino_core::{PlayerId, Vec3};

/// A potential target as seen by one agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub player: PlayerId,
    pub position: Vec3,
    /// Threat the agent holds against this player
    pub threat: f32,
}

/// `threat + (1 - distance / radius)`
pub fn target_score(threat: f32, distance: f32, radius: f32) -> f32 {
    threat + (1.0 - distance / radius)
}

/// Pick the highest-scoring candidate within `radius` of `origin`
///
/// Candidates are evaluated in iteration order and only a strictly greater
/// score replaces the current best, so the first of equal scores wins.
pub fn find_best_target<I>(origin: Vec3, radius: f32, candidates: I) -> Option<(PlayerId, f32)>
where
    I: IntoIterator<Item = TargetCandidate>,
{
    if !radius.is_finite() || radius <= 0.0 {
        return None;
    }

    let mut best: Option<(PlayerId, f32)> = None;
    for candidate in candidates {
        let distance = origin.distance(candidate.position);
        if distance > radius {
            continue;
        }
        let score = target_score(candidate.threat, distance, radius);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate.player, score));
        }
    }
    best
}
