//! Status timers on agents and damage-over-time on players

use dino_core::PlayerId;

/// Timed status flags of an agent, expiring on the simulation clock
#[derive(Debug, Clone, Default)]
pub struct StatusTimers {
    stunned_until: Option<f64>,
    camouflaged_until: Option<f64>,
}

impl StatusTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stun for `duration` seconds; a longer running stun is kept
    pub fn stun(&mut self, now: f64, duration: f32) {
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }
        let until = now + duration as f64;
        self.stunned_until = Some(self.stunned_until.map_or(until, |u| u.max(until)));
    }

    /// Whether a stun is active at `now`; clears it once expired
    pub fn check_stun(&mut self, now: f64) -> bool {
        match self.stunned_until {
            Some(until) if now < until => true,
            Some(_) => {
                self.stunned_until = None;
                false
            }
            None => false,
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned_until.is_some()
    }

    pub fn stunned_until(&self) -> Option<f64> {
        self.stunned_until
    }

    /// Turn camouflage on until `now + duration`
    pub fn camouflage(&mut self, now: f64, duration: f32) {
        self.camouflaged_until = Some(now + duration.max(0.0) as f64);
    }

    pub fn is_camouflaged(&self) -> bool {
        self.camouflaged_until.is_some()
    }

    /// Drop camouflage; returns whether it was active
    pub fn reveal(&mut self) -> bool {
        self.camouflaged_until.take().is_some()
    }

    /// Drop camouflage if it has run out; returns whether it expired now
    pub fn expire_camouflage(&mut self, now: f64) -> bool {
        match self.camouflaged_until {
            Some(until) if now >= until => {
                self.camouflaged_until = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A running damage-over-time on one player
#[derive(Debug, Clone, PartialEq)]
pub struct DamageOverTime {
    pub player: PlayerId,
    /// Damage per second
    pub per_second: f32,
    /// Seconds left
    pub remaining: f32,
}

/// All damage-over-time effects the agents have applied to players
#[derive(Debug, Clone, Default)]
pub struct DotTracker {
    active: Vec<DamageOverTime>,
}

impl DotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a DoT; ignored when it would deal nothing
    pub fn apply(&mut self, player: PlayerId, per_second: f32, duration: f32) {
        if per_second <= 0.0 || duration <= 0.0 || !per_second.is_finite() || !duration.is_finite() {
            return;
        }
        self.active.push(DamageOverTime {
            player,
            per_second,
            remaining: duration,
        });
    }

    /// Advance by `dt` and return the damage owed per player this step
    pub fn tick(&mut self, dt: f32) -> Vec<(PlayerId, f32)> {
        let mut owed: Vec<(PlayerId, f32)> = Vec::new();
        for dot in &mut self.active {
            let step = dt.min(dot.remaining);
            dot.remaining -= step;
            let amount = dot.per_second * step;
            if amount <= 0.0 {
                continue;
            }
            match owed.iter_mut().find(|(p, _)| *p == dot.player) {
                Some((_, total)) => *total += amount,
                None => owed.push((dot.player, amount)),
            }
        }
        self.active.retain(|dot| dot.remaining > 0.0);
        owed
    }

    /// Stop every DoT on a player (for example when they leave the match)
    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stun_expires() {
        let mut status = StatusTimers::new();
        status.stun(10.0, 2.0);
        assert!(status.check_stun(11.0));
        assert!(!status.check_stun(12.0));
        assert!(!status.is_stunned());
    }

    #[test]
    fn test_shorter_stun_does_not_shorten() {
        let mut status = StatusTimers::new();
        status.stun(0.0, 5.0);
        status.stun(1.0, 1.0);
        assert_eq!(status.stunned_until(), Some(5.0));
    }

    #[test]
    fn test_camouflage_reveal_and_expiry() {
        let mut status = StatusTimers::new();
        status.camouflage(0.0, 6.0);
        assert!(!status.expire_camouflage(5.0));
        assert!(status.expire_camouflage(6.0));
        assert!(!status.reveal());

        status.camouflage(10.0, 6.0);
        assert!(status.reveal());
        assert!(!status.is_camouflaged());
    }

    #[test]
    fn test_dot_ticks_until_exhausted() {
        let mut dots = DotTracker::new();
        dots.apply(PlayerId(1), 4.0, 0.5);
        dots.apply(PlayerId(1), 2.0, 1.0);

        let owed = dots.tick(0.2);
        assert_eq!(owed.len(), 1);
        assert_relative_eq!(owed[0].1, 1.2, epsilon = 1e-5);

        dots.tick(0.2);
        let owed = dots.tick(0.2);
        // First DoT only had 0.1 s left
        assert_relative_eq!(owed[0].1, 4.0 * 0.1 + 2.0 * 0.2, epsilon = 1e-5);
        assert_eq!(dots.len(), 1);

        dots.tick(1.0);
        assert!(dots.is_empty());
    }
}
