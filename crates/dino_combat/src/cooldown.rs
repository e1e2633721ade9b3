//! Named ability cooldowns

use std::collections::HashMap;

/// Last-used timestamps per ability name, on the simulation clock (seconds)
#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    last_used: HashMap<String, f64>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the ability was never used or `cooldown` seconds have elapsed
    pub fn can_use(&self, name: &str, cooldown: f32, now: f64) -> bool {
        match self.last_used.get(name) {
            Some(&last) => now - last >= cooldown as f64,
            None => true,
        }
    }

    /// Record a use at `now`
    pub fn stamp(&mut self, name: &str, now: f64) {
        match self.last_used.get_mut(name) {
            Some(last) => *last = now,
            None => {
                self.last_used.insert(name.to_string(), now);
            }
        }
    }

    pub fn last_used(&self, name: &str) -> Option<f64> {
        self.last_used.get(name).copied()
    }

    /// Seconds until the ability is ready (0 when ready)
    pub fn remaining(&self, name: &str, cooldown: f32, now: f64) -> f64 {
        self.last_used
            .get(name)
            .map(|&last| (cooldown as f64 - (now - last)).max(0.0))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_inside_cooldown_are_rejected() {
        let mut cooldowns = CooldownTracker::new();
        assert!(cooldowns.can_use("roar", 5.0, 10.0));
        cooldowns.stamp("roar", 10.0);
        assert!(!cooldowns.can_use("roar", 5.0, 13.0));
        assert_eq!(cooldowns.last_used("roar"), Some(10.0));
    }

    #[test]
    fn test_calls_after_cooldown_succeed() {
        let mut cooldowns = CooldownTracker::new();
        cooldowns.stamp("roar", 10.0);
        assert!(cooldowns.can_use("roar", 5.0, 16.0));
        cooldowns.stamp("roar", 16.0);
        assert_eq!(cooldowns.last_used("roar"), Some(16.0));
    }

    #[test]
    fn test_exact_boundary_is_ready() {
        let mut cooldowns = CooldownTracker::new();
        cooldowns.stamp("spit", 1.0);
        assert!(!cooldowns.can_use("spit", 4.0, 4.5));
        assert!(cooldowns.can_use("spit", 4.0, 5.0));
        assert_eq!(cooldowns.remaining("spit", 4.0, 3.0), 2.0);
        assert!(cooldowns.can_use("pounce", 4.0, 0.0));
    }
}
