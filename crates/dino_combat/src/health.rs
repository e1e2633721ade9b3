//! Health pool

use crate::damage::DamageInfo;
use serde::{Deserialize, Serialize};

/// Health of an agent, always within `[0, max]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPool {
    current: f32,
    max: f32,
    /// Fraction of incoming damage absorbed (0.0 - 1.0)
    pub armor: f32,
}

impl HealthPool {
    /// Create a full pool
    pub fn new(max_health: f32) -> Self {
        let max = max_health.max(0.0);
        Self {
            current: max,
            max,
            armor: 0.0,
        }
    }

    /// Set armor
    pub fn with_armor(mut self, armor: f32) -> Self {
        self.armor = armor.clamp(0.0, 1.0);
        self
    }

    /// Apply damage after armor
    /// Returns the actual damage dealt and whether this hit was lethal
    pub fn apply_damage(&mut self, damage: &DamageInfo) -> (f32, bool) {
        if self.is_dead() {
            return (0.0, false);
        }

        let amount = damage.after_armor(self.armor);
        let before = self.current;
        self.current = (self.current - amount).max(0.0);
        (before - self.current, self.current <= 0.0)
    }

    /// Heal, never above max
    /// Returns the actual amount healed
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead() || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }

        let old_health = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - old_health
    }

    /// Set health directly (clamped to 0..max)
    pub fn set_health(&mut self, health: f32) {
        if health.is_finite() {
            self.current = health.clamp(0.0, self.max);
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Get health as a fraction (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

impl Default for HealthPool {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_damage_with_armor() {
        let mut health = HealthPool::new(100.0).with_armor(0.25);

        let (dealt, died) = health.apply_damage(&DamageInfo::new(40.0));
        assert_relative_eq!(dealt, 30.0);
        assert!(!died);
        assert_relative_eq!(health.current(), 70.0);
    }

    #[test]
    fn test_death_clamps_to_zero() {
        let mut health = HealthPool::new(50.0);

        let (dealt, died) = health.apply_damage(&DamageInfo::new(100.0));
        assert!(died);
        assert_eq!(dealt, 50.0);
        assert_eq!(health.current(), 0.0);

        // Already dead: nothing further happens
        let (dealt, died) = health.apply_damage(&DamageInfo::new(10.0));
        assert_eq!(dealt, 0.0);
        assert!(!died);
    }

    #[test]
    fn test_healing_is_capped() {
        let mut health = HealthPool::new(100.0);
        health.set_health(50.0);

        assert_eq!(health.heal(30.0), 30.0);
        assert_eq!(health.heal(50.0), 20.0);
        assert_eq!(health.current(), 100.0);
        assert_eq!(health.heal(-5.0), 0.0);
    }

    #[test]
    fn test_fraction() {
        let mut health = HealthPool::new(150.0);
        health.set_health(20.0);
        assert_relative_eq!(health.fraction(), 20.0 / 150.0);
        health.set_health(400.0);
        assert_eq!(health.fraction(), 1.0);
    }
}
