//! Damage information

use dino_core::PlayerId;
use serde::{Deserialize, Serialize};

/// Information about a damage instance against an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageInfo {
    /// Raw damage before armor
    pub amount: f32,
    /// Player that caused the damage (if any)
    pub source: Option<PlayerId>,
}

impl DamageInfo {
    /// Create new damage info
    pub fn new(amount: f32) -> Self {
        Self {
            amount,
            source: None,
        }
    }

    /// Set the attacking player
    pub fn with_source(mut self, player: PlayerId) -> Self {
        self.source = Some(player);
        self
    }

    /// Damage after an armor fraction is applied
    pub fn after_armor(&self, armor: f32) -> f32 {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return 0.0;
        }
        self.amount * (1.0 - armor.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_info() {
        let damage = DamageInfo::new(50.0).with_source(PlayerId(3));
        assert_eq!(damage.source, Some(PlayerId(3)));
        assert_eq!(damage.after_armor(0.2), 40.0);
        assert_eq!(damage.after_armor(1.5), 0.0);
    }

    #[test]
    fn test_invalid_amounts_deal_nothing() {
        assert_eq!(DamageInfo::new(-10.0).after_armor(0.0), 0.0);
        assert_eq!(DamageInfo::new(f32::NAN).after_armor(0.0), 0.0);
    }
}
