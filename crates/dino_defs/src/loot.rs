//! Loot table entries

use serde::{Deserialize, Serialize};

/// One weighted line of a loot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item id understood by the loot provider
    pub item: String,
    /// Drop probability (0.0 - 1.0)
    pub chance: f32,
    /// Minimum quantity when dropped
    #[serde(default = "default_quantity")]
    pub min: u32,
    /// Maximum quantity when dropped
    #[serde(default = "default_quantity")]
    pub max: u32,
    /// Rarity tag forwarded to the loot provider
    #[serde(default)]
    pub rarity: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

impl LootEntry {
    /// Create an entry dropping exactly one item
    pub fn new(item: impl Into<String>, chance: f32) -> Self {
        Self {
            item: item.into(),
            chance,
            min: 1,
            max: 1,
            rarity: None,
        }
    }

    /// Set the quantity range
    pub fn with_quantity(mut self, min: u32, max: u32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.item.trim().is_empty() {
            return Err("loot entry with empty item id".into());
        }
        if !(0.0..=1.0).contains(&self.chance) {
            return Err(format!("loot '{}' chance {} outside [0, 1]", self.item, self.chance));
        }
        if self.min > self.max {
            return Err(format!("loot '{}' has min {} > max {}", self.item, self.min, self.max));
        }
        Ok(())
    }
}
