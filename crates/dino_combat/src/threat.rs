//! Threat bookkeeping

use dino_core::PlayerId;
use serde::{Deserialize, Serialize};

/// Accumulated threat per attacking player
///
/// Entries keep the order in which attackers first generated threat, which
/// is the tie-break order for `highest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreatTable {
    entries: Vec<(PlayerId, f32)>,
}

impl ThreatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add threat for `attacker`; negative or non-finite amounts are ignored
    pub fn add(&mut self, attacker: PlayerId, amount: f32) {
        if !amount.is_finite() || amount < 0.0 {
            return;
        }
        match self.entries.iter_mut().find(|(id, _)| *id == attacker) {
            Some((_, threat)) => *threat += amount,
            None => self.entries.push((attacker, amount)),
        }
    }

    /// Threat held against `attacker` (0 when absent)
    pub fn get(&self, attacker: PlayerId) -> f32 {
        self.entries
            .iter()
            .find(|(id, _)| *id == attacker)
            .map(|(_, t)| *t)
            .unwrap_or(0.0)
    }

    /// Attacker with the most threat; first entry wins ties
    pub fn highest(&self) -> Option<(PlayerId, f32)> {
        self.highest_where(|_| true)
    }

    /// Highest-threat attacker accepted by `filter`
    pub fn highest_where(&self, mut filter: impl FnMut(PlayerId) -> bool) -> Option<(PlayerId, f32)> {
        let mut best: Option<(PlayerId, f32)> = None;
        for &(id, threat) in &self.entries {
            if !filter(id) {
                continue;
            }
            if best.map_or(true, |(_, b)| threat > b) {
                best = Some((id, threat));
            }
        }
        best
    }

    /// Linear decay; entries reaching zero are dropped
    pub fn decay(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        for (_, threat) in &mut self.entries {
            *threat -= amount;
        }
        self.entries.retain(|(_, threat)| *threat > 0.0);
    }

    /// Every attacker in first-hit order
    pub fn attackers(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
