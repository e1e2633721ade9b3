//! Match report: an event sink that keeps score

use crate::arena::ArenaTally;
use dino_encounter::{DomainEvent, EventSink, SimulationStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts domain events as the match runs
#[derive(Debug, Default)]
pub struct MatchReport {
    events: BTreeMap<&'static str, usize>,
    kills: BTreeMap<String, usize>,
    player_kills: usize,
    bosses_defeated: Vec<String>,
}

impl MatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events of a kind seen so far
    pub fn count(&self, kind: &str) -> usize {
        self.events.get(kind).copied().unwrap_or(0)
    }

    pub fn summary(&self, stats: SimulationStats, tally: &ArenaTally, survivors: usize) -> MatchSummary {
        MatchSummary {
            ticks: stats.ticks,
            waves: stats.waves,
            spawned: stats.spawned,
            despawned: stats.despawned,
            step_errors: stats.step_errors,
            kills: self.kills.clone(),
            player_kills: self.player_kills,
            bosses_defeated: self.bosses_defeated.clone(),
            events: self
                .events
                .iter()
                .map(|(kind, count)| (kind.to_string(), *count))
                .collect(),
            arena: tally.clone(),
            survivors,
        }
    }
}

impl EventSink for MatchReport {
    fn emit(&mut self, event: DomainEvent) {
        *self.events.entry(event.kind()).or_insert(0) += 1;
        match &event {
            DomainEvent::AgentDied { species, killer, .. } => {
                *self.kills.entry(species.clone()).or_insert(0) += 1;
                if killer.is_some() {
                    self.player_kills += 1;
                }
            }
            DomainEvent::BossDied { boss, .. } => self.bosses_defeated.push(boss.clone()),
            _ => {}
        }
    }
}

/// End-of-match summary, printed as JSON
#[derive(Debug, Serialize)]
pub struct MatchSummary {
    /// Ticks simulated
    pub ticks: u64,
    pub waves: u64,
    pub spawned: u64,
    pub despawned: u64,
    pub step_errors: u64,
    /// Deaths per species
    pub kills: BTreeMap<String, usize>,
    /// Deaths credited to a player
    pub player_kills: usize,
    pub bosses_defeated: Vec<String>,
    /// Event counts by kind
    pub events: BTreeMap<String, usize>,
    pub arena: ArenaTally,
    /// Players alive at the end
    pub survivors: usize,
}
