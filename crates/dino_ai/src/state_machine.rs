//! Agent behavior states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior state of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Waiting or wandering near home
    Idle,
    /// Just noticed a target
    Alert,
    /// Lost the target, searching
    Hunting,
    /// Closing in on the target
    Chasing,
    /// In range, trading basic attacks
    Attacking,
    /// Recovering from an ability
    #[serde(rename = "ability")]
    UsingAbility,
    /// Running from attackers
    Fleeing,
    /// Terminal
    Dead,
}

impl AgentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Alert => "alert",
            Self::Hunting => "hunting",
            Self::Chasing => "chasing",
            Self::Attacking => "attacking",
            Self::UsingAbility => "ability",
            Self::Fleeing => "fleeing",
            Self::Dead => "dead",
        }
    }

    /// Dead agents never leave this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dead)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed state change
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateTransition {
    pub from: AgentState,
    pub to: AgentState,
    /// Simulation time of the change
    pub at: f64,
}

/// Current state plus the time it was entered
#[derive(Debug, Clone)]
pub struct AgentStateMachine {
    current: AgentState,
    previous: Option<AgentState>,
    entered_at: f64,
}

impl AgentStateMachine {
    /// Start in `Idle` at `now`
    pub fn new(now: f64) -> Self {
        Self {
            current: AgentState::Idle,
            previous: None,
            entered_at: now,
        }
    }

    pub fn current(&self) -> AgentState {
        self.current
    }

    pub fn previous(&self) -> Option<AgentState> {
        self.previous
    }

    pub fn entered_at(&self) -> f64 {
        self.entered_at
    }

    /// Seconds spent in the current state
    pub fn time_in_state(&self, now: f64) -> f64 {
        (now - self.entered_at).max(0.0)
    }

    pub fn is_in(&self, state: AgentState) -> bool {
        self.current == state
    }

    /// Move to `to`, resetting time-in-state
    ///
    /// Returns `None` when nothing changed: the agent is already in `to`, or
    /// is dead.
    pub fn transition(&mut self, to: AgentState, now: f64) -> Option<StateTransition> {
        if self.current == to || self.current.is_terminal() {
            return None;
        }
        let from = self.current;
        self.previous = Some(from);
        self.current = to;
        self.entered_at = now;
        Some(StateTransition { from, to, at: now })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let fsm = AgentStateMachine::new(3.0);
        assert!(fsm.is_in(AgentState::Idle));
        assert_eq!(fsm.previous(), None);
        assert_eq!(fsm.time_in_state(5.0), 2.0);
    }

    #[test]
    fn test_transition_resets_timer() {
        let mut fsm = AgentStateMachine::new(0.0);
        let change = fsm.transition(AgentState::Alert, 4.0).unwrap();
        assert_eq!(change.from, AgentState::Idle);
        assert_eq!(change.to, AgentState::Alert);
        assert_eq!(fsm.time_in_state(4.5), 0.5);
        assert_eq!(fsm.previous(), Some(AgentState::Idle));
    }

    #[test]
    fn test_same_state_is_not_a_transition() {
        let mut fsm = AgentStateMachine::new(0.0);
        assert!(fsm.transition(AgentState::Idle, 1.0).is_none());
        assert_eq!(fsm.entered_at(), 0.0);
    }

    #[test]
    fn test_dead_is_terminal() {
        let mut fsm = AgentStateMachine::new(0.0);
        fsm.transition(AgentState::Dead, 1.0);
        assert!(fsm.transition(AgentState::Idle, 2.0).is_none());
        assert!(fsm.is_in(AgentState::Dead));
    }

    #[test]
    fn test_state_names() {
        assert_eq!(AgentState::UsingAbility.to_string(), "ability");
        assert_eq!(
            serde_json::to_string(&AgentState::UsingAbility).ok().as_deref(),
            Some("\"ability\"")
        );
    }
}
