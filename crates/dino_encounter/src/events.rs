//! Domain events emitted by the engine

use crossbeam_channel::Sender;
use dino_ai::AgentState;
use dino_core::{AgentId, PackId, PlayerId, Vec3};
use dino_defs::AbilityEffect;
use serde::Serialize;

/// Something observable happened in the encounter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    AgentSpawned {
        agent: AgentId,
        species: String,
        position: Vec3,
        pack: Option<PackId>,
        boss: bool,
    },
    AgentDamaged {
        agent: AgentId,
        amount: f32,
        health: f32,
        attacker: Option<PlayerId>,
    },
    AgentDied {
        agent: AgentId,
        species: String,
        position: Vec3,
        killer: Option<PlayerId>,
    },
    AgentAttacked {
        agent: AgentId,
        target: PlayerId,
        damage: f32,
    },
    AbilityUsed {
        agent: AgentId,
        ability: String,
        effect: AbilityEffect,
        target: Option<PlayerId>,
    },
    StateChanged {
        agent: AgentId,
        from: AgentState,
        to: AgentState,
    },
    BossSpawned {
        agent: AgentId,
        boss: String,
        position: Vec3,
        tint: [f32; 3],
    },
    BossPhaseChanged {
        agent: AgentId,
        phase: u32,
        enraged: bool,
    },
    BossDied {
        agent: AgentId,
        boss: String,
    },
    PackAlert {
        pack: PackId,
        leader: AgentId,
        leader_position: Vec3,
        target: Option<PlayerId>,
    },
    AgentDespawned {
        agent: AgentId,
    },
    CamouflageChanged {
        agent: AgentId,
        camouflaged: bool,
    },
}

impl DomainEvent {
    /// Agent the event is about (the leader for pack alerts)
    pub fn agent(&self) -> Option<AgentId> {
        match self {
            Self::AgentSpawned { agent, .. }
            | Self::AgentDamaged { agent, .. }
            | Self::AgentDied { agent, .. }
            | Self::AgentAttacked { agent, .. }
            | Self::AbilityUsed { agent, .. }
            | Self::StateChanged { agent, .. }
            | Self::BossSpawned { agent, .. }
            | Self::BossPhaseChanged { agent, .. }
            | Self::BossDied { agent, .. }
            | Self::AgentDespawned { agent }
            | Self::CamouflageChanged { agent, .. } => Some(*agent),
            Self::PackAlert { leader, .. } => Some(*leader),
        }
    }

    /// Snake-case event name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AgentSpawned { .. } => "agent_spawned",
            Self::AgentDamaged { .. } => "agent_damaged",
            Self::AgentDied { .. } => "agent_died",
            Self::AgentAttacked { .. } => "agent_attacked",
            Self::AbilityUsed { .. } => "ability_used",
            Self::StateChanged { .. } => "state_changed",
            Self::BossSpawned { .. } => "boss_spawned",
            Self::BossPhaseChanged { .. } => "boss_phase_changed",
            Self::BossDied { .. } => "boss_died",
            Self::PackAlert { .. } => "pack_alert",
            Self::AgentDespawned { .. } => "agent_despawned",
            Self::CamouflageChanged { .. } => "camouflage_changed",
        }
    }
}

/// Receiver of domain events
pub trait EventSink {
    fn emit(&mut self, event: DomainEvent);
}

/// Buffers every event in order
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<DomainEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Take every buffered event
    pub fn drain(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of buffered events of one kind
    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    /// Buffered events about one agent
    pub fn for_agent(&self, agent: AgentId) -> impl Iterator<Item = &DomainEvent> {
        self.events.iter().filter(move |e| e.agent() == Some(agent))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: DomainEvent) {
        self.events.push(event);
    }
}

/// Forwards events over a crossbeam channel
///
/// Events are dropped once the receiving side is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<DomainEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<DomainEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: DomainEvent) {
        if self.sender.send(event).is_err() {
            log::trace!("Event receiver disconnected, dropping event");
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: DomainEvent) {}
}
