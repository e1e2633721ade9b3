//! Encounter service
//!
//! Runs a [`Simulation`] on its own thread. The thread is driven by
//! `crossbeam_channel` timers: an AI tick every `ai_tick_interval` and, while
//! spawning is enabled, a wave every `wave_interval`. Requests from other
//! threads are commands on a channel and are applied between ticks, so the
//! simulation itself is never shared.

use crate::error::{EncounterError, Result};
use crate::events::EventSink;
use crate::simulation::Simulation;
use crate::world::EncounterWorld;
use crossbeam_channel::{bounded, never, select, tick, unbounded, Receiver, Sender};
use dino_core::{AgentId, PlayerId, Vec3};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Service lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceState {
    /// Thread is being started
    Starting,
    /// Ticking
    Running,
    /// Shutdown requested, clearing agents
    Stopping,
    /// Thread has exited
    Stopped,
}

impl ServiceState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Snapshot published by the service thread after every command and tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub state: ServiceState,
    pub spawning: bool,
    pub active_agents: usize,
    pub ticks: u64,
    /// Simulation clock (seconds)
    pub sim_time: f64,
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self {
            state: ServiceState::Starting,
            spawning: false,
            active_agents: 0,
            ticks: 0,
            sim_time: 0.0,
        }
    }
}

enum Command {
    StartSpawning,
    StopSpawning,
    SpawnBoss {
        boss: String,
        position: Vec3,
        reply: Sender<Result<AgentId>>,
    },
    DamageAgent {
        agent: AgentId,
        amount: f32,
        attacker: Option<PlayerId>,
        reply: Sender<bool>,
    },
    QueueDamage {
        agent: AgentId,
        amount: f32,
        attacker: Option<PlayerId>,
    },
    StunAgent {
        agent: AgentId,
        duration: f32,
    },
    DespawnAll {
        reply: Sender<usize>,
    },
    Shutdown,
}

/// Handle to a simulation running on a background thread
///
/// Dropping the handle shuts the service down.
pub struct EncounterService {
    commands: Sender<Command>,
    status: Arc<Mutex<ServiceStatus>>,
    thread: Option<JoinHandle<()>>,
}

impl EncounterService {
    /// Move the simulation, world and event sink onto a new thread and start ticking
    pub fn start<W>(simulation: Simulation, world: W, events: Box<dyn EventSink + Send>) -> Result<Self>
    where
        W: EncounterWorld + Send + 'static,
    {
        let (commands, receiver) = unbounded();
        let status = Arc::new(Mutex::new(ServiceStatus::default()));

        let worker = Worker {
            simulation,
            world,
            events,
            status: Arc::clone(&status),
            spawning: false,
        };
        let thread = thread::Builder::new()
            .name("encounter-sim".into())
            .spawn(move || worker.run(receiver))?;

        log::info!("Encounter service started");
        Ok(Self {
            commands,
            status,
            thread: Some(thread),
        })
    }

    /// Spawn a wave now and then every `wave_interval`
    pub fn start_spawning(&self) -> Result<()> {
        self.send(Command::StartSpawning)
    }

    /// Stop periodic waves (agents already spawned keep running)
    pub fn stop_spawning(&self) -> Result<()> {
        self.send(Command::StopSpawning)
    }

    pub fn spawn_boss(&self, boss: &str, position: Vec3) -> Result<AgentId> {
        let (reply, response) = bounded(1);
        self.send(Command::SpawnBoss {
            boss: boss.to_string(),
            position,
            reply,
        })?;
        response.recv().map_err(|_| EncounterError::ServiceStopped)?
    }

    /// Damage an agent and wait for the result
    pub fn damage_agent(&self, agent: AgentId, amount: f32, attacker: Option<PlayerId>) -> Result<bool> {
        let (reply, response) = bounded(1);
        self.send(Command::DamageAgent {
            agent,
            amount,
            attacker,
            reply,
        })?;
        response.recv().map_err(|_| EncounterError::ServiceStopped)
    }

    /// Damage an agent at the next tick boundary without waiting
    pub fn queue_damage(&self, agent: AgentId, amount: f32, attacker: Option<PlayerId>) -> Result<()> {
        self.send(Command::QueueDamage {
            agent,
            amount,
            attacker,
        })
    }

    pub fn stun_agent(&self, agent: AgentId, duration: f32) -> Result<()> {
        self.send(Command::StunAgent { agent, duration })
    }

    /// Remove every agent; returns how many were removed
    pub fn despawn_all(&self) -> Result<usize> {
        let (reply, response) = bounded(1);
        self.send(Command::DespawnAll { reply })?;
        response.recv().map_err(|_| EncounterError::ServiceStopped)
    }

    /// Agents alive as of the last tick or command
    pub fn active_count(&self) -> usize {
        self.status.lock().active_agents
    }

    pub fn status(&self) -> ServiceStatus {
        *self.status.lock()
    }

    pub fn is_running(&self) -> bool {
        self.status.lock().state.is_running()
    }

    /// Stop the thread, clearing every agent; safe to call more than once
    pub fn shutdown(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        // The thread may already be gone; joining below is what matters
        let _ = self.commands.send(Command::Shutdown);
        if thread.join().is_err() {
            log::error!("Encounter service thread panicked");
            self.status.lock().state = ServiceState::Stopped;
            return Err(EncounterError::ServiceStopped);
        }
        log::info!("Encounter service stopped");
        Ok(())
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| EncounterError::ServiceStopped)
    }
}

impl Drop for EncounterService {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

/// What woke the service thread
enum Wake {
    /// `None` once every handle is gone
    Command(Option<Command>),
    Tick,
    Wave,
}

/// State owned by the service thread
struct Worker<W> {
    simulation: Simulation,
    world: W,
    events: Box<dyn EventSink + Send>,
    status: Arc<Mutex<ServiceStatus>>,
    spawning: bool,
}

impl<W: EncounterWorld> Worker<W> {
    fn run(mut self, commands: Receiver<Command>) {
        let config = self.simulation.config();
        let dt = config.ai_tick_interval;
        let wave_period = Duration::from_secs_f32(config.wave_interval);
        let ticker = tick(Duration::from_secs_f32(dt));
        let mut waves: Receiver<Instant> = never();

        self.publish(ServiceState::Running);
        loop {
            let wake = select! {
                recv(commands) -> command => Wake::Command(command.ok()),
                recv(ticker) -> _ => Wake::Tick,
                recv(waves) -> _ => Wake::Wave,
            };
            match wake {
                Wake::Command(None) | Wake::Command(Some(Command::Shutdown)) => break,
                Wake::Command(Some(Command::StartSpawning)) => {
                    if !self.spawning {
                        self.spawning = true;
                        self.spawn_wave();
                        waves = tick(wave_period);
                        log::info!("Wave spawning started");
                    }
                }
                Wake::Command(Some(Command::StopSpawning)) => {
                    if self.spawning {
                        self.spawning = false;
                        waves = never();
                        log::info!("Wave spawning stopped");
                    }
                }
                Wake::Command(Some(command)) => self.handle(command),
                Wake::Tick => {
                    self.simulation
                        .tick(&mut self.world, &mut *self.events, dt);
                }
                Wake::Wave => self.spawn_wave(),
            }
            self.publish(ServiceState::Running);
        }

        self.publish(ServiceState::Stopping);
        self.simulation.despawn_all(&mut *self.events);
        self.spawning = false;
        self.publish(ServiceState::Stopped);
    }

    fn handle(&mut self, command: Command) {
        let world = &mut self.world;
        let events = &mut *self.events;
        match command {
            Command::SpawnBoss {
                boss,
                position,
                reply,
            } => {
                let result = self.simulation.spawn_boss(world, events, &boss, position);
                if let Err(e) = &result {
                    log::warn!("Boss spawn '{}' failed: {}", boss, e);
                }
                let _ = reply.send(result);
            }
            Command::DamageAgent {
                agent,
                amount,
                attacker,
                reply,
            } => {
                let applied = self
                    .simulation
                    .damage_agent(world, events, agent, amount, attacker);
                let _ = reply.send(applied);
            }
            Command::QueueDamage {
                agent,
                amount,
                attacker,
            } => {
                self.simulation
                    .damage_agent(world, events, agent, amount, attacker);
            }
            Command::StunAgent { agent, duration } => {
                if let Err(e) = self.simulation.stun_agent(agent, duration) {
                    log::debug!("Stun ignored: {}", e);
                }
            }
            Command::DespawnAll { reply } => {
                let removed = self.simulation.despawn_all(events);
                let _ = reply.send(removed);
            }
            Command::StartSpawning | Command::StopSpawning | Command::Shutdown => {}
        }
    }

    fn spawn_wave(&mut self) {
        self.simulation
            .spawn_wave(&mut self.world, &mut *self.events);
    }

    fn publish(&self, state: ServiceState) {
        let mut status = self.status.lock();
        status.state = state;
        status.spawning = self.spawning;
        status.active_agents = self.simulation.active_count();
        status.ticks = self.simulation.stats().ticks;
        status.sim_time = self.simulation.now();
    }
}
