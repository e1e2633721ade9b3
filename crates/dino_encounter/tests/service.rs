//! Background encounter service

mod common;

use common::*;
use crossbeam_channel::{unbounded, Receiver};
use dino_encounter::prelude::*;
use std::thread;
use std::time::{Duration, Instant};

fn start_service() -> (EncounterService, Receiver<DomainEvent>) {
    let mut config = quiet_config(31).with_max_active(10);
    config.ai_tick_interval = 0.05;
    config.wave_interval = 60.0;
    config.severity_scaling = vec![1.0];
    let sim = simulation(config);
    let world = MockWorld::new().with_spawn_points(vec![Vec3::ZERO, Vec3::ground(100.0, 0.0)]);

    let (sender, receiver) = unbounded();
    let service = EncounterService::start(sim, world, Box::new(ChannelSink::new(sender))).unwrap();
    (service, receiver)
}

/// Poll `condition` for up to two seconds
fn wait_for(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

#[test]
fn test_service_ticks_and_reports_status() {
    let (service, _events) = start_service();

    assert!(wait_for(|| service.status().ticks >= 3));
    let status = service.status();
    assert_eq!(status.state, ServiceState::Running);
    assert!(!status.spawning);
    assert!(service.is_running());
    assert!(status.sim_time > 0.0);
}

#[test]
fn test_boss_commands_round_trip() {
    let (service, events) = start_service();

    let boss = service.spawn_boss("alpha_rex", Vec3::ground(20.0, 0.0)).unwrap();
    assert!(wait_for(|| service.active_count() == 4));

    assert!(service.damage_agent(boss, 10.0, Some(PlayerId(1))).unwrap());
    assert!(!service.damage_agent(AgentId(999), 10.0, None).unwrap());
    service.stun_agent(boss, 1.0).unwrap();
    service.queue_damage(boss, 5.0, None).unwrap();

    assert!(matches!(
        service.spawn_boss("unknown_boss", Vec3::ZERO),
        Err(EncounterError::DefinitionNotFound(_))
    ));

    assert_eq!(service.despawn_all().unwrap(), 4);
    assert!(wait_for(|| service.active_count() == 0));

    let received: Vec<DomainEvent> = events.try_iter().collect();
    assert!(received
        .iter()
        .any(|e| matches!(e, DomainEvent::BossSpawned { agent, .. } if *agent == boss)));
    assert_eq!(
        received.iter().filter(|e| e.kind() == "agent_damaged").count(),
        2
    );
}

#[test]
fn test_spawning_fills_the_cap() {
    let (service, _events) = start_service();

    service.start_spawning().unwrap();
    assert!(wait_for(|| service.active_count() == 10));
    assert!(service.status().spawning);

    service.stop_spawning().unwrap();
    assert!(wait_for(|| !service.status().spawning));
    assert_eq!(service.active_count(), 10);
}

#[test]
fn test_shutdown_is_idempotent() {
    let (mut service, events) = start_service();
    service.spawn_boss("brood_queen", Vec3::ZERO).unwrap();

    service.shutdown().unwrap();
    service.shutdown().unwrap();

    let status = service.status();
    assert_eq!(status.state, ServiceState::Stopped);
    assert_eq!(status.active_agents, 0);
    assert!(!service.is_running());

    assert!(matches!(service.start_spawning(), Err(EncounterError::ServiceStopped)));
    assert!(matches!(
        service.despawn_all(),
        Err(EncounterError::ServiceStopped)
    ));

    // Agents still alive at shutdown are despawned
    let despawned = events
        .try_iter()
        .filter(|e| e.kind() == "agent_despawned")
        .count();
    assert_eq!(despawned, 7);
}
