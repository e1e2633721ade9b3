//! Wave sizing and spawn point selection

mod common;

use approx::assert_relative_eq;
use common::*;
use dino_encounter::prelude::*;

fn wave_config(max_active: u32) -> EncounterConfig {
    quiet_config(21).with_max_active(max_active)
}

#[test]
fn test_wave_fills_cap_exactly() {
    let mut config = wave_config(10);
    config.severity_scaling = vec![1.0];
    let mut sim = simulation(config);
    let mut world = MockWorld::new().with_spawn_points(vec![Vec3::ZERO, Vec3::ground(80.0, 0.0)]);
    let mut events = EventLog::new();

    assert_eq!(sim.spawn_wave(&mut world, &mut events), 10);
    assert_eq!(sim.active_count(), 10);
    assert_eq!(events.count("agent_spawned"), 10);

    // Already at the cap
    assert_eq!(sim.spawn_wave(&mut world, &mut events), 0);
    assert_eq!(sim.active_count(), 10);
    assert_eq!(sim.stats().waves, 2);
    assert_eq!(sim.stats().spawned, 10);
}

#[test]
fn test_wave_refills_after_deaths() {
    let mut config = wave_config(10);
    config.severity_scaling = vec![1.0];
    let mut sim = simulation(config);
    let mut world = MockWorld::new().with_spawn_points(vec![Vec3::ZERO]);
    let mut events = EventLog::new();

    sim.spawn_wave(&mut world, &mut events);
    let victims: Vec<AgentId> = sim.agents().take(3).map(|a| a.id).collect();
    for id in victims {
        sim.damage_agent(&mut world, &mut events, id, 100_000.0, None);
    }
    assert_eq!(sim.active_count(), 7);
    assert_eq!(sim.spawn_wave(&mut world, &mut events), 3);
}

#[test]
fn test_cap_scales_with_severity() {
    let points = vec![Vec3::ZERO];

    let mut sim = simulation(wave_config(10));
    let mut world = MockWorld::new().with_spawn_points(points.clone());
    let mut events = EventLog::new();
    assert_eq!(sim.spawn_wave(&mut world, &mut events), 5);

    // Levels past the table use its last entry
    let mut sim = simulation(wave_config(10));
    let mut world = MockWorld::new()
        .with_spawn_points(points)
        .with_severity(40);
    assert_eq!(sim.spawn_wave(&mut world, &mut events), 15);
}

#[test]
fn test_spawn_points_inside_safe_zone_are_preferred() {
    let mut config = wave_config(12);
    config.severity_scaling = vec![1.0];
    config.spawn_jitter = 3.0;
    let mut sim = simulation(config);
    let safe_point = Vec3::ground(500.0, 0.0);
    let mut world = MockWorld::new()
        .with_spawn_points(vec![Vec3::ZERO, safe_point, Vec3::ground(-300.0, 40.0)])
        .with_safe_zone(safe_point, 50.0);
    let mut events = EventLog::new();

    assert_eq!(sim.spawn_wave(&mut world, &mut events), 12);
    for agent in sim.agents() {
        assert!(agent.position.distance(safe_point) <= 3.0 + 1e-3);
    }
}

#[test]
fn test_unsafe_points_are_used_when_nothing_is_safe() {
    let mut config = wave_config(6);
    config.severity_scaling = vec![1.0];
    config.spawn_jitter = 0.0;
    let mut sim = simulation(config);
    let point = Vec3::ground(-40.0, 25.0);
    let mut world = MockWorld::new()
        .with_spawn_points(vec![point])
        .with_safe_zone(Vec3::ground(1000.0, 1000.0), 10.0);
    let mut events = EventLog::new();

    assert_eq!(sim.spawn_wave(&mut world, &mut events), 6);
    assert!(sim.agents().all(|a| a.position == point));
}

#[test]
fn test_fallback_ring_without_spawn_points() {
    let mut config = wave_config(8);
    config.severity_scaling = vec![1.0];
    config.spawn_jitter = 0.0;
    let mut sim = simulation(config);
    let mut world = MockWorld::new();
    let mut events = EventLog::new();

    assert_eq!(sim.spawn_wave(&mut world, &mut events), 8);
    for agent in sim.agents() {
        assert_relative_eq!(agent.position.horizontal().length(), 150.0, epsilon = 1e-2);
    }
}

#[test]
fn test_fallback_ring_prefers_safe_points() {
    let mut config = wave_config(8);
    config.severity_scaling = vec![1.0];
    config.spawn_jitter = 0.0;
    let mut sim = simulation(config);
    // Only the ring point at (150, 0) is inside the zone
    let mut world = MockWorld::new().with_safe_zone(Vec3::ground(150.0, 0.0), 10.0);
    let mut events = EventLog::new();

    assert_eq!(sim.spawn_wave(&mut world, &mut events), 8);
    for agent in sim.agents() {
        assert_relative_eq!(agent.position.x, 150.0, epsilon = 1e-2);
        assert_relative_eq!(agent.position.z, 0.0, epsilon = 1e-2);
    }
}

#[test]
fn test_fallback_ring_used_when_zone_excludes_it() {
    let mut config = wave_config(8);
    config.severity_scaling = vec![1.0];
    config.spawn_jitter = 0.0;
    let mut sim = simulation(config);
    // The zone has shrunk well inside the ring
    let mut world = MockWorld::new().with_safe_zone(Vec3::ZERO, 100.0);
    let mut events = EventLog::new();

    assert_eq!(sim.spawn_wave(&mut world, &mut events), 8);
    assert_eq!(sim.active_count(), 8);
    for agent in sim.agents() {
        assert_relative_eq!(agent.position.horizontal().length(), 150.0, epsilon = 1e-2);
    }
}

#[test]
fn test_unknown_species_is_rejected() {
    let mut sim = simulation(quiet_config(22));
    let mut world = MockWorld::new();
    let mut events = EventLog::new();

    let result = sim.spawn_agent(&mut world, &mut events, "stegosaurus", Vec3::ZERO);
    assert!(matches!(result, Err(EncounterError::DefinitionNotFound(_))));

    let result = sim.spawn_agent(&mut world, &mut events, "velociraptor", Vec3::new(f32::NAN, 0.0, 0.0));
    assert!(matches!(result, Err(EncounterError::NoValidSpawnPosition)));
    assert_eq!(sim.active_count(), 0);
}

#[test]
fn test_despawn_all_clears_everything() {
    let mut config = wave_config(10);
    config.severity_scaling = vec![1.0];
    let mut sim = simulation(config);
    let mut world = MockWorld::new().with_spawn_points(vec![Vec3::ZERO]);
    let mut events = EventLog::new();

    sim.spawn_wave(&mut world, &mut events);
    sim.spawn_boss(&mut world, &mut events, "brood_queen", Vec3::ground(50.0, 0.0))
        .unwrap();
    let total = sim.registry().len();

    assert_eq!(sim.despawn_all(&mut events), total);
    assert_eq!(sim.active_count(), 0);
    assert_eq!(sim.packs().count(), 0);
    assert_eq!(sim.registry().bosses().count(), 0);
    assert_eq!(events.count("agent_despawned"), total);
}
