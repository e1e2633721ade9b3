//! Boss spawning, phase progression and defeat

mod common;

use approx::assert_relative_eq;
use common::*;
use dino_encounter::prelude::*;

fn spawn_rex(world: &mut MockWorld, events: &mut EventLog) -> (Simulation, AgentId) {
    let mut config = quiet_config(11);
    config.spawn_jitter = 2.0;
    let mut sim = simulation(config);
    let id = sim
        .spawn_boss(world, events, "alpha_rex", Vec3::ground(10.0, 10.0))
        .unwrap();
    (sim, id)
}

#[test]
fn test_boss_spawns_with_escort() {
    let mut world = MockWorld::new();
    let mut events = EventLog::new();
    let (sim, id) = spawn_rex(&mut world, &mut events);

    assert_eq!(events.count("agent_spawned"), 4);
    assert_eq!(events.count("boss_spawned"), 1);
    assert_eq!(sim.active_count(), 4);
    assert_eq!(sim.boss_phase(id), Some(1));
    assert_eq!(sim.stats().spawned, 4);

    let boss = sim.agent(id).unwrap();
    assert!(boss.is_boss());
    assert_eq!(boss.size, 1.5);
    assert_relative_eq!(boss.health.max(), 2700.0);
    assert_relative_eq!(boss.damage, 67.5);
    assert_eq!(boss.pack, None);

    // The escort is its own pack, led by its first member
    let escort = sim.packs().next().unwrap();
    assert_eq!(escort.species, "velociraptor");
    assert_eq!(escort.members.len(), 3);
    for &member in &escort.members {
        let raptor = sim.agent(member).unwrap();
        assert!(raptor.position.distance(Vec3::ground(10.0, 10.0)) <= 2.0 + 1e-3);
    }

    let spawned = events
        .events()
        .iter()
        .find(|e| matches!(e, DomainEvent::BossSpawned { .. }))
        .unwrap();
    assert!(matches!(
        spawned,
        DomainEvent::BossSpawned { boss, tint, .. } if boss == "alpha_rex" && *tint == [0.55, 0.15, 0.1]
    ));
}

#[test]
fn test_phases_never_go_back() {
    let mut world = MockWorld::new();
    let mut events = EventLog::new();
    let (mut sim, id) = spawn_rex(&mut world, &mut events);

    // 20% armor: 1500 raw is 1200 dealt, leaving 1500 of 2700
    sim.damage_agent(&mut world, &mut events, id, 1500.0, None);
    assert_eq!(sim.boss_phase(id), Some(2));

    sim.heal_agent(id, 1000.0).unwrap();
    assert_eq!(sim.boss_phase(id), Some(2));
    sim.damage_agent(&mut world, &mut events, id, 10.0, None);
    assert_eq!(sim.boss_phase(id), Some(2));

    sim.damage_agent(&mut world, &mut events, id, 2500.0, None);
    assert_eq!(sim.boss_phase(id), Some(3));
    assert_eq!(events.count("boss_phase_changed"), 2);
    assert!(sim.agent(id).unwrap().enraged);
}

#[test]
fn test_phase_bonuses_accumulate() {
    let mut world = MockWorld::new();
    let mut events = EventLog::new();
    let (mut sim, id) = spawn_rex(&mut world, &mut events);
    let base_speed = sim.agent(id).unwrap().speed;
    let base_aggression = sim.agent(id).unwrap().aggression_radius;

    // One big hit skips straight to the last phase, entering each in turn
    sim.damage_agent(&mut world, &mut events, id, 3000.0, None);
    assert_eq!(sim.boss_phase(id), Some(3));

    let phases: Vec<u32> = events
        .events()
        .iter()
        .filter_map(|e| match e {
            DomainEvent::BossPhaseChanged { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(phases, vec![2, 3]);

    let boss = sim.agent(id).unwrap();
    assert_relative_eq!(boss.damage, 67.5 * 1.1 * 1.3, epsilon = 1e-3);
    assert_relative_eq!(boss.speed, base_speed * 1.15 * 1.2, epsilon = 1e-3);
    assert_relative_eq!(boss.aggression_radius, base_aggression * 1.5, epsilon = 1e-3);
}

#[test]
fn test_boss_death_drops_boss_loot() {
    let mut world = MockWorld::new().accepting_loot();
    let mut events = EventLog::new();
    let (mut sim, id) = spawn_rex(&mut world, &mut events);

    assert!(sim.damage_agent(&mut world, &mut events, id, 100_000.0, Some(PlayerId(9))));

    assert_eq!(events.count("boss_died"), 1);
    assert_eq!(sim.boss_phase(id), None);
    // The lethal hit does not walk the phases
    assert_eq!(events.count("boss_phase_changed"), 0);

    let items: Vec<&str> = world.loot.iter().map(|(item, _, _)| item.as_str()).collect();
    assert_eq!(items, vec!["alpha_trophy", "rex_tooth"]);
    let teeth = &world.loot[1].2;
    assert!((3..=5).contains(&teeth.count));
    assert_eq!(teeth.rarity.as_deref(), Some("rare"));
}

#[test]
fn test_unknown_boss_is_rejected() {
    let mut world = MockWorld::new();
    let mut events = EventLog::new();
    let mut sim = simulation(quiet_config(12));

    let result = sim.spawn_boss(&mut world, &mut events, "mega_croc", Vec3::ZERO);
    assert!(matches!(result, Err(EncounterError::DefinitionNotFound(ref id)) if id == "mega_croc"));
    assert!(events.is_empty());
    assert_eq!(sim.active_count(), 0);
}

#[test]
fn test_boss_hunts_players() {
    let mut world = MockWorld::new().with_player(1, Vec3::ground(40.0, 10.0), 10_000.0);
    let mut events = EventLog::new();
    let (mut sim, id) = spawn_rex(&mut world, &mut events);

    run(&mut sim, &mut world, &mut events, 3);
    let boss = sim.agent(id).unwrap();
    assert_eq!(boss.target, Some(PlayerId(1)));
    assert_ne!(boss.state(), AgentState::Idle);
}
