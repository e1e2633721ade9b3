//! Pack formation, alerts, leader succession and flanking

mod common;

use common::*;
use dino_defs::SizeRange;
use dino_encounter::prelude::*;

/// Raptors only, always in packs of exactly four
fn raptor_definitions() -> Arc<DefinitionRegistry> {
    let builtin = DefinitionRegistry::load_builtin().unwrap();
    let mut raptor = (**builtin.species("velociraptor").unwrap()).clone();
    raptor.pack_size = SizeRange { min: 4, max: 4 };
    Arc::new(DefinitionRegistry::from_definitions(vec![raptor], Vec::new()).unwrap())
}

fn pack_config(seed: u64) -> EncounterConfig {
    let mut config = quiet_config(seed).with_max_active(4);
    config.severity_scaling = vec![1.0];
    config.spawn_jitter = 0.0;
    config
}

/// Spawn one pack of four raptors at the origin
fn spawn_pack(config: EncounterConfig, world: &mut MockWorld, events: &mut EventLog) -> (Simulation, Pack) {
    let mut sim = Simulation::new(raptor_definitions(), config).unwrap();
    world.spawn_points = vec![Vec3::ZERO];
    assert_eq!(sim.spawn_wave(world, events), 4);
    let pack = sim.packs().next().cloned().unwrap();
    (sim, pack)
}

#[test]
fn test_group_forms_one_pack() {
    let mut world = MockWorld::new();
    let mut events = EventLog::new();
    let (sim, pack) = spawn_pack(pack_config(1), &mut world, &mut events);

    assert_eq!(sim.packs().count(), 1);
    assert_eq!(pack.members.len(), 4);
    assert_eq!(pack.leader, Some(pack.members[0]));

    let leader = sim.agent(pack.members[0]).unwrap();
    assert!(leader.is_leader);
    for &id in &pack.members[1..] {
        let member = sim.agent(id).unwrap();
        assert_eq!(member.pack, Some(pack.id));
        assert!(!member.is_leader);
    }
}

#[test]
fn test_pack_is_deleted_when_emptied() {
    let mut world = MockWorld::new();
    let mut events = EventLog::new();
    let (mut sim, pack) = spawn_pack(pack_config(2).with_scatter_chance(0.0), &mut world, &mut events);

    for (killed, &id) in pack.members.iter().enumerate() {
        assert!(sim.damage_agent(&mut world, &mut events, id, 1000.0, None));
        let remaining = sim.pack(pack.id).map_or(0, |p| p.members.len());
        assert_eq!(remaining, 3 - killed);
    }
    assert!(sim.pack(pack.id).is_none());
    assert_eq!(sim.packs().count(), 0);
}

#[test]
fn test_leader_death_scatters_pack() {
    let mut world = MockWorld::new().with_player(1, Vec3::ground(100.0, 0.0), 100.0);
    let mut events = EventLog::new();
    let (mut sim, pack) = spawn_pack(pack_config(3).with_scatter_chance(1.0), &mut world, &mut events);

    sim.damage_agent(&mut world, &mut events, pack.members[0], 1000.0, Some(PlayerId(1)));

    let survivors = &pack.members[1..];
    for &id in survivors {
        let member = sim.agent(id).unwrap();
        assert_eq!(member.state(), AgentState::Fleeing);
        assert!(!member.enraged);
    }
    let group = sim.pack(pack.id).unwrap();
    assert_eq!(group.leader, Some(pack.members[1]));
    assert_eq!(group.members, survivors.to_vec());
    assert!(sim.agent(pack.members[1]).unwrap().is_leader);
}

#[test]
fn test_leader_death_enrages_once() {
    let mut world = MockWorld::new();
    let mut events = EventLog::new();
    let (mut sim, pack) = spawn_pack(pack_config(4).with_scatter_chance(0.0), &mut world, &mut events);

    sim.damage_agent(&mut world, &mut events, pack.members[0], 1000.0, None);
    for &id in &pack.members[1..] {
        let member = sim.agent(id).unwrap();
        assert!(member.enraged);
        assert_eq!(member.damage, 18.0);
        assert_ne!(member.state(), AgentState::Fleeing);
    }

    // The successor dies too; the rest are already enraged
    sim.damage_agent(&mut world, &mut events, pack.members[1], 1000.0, None);
    for &id in &pack.members[2..] {
        assert_eq!(sim.agent(id).unwrap().damage, 18.0);
    }
    assert_eq!(sim.pack(pack.id).unwrap().leader, Some(pack.members[2]));
}

#[test]
fn test_leader_alerts_followers() {
    let mut world = MockWorld::new().with_player(1, Vec3::ground(100.0, 0.0), 1000.0);
    let mut events = EventLog::new();
    let (mut sim, pack) = spawn_pack(pack_config(5), &mut world, &mut events);

    // Out of aggression range: only the shot at the leader starts the fight
    sim.damage_agent(&mut world, &mut events, pack.members[0], 1.0, Some(PlayerId(1)));
    run(&mut sim, &mut world, &mut events, 2);

    assert_eq!(events.count("pack_alert"), 1);
    let alert = events
        .events()
        .iter()
        .find(|e| matches!(e, DomainEvent::PackAlert { .. }))
        .cloned()
        .unwrap();
    assert_eq!(
        alert,
        DomainEvent::PackAlert {
            pack: pack.id,
            leader: pack.members[0],
            leader_position: Vec3::ZERO,
            target: Some(PlayerId(1)),
        }
    );

    for &id in &pack.members[1..] {
        let member = sim.agent(id).unwrap();
        assert_eq!(member.target, Some(PlayerId(1)));
        assert_ne!(member.state(), AgentState::Idle);
    }
}

#[test]
fn test_followers_flank_on_both_sides() {
    let mut world = MockWorld::new().with_player(1, Vec3::ground(60.0, 0.0), 1000.0);
    let mut events = EventLog::new();
    let (mut sim, pack) = spawn_pack(pack_config(6), &mut world, &mut events);

    sim.damage_agent(&mut world, &mut events, pack.members[0], 1.0, Some(PlayerId(1)));
    run(&mut sim, &mut world, &mut events, 5);

    let leader = sim.agent(pack.members[0]).unwrap();
    let left = sim.agent(pack.members[1]).unwrap();
    let right = sim.agent(pack.members[2]).unwrap();
    assert_eq!(left.state(), AgentState::Chasing);
    assert_eq!(right.state(), AgentState::Chasing);

    // The leader runs straight at the target, followers fan out
    assert!(leader.position.z.abs() < 1e-3);
    assert!(left.position.z.abs() > 0.5);
    assert!(left.position.z * right.position.z < 0.0);
}

#[test]
fn test_dead_member_leaves_pack() {
    let mut world = MockWorld::new();
    let mut events = EventLog::new();
    let (mut sim, pack) = spawn_pack(pack_config(7), &mut world, &mut events);

    sim.damage_agent(&mut world, &mut events, pack.members[3], 1000.0, None);
    sim.tick(&mut world, &mut events, DT);

    let group = sim.pack(pack.id).unwrap();
    assert_eq!(group.members, pack.members[..3].to_vec());
    assert_eq!(group.leader, Some(pack.members[0]));
    assert_eq!(sim.agent(pack.members[3]).unwrap().pack, None);
}

/// Damage of every basic attack, keyed by attacker, in order
fn attacks(events: &[DomainEvent]) -> Vec<(AgentId, f32)> {
    events
        .iter()
        .filter_map(|e| match e {
            DomainEvent::AgentAttacked { agent, damage, .. } => Some((*agent, *damage)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_followers_hit_harder_while_leader_lives() {
    let mut world = MockWorld::new().with_player(1, Vec3::ground(2.0, 0.0), 100_000.0);
    let mut events = EventLog::new();
    let (mut sim, pack) = spawn_pack(pack_config(11).with_scatter_chance(0.0), &mut world, &mut events);
    let leader = pack.members[0];

    run(&mut sim, &mut world, &mut events, 4);
    let hits = attacks(events.events());
    assert_eq!(hits.len(), 4);
    for (agent, damage) in hits {
        // Base 12, followers +20%
        let expected = if agent == leader { 12.0 } else { 14.4 };
        assert!((damage - expected).abs() < 1e-4, "{} hit for {}", agent, damage);
    }

    // Survivors are enraged; the new leader loses the follower bonus
    sim.damage_agent(&mut world, &mut events, leader, 1000.0, None);
    let successor = pack.members[1];
    let seen = events.len();
    run(&mut sim, &mut world, &mut events, 10);
    let hits = attacks(&events.events()[seen..]);
    assert!(hits.iter().any(|(agent, _)| *agent == successor));
    for (agent, damage) in hits {
        let expected = if agent == successor { 18.0 } else { 21.6 };
        assert!((damage - expected).abs() < 1e-4, "{} hit for {}", agent, damage);
    }
}

const NIPPER: &str = r#"{ "species": [ {
    "id": "nipper", "display_name": "Nipper", "category": "swarm",
    "stats": { "health": 20, "move_speed": 10, "damage": 10, "attack_range": 3, "attack_cooldown": 1 },
    "spawn_weight": 1, "aggression_radius": 30,
    "swarm": { "bonus_per_ally": 0.1, "max_bonus": 0.25, "radius": 15 }
} ] }"#;

/// `count` nippers side by side next to one player; returns the first hit of each
fn swarm_hits(count: usize) -> Vec<f32> {
    let defs = DefinitionRegistry::load_from_str(NIPPER, "{}").unwrap();
    let mut sim = Simulation::new(Arc::new(defs), quiet_config(12)).unwrap();
    let mut world = MockWorld::new().with_player(1, Vec3::ground(2.0, 0.0), 100_000.0);
    let mut events = EventLog::new();
    for i in 0..count {
        sim.spawn_agent(&mut world, &mut events, "nipper", Vec3::ground(0.0, i as f32 * 0.1))
            .unwrap();
    }
    run(&mut sim, &mut world, &mut events, 4);
    attacks(events.events()).into_iter().map(|(_, damage)| damage).collect()
}

#[test]
fn test_swarm_bonus_grows_with_allies() {
    let lone = swarm_hits(1);
    assert_eq!(lone, vec![10.0]);

    // Two allies each: +20%
    let trio = swarm_hits(3);
    assert_eq!(trio.len(), 3);
    for damage in trio {
        assert!((damage - 12.0).abs() < 1e-4, "hit for {}", damage);
    }
}

#[test]
fn test_swarm_bonus_is_capped() {
    // Four allies would be +40%, the cap is +25%
    let hits = swarm_hits(5);
    assert_eq!(hits.len(), 5);
    for damage in hits {
        assert!((damage - 12.5).abs() < 1e-4, "hit for {}", damage);
    }
}
