//! Pack coordination: alerts, leader succession and cohesion

use crate::agent::Agent;
use crate::brain;
use crate::context::StepContext;
use crate::events::DomainEvent;
use crate::registry::AgentRegistry;
use dino_ai::AgentState;
use dino_core::{AgentId, PackId};
use dino_defs::species::DEFAULT_SCATTER_CHANCE;
use rand::Rng;

/// Pull followers in call range onto the leader's target
///
/// Dead, fleeing and already alerted followers are left alone. Returns the
/// number of followers alerted.
pub(crate) fn alert_pack(
    leader: &Agent,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) -> usize {
    let (Some(pack_id), Some(target)) = (leader.pack, leader.target) else {
        return 0;
    };
    let Some(group) = registry.pack(pack_id) else {
        return 0;
    };
    let members = group.members.clone();
    let call_range = leader
        .species
        .pack
        .as_ref()
        .map_or(ctx.config.pack_cohesion_radius, |p| p.call_range);

    let mut alerted = 0;
    for id in members {
        if id == leader.id {
            continue;
        }
        let Some(member) = registry.agent_mut(id) else {
            continue;
        };
        if matches!(
            member.state(),
            AgentState::Dead | AgentState::Fleeing | AgentState::Alert
        ) {
            continue;
        }
        if member.position.distance(leader.position) > call_range {
            continue;
        }
        member.target = Some(target);
        member.wander_target = None;
        member.set_state(AgentState::Alert, ctx.now, ctx.events);
        alerted += 1;
    }

    ctx.events.emit(DomainEvent::PackAlert {
        pack: pack_id,
        leader: leader.id,
        leader_position: leader.position,
        target: Some(target),
    });
    log::debug!("{} alerted {} followers of {}", leader.id, alerted, pack_id);
    alerted
}

/// React to the death of a pack's leader
///
/// Must run after the dead leader left the pack. Every survivor rolls against
/// the scatter probability: scatterers flee, the rest are enraged once. The
/// first survivor becomes the new leader.
pub(crate) fn on_leader_death(
    pack_id: PackId,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) {
    let Some(group) = registry.pack(pack_id) else {
        return;
    };
    let survivors: Vec<AgentId> = group
        .members
        .iter()
        .copied()
        .filter(|&id| registry.agent(id).map_or(false, Agent::is_alive))
        .collect();
    let scatter_chance = ctx.config.scatter_chance_override.unwrap_or_else(|| {
        ctx.definitions
            .species(&group.species)
            .map_or(DEFAULT_SCATTER_CHANCE, |s| s.scatter_chance())
    });

    let mut scattered = 0;
    for &id in &survivors {
        let Some(member) = registry.agent_mut(id) else {
            continue;
        };
        if ctx.rng.gen::<f32>() < scatter_chance {
            brain::enter_flee(member, ctx.now, ctx.events);
            scattered += 1;
        } else if !member.enraged {
            member.enraged = true;
            member.damage *= ctx.config.enrage_damage_multiplier;
        }
    }

    if let Some(&successor) = survivors.first() {
        registry.promote(pack_id, successor);
        log::info!(
            "{} lost its leader: {} scattered, {} enraged, {} now leads",
            pack_id,
            scattered,
            survivors.len() - scattered,
            successor
        );
    }
}

/// Per-tick pack maintenance
///
/// Drops dead or despawned members (deleting packs that empty out), repairs
/// a missing leader and sends idle followers that strayed beyond the
/// cohesion radius back toward their leader.
pub(crate) fn pack_pass(registry: &mut AgentRegistry, ctx: &mut StepContext<'_>) {
    for pack_id in registry.pack_ids() {
        let Some(group) = registry.pack(pack_id) else {
            continue;
        };
        let gone: Vec<AgentId> = group
            .members
            .iter()
            .copied()
            .filter(|&id| registry.agent(id).map_or(true, Agent::is_dead))
            .collect();
        for id in gone {
            registry.leave_pack(pack_id, id);
        }

        let Some(group) = registry.pack(pack_id) else {
            continue;
        };
        let leader = match group.leader {
            Some(leader) => leader,
            None => {
                let Some(&first) = group.members.first() else {
                    continue;
                };
                registry.promote(pack_id, first);
                log::debug!("{} promoted {} to leader", pack_id, first);
                first
            }
        };
        regroup(pack_id, leader, registry, ctx);
    }
}

fn regroup(pack_id: PackId, leader: AgentId, registry: &mut AgentRegistry, ctx: &StepContext<'_>) {
    let Some(leader_position) = registry.agent(leader).map(|a| a.position) else {
        return;
    };
    let Some(group) = registry.pack(pack_id) else {
        return;
    };
    let followers: Vec<AgentId> = group
        .members
        .iter()
        .copied()
        .filter(|&id| id != leader)
        .collect();
    let cohesion = ctx.config.pack_cohesion_radius;
    for id in followers {
        let Some(member) = registry.agent_mut(id) else {
            continue;
        };
        if member.state() == AgentState::Idle && member.position.distance(leader_position) > cohesion {
            member.wander_target = Some(leader_position);
        }
    }
}
