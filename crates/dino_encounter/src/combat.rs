//! Damage, death, healing and stuns applied to agents

use crate::agent::Agent;
use crate::boss;
use crate::context::StepContext;
use crate::error::{EncounterError, Result};
use crate::events::DomainEvent;
use crate::loot;
use crate::pack;
use crate::registry::AgentRegistry;
use dino_ai::AgentState;
use dino_combat::DamageInfo;
use dino_core::{AgentId, PlayerId};

/// Apply damage to an agent
///
/// Returns `true` iff the agent exists, was alive and `amount` is a positive
/// number.
pub(crate) fn damage_agent(
    id: AgentId,
    amount: f32,
    attacker: Option<PlayerId>,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) -> bool {
    let Some(mut agent) = registry.take(id) else {
        log::debug!("Damage for unknown {} ignored", id);
        return false;
    };
    let applied = apply_damage(&mut agent, amount, attacker, registry, ctx);
    registry.put_back(agent);
    applied
}

fn apply_damage(
    agent: &mut Agent,
    amount: f32,
    attacker: Option<PlayerId>,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) -> bool {
    if agent.is_dead() || !amount.is_finite() || amount <= 0.0 {
        return false;
    }

    let mut info = DamageInfo::new(amount);
    if let Some(player) = attacker {
        info = info.with_source(player);
    }
    let (dealt, lethal) = agent.health.apply_damage(&info);

    if let Some(player) = attacker {
        agent.threat.add(player, dealt);
    }
    if agent.status.reveal() {
        ctx.events.emit(DomainEvent::CamouflageChanged {
            agent: agent.id,
            camouflaged: false,
        });
    }
    ctx.events.emit(DomainEvent::AgentDamaged {
        agent: agent.id,
        amount: dealt,
        health: agent.health.current(),
        attacker,
    });

    if lethal {
        handle_death(agent, attacker, registry, ctx);
    } else if agent.is_boss() {
        boss::update_phase(agent, registry, ctx.config, ctx.events);
    }
    true
}

/// Everything that happens exactly once when an agent dies
///
/// The agent must be detached from the registry.
fn handle_death(
    agent: &mut Agent,
    killer: Option<PlayerId>,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) {
    agent.set_state(AgentState::Dead, ctx.now, ctx.events);
    agent.died_at = Some(ctx.now);
    agent.target = None;
    agent.wander_target = None;
    agent.flee_heading = None;
    agent.ambush_multiplier = None;
    agent.status.clear();

    ctx.events.emit(DomainEvent::AgentDied {
        agent: agent.id,
        species: agent.species.id.clone(),
        position: agent.position,
        killer,
    });
    log::debug!("{} ({}) died at {}", agent.id, agent.display_name(), agent.position);

    loot::drop_loot(agent, ctx);

    if let Some(boss) = &agent.boss {
        registry.remove_boss(agent.id);
        ctx.events.emit(DomainEvent::BossDied {
            agent: agent.id,
            boss: boss.id.clone(),
        });
        log::info!("{} ({}) was defeated", boss.display_name, agent.id);
    }

    if let Some(pack_id) = agent.pack.take() {
        let was_leader = std::mem::replace(&mut agent.is_leader, false);
        if registry.leave_pack(pack_id, agent.id) && was_leader {
            pack::on_leader_death(pack_id, registry, ctx);
        }
    }

    let grace = ctx.config.corpse_grace_secs as f64;
    registry.schedule_corpse(agent.id, ctx.now + grace);
}

/// Heal a live agent; returns the amount healed
///
/// Boss phases are unaffected by healing.
pub(crate) fn heal_agent(registry: &mut AgentRegistry, id: AgentId, amount: f32) -> Result<f32> {
    let agent = registry
        .agent_mut(id)
        .ok_or(EncounterError::UnknownAgent(id))?;
    Ok(agent.health.heal(amount))
}

/// Stun an agent for `duration` seconds
pub(crate) fn stun_agent(registry: &mut AgentRegistry, id: AgentId, duration: f32, now: f64) -> Result<()> {
    let agent = registry
        .agent_mut(id)
        .ok_or(EncounterError::UnknownAgent(id))?;
    if agent.is_alive() {
        agent.status.stun(now, duration);
        log::debug!("{} stunned for {:.1}s", id, duration);
    }
    Ok(())
}
