//! Per-agent decision step
//!
//! One call to [`step_agent`] advances a single agent by one AI tick. The
//! agent is detached from the registry while it is stepped, so the registry
//! here only ever holds the *other* agents.

use crate::abilities;
use crate::agent::Agent;
use crate::context::StepContext;
use crate::error::Result;
use crate::events::{DomainEvent, EventSink};
use crate::pack;
use crate::registry::AgentRegistry;
use dino_ai::{
    find_best_target, flank_position, flee_direction, flee_point, random_horizontal_direction,
    wander_point, AgentState,
};
use dino_core::{PlayerId, Vec3};
use dino_defs::{AbilityEffect, BehaviorCategory};
use rand::Rng;

/// Wandering agents stop once this close to their wander point
const ARRIVAL_DISTANCE: f32 = 1.0;

/// Advance one live agent by one tick
pub(crate) fn step_agent(
    agent: &mut Agent,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) -> Result<()> {
    if agent.is_dead() {
        return Ok(());
    }

    if agent.status.expire_camouflage(ctx.now) {
        ctx.events.emit(DomainEvent::CamouflageChanged {
            agent: agent.id,
            camouflaged: false,
        });
    }

    // Low health overrides everything, stunned or not
    if agent.should_flee() && agent.state() != AgentState::Fleeing {
        enter_flee(agent, ctx.now, ctx.events);
    }

    if agent.status.check_stun(ctx.now) {
        return Ok(());
    }

    match agent.state() {
        AgentState::Idle => idle(agent, ctx),
        AgentState::Alert => alert(agent, registry, ctx),
        AgentState::Hunting => {
            hunting(agent, ctx);
            Ok(())
        }
        AgentState::Chasing => chasing(agent, registry, ctx),
        AgentState::Attacking => {
            attacking(agent, registry, ctx);
            Ok(())
        }
        AgentState::UsingAbility => {
            if agent.time_in_state(ctx.now) >= ctx.config.ability_state_duration as f64 {
                agent.set_state(AgentState::Chasing, ctx.now, ctx.events);
            }
            Ok(())
        }
        AgentState::Fleeing => fleeing(agent, ctx),
        AgentState::Dead => Ok(()),
    }
}

/// Switch to fleeing, dropping any wander or flee heading
pub(crate) fn enter_flee(agent: &mut Agent, now: f64, events: &mut dyn EventSink) {
    agent.wander_target = None;
    agent.flee_heading = None;
    agent.set_state(AgentState::Fleeing, now, events);
}

fn idle(agent: &mut Agent, ctx: &mut StepContext<'_>) -> Result<()> {
    if let Some(attacker) = highest_valid_attacker(agent, ctx) {
        engage(agent, attacker, ctx);
        return Ok(());
    }

    let interval = ctx.config.idle_search_interval as f64;
    let due = agent.last_search.map_or(true, |last| ctx.now - last >= interval);
    if due {
        agent.last_search = Some(ctx.now);
        if !agent.species.passive {
            if let Some(player) = search(agent, ctx) {
                engage(agent, player, ctx);
                return Ok(());
            }
        }
        if agent.wander_target.is_none() && ctx.rng.gen::<f32>() < ctx.config.wander_chance {
            let point = wander_point(&mut *ctx.rng, agent.home, ctx.config.wander_radius);
            if ctx.world.can_reach(agent.position, point) {
                agent.wander_target = Some(point);
            }
        }
    }

    if let Some(point) = agent.wander_target {
        step_toward(agent, point, ctx)?;
        if agent.position.distance(point) <= ARRIVAL_DISTANCE {
            agent.wander_target = None;
        }
    }
    Ok(())
}

fn alert(agent: &mut Agent, registry: &mut AgentRegistry, ctx: &mut StepContext<'_>) -> Result<()> {
    let mut target = agent.target.filter(|&t| ctx.players.is_valid_target(t));
    if target.is_none() {
        target = highest_valid_attacker(agent, ctx);
    }
    if target.is_none() {
        target = search(agent, ctx);
    }
    let Some(target) = target else {
        agent.target = None;
        agent.set_state(AgentState::Hunting, ctx.now, ctx.events);
        return Ok(());
    };
    agent.target = Some(target);

    if agent.is_leader {
        pack::alert_pack(agent, registry, ctx);
    }

    let opened = match agent.species.category {
        BehaviorCategory::AmbushPredator => {
            abilities::try_effect(agent, AbilityEffect::Camouflage, ctx)
        }
        BehaviorCategory::RangedSpitter => abilities::try_effect(agent, AbilityEffect::Spit, ctx),
        _ => false,
    };
    if opened {
        return Ok(());
    }

    let next = match ctx.players.position(target) {
        Some(position) if agent.position.distance(position) <= agent.attack_range() => {
            AgentState::Attacking
        }
        _ => AgentState::Chasing,
    };
    agent.set_state(next, ctx.now, ctx.events);
    Ok(())
}

fn hunting(agent: &mut Agent, ctx: &mut StepContext<'_>) {
    agent.target = None;
    let mut found = highest_valid_attacker(agent, ctx);
    if found.is_none() {
        found = search(agent, ctx);
    }
    if let Some(player) = found {
        engage(agent, player, ctx);
        return;
    }
    if agent.time_in_state(ctx.now) >= ctx.config.hunting_timeout as f64 {
        agent.set_state(AgentState::Idle, ctx.now, ctx.events);
    }
}

fn chasing(agent: &mut Agent, registry: &mut AgentRegistry, ctx: &mut StepContext<'_>) -> Result<()> {
    let Some((_, target_position)) = valid_target(agent, ctx) else {
        lose_target(agent, ctx);
        return Ok(());
    };

    let distance = agent.position.distance(target_position);
    if distance > agent.aggression_radius * ctx.config.deaggro_multiplier {
        log::debug!("{} gave up the chase at {:.1}", agent.id, distance);
        agent.target = None;
        agent.set_state(AgentState::Idle, ctx.now, ctx.events);
        return Ok(());
    }

    let phase = registry.boss(agent.id).map(|b| b.phase);
    if abilities::select_and_use(agent, phase, ctx) {
        return Ok(());
    }

    if distance <= agent.attack_range() {
        agent.set_state(AgentState::Attacking, ctx.now, ctx.events);
        return Ok(());
    }

    let goal = chase_goal(agent, registry, target_position, ctx);
    step_toward(agent, goal, ctx)
}

/// Flank point for followers of a flanking pack, the target otherwise
///
/// Followers close in directly once they are nearer the target than the
/// flank distance.
fn chase_goal(
    agent: &Agent,
    registry: &AgentRegistry,
    target_position: Vec3,
    ctx: &StepContext<'_>,
) -> Vec3 {
    let flanking = agent.species.pack.as_ref().map_or(false, |p| p.flanking);
    if !flanking || agent.is_leader {
        return target_position;
    }
    if agent.position.distance(target_position) <= ctx.config.flank_distance {
        return target_position;
    }
    let Some(group) = agent.pack.and_then(|id| registry.pack(id)) else {
        return target_position;
    };
    let leader = group
        .leader
        .and_then(|id| registry.agent(id))
        .filter(|leader| leader.is_alive());
    match (leader, group.member_index(agent.id)) {
        (Some(leader), Some(index)) => flank_position(
            index,
            leader.position,
            target_position,
            ctx.config.flank_angle(),
            ctx.config.flank_distance,
        ),
        _ => target_position,
    }
}

fn attacking(agent: &mut Agent, registry: &AgentRegistry, ctx: &mut StepContext<'_>) {
    let Some((target, target_position)) = valid_target(agent, ctx) else {
        lose_target(agent, ctx);
        return;
    };

    let reach = agent.attack_range() * ctx.config.attack_exit_multiplier;
    if agent.position.distance(target_position) > reach {
        agent.set_state(AgentState::Chasing, ctx.now, ctx.events);
        return;
    }
    if !agent.attack_ready(ctx.now) {
        return;
    }

    let damage = basic_attack_damage(agent, registry);
    ctx.damage_player(target, damage);
    agent
        .threat
        .add(target, damage * ctx.config.threat_from_attack_fraction);
    agent.last_attack = Some(ctx.now);
    ctx.events.emit(DomainEvent::AgentAttacked {
        agent: agent.id,
        target,
        damage,
    });
    if agent.status.reveal() {
        ctx.events.emit(DomainEvent::CamouflageChanged {
            agent: agent.id,
            camouflaged: false,
        });
    }
}

/// Basic attack damage with leader, swarm and ambush bonuses; consumes the ambush bonus
fn basic_attack_damage(agent: &mut Agent, registry: &AgentRegistry) -> f32 {
    let mut damage = agent.damage;

    if let Some(behavior) = &agent.species.pack {
        if leader_alive(agent, registry) {
            damage *= 1.0 + behavior.leader_damage_bonus;
        }
    }

    if let Some(swarm) = &agent.species.swarm {
        let allies = registry
            .agents_near(agent.position, swarm.radius)
            .into_iter()
            .filter(|&id| id != agent.id)
            .filter_map(|id| registry.agent(id))
            .filter(|other| other.is_alive() && other.species.id == agent.species.id)
            .count();
        damage *= swarm.multiplier(allies);
    }

    if let Some(multiplier) = agent.ambush_multiplier.take() {
        damage *= multiplier;
    }
    damage
}

/// Follower whose pack leader is still alive
fn leader_alive(agent: &Agent, registry: &AgentRegistry) -> bool {
    if agent.is_leader {
        return false;
    }
    agent
        .pack
        .and_then(|id| registry.pack(id))
        .and_then(|group| group.leader)
        .and_then(|leader| registry.agent(leader))
        .map_or(false, Agent::is_alive)
}

fn fleeing(agent: &mut Agent, ctx: &mut StepContext<'_>) -> Result<()> {
    if agent.time_in_state(ctx.now) >= ctx.config.flee_duration as f64 {
        agent.threat.clear();
        agent.target = None;
        agent.flee_heading = None;
        agent.set_state(AgentState::Idle, ctx.now, ctx.events);
        return Ok(());
    }

    let attackers: Vec<Vec3> = agent
        .threat
        .attackers()
        .filter_map(|player| ctx.players.position(player))
        .collect();
    let direction = match flee_direction(agent.position, attackers) {
        Some(direction) => direction,
        None => match agent.flee_heading {
            Some(heading) => heading,
            None => random_horizontal_direction(&mut *ctx.rng),
        },
    };
    agent.flee_heading = Some(direction);

    let goal = flee_point(agent.position, direction, ctx.config.flee_distance);
    step_toward(agent, goal, ctx)
}

/// Target the player and raise the alert
fn engage(agent: &mut Agent, player: PlayerId, ctx: &mut StepContext<'_>) {
    agent.target = Some(player);
    agent.wander_target = None;
    agent.set_state(AgentState::Alert, ctx.now, ctx.events);
}

fn lose_target(agent: &mut Agent, ctx: &mut StepContext<'_>) {
    log::debug!("{} lost its target", agent.id);
    agent.target = None;
    agent.set_state(AgentState::Hunting, ctx.now, ctx.events);
}

fn valid_target(agent: &Agent, ctx: &StepContext<'_>) -> Option<(PlayerId, Vec3)> {
    let target = agent.target.filter(|&t| ctx.players.is_valid_target(t))?;
    ctx.players.position(target).map(|position| (target, position))
}

fn highest_valid_attacker(agent: &Agent, ctx: &StepContext<'_>) -> Option<PlayerId> {
    agent
        .threat
        .highest_where(|player| ctx.players.is_valid_target(player))
        .map(|(player, _)| player)
}

fn search(agent: &Agent, ctx: &StepContext<'_>) -> Option<PlayerId> {
    let radius = agent.aggression_radius;
    let candidates = ctx.players.candidates(agent.position, radius, &agent.threat);
    find_best_target(agent.position, radius, candidates).map(|(player, _)| player)
}

/// Move at current speed toward `goal`
fn step_toward(agent: &mut Agent, goal: Vec3, ctx: &mut StepContext<'_>) -> Result<()> {
    let max_step = agent.speed * ctx.dt;
    agent.position = ctx.move_agent(agent.id, agent.position, goal, max_step)?;
    Ok(())
}
