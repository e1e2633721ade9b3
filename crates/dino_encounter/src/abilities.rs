//! Ability selection and execution

use crate::agent::Agent;
use crate::context::StepContext;
use crate::events::DomainEvent;
use crate::world::PlayerEffect;
use dino_ai::{random_horizontal_direction, AgentState};
use dino_core::{PlayerId, Vec3};
use dino_defs::{AbilityDefinition, AbilityEffect, BehaviorCategory};

/// Effects a category tries while chasing, most preferred first
pub fn category_priority(category: BehaviorCategory) -> &'static [AbilityEffect] {
    use AbilityEffect::*;
    match category {
        BehaviorCategory::PackHunter => &[Pounce, Roar],
        BehaviorCategory::SoloPredator => &[Roar, TailSweep, GroundPound, Pounce],
        BehaviorCategory::AerialDiver => &[Pounce, Spit],
        BehaviorCategory::DefensiveCharger => &[Charge, TailSweep],
        BehaviorCategory::RangedSpitter => &[Spit],
        BehaviorCategory::AmbushPredator => &[Camouflage, Pounce],
        BehaviorCategory::Swarm => &[Pounce],
    }
}

/// True iff the agent owns the ability and it was never used or its cooldown elapsed
pub fn can_use(agent: &Agent, name: &str, now: f64) -> bool {
    agent
        .ability(name)
        .map_or(false, |ability| agent.cooldowns.can_use(name, ability.cooldown, now))
}

/// Use an ability if allowed
///
/// Returns `false` with no side effects when the ability is unknown or
/// disabled, still cooling down, or targeted without a valid target.
/// Otherwise the effect runs, the cooldown is stamped, the agent enters the
/// ability state and `AbilityUsed` is emitted.
pub(crate) fn try_use(agent: &mut Agent, name: &str, ctx: &mut StepContext<'_>) -> bool {
    let Some(ability) = agent.ability(name).cloned() else {
        return false;
    };
    if !ability.enabled || !agent.cooldowns.can_use(name, ability.cooldown, ctx.now) {
        return false;
    }
    let target = agent.target.filter(|&t| ctx.players.is_valid_target(t));
    if ability.effect.is_targeted() && target.is_none() {
        return false;
    }

    execute(agent, &ability, target, ctx);
    agent.cooldowns.stamp(name, ctx.now);
    agent.set_state(AgentState::UsingAbility, ctx.now, ctx.events);
    ctx.events.emit(DomainEvent::AbilityUsed {
        agent: agent.id,
        ability: ability.name.clone(),
        effect: ability.effect,
        target,
    });
    log::debug!("{} used {} ({})", agent.id, ability.name, ability.effect);
    true
}

/// Whether the ability would be picked right now
fn is_eligible(agent: &Agent, ability: &AbilityDefinition, ctx: &StepContext<'_>) -> bool {
    if !ability.enabled || !agent.cooldowns.can_use(&ability.name, ability.cooldown, ctx.now) {
        return false;
    }
    if ability.effect == AbilityEffect::Camouflage {
        return !agent.is_camouflaged();
    }
    let Some(target_position) = agent
        .target
        .filter(|&t| ctx.players.is_valid_target(t))
        .and_then(|t| ctx.players.position(t))
    else {
        return false;
    };
    ability.in_reach(agent.position.distance(target_position))
}

/// Try the abilities named in `names` in order; first success wins
fn try_first_eligible(agent: &mut Agent, names: &[String], ctx: &mut StepContext<'_>) -> bool {
    for name in names {
        let eligible = match agent.ability(name) {
            Some(ability) => is_eligible(agent, ability, ctx),
            None => false,
        };
        if eligible && try_use(agent, name, ctx) {
            return true;
        }
    }
    false
}

/// Ability names the agent owns with the given effect, in definition order
fn names_with_effect(agent: &Agent, effect: AbilityEffect) -> Vec<String> {
    agent
        .abilities()
        .filter(|a| a.effect == effect)
        .map(|a| a.name.clone())
        .collect()
}

/// Try every owned ability with `effect`
pub(crate) fn try_effect(agent: &mut Agent, effect: AbilityEffect, ctx: &mut StepContext<'_>) -> bool {
    let names = names_with_effect(agent, effect);
    try_first_eligible(agent, &names, ctx)
}

/// Chasing-state selection: the boss phase pattern first, then the category list
pub(crate) fn select_and_use(agent: &mut Agent, boss_phase: Option<u32>, ctx: &mut StepContext<'_>) -> bool {
    let mut names: Vec<String> = Vec::new();
    if let (Some(boss), Some(phase)) = (&agent.boss, boss_phase) {
        if let Some(phase) = boss.phase(phase) {
            names.extend(phase.attack_pattern.iter().cloned());
        }
    }
    for &effect in category_priority(agent.species.category) {
        names.extend(names_with_effect(agent, effect));
    }
    try_first_eligible(agent, &names, ctx)
}

fn execute(
    agent: &mut Agent,
    ability: &AbilityDefinition,
    target: Option<PlayerId>,
    ctx: &mut StepContext<'_>,
) {
    let magnitude = ability.magnitude * agent.damage_scale();
    let target = target.and_then(|t| ctx.players.position(t).map(|p| (t, p)));

    match ability.effect {
        AbilityEffect::Roar => {
            for player in ctx.players.within(agent.position, ability.radius) {
                if ability.stun_duration > 0.0 {
                    ctx.apply_effect(
                        player.id,
                        PlayerEffect::Stun {
                            duration: ability.stun_duration,
                        },
                    );
                }
            }
        }
        AbilityEffect::Charge => {
            let Some((player, position)) = target else { return };
            let direction = (position - agent.position).horizontal().normalize_or_zero();
            let dash = (agent.position.distance(position) - agent.attack_range() * 0.5)
                .clamp(0.0, ability.range);
            let goal = agent.position + direction * dash;
            relocate(agent, goal, dash, ctx);
            ctx.damage_player(player, magnitude);
            if ability.knockback > 0.0 {
                ctx.apply_effect(
                    player,
                    PlayerEffect::Knockback {
                        direction,
                        strength: ability.knockback,
                    },
                );
            }
        }
        AbilityEffect::Pounce => {
            let Some((player, position)) = target else { return };
            let direction = (position - agent.position).horizontal().normalize_or_zero();
            let landing = position - direction * (agent.attack_range() * 0.5);
            let leap = agent.position.distance(landing).min(ability.range);
            relocate(agent, landing, leap, ctx);
            ctx.damage_player(player, magnitude);
        }
        AbilityEffect::Spit => {
            let Some((player, _)) = target else { return };
            ctx.damage_player(player, magnitude);
            if ability.blind_duration > 0.0 {
                ctx.apply_effect(
                    player,
                    PlayerEffect::Blind {
                        duration: ability.blind_duration,
                    },
                );
            }
            ctx.dots.apply(
                player,
                ability.dot_damage * agent.damage_scale(),
                ability.dot_duration,
            );
        }
        AbilityEffect::TailSweep => {
            for player in ctx.players.within(agent.position, ability.radius) {
                let falloff = falloff(agent.position.distance(player.position), ability.radius);
                ctx.damage_player(player.id, magnitude * falloff);
                if ability.knockback > 0.0 {
                    let mut direction = (player.position - agent.position)
                        .horizontal()
                        .normalize_or_zero();
                    if direction == Vec3::ZERO {
                        direction = random_horizontal_direction(&mut *ctx.rng);
                    }
                    ctx.apply_effect(
                        player.id,
                        PlayerEffect::Knockback {
                            direction,
                            strength: ability.knockback * falloff,
                        },
                    );
                }
            }
        }
        AbilityEffect::GroundPound => {
            for player in ctx.players.within(agent.position, ability.radius) {
                let falloff = falloff(agent.position.distance(player.position), ability.radius);
                ctx.damage_player(player.id, magnitude * falloff);
                if ability.stun_duration > 0.0 && falloff > 0.0 {
                    ctx.apply_effect(
                        player.id,
                        PlayerEffect::Stun {
                            duration: ability.stun_duration * falloff,
                        },
                    );
                }
            }
        }
        AbilityEffect::Camouflage => {
            agent.status.camouflage(ctx.now, ability.duration);
            agent.ambush_multiplier = Some(ability.multiplier);
            ctx.events.emit(DomainEvent::CamouflageChanged {
                agent: agent.id,
                camouflaged: true,
            });
        }
    }
}

/// Linear falloff `1 - d / radius`, clamped to `[0, 1]`
fn falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

/// Leap toward `goal`; an unreachable goal leaves the agent in place
fn relocate(agent: &mut Agent, goal: Vec3, max_step: f32, ctx: &mut StepContext<'_>) {
    if !ctx.world.can_reach(agent.position, goal) {
        log::debug!("{} cannot reach {}, staying put", agent.id, goal);
        return;
    }
    match ctx.move_agent(agent.id, agent.position, goal, max_step) {
        Ok(position) => agent.position = position,
        Err(e) => log::warn!("{} ability movement rejected: {}", agent.id, e),
    }
}
