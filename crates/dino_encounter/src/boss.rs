//! Boss spawning and health-driven phase progression

use crate::agent::Agent;
use crate::config::EncounterConfig;
use crate::context::StepContext;
use crate::error::{EncounterError, Result};
use crate::events::{DomainEvent, EventSink};
use crate::registry::{AgentRegistry, BossEncounter};
use crate::spawn;
use dino_core::{AgentId, Vec3};
use dino_defs::{BossDefinition, BossPhase};

/// Spawn a boss and its escort at `position`
///
/// Every definition involved is resolved before anything is created, so an
/// unknown id leaves the registry untouched.
pub(crate) fn spawn_boss(
    boss_id: &str,
    position: Vec3,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) -> Result<AgentId> {
    let boss = ctx.definitions.require_boss(boss_id)?.clone();
    let species = ctx.definitions.require_species(&boss.base_species)?.clone();
    let escort = match &boss.escort {
        Some(escort) if escort.count > 0 => Some((
            ctx.definitions.require_species(&escort.species)?.clone(),
            escort.count,
        )),
        _ => None,
    };
    if !position.is_finite() {
        return Err(EncounterError::NoValidSpawnPosition);
    }

    let id = registry.next_agent_id();
    let mut agent = Agent::new_boss(id, boss.clone(), species, position, ctx.now);
    if let Some(first) = boss.phase(1) {
        apply_phase_bonuses(&mut agent, first);
    }
    registry.insert(agent);
    registry.insert_boss(BossEncounter {
        agent: id,
        boss_id: boss.id.clone(),
        phase: 1,
        spawned_at: ctx.now,
    });

    ctx.events.emit(DomainEvent::AgentSpawned {
        agent: id,
        species: boss.base_species.clone(),
        position,
        pack: None,
        boss: true,
    });
    ctx.events.emit(DomainEvent::BossSpawned {
        agent: id,
        boss: boss.id.clone(),
        position,
        tint: boss.tint,
    });
    log::info!("{} ({}) spawned at {}", boss.display_name, id, position);

    if let Some((escort_species, count)) = escort {
        let jitter = ctx.config.spawn_jitter;
        let escorts = spawn::spawn_group(&escort_species, count, position, jitter, registry, ctx);
        log::info!("{} escorted by {} {}", id, escorts.len(), escort_species.id);
    }

    Ok(id)
}

/// Advance a damaged boss through every phase its health fraction has reached
///
/// Phases never go back, so healing does not undo a phase. Returns the
/// number of phases entered.
pub(crate) fn update_phase(
    agent: &mut Agent,
    registry: &mut AgentRegistry,
    config: &EncounterConfig,
    events: &mut dyn EventSink,
) -> u32 {
    let Some(boss) = agent.boss.clone() else {
        return 0;
    };
    let Some(encounter) = registry.boss_mut(agent.id) else {
        return 0;
    };

    let reached = boss.phase_for_fraction(agent.health_fraction());
    let mut entered = 0;
    while encounter.phase < reached {
        encounter.phase += 1;
        enter_phase(agent, &boss, encounter.phase, config, events);
        entered += 1;
    }
    entered
}

fn enter_phase(
    agent: &mut Agent,
    boss: &BossDefinition,
    number: u32,
    config: &EncounterConfig,
    events: &mut dyn EventSink,
) {
    if let Some(phase) = boss.phase(number) {
        apply_phase_bonuses(agent, phase);
    }
    let enraged = number >= config.boss_enrage_phase;
    if enraged {
        agent.enraged = true;
    }
    events.emit(DomainEvent::BossPhaseChanged {
        agent: agent.id,
        phase: number,
        enraged,
    });
    log::info!(
        "{} entered phase {}/{}{}",
        boss.display_name,
        number,
        boss.phase_count(),
        if enraged { " (enraged)" } else { "" }
    );
}

/// Phase bonuses stack multiplicatively on top of the current stats
fn apply_phase_bonuses(agent: &mut Agent, phase: &BossPhase) {
    agent.speed *= 1.0 + phase.speed_bonus;
    agent.damage *= 1.0 + phase.damage_bonus;
    agent.aggression_radius *= 1.0 + phase.aggression_bonus;
}
