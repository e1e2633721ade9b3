//! Wave director and group spawning

use crate::agent::Agent;
use crate::context::StepContext;
use crate::error::{EncounterError, Result};
use crate::events::DomainEvent;
use crate::registry::AgentRegistry;
use dino_ai::random_horizontal_direction;
use dino_core::consts::TAU;
use dino_core::{AgentId, Vec3};
use dino_defs::SpeciesDefinition;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Fill the active agent budget for the current severity level
///
/// Returns the number of agents spawned. Running out of spawn positions
/// aborts the wave with a warning instead of failing the caller.
pub(crate) fn spawn_wave(registry: &mut AgentRegistry, ctx: &mut StepContext<'_>) -> usize {
    let level = ctx.world.current_severity_level();
    let cap = (ctx.config.max_active as f32 * ctx.config.scaling_for(level)).floor() as usize;
    let active = registry.active_count();
    if active >= cap {
        log::debug!("Wave skipped: {} active, cap {}", active, cap);
        return 0;
    }

    let total_weight = ctx.definitions.total_spawn_weight();
    if total_weight <= 0.0 {
        log::warn!("Wave skipped: no species has a spawn weight");
        return 0;
    }

    let mut budget = cap - active;
    let mut spawned = 0;
    while budget > 0 {
        let roll = ctx.rng.gen_range(0.0..total_weight);
        let Some(species) = ctx.definitions.species_for_roll(roll).cloned() else {
            break;
        };
        let size = ctx
            .rng
            .gen_range(species.pack_size.min..=species.pack_size.max.max(species.pack_size.min))
            .clamp(1, budget as u32);

        let center = match pick_spawn_point(ctx) {
            Ok(point) => point,
            Err(e) => {
                log::warn!("Wave aborted after {} spawns: {}", spawned, e);
                break;
            }
        };

        let jitter = ctx.config.spawn_jitter;
        let group = spawn_group(&species, size, center, jitter, registry, ctx);
        if group.is_empty() {
            break;
        }
        spawned += group.len();
        budget = budget.saturating_sub(group.len());
    }

    log::info!(
        "Wave spawned {} agents (severity {}, cap {}, active {})",
        spawned,
        level,
        cap,
        registry.active_count()
    );
    spawned
}

/// Spawn `count` agents of one species around `center`
///
/// Groups of two or more form a pack led by the first member.
pub(crate) fn spawn_group(
    species: &Arc<SpeciesDefinition>,
    count: u32,
    center: Vec3,
    jitter: f32,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) -> Vec<AgentId> {
    let mut ids = Vec::with_capacity(count as usize);
    let mut pack = None;

    for _ in 0..count {
        let offset = if jitter > 0.0 {
            random_horizontal_direction(&mut *ctx.rng) * (ctx.rng.gen::<f32>() * jitter)
        } else {
            Vec3::ZERO
        };
        let position = center + offset;
        let id = registry.next_agent_id();
        registry.insert(Agent::new(id, species.clone(), position, ctx.now));

        if count >= 2 {
            match pack {
                None => pack = Some(registry.create_pack(&species.id, id)),
                Some(existing) => {
                    registry.join_pack(existing, id);
                }
            }
        }

        ctx.events.emit(DomainEvent::AgentSpawned {
            agent: id,
            species: species.id.clone(),
            position,
            pack,
            boss: false,
        });
        ids.push(id);
    }

    log::debug!("Spawned {} x{} at {}", species.id, ids.len(), center);
    ids
}

/// Spawn one agent of a species at an exact position
pub(crate) fn spawn_agent(
    species_id: &str,
    position: Vec3,
    registry: &mut AgentRegistry,
    ctx: &mut StepContext<'_>,
) -> Result<AgentId> {
    let species = ctx.definitions.require_species(species_id)?.clone();
    if !position.is_finite() {
        return Err(EncounterError::NoValidSpawnPosition);
    }
    spawn_group(&species, 1, position, 0.0, registry, ctx)
        .first()
        .copied()
        .ok_or(EncounterError::NoValidSpawnPosition)
}

/// Choose a spawn point
///
/// Preference order: designated points inside the safe zone, any designated
/// point, then the fallback ring (its safe points when it has any).
fn pick_spawn_point(ctx: &mut StepContext<'_>) -> Result<Vec3> {
    let known: Vec<Vec3> = ctx
        .world
        .encounter_spawn_points()
        .into_iter()
        .filter(|p| p.is_finite())
        .collect();
    let safe: Vec<Vec3> = known
        .iter()
        .copied()
        .filter(|&p| ctx.world.is_inside_safe_zone(p))
        .collect();

    let pool = if !safe.is_empty() {
        safe
    } else if !known.is_empty() {
        known
    } else {
        let ring = fallback_ring(ctx.config.fallback_ring_points, ctx.config.fallback_ring_radius);
        let safe_ring: Vec<Vec3> = ring
            .iter()
            .copied()
            .filter(|&p| ctx.world.is_inside_safe_zone(p))
            .collect();
        if safe_ring.is_empty() {
            ring
        } else {
            safe_ring
        }
    };

    pool.choose(&mut *ctx.rng)
        .copied()
        .ok_or(EncounterError::NoValidSpawnPosition)
}

/// Evenly spaced points on a ground circle around the origin
pub fn fallback_ring(points: u32, radius: f32) -> Vec<Vec3> {
    (0..points)
        .map(|i| {
            let angle = TAU * i as f32 / points as f32;
            Vec3::ground(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}
