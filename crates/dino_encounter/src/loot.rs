//! Loot resolution on death

use crate::agent::Agent;
use crate::context::StepContext;
use crate::world::LootDrop;
use dino_defs::LootEntry;
use rand::Rng;

/// Loot table of an agent: the boss table when it has one, else the species'
pub fn loot_table(agent: &Agent) -> &[LootEntry] {
    match &agent.boss {
        Some(boss) if !boss.loot.is_empty() => &boss.loot,
        _ => &agent.species.loot,
    }
}

/// Roll every entry of the agent's loot table and request the drops
///
/// Returns the number of drops rolled (whether or not the world spawned them).
pub(crate) fn drop_loot(agent: &Agent, ctx: &mut StepContext<'_>) -> usize {
    let mut rolled = 0;
    for entry in loot_table(agent) {
        if ctx.rng.gen::<f32>() >= entry.chance {
            continue;
        }
        let count = if entry.max > entry.min {
            ctx.rng.gen_range(entry.min..=entry.max)
        } else {
            entry.min
        };
        if count == 0 {
            continue;
        }

        let drop = LootDrop {
            rarity: entry.rarity.clone(),
            count,
        };
        rolled += 1;
        if !ctx.world.spawn_loot_item(&entry.item, agent.position, &drop) {
            log::info!(
                "{} dropped {}x {} at {} (no loot provider)",
                agent.display_name(),
                count,
                entry.item,
                agent.position
            );
        }
    }
    rolled
}
