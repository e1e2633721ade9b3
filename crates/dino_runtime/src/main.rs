//! Dino Arena
//!
//! Headless runner for the encounter engine. Plays one scripted match:
//! players wander a shrinking arena and shoot back, waves arrive on the
//! configured interval, a boss joins halfway through and a JSON summary is
//! printed at the end.
//!
//! Run with: cargo run -p dino_runtime -- [path/to/encounter.toml]
//!
//! Stop early with Ctrl+C; the match still ends cleanly and reports.

mod arena;
mod config;
mod report;

use arena::ArenaWorld;
use config::RuntimeConfig;
use dino_encounter::prelude::*;
use report::MatchReport;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = match RuntimeConfig::load(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config) {
        log::error!("Match failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: RuntimeConfig) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let definitions = match &config.definitions_dir {
        Some(dir) => DefinitionRegistry::load_from_dir(dir)?,
        None => DefinitionRegistry::load_builtin()?,
    };
    log::info!(
        "{} species and {} bosses available",
        definitions.species_count(),
        definitions.boss_count()
    );

    // Resolve the seed up front so the arena and the engine agree on it
    let seed = config.encounter.seed.unwrap_or_else(rand::random);
    let mut encounter = config.encounter.clone();
    encounter.seed = Some(seed);
    let dt = encounter.ai_tick_interval;
    let wave_interval = encounter.wave_interval;

    let mut sim = Simulation::new(Arc::new(definitions), encounter)?;
    let mut world = ArenaWorld::new(&config, seed);
    let mut report = MatchReport::new();

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            log::info!("Interrupted, ending match");
            running.store(false, Ordering::SeqCst);
        })?;
    }

    log::info!(
        "Match started: {} players, {:.0}s, seed {}",
        config.players,
        config.match_secs,
        seed
    );

    let mut pending_boss = config.boss.as_deref().filter(|b| !b.is_empty());
    let mut next_wave = 0.0;
    let pause = (config.time_scale > 0.0).then(|| Duration::from_secs_f32(dt / config.time_scale));

    while running.load(Ordering::SeqCst) {
        let elapsed = sim.now() as f32;
        if elapsed >= config.match_secs {
            log::info!("Match time is up");
            break;
        }
        if world.alive_players() == 0 {
            log::info!("Every player was eliminated");
            break;
        }

        world.advance(elapsed, dt);

        if elapsed >= next_wave {
            sim.spawn_wave(&mut world, &mut report);
            next_wave += wave_interval;
        }

        if let Some(boss) = pending_boss.filter(|_| elapsed >= config.boss_at_secs) {
            let position = world.boss_spawn_point();
            match sim.spawn_boss(&mut world, &mut report, boss, position) {
                Ok(id) => log::info!("Boss {} arrived as {}", boss, id),
                Err(e) => log::warn!("Boss '{}' could not spawn: {}", boss, e),
            }
            pending_boss = None;
        }

        let shots = world.player_attacks(sim.agents(), config.player_range);
        for (player, agent) in shots {
            sim.damage_agent(&mut world, &mut report, agent, config.player_dps * dt, Some(player));
        }

        sim.tick(&mut world, &mut report, dt);

        if let Some(pause) = pause {
            std::thread::sleep(pause);
        }
    }

    let remaining = sim.despawn_all(&mut report);
    log::info!(
        "Match over after {:.1}s: {} creatures left, {} players standing (zone radius {:.0})",
        sim.now(),
        remaining,
        world.alive_players(),
        world.zone_radius()
    );
    log::info!(
        "{} pack alerts, {} abilities used, {} boss phase changes",
        report.count("pack_alert"),
        report.count("ability_used"),
        report.count("boss_phase_changed")
    );
    for player in world.players().iter().filter(|p| p.is_alive()) {
        log::debug!("{} survived with {:.0} health at {}", player.id, player.health, player.position);
    }

    let summary = report.summary(sim.stats(), world.tally(), world.alive_players());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
