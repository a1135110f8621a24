//! Critterscript headless runner.
//!
//! Loads the configuration and a scene, then simulates a fixed number of
//! ticks, logging entity positions and animation clips as it goes. There is no
//! window; everything observable goes through the log.

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use critterscript::components::animation::AnimationPlayer;
use critterscript::components::mapposition::MapPosition;
use critterscript::components::script::Script;
use critterscript::game::{setup_world, spawn_scene, update_schedule};
use critterscript::resources::gameconfig::GameConfig;
use critterscript::resources::input::{Direction, InputDriver};
use critterscript::resources::scene::SceneDescription;
use critterscript::resources::viewport::Viewport;
use critterscript::systems::time::update_world_time;

/// Seconds between direction changes with `--random-input`.
const RANDOM_INPUT_PERIOD: f32 = 1.0;

/// Critterscript: scripted entity movement and animation, headless.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INI configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON scene description. Without it, one elk and one player are spawned.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Number of ticks to simulate (overrides the config).
    #[arg(long)]
    ticks: Option<u64>,

    /// Simulated frames per second (overrides the config).
    #[arg(long)]
    fps: Option<u32>,

    /// Directions held for the whole run, e.g. `left,up`.
    #[arg(long, value_delimiter = ',', value_name = "DIRS")]
    hold: Vec<Direction>,

    /// Pick a new random direction combination every second.
    #[arg(long, conflicts_with = "hold")]
    random_input: bool,

    /// Seed for `--random-input`.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    info!("Hello, world! This is Critterscript!");

    let mut config = match cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        info!("{}; using defaults", e);
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }
    if let Some(fps) = cli.fps {
        config.fps = fps.max(1);
    }

    let scene = match cli.scene {
        Some(path) => match SceneDescription::load_from_file(&path) {
            Ok(scene) => scene,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SceneDescription::default(),
    };

    let driver = if cli.random_input {
        InputDriver::random(cli.seed, RANDOM_INPUT_PERIOD)
    } else {
        InputDriver::fixed(cli.hold)
    };
    if driver.is_random() {
        info!("random input, seed {}", cli.seed);
    } else {
        info!("holding {:?}", driver.held);
    }

    let mut world = setup_world(&config, Some(driver));
    spawn_scene(&mut world, &scene);
    let mut update = update_schedule();

    let dt = config.tick_delta();
    for tick in 1..=config.ticks {
        update_world_time(&mut world, dt);
        update.run(&mut world);

        if config.log_every > 0 && tick % config.log_every == 0 {
            log_entities(&mut world, tick);
        }
    }
    log_entities(&mut world, config.ticks);
    info!("simulated {} ticks at {} fps", config.ticks, config.fps);
}

fn log_entities(world: &mut World, tick: u64) {
    let mut query = world.query::<(Entity, &Script, &MapPosition, Option<&AnimationPlayer>)>();
    for (entity, script, position, player) in query.iter(world) {
        let clips = player
            .map(|p| p.playing_clips().join(","))
            .filter(|clips| !clips.is_empty())
            .unwrap_or_else(|| "-".to_string());
        info!(
            "tick {:>5} {:?} '{}' at ({:.1}, {:.1}) clips {}{}",
            tick,
            entity,
            script.name,
            position.pos.x,
            position.pos.y,
            clips,
            if script.enabled { "" } else { " [disabled]" }
        );
    }
    if let Some(viewport) = world.get_resource::<Viewport>() {
        info!(
            "tick {:>5} viewport at ({:.1}, {:.1})",
            tick, viewport.position.x, viewport.position.y
        );
    }
}
