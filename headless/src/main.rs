use anyhow::{Context, Result};
use clap::Parser;
use game::{
    FileHighScoreStore, GameConfig, GameEvent, GameState, HighScoreStore, InputEvent,
    InputState, MemoryHighScoreStore, MovementKeys, ResourceLoader, ResourceRegistry, Simulation,
    WeaponKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::{debug, info};

/// Run the asteroid shooter without a window, driven by scripted input.
#[derive(Debug, Parser)]
#[command(name = "headless")]
struct Args {
    /// Simulation ticks to run.
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Seed for both the game and the input script. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON game config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `sprites/` and `sounds/`. Procedural placeholders are
    /// used when omitted.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Persist the high score to this file instead of keeping it in memory.
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Start a new game whenever one ends.
    #[arg(long)]
    restart: bool,
}

/// Wanders the pointer and the ship around, fires constantly, and swaps
/// weapons now and then.
struct InputScript {
    rng: StdRng,
    input: InputState,
}

impl InputScript {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed ^ 0x5eed),
            input: InputState {
                firing: true,
                ..Default::default()
            },
        }
    }

    fn next(&mut self, tick: u64, config: &GameConfig) -> (InputState, Option<InputEvent>) {
        if tick % 60 == 0 {
            self.input.pointer_x = self.rng.gen_range(0.0..config.width);
            self.input.pointer_y = self.rng.gen_range(0.0..config.height);
            self.input.held = MovementKeys {
                up: self.rng.gen_bool(0.3),
                down: self.rng.gen_bool(0.3),
                left: self.rng.gen_bool(0.3),
                right: self.rng.gen_bool(0.3),
            };
        }
        let event = match tick % 1200 {
            600 => Some(InputEvent::SelectWeapon(WeaponKind::TrackingMissile)),
            0 if tick > 0 => Some(InputEvent::SelectWeapon(WeaponKind::Laser)),
            _ => None,
        };
        (self.input, event)
    }
}

#[derive(Debug, Default)]
struct Tally {
    games: u32,
    asteroids: u32,
    hits_taken: u32,
    powerups: u32,
    sounds: u32,
    best_score: u32,
}

impl Tally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Sound(_) => self.sounds += 1,
            GameEvent::AsteroidDestroyed { .. } => self.asteroids += 1,
            GameEvent::PlayerHit { .. } => self.hits_taken += 1,
            GameEvent::PowerUpCollected(kind) => {
                debug!(?kind, "power-up collected");
                self.powerups += 1;
            }
            GameEvent::GameOver { score, .. } => {
                self.best_score = self.best_score.max(*score);
            }
            GameEvent::StateChanged(_) => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let script_seed = config.seed.unwrap_or_default();

    let resources = match &args.assets {
        Some(dir) => ResourceLoader::new(dir)
            .load()
            .with_context(|| format!("loading assets from {}", dir.display()))?,
        None => ResourceRegistry::placeholder(),
    };
    let store: Box<dyn HighScoreStore> = match &args.high_score_file {
        Some(path) => Box::new(FileHighScoreStore::new(path)),
        None => Box::new(MemoryHighScoreStore::default()),
    };

    let mut sim = Simulation::new(config.clone(), resources, store)?;
    let mut script = InputScript::new(script_seed);
    let mut tally = Tally::default();

    sim.handle_event(InputEvent::Start);
    tally.games += 1;
    for tick in 0..args.ticks {
        let (input, event) = script.next(tick, &config);
        if let Some(event) = event {
            sim.handle_event(event);
        }
        sim.tick(&input);
        sim.frame();
        for event in sim.drain_events() {
            tally.record(&event);
        }

        if sim.state() == GameState::GameOver {
            if !args.restart {
                break;
            }
            sim.handle_event(InputEvent::Start);
            tally.games += 1;
        }
    }

    tally.best_score = tally.best_score.max(sim.score());
    info!(
        games = tally.games,
        ticks = sim.ticks(),
        score = sim.score(),
        best_score = tally.best_score,
        high_score = sim.high_score(),
        lives = sim.lives(),
        asteroids_destroyed = tally.asteroids,
        hits_taken = tally.hits_taken,
        powerups = tally.powerups,
        sounds = tally.sounds,
        "run finished"
    );
    println!(
        "games={} score={} best={} high_score={} asteroids_destroyed={} hits_taken={}",
        tally.games,
        sim.score(),
        tally.best_score,
        sim.high_score(),
        tally.asteroids,
        tally.hits_taken
    );
    Ok(())
}
