// Headless school of wandering fish driven by a fixed-step ECS schedule.
// Runs either as fast as possible or paced against the wall clock.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use bevy_ecs::prelude::*;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use penguin_fish::engine::{
    self, AnnulusArea, FixedClock, FixedStepper, SimConfig,
    systems::{SwimStats, fixed_schedule, insert_swim_resources, spawn_school},
};

// ============================================================================
// COMMAND LINE
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "penguin-fish", about = "Simulate a school of wandering fish")]
struct Cli {
    /// TOML file with simulation settings.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of fish to spawn.
    #[arg(long)]
    fish: Option<usize>,
    /// Cruising speed in world units per second.
    #[arg(long)]
    speed: Option<f32>,
    /// RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run.
    #[arg(long)]
    seconds: Option<f32>,
    /// Pace ticks against the wall clock instead of running flat out.
    #[arg(long)]
    realtime: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(fish) = self.fish {
            config.fish_count = fish;
        }
        if let Some(speed) = self.speed {
            config.base_speed = speed;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(seconds) = self.seconds {
            config.duration_secs = seconds;
        }
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    world: World,
    schedule: Schedule,
    total_ticks: u64,
    stats_every: u64,
    last_logged: Option<u64>,
}

impl State {
    fn new(config: &SimConfig) -> anyhow::Result<Self> {
        let mut world = World::new();
        insert_swim_resources(&mut world, config, Box::new(AnnulusArea));

        // Spawning draws from its own stream so school layout does not shift
        // the wandering sequence.
        let mut spawn_rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));
        spawn_school(&mut world, config, &mut spawn_rng).context("spawning school")?;

        let stats_every = (config.stats_interval_secs * config.tick_rate_hz).round() as u64;
        let stats_every = stats_every.max(1);

        Ok(Self {
            world,
            schedule: fixed_schedule(),
            total_ticks: config.total_ticks(),
            stats_every,
            last_logged: None,
        })
    }

    fn ticks(&self) -> u64 {
        self.world.resource::<FixedClock>().ticks()
    }

    fn finished(&self) -> bool {
        self.ticks() >= self.total_ticks
    }

    fn tick(&mut self) {
        self.schedule.run(&mut self.world);
        if self.ticks() % self.stats_every == 0 {
            self.log_stats();
        }
    }

    /// Log the closing stats line unless the last tick already did.
    /// Returns whether anything was logged.
    fn finish(&mut self) -> bool {
        if self.last_logged == Some(self.ticks()) {
            return false;
        }
        self.log_stats();
        true
    }

    fn log_stats(&mut self) {
        self.last_logged = Some(self.ticks());
        let clock = self.world.resource::<FixedClock>();
        let stats = self.world.resource::<SwimStats>();
        log::info!(
            "t={:.2}s | ticks: {} | decisions: {} | arrivals: {} | steps: {}",
            clock.now(),
            clock.ticks(),
            stats.decisions,
            stats.arrivals,
            stats.moves,
        );
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    engine::logging::init(cli.verbose);
    let realtime = cli.realtime;
    let config = cli.into_config()?;

    let mut state = State::new(&config)?;
    log::info!(
        "Running {} ticks at {} Hz ({})",
        state.total_ticks,
        config.tick_rate_hz,
        if realtime { "realtime" } else { "flat out" },
    );

    if realtime {
        let step = 1.0 / config.tick_rate_hz;
        let mut stepper = FixedStepper::new(step);
        let mut last_update = Instant::now();
        while !state.finished() {
            let now = Instant::now();
            let due = stepper.accumulate((now - last_update).as_secs_f32());
            last_update = now;
            for _ in 0..due {
                if state.finished() {
                    break;
                }
                state.tick();
            }
            std::thread::sleep(Duration::from_secs_f32(step / 2.0));
        }
    } else {
        while !state.finished() {
            state.tick();
        }
    }

    state.finish();
    Ok(())
}
