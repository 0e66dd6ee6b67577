#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Shoal session.

mod script;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shoal_core::{CharacterProfile, Direction, Event, PlayMode, SceneBounds};
use shoal_simulation::{ModeConfig, Simulation, SimulationConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::script::{InputScript, ScriptAction};

/// Population policy selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Budgeted population hunted by the player.
    Survival,
    /// Constant standing population without a player.
    Ambient,
}

/// Runs a scripted Shoal session and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "shoal", version, about)]
struct Cli {
    /// Character profile determining the spawn distribution of survival games.
    #[arg(long, default_value = "shark")]
    profile: CharacterProfile,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Simulated duration of one tick, in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Scene width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Scene height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Overrides the population policy from the configuration.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Seed for every random stream.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scripted input such as `0:right,40:-` (tick:key, `-` releases).
    #[arg(long)]
    script: Option<InputScript>,

    /// Prints every frame as a JSON line.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        match (self.mode, &config.mode) {
            (Some(ModeArg::Survival), ModeConfig::Ambient { .. }) => {
                config.mode = ModeConfig::survival();
            }
            (Some(ModeArg::Ambient), ModeConfig::Survival { .. }) => {
                config.mode = ModeConfig::ambient();
            }
            _ => {}
        }
        if self.seed.is_some() {
            config.rng_seed = self.seed;
        }
        Ok(config)
    }
}

/// Entry point for the Shoal command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.simulation_config()?;
    let bounds = SceneBounds::new(cli.width, cli.height).context("invalid scene size")?;
    let mut simulation =
        Simulation::new(config, bounds).context("invalid simulation configuration")?;
    let mode = simulation.config().mode.play_mode();
    info!(seed = simulation.seed(), ?mode, "starting session");

    let mut events = Vec::new();
    if mode == PlayMode::Survival {
        simulation.select_character(cli.profile, &mut events);
    }
    simulation
        .start_game(&mut events)
        .context("failed to start the game")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let dt = Duration::from_millis(cli.frame_ms);
    let script = cli.script.clone().unwrap_or_default();
    let mut held: Option<Direction> = None;

    for tick in 0..cli.ticks {
        for action in script.actions_at(tick) {
            match action {
                ScriptAction::Press(direction) => {
                    simulation.input().press(direction);
                    held = Some(direction);
                }
                ScriptAction::Release => {
                    if let Some(direction) = held.take() {
                        simulation.input().release(direction);
                    }
                }
            }
        }

        events.clear();
        simulation.tick(dt, &mut events);
        report_events(tick, &events);

        if cli.json {
            let frame = serde_json::to_string(&simulation.frame())
                .context("failed to serialise frame")?;
            writeln!(out, "{frame}").context("failed to write frame")?;
        }
    }

    let frame = simulation.frame();
    let live: Vec<String> = frame
        .live_count_by_kind
        .iter()
        .map(|(kind, count)| format!("{kind}={count}"))
        .collect();
    writeln!(
        out,
        "profile={} ticks={} eaten={} spawned={} live=[{}]",
        frame.profile.map_or("none", CharacterProfile::name),
        frame.tick,
        frame.eaten_count,
        frame.spawned_count,
        live.join(" ")
    )
    .context("failed to write summary")?;
    Ok(())
}

fn report_events(tick: u64, events: &[Event]) {
    for event in events {
        match event {
            Event::CreatureEaten {
                creature,
                kind,
                eaten_count,
            } => info!(tick, creature = creature.get(), %kind, eaten_count, "creature eaten"),
            Event::ViewportResized { bounds } => {
                debug!(tick, width = bounds.width(), height = bounds.height(), "viewport resized");
            }
            _ => {}
        }
    }
}
