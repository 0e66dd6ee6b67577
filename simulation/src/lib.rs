#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level driver that wires the world to its systems.
//!
//! A [`Simulation`] owns the authoritative world, the spawning and collision
//! systems, and the input port. Every tick drains buffered input, advances
//! the world (player first, then every creature), runs the collision pass on
//! the fully updated generation and finally lets the spawner top up the
//! population.

mod config;
mod input;

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shoal_core::{
    CharacterProfile, Command, ConfigurationError, Event, Frame, PlayMode, SceneBounds,
    SessionState, SteeringNoise,
};
use shoal_system_collision::{self as collision, Collision};
use shoal_system_spawning::{self as spawning, Spawning};
use shoal_system_steering::PerlinSteering;
use shoal_world::{self as world, query, World, WorldConfig};
use tracing::{debug, info};

pub use config::{ConfigLoadError, ModeConfig, SimulationConfig};
pub use input::InputPort;

/// Independent seeds for every random stream, derived from one root seed.
#[derive(Clone, Copy, Debug)]
struct StreamSeeds {
    root: u64,
    noise: u64,
    world: u64,
    spawning: u64,
}

impl StreamSeeds {
    fn derive(root: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(root);
        Self {
            root,
            noise: rng.gen(),
            world: rng.gen(),
            spawning: rng.gen(),
        }
    }
}

/// Session driver owning the world, its systems and the input port.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    seed: u64,
    world: World,
    spawning: Spawning,
    collision: Collision,
    input: InputPort,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a simulation steered by seeded Perlin noise.
    pub fn new(config: SimulationConfig, bounds: SceneBounds) -> Result<Self, ConfigurationError> {
        let seeds = StreamSeeds::derive(config.resolve_seed());
        let noise = PerlinSteering::from_seed(seeds.noise);
        Self::build(config, bounds, Box::new(noise), seeds)
    }

    /// Creates a simulation steered by the provided noise source.
    pub fn with_noise(
        config: SimulationConfig,
        bounds: SceneBounds,
        noise: Box<dyn SteeringNoise>,
    ) -> Result<Self, ConfigurationError> {
        let seeds = StreamSeeds::derive(config.resolve_seed());
        Self::build(config, bounds, noise, seeds)
    }

    fn build(
        config: SimulationConfig,
        bounds: SceneBounds,
        noise: Box<dyn SteeringNoise>,
        seeds: StreamSeeds,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let world_config = WorldConfig {
            mode: config.mode.play_mode(),
            wrap_policy: config.effective_wrap_policy(),
            population_cap: config.mode.population(),
            ambient_mix: config.mode.ambient_mix().unwrap_or_default(),
            player_step_interval: config.player_step_interval(),
            player_step: config.player_step,
            player_size: config.player_size,
            bubble_count: config.bubble_count(),
            rng_seed: seeds.world,
        };
        let spawning = Spawning::new(spawning::Config::new(
            config.respawn_interval(),
            seeds.spawning,
        ));
        let collision = Collision::new(collision::Config::new(
            config.collision_interval(),
            config.solitary_collision_radius,
            config.swarm_collision_radius,
        ));

        debug!(seed = seeds.root, mode = ?world_config.mode, "simulation created");
        Ok(Self {
            world: World::new(world_config, bounds, noise),
            config,
            seed: seeds.root,
            spawning,
            collision,
            input: InputPort::new(),
            commands: Vec::new(),
        })
    }

    /// Configuration the simulation was built with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seed every random stream of this simulation derives from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Port receiving key and viewport signals from the presentation layer.
    pub fn input(&mut self) -> &mut InputPort {
        &mut self.input
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        query::session_state(&self.world)
    }

    /// Creatures eaten in the current session.
    #[must_use]
    pub fn eaten_count(&self) -> u32 {
        query::eaten_count(&self.world)
    }

    /// Selects the character that determines the spawn distribution.
    pub fn select_character(&mut self, profile: CharacterProfile, out_events: &mut Vec<Event>) {
        self.dispatch(Command::SelectCharacter { profile }, out_events);
    }

    /// Starts a game, spawning the initial population.
    ///
    /// Survival games need a selected character; ambient scenes draw from the
    /// configured species mix and start without one. Configuration problems
    /// are reported before any creature is created. Starting an already
    /// running game changes nothing.
    pub fn start_game(&mut self, out_events: &mut Vec<Event>) -> Result<(), ConfigurationError> {
        if self.state() == SessionState::Running {
            return Ok(());
        }

        let mix = match self.config.mode.ambient_mix() {
            Some(mix) => mix,
            None => query::profile(&self.world)
                .ok_or(ConfigurationError::CharacterNotSelected)?
                .mix(),
        };
        let _ = spawning::allocate_mix(mix, self.config.mode.population())?;

        self.apply_input(out_events);
        self.dispatch(Command::StartGame, out_events);
        if self.config.mode.play_mode() == PlayMode::Survival {
            self.input.attach();
        }
        info!(?mix, seed = self.seed, "session running");
        Ok(())
    }

    /// Returns to character selection, clearing creatures, score and input.
    ///
    /// The input port is detached and every pending cadence is cancelled, so
    /// nothing fires against the cleared session.
    pub fn reset_game(&mut self, out_events: &mut Vec<Event>) {
        self.input.detach();
        self.dispatch(Command::ResetGame, out_events);
    }

    /// Advances the session by `dt`.
    pub fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.apply_input(out_events);
        self.dispatch(Command::Tick { dt }, out_events);
    }

    /// Everything the presentation layer draws for the current tick.
    #[must_use]
    pub fn frame(&self) -> Frame {
        query::frame(&self.world)
    }

    fn apply_input(&mut self, out_events: &mut Vec<Event>) {
        self.commands.extend(self.input.drain());
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }

    fn dispatch(&mut self, command: Command, out_events: &mut Vec<Event>) {
        let start = out_events.len();
        world::apply(&mut self.world, command, out_events);
        self.run_systems(start, out_events);
    }

    fn run_systems(&mut self, start: usize, out_events: &mut Vec<Event>) {
        let player = query::player(&self.world);
        let creatures = query::creature_view(&self.world);
        self.collision.handle(
            &out_events[start..],
            player.as_ref(),
            &creatures,
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }

        self.spawning.handle(
            &out_events[start..],
            query::bounds(&self.world),
            &query::population(&self.world),
            query::spawn_capacity(&self.world),
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }
}
