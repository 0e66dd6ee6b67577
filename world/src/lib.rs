#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Shoal creature simulation.
//!
//! The world owns the scene bounds, the session state machine, the player
//! entity and every live creature. It is only mutated through [`apply`], and
//! observed through the read-only functions in [`query`].

mod bubbles;
mod creature;
mod player;

use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shoal_core::{
    CharacterProfile, Command, ConfigurationError, CreatureId, CreatureKind, Event, PlayMode,
    SceneBounds, SessionState, SpawnRejection, SpeciesMix, SteeringNoise, WrapPolicy,
};
use tracing::{debug, info, warn};

use crate::{
    bubbles::BubbleField,
    creature::{Creature, MotionContext},
    player::Player,
};

/// Horizontal start position of the player at the beginning of every game.
const PLAYER_START_X: f32 = 50.0;

/// Tunable parameters of the authoritative world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Population policy of the session.
    pub mode: PlayMode,
    /// Behaviour applied when a creature leaves the scene horizontally.
    pub wrap_policy: WrapPolicy,
    /// Survival: total spawn budget. Ambient: standing population target.
    pub population_cap: u32,
    /// Species mix of ambient scenes; survival games use the selected profile's mix.
    pub ambient_mix: SpeciesMix,
    /// Cadence of player steps while a direction is held.
    pub player_step_interval: Duration,
    /// Displacement applied by one player step, in pixels.
    pub player_step: f32,
    /// Render scale of the player; also sets its clamping margin.
    pub player_size: f32,
    /// Number of decorative bubbles maintained in ambient scenes.
    pub bubble_count: usize,
    /// Seed for every random draw the world performs.
    pub rng_seed: u64,
}

impl WorldConfig {
    /// Survival configuration with the provided spawn budget.
    #[must_use]
    pub fn survival(budget: u32) -> Self {
        Self {
            mode: PlayMode::Survival,
            wrap_policy: PlayMode::Survival.default_wrap_policy(),
            population_cap: budget,
            ambient_mix: SpeciesMix::FISH_ONLY,
            player_step_interval: Duration::from_millis(100),
            player_step: 50.0,
            player_size: 0.4,
            bubble_count: 0,
            rng_seed: 0,
        }
    }

    /// Ambient configuration maintaining the provided standing population.
    #[must_use]
    pub fn ambient(target_population: u32) -> Self {
        Self {
            mode: PlayMode::Ambient,
            wrap_policy: PlayMode::Ambient.default_wrap_policy(),
            population_cap: target_population,
            bubble_count: 2,
            ..Self::survival(target_population)
        }
    }
}

/// Represents the authoritative simulation state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    noise: Box<dyn SteeringNoise>,
    rng: ChaCha8Rng,
    bounds: SceneBounds,
    pending_bounds: Option<SceneBounds>,
    state: SessionState,
    profile: Option<CharacterProfile>,
    player: Player,
    creatures: Vec<Creature>,
    bubbles: BubbleField,
    next_creature_id: u32,
    eaten_count: u32,
    spawned_count: u32,
    tick_index: u64,
    elapsed: Duration,
}

impl World {
    /// Creates an idle world using the provided configuration and steering noise.
    #[must_use]
    pub fn new(config: WorldConfig, bounds: SceneBounds, noise: Box<dyn SteeringNoise>) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let player = Player::new(
            Vec2::new(PLAYER_START_X, bounds.height() / 2.0),
            config.player_size,
        );
        Self {
            config,
            noise,
            rng,
            bounds,
            pending_bounds: None,
            state: SessionState::Idle,
            profile: None,
            player,
            creatures: Vec::new(),
            bubbles: BubbleField::default(),
            next_creature_id: 0,
            eaten_count: 0,
            spawned_count: 0,
            tick_index: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn set_state(&mut self, state: SessionState, out_events: &mut Vec<Event>) {
        if self.state != state {
            self.state = state;
            out_events.push(Event::SessionStateChanged { state });
        }
    }

    fn commit_pending_bounds(&mut self, out_events: &mut Vec<Event>) {
        if let Some(bounds) = self.pending_bounds.take() {
            if bounds != self.bounds {
                self.bounds = bounds;
                info!(
                    width = bounds.width(),
                    height = bounds.height(),
                    "viewport resized"
                );
                out_events.push(Event::ViewportResized { bounds });
            }
        }
    }

    fn clear_session(&mut self) {
        self.creatures.clear();
        self.bubbles.clear();
        self.eaten_count = 0;
        self.spawned_count = 0;
        self.tick_index = 0;
        self.elapsed = Duration::ZERO;
        self.player.set_direction(None);
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.state == SessionState::Running {
            return;
        }

        let (profile, mix) = match (self.config.mode, self.profile) {
            (PlayMode::Ambient, _) => (None, self.config.ambient_mix),
            (PlayMode::Survival, Some(profile)) => (Some(profile), profile.mix()),
            (PlayMode::Survival, None) => {
                warn!("start requested before a character was selected");
                out_events.push(Event::StartRejected {
                    reason: ConfigurationError::CharacterNotSelected,
                });
                return;
            }
        };

        self.commit_pending_bounds(out_events);
        self.clear_session();
        self.player = Player::new(
            Vec2::new(PLAYER_START_X, self.bounds.height() / 2.0),
            self.config.player_size,
        );
        if self.config.mode == PlayMode::Ambient {
            self.bubbles
                .fill(self.config.bubble_count, self.bounds, &mut self.rng);
        }

        info!(?profile, ?mix, mode = ?self.config.mode, "game started");
        self.set_state(SessionState::Running, out_events);
        out_events.push(Event::GameStarted {
            profile,
            mix,
            mode: self.config.mode,
            bounds: self.bounds,
        });
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.clear_session();
        info!("session reset");
        out_events.push(Event::SessionReset);
        self.set_state(SessionState::CharacterSelect, out_events);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.state != SessionState::Running {
            return;
        }

        self.commit_pending_bounds(out_events);
        self.tick_index = self.tick_index.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if self.config.mode == PlayMode::Survival {
            self.player.advance(
                dt,
                self.config.player_step_interval,
                self.config.player_step,
                self.bounds,
                out_events,
            );
        }

        let context = MotionContext {
            bounds: self.bounds,
            noise: self.noise.as_ref(),
            wrap_policy: self.config.wrap_policy,
            elapsed: self.elapsed,
        };
        for creature in &mut self.creatures {
            if let Some(policy) = creature.advance(&context, &mut self.rng) {
                debug!(creature = creature.id.get(), kind = %creature.kind, ?policy, "creature wrapped");
                out_events.push(Event::CreatureWrapped {
                    creature: creature.id,
                    policy,
                });
            }
        }

        self.bubbles.advance(self.bounds, &mut self.rng);
    }

    fn spawn(&mut self, kind: CreatureKind, position: Vec2, size: f32, out_events: &mut Vec<Event>) {
        if let Some(reason) = self.spawn_rejection() {
            debug!(%kind, ?reason, "spawn rejected");
            out_events.push(Event::SpawnRejected { kind, reason });
            return;
        }

        let id = CreatureId::new(self.next_creature_id);
        self.next_creature_id = self.next_creature_id.wrapping_add(1);
        let position = Vec2::new(
            position.x,
            position
                .y
                .clamp(self.bounds.surface_level(), self.bounds.sand_level()),
        );
        self.creatures
            .push(Creature::spawn(id, kind, position, size, &mut self.rng));
        self.spawned_count = self.spawned_count.saturating_add(1);

        debug!(creature = id.get(), %kind, x = position.x, y = position.y, "creature spawned");
        out_events.push(Event::CreatureSpawned {
            creature: id,
            kind,
            position,
        });
    }

    fn spawn_rejection(&self) -> Option<SpawnRejection> {
        if self.state != SessionState::Running {
            return Some(SpawnRejection::InvalidState);
        }
        match self.config.mode {
            PlayMode::Survival if self.spawned_count >= self.config.population_cap => {
                Some(SpawnRejection::BudgetExhausted)
            }
            PlayMode::Ambient if self.live_count() >= self.config.population_cap as usize => {
                Some(SpawnRejection::PopulationCapReached)
            }
            _ => None,
        }
    }

    fn eat(&mut self, creature_id: CreatureId, out_events: &mut Vec<Event>) {
        if self.state != SessionState::Running {
            return;
        }

        let Some(index) = self.creature_index(creature_id) else {
            return;
        };

        let creature = &mut self.creatures[index];
        if creature.collided {
            return;
        }
        creature.collided = true;
        let kind = creature.kind;

        let _ = self.creatures.remove(index);
        self.eaten_count = self.eaten_count.saturating_add(1);
        debug!(creature = creature_id.get(), %kind, eaten = self.eaten_count, "creature eaten");
        out_events.push(Event::CreatureEaten {
            creature: creature_id,
            kind,
            eaten_count: self.eaten_count,
        });
    }

    fn creature_index(&self, creature_id: CreatureId) -> Option<usize> {
        self.creatures
            .binary_search_by_key(&creature_id, |creature| creature.id)
            .ok()
    }

    fn live_count(&self) -> usize {
        self.creatures.len()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ResizeViewport { width, height } => match SceneBounds::new(width, height) {
            Ok(bounds) => world.pending_bounds = Some(bounds),
            Err(error) => warn!(%error, "ignoring viewport update"),
        },
        Command::SelectCharacter { profile } => {
            if world.state == SessionState::Running {
                warn!(%profile, "character selection ignored while a game runs");
                return;
            }
            world.profile = Some(profile);
            out_events.push(Event::CharacterSelected { profile });
            world.set_state(SessionState::CharacterSelect, out_events);
        }
        Command::StartGame => world.start(out_events),
        Command::ResetGame => world.reset(out_events),
        Command::PressDirection { direction } => {
            if world.state == SessionState::Running && world.config.mode == PlayMode::Survival {
                world.player.set_direction(Some(direction));
            }
        }
        Command::ReleaseDirection { .. } => world.player.set_direction(None),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnCreature {
            kind,
            position,
            size,
        } => world.spawn(kind, position, size, out_events),
        Command::EatCreature { creature } => world.eat(creature, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use shoal_core::{
        BubbleSnapshot, CharacterProfile, CreatureView, Direction, Frame, PlayMode,
        PlayerSnapshot, PopulationCounts, RenderEntity, SceneBounds, SessionState,
    };

    use std::time::Duration;

    /// Active world configuration.
    #[must_use]
    pub fn config(world: &World) -> &super::WorldConfig {
        &world.config
    }

    /// Current lifecycle state of the session.
    #[must_use]
    pub fn session_state(world: &World) -> SessionState {
        world.state
    }

    /// Population policy of the session.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.config.mode
    }

    /// Selected character profile, if any.
    #[must_use]
    pub fn profile(world: &World) -> Option<CharacterProfile> {
        world.profile
    }

    /// Scene bounds currently in effect.
    #[must_use]
    pub fn bounds(world: &World) -> SceneBounds {
        world.bounds
    }

    /// Viewport size waiting for the next tick boundary, if any.
    #[must_use]
    pub fn pending_bounds(world: &World) -> Option<SceneBounds> {
        world.pending_bounds
    }

    /// Cumulative number of creatures eaten in this session.
    #[must_use]
    pub fn eaten_count(world: &World) -> u32 {
        world.eaten_count
    }

    /// Number of creatures spawned in this session.
    #[must_use]
    pub fn spawned_count(world: &World) -> u32 {
        world.spawned_count
    }

    /// Number of ticks processed in this session.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Simulated time elapsed in this session.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Spawns the world will still accept before hitting its cap.
    #[must_use]
    pub fn spawn_capacity(world: &World) -> u32 {
        let cap = world.config.population_cap;
        match world.config.mode {
            PlayMode::Survival => cap.saturating_sub(world.spawned_count),
            PlayMode::Ambient => {
                let live = u32::try_from(world.creatures.len()).unwrap_or(u32::MAX);
                cap.saturating_sub(live)
            }
        }
    }

    /// Captures a read-only view of every live creature.
    #[must_use]
    pub fn creature_view(world: &World) -> CreatureView {
        CreatureView::from_snapshots(world.creatures.iter().map(|c| c.snapshot()).collect())
    }

    /// Live creature totals keyed by kind.
    #[must_use]
    pub fn population(world: &World) -> PopulationCounts {
        PopulationCounts::tally(world.creatures.iter().map(|creature| creature.kind))
    }

    /// Player entity while a survival game runs.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        (world.state == SessionState::Running && world.config.mode == PlayMode::Survival)
            .then(|| world.player.snapshot())
    }

    /// Direction the player currently holds.
    #[must_use]
    pub fn held_direction(world: &World) -> Option<Direction> {
        world.player.moving
    }

    /// Pixel margin the player keeps from every scene edge.
    #[must_use]
    pub fn player_margin(world: &World) -> f32 {
        world.player.margin()
    }

    /// Drawable records for every live creature, swarm members included.
    #[must_use]
    pub fn render_entities(world: &World) -> Vec<RenderEntity> {
        let mut out = Vec::with_capacity(world.creatures.len());
        for creature in &world.creatures {
            creature.render_into(&mut out);
        }
        out
    }

    /// Decorative bubbles currently on screen.
    #[must_use]
    pub fn bubbles(world: &World) -> Vec<BubbleSnapshot> {
        world.bubbles.snapshots()
    }

    /// Assembles everything the presentation layer draws for the current tick.
    #[must_use]
    pub fn frame(world: &World) -> Frame {
        Frame {
            tick: world.tick_index,
            state: world.state,
            mode: world.config.mode,
            profile: world
                .profile
                .filter(|_| world.config.mode == PlayMode::Survival),
            eaten_count: world.eaten_count,
            spawned_count: world.spawned_count,
            live_count_by_kind: population(world),
            player: player(world),
            entities: render_entities(world),
            bubbles: bubbles(world),
        }
    }
}
