#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Shoal creature simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{collections::BTreeMap, fmt, str::FromStr, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fraction of the scene height above which creatures may not rise.
pub const SURFACE_FRACTION: f32 = 0.1;

/// Fraction of the scene height below which creatures may not sink.
pub const SAND_FRACTION: f32 = 0.9;

/// Population policy governing a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Budgeted population hunted by a player-controlled predator for score.
    Survival,
    /// Constant standing population with no player and no score.
    Ambient,
}

impl PlayMode {
    /// Wrap policy applied when no explicit override is configured.
    #[must_use]
    pub const fn default_wrap_policy(self) -> WrapPolicy {
        match self {
            Self::Survival => WrapPolicy::Translate,
            Self::Ambient => WrapPolicy::Respawn,
        }
    }
}

/// Behaviour applied when a creature leaves the scene horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapPolicy {
    /// Only the horizontal position moves to the opposite side.
    Translate,
    /// The creature re-enters with a freshly sampled motion profile and depth.
    Respawn,
}

/// Lifecycle state of the simulation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session has been opened yet.
    Idle,
    /// A character profile may be chosen before the game starts.
    CharacterSelect,
    /// Creatures move, collide and spawn every tick.
    Running,
}

/// Player character selection that determines the spawn distribution.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CharacterProfile {
    /// Balanced distribution: 60% fish, 20% squid, 20% krill.
    #[default]
    Shark,
    /// Fish and squid only: 50% fish, 50% squid.
    Orca,
    /// 50% fish, 25% squid, 25% krill.
    Sperm,
}

impl CharacterProfile {
    /// Every selectable profile.
    pub const ALL: [Self; 3] = [Self::Shark, Self::Orca, Self::Sperm];

    /// Species mix this profile hunts in survival games.
    #[must_use]
    pub const fn mix(self) -> SpeciesMix {
        match self {
            Self::Shark => SpeciesMix::new(60, 20, 20),
            Self::Orca => SpeciesMix::new(50, 50, 0),
            Self::Sperm => SpeciesMix::new(50, 25, 25),
        }
    }

    /// Percentage share assigned to each creature kind, in spawn order.
    #[must_use]
    pub const fn shares(self) -> [(CreatureKind, u32); 3] {
        self.mix().shares()
    }

    /// Stable lowercase name used by adapters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shark => "shark",
            Self::Orca => "orca",
            Self::Sperm => "sperm",
        }
    }
}

/// Percentage split of a population across creature kinds.
///
/// The last populated kind receives the rounding remainder when a budget is
/// divided, so only the leading shares are applied literally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesMix {
    /// Share of fish, in percent.
    #[serde(default)]
    pub fish: u32,
    /// Share of squid, in percent.
    #[serde(default)]
    pub squid: u32,
    /// Share of krill swarms, in percent.
    #[serde(default)]
    pub krill: u32,
}

impl SpeciesMix {
    /// A population made of fish alone.
    pub const FISH_ONLY: Self = Self::new(100, 0, 0);

    /// Creates a mix from per-kind percentages.
    #[must_use]
    pub const fn new(fish: u32, squid: u32, krill: u32) -> Self {
        Self { fish, squid, krill }
    }

    /// Percentage share assigned to each creature kind, in spawn order.
    #[must_use]
    pub const fn shares(self) -> [(CreatureKind, u32); 3] {
        [
            (CreatureKind::Fish, self.fish),
            (CreatureKind::Squid, self.squid),
            (CreatureKind::Krill, self.krill),
        ]
    }

    /// Rejects mixes whose shares do not add up to 100 percent.
    pub fn validate(self) -> Result<(), ConfigurationError> {
        let total = u64::from(self.fish) + u64::from(self.squid) + u64::from(self.krill);
        if total == 100 {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidParameter(
                "species mix must add up to 100 percent",
            ))
        }
    }
}

impl Default for SpeciesMix {
    fn default() -> Self {
        Self::FISH_ONLY
    }
}

impl fmt::Display for CharacterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterProfile {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shark" => Ok(Self::Shark),
            "orca" => Ok(Self::Orca),
            "sperm" | "sperm_whale" | "sperm-whale" => Ok(Self::Sperm),
            _ => Err(ConfigurationError::UnknownProfile(value.to_owned())),
        }
    }
}

/// Species of simulated creature.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CreatureKind {
    /// Solitary swimmer with a steady gait.
    Fish,
    /// Solitary swimmer with jet bursts and a pulsing body.
    Squid,
    /// Swarm of krill sub-particles orbiting one collidable centroid.
    Krill,
}

impl CreatureKind {
    /// Every creature kind in canonical order.
    pub const ALL: [Self; 3] = [Self::Fish, Self::Squid, Self::Krill];

    /// Reports whether the kind is rendered as a cluster of sub-particles.
    #[must_use]
    pub const fn is_swarm(self) -> bool {
        matches!(self, Self::Krill)
    }

    /// Stable lowercase name used by adapters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fish => "fish",
            Self::Squid => "squid",
            Self::Krill => "krill",
        }
    }
}

impl fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cardinal directions the player may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward decreasing y.
    Up,
    /// Movement toward increasing y.
    Down,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
}

impl Direction {
    /// Unit displacement for one step in this direction.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Maps a keyboard key name onto a direction.
    ///
    /// Unrecognised keys yield [`InputError::UnrecognizedKey`], which callers
    /// are expected to drop without changing any state.
    pub fn from_key(key: &str) -> Result<Self, InputError> {
        match key {
            "ArrowUp" | "up" | "Up" | "w" | "W" => Ok(Self::Up),
            "ArrowDown" | "down" | "Down" | "s" | "S" => Ok(Self::Down),
            "ArrowLeft" | "left" | "Left" | "a" | "A" => Ok(Self::Left),
            "ArrowRight" | "right" | "Right" | "d" | "D" => Ok(Self::Right),
            other => Err(InputError::UnrecognizedKey(other.to_owned())),
        }
    }
}

/// Horizontal orientation of a creature sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Sprite mirrored to face decreasing x.
    Left,
    /// Sprite faces increasing x.
    Right,
}

impl Facing {
    /// Derives the facing from the sign of a horizontal velocity.
    ///
    /// Zero velocity faces left, matching a strict `> 0` comparison.
    #[must_use]
    pub fn from_velocity(dx: f32) -> Self {
        if dx > 0.0 {
            Self::Right
        } else {
            Self::Left
        }
    }

    /// Horizontal scale sign applied by renderers.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Unique identifier assigned to a creature for its whole lifetime.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CreatureId(u32);

impl CreatureId {
    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Pixel dimensions of the scene together with its vertical swimming band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    width: f32,
    height: f32,
}

impl SceneBounds {
    /// Validates and creates scene bounds.
    ///
    /// Both dimensions must be finite and strictly positive.
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigurationError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ConfigurationError::InvalidSceneBounds { width, height });
        }
        Ok(Self { width, height })
    }

    /// Horizontal extent of the scene.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the scene.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Smallest y a creature may occupy.
    #[must_use]
    pub fn surface_level(&self) -> f32 {
        self.height * SURFACE_FRACTION
    }

    /// Largest y a creature may occupy.
    #[must_use]
    pub fn sand_level(&self) -> f32 {
        self.height * SAND_FRACTION
    }

    /// Reports whether `y` lies inside the swimming band.
    #[must_use]
    pub fn contains_depth(&self, y: f32) -> bool {
        y >= self.surface_level() && y <= self.sand_level()
    }
}

/// Phase span over which steering noise repeats.
///
/// Callers may wrap their phases modulo this period without a visible seam.
pub const PHASE_PERIOD: u32 = 4096;

/// Source of smooth pseudo-random steering values.
///
/// Implementations are pure functions of `phase`: callers own and advance the
/// phase. Samples lie within `[0, 1]`, nearby phases produce nearby values and
/// the field repeats every [`PHASE_PERIOD`].
pub trait SteeringNoise: fmt::Debug {
    /// Samples the noise field at `phase`.
    fn sample(&self, phase: f32) -> f32;

    /// Samples the noise field remapped onto `[-1, 1]`.
    fn signed(&self, phase: f32) -> f32 {
        self.sample(phase) * 2.0 - 1.0
    }
}

/// Noise source that yields the same value for every phase.
///
/// Useful wherever a replay must not depend on the shape of the noise field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantNoise(pub f32);

impl SteeringNoise for ConstantNoise {
    fn sample(&self, _phase: f32) -> f32 {
        self.0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Records a new viewport size; it takes effect at the next tick boundary.
    ResizeViewport {
        /// New scene width in pixels.
        width: f32,
        /// New scene height in pixels.
        height: f32,
    },
    /// Chooses the character profile used by the next game.
    SelectCharacter {
        /// Profile to select.
        profile: CharacterProfile,
    },
    /// Starts a game from the character selection screen.
    StartGame,
    /// Clears the running game and returns to character selection.
    ResetGame,
    /// Records that a direction key is held.
    PressDirection {
        /// Direction associated with the pressed key.
        direction: Direction,
    },
    /// Records that a direction key was released, clearing any held direction.
    ReleaseDirection {
        /// Direction associated with the released key.
        direction: Direction,
    },
    /// Advances the simulation clock and moves every entity once.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a creature be added to the live population.
    SpawnCreature {
        /// Species of the new creature.
        kind: CreatureKind,
        /// Initial centroid of the creature.
        position: Vec2,
        /// Render scale of the creature.
        size: f32,
    },
    /// Reports that the player caught a creature.
    EatCreature {
        /// Identifier of the caught creature.
        creature: CreatureId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a pending viewport size became the active scene bounds.
    ViewportResized {
        /// Bounds in effect from this tick onward.
        bounds: SceneBounds,
    },
    /// Confirms a character profile selection.
    CharacterSelected {
        /// Profile now selected.
        profile: CharacterProfile,
    },
    /// Announces that the session moved into a new lifecycle state.
    SessionStateChanged {
        /// State that became active.
        state: SessionState,
    },
    /// Confirms that a game started and requests its initial population.
    GameStarted {
        /// Profile hunting this game; ambient scenes have none.
        profile: Option<CharacterProfile>,
        /// Species mix the initial population is drawn from.
        mix: SpeciesMix,
        /// Population policy of the session.
        mode: PlayMode,
        /// Scene bounds in effect when the game started.
        bounds: SceneBounds,
    },
    /// Reports that a start request was refused before any creature was created.
    StartRejected {
        /// Reason the game could not start.
        reason: ConfigurationError,
    },
    /// Confirms that every creature, the score and held input were cleared.
    SessionReset,
    /// Confirms that the player advanced one step.
    PlayerMoved {
        /// Position before the step.
        from: Vec2,
        /// Position after the step and clamping.
        to: Vec2,
    },
    /// Confirms that a creature joined the live population.
    CreatureSpawned {
        /// Identifier assigned to the creature.
        creature: CreatureId,
        /// Species of the creature.
        kind: CreatureKind,
        /// Initial centroid of the creature.
        position: Vec2,
    },
    /// Reports that a spawn request was refused.
    SpawnRejected {
        /// Species that was requested.
        kind: CreatureKind,
        /// Reason the spawn was refused.
        reason: SpawnRejection,
    },
    /// Reports that a creature crossed a horizontal edge and re-entered opposite.
    CreatureWrapped {
        /// Identifier of the creature.
        creature: CreatureId,
        /// Wrap policy that was applied.
        policy: WrapPolicy,
    },
    /// Confirms that a creature was eaten and removed from the live set.
    CreatureEaten {
        /// Identifier of the eaten creature.
        creature: CreatureId,
        /// Species of the eaten creature.
        kind: CreatureKind,
        /// Cumulative number of creatures eaten in this session.
        eaten_count: u32,
    },
}

/// Reasons a spawn request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// Spawns are only accepted while the session is running.
    InvalidState,
    /// The session already spawned its whole budget.
    BudgetExhausted,
    /// The live population already sits at its cap.
    PopulationCapReached,
}

/// Configuration problems that prevent a game from starting.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigurationError {
    /// Scene dimensions must be finite and strictly positive.
    #[error("scene bounds must be positive (received {width}x{height})")]
    InvalidSceneBounds {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
    /// The requested character profile does not exist.
    #[error("unknown character profile `{0}`")]
    UnknownProfile(String),
    /// A game cannot start before a character profile has been selected.
    #[error("no character profile has been selected")]
    CharacterNotSelected,
    /// Allocated spawn counts do not add up to the budget.
    #[error("allocated {allocated} creatures for a budget of {budget}")]
    AllocationMismatch {
        /// Requested budget.
        budget: u32,
        /// Sum of the allocated counts.
        allocated: u32,
    },
    /// A tuning parameter lies outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidParameter(&'static str),
}

/// Transient input problems; callers ignore them without changing state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InputError {
    /// The key does not map onto a tracked direction.
    #[error("unrecognized key `{0}`")]
    UnrecognizedKey(String),
}

/// Immutable representation of a single creature used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreatureSnapshot {
    /// Unique identifier assigned to the creature.
    pub id: CreatureId,
    /// Species of the creature.
    pub kind: CreatureKind,
    /// Current centroid.
    pub position: Vec2,
    /// Current sprite orientation.
    pub facing: Facing,
    /// Whether the creature has already been caught.
    pub collided: bool,
}

/// Read-only snapshot describing every live creature.
#[derive(Clone, Debug, Default)]
pub struct CreatureView {
    snapshots: Vec<CreatureSnapshot>,
}

impl CreatureView {
    /// Creates a new creature view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CreatureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &CreatureSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured creatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no creatures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CreatureSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    /// Current centre of the player sprite.
    pub position: Vec2,
    /// Render scale of the player sprite.
    pub size: f32,
    /// Direction currently held, if any.
    pub moving: Option<Direction>,
}

/// Live creature totals keyed by kind; every kind is always present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PopulationCounts(BTreeMap<CreatureKind, usize>);

impl PopulationCounts {
    /// Creates counts with every kind set to zero.
    #[must_use]
    pub fn zero() -> Self {
        Self(CreatureKind::ALL.iter().map(|kind| (*kind, 0)).collect())
    }

    /// Tallies the provided kinds.
    pub fn tally(kinds: impl IntoIterator<Item = CreatureKind>) -> Self {
        let mut counts = Self::zero();
        for kind in kinds {
            *counts.0.entry(kind).or_insert(0) += 1;
        }
        counts
    }

    /// Count recorded for `kind`.
    #[must_use]
    pub fn get(&self, kind: CreatureKind) -> usize {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Sum across every kind.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Iterator over `(kind, count)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CreatureKind, usize)> + '_ {
        self.0.iter().map(|(kind, count)| (*kind, *count))
    }
}

impl Default for PopulationCounts {
    fn default() -> Self {
        Self::zero()
    }
}

/// Part of a creature represented by a render entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPart {
    /// The creature's own body (the centroid for swarms).
    Body,
    /// One member of a swarm cluster.
    SwarmMember {
        /// Index of the member inside its swarm.
        index: u16,
    },
}

/// Drawable record emitted for every live creature or swarm member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RenderEntity {
    /// Identifier of the owning creature.
    pub id: CreatureId,
    /// Species of the owning creature.
    pub kind: CreatureKind,
    /// Which part of the creature this record describes.
    pub part: EntityPart,
    /// Screen position of the part.
    pub position: Vec2,
    /// Horizontal orientation of the part.
    pub facing: Facing,
    /// Render scale, including any cosmetic pulsing.
    pub size_scale: f32,
}

/// Drawable record for a decorative bubble.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BubbleSnapshot {
    /// Bubble centre.
    pub position: Vec2,
    /// Bubble radius in pixels.
    pub radius: f32,
    /// Bubble opacity.
    pub alpha: f32,
}

/// Everything the presentation layer needs to draw and label one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    /// Number of ticks processed so far in the session.
    pub tick: u64,
    /// Session lifecycle state.
    pub state: SessionState,
    /// Population policy of the session.
    pub mode: PlayMode,
    /// Character hunting in survival games; always empty in ambient scenes.
    pub profile: Option<CharacterProfile>,
    /// Cumulative number of creatures eaten.
    pub eaten_count: u32,
    /// Number of creatures spawned in the session.
    pub spawned_count: u32,
    /// Live creatures grouped by kind.
    pub live_count_by_kind: PopulationCounts,
    /// Player entity, present while a survival game runs.
    pub player: Option<PlayerSnapshot>,
    /// Drawable creature records including swarm members.
    pub entities: Vec<RenderEntity>,
    /// Decorative bubbles.
    pub bubbles: Vec<BubbleSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_bounds_reject_non_positive_dimensions() {
        assert!(matches!(
            SceneBounds::new(0.0, 600.0),
            Err(ConfigurationError::InvalidSceneBounds { .. })
        ));
        assert!(SceneBounds::new(800.0, -1.0).is_err());
        assert!(SceneBounds::new(f32::NAN, 600.0).is_err());
    }

    #[test]
    fn scene_bounds_expose_surface_and_sand_levels() {
        let bounds = SceneBounds::new(800.0, 600.0).expect("valid bounds");
        assert!((bounds.surface_level() - 60.0).abs() < 1e-4);
        assert!((bounds.sand_level() - 540.0).abs() < 1e-4);
        assert!(bounds.contains_depth(300.0));
        assert!(!bounds.contains_depth(30.0));
    }

    #[test]
    fn profiles_parse_from_names() {
        assert_eq!("orca".parse::<CharacterProfile>(), Ok(CharacterProfile::Orca));
        assert_eq!(" Sperm ".parse::<CharacterProfile>(), Ok(CharacterProfile::Sperm));
        assert_eq!(
            "narwhal".parse::<CharacterProfile>(),
            Err(ConfigurationError::UnknownProfile("narwhal".to_owned()))
        );
    }

    #[test]
    fn profile_shares_cover_the_whole_budget() {
        for profile in CharacterProfile::ALL {
            let total: u32 = profile.shares().iter().map(|(_, share)| share).sum();
            assert_eq!(total, 100, "{profile} shares must add to 100");
            assert_eq!(profile.mix().validate(), Ok(()));
        }
    }

    #[test]
    fn default_mix_is_fish_only() {
        let mix = SpeciesMix::default();
        assert_eq!(mix.shares()[0], (CreatureKind::Fish, 100));
        assert_eq!(mix.validate(), Ok(()));
        assert!(SpeciesMix::new(50, 20, 20).validate().is_err());
    }

    #[test]
    fn arrow_keys_map_onto_directions() {
        assert_eq!(Direction::from_key("ArrowUp"), Ok(Direction::Up));
        assert_eq!(Direction::from_key("ArrowLeft"), Ok(Direction::Left));
        assert_eq!(
            Direction::from_key("Space"),
            Err(InputError::UnrecognizedKey("Space".to_owned()))
        );
    }

    #[test]
    fn facing_follows_velocity_sign() {
        assert_eq!(Facing::from_velocity(0.4), Facing::Right);
        assert_eq!(Facing::from_velocity(-0.4), Facing::Left);
        assert_eq!(Facing::from_velocity(0.0), Facing::Left);
    }

    #[test]
    fn population_counts_always_list_every_kind() {
        let counts = PopulationCounts::tally([CreatureKind::Fish, CreatureKind::Fish]);
        assert_eq!(counts.get(CreatureKind::Fish), 2);
        assert_eq!(counts.get(CreatureKind::Krill), 0);
        assert_eq!(counts.iter().count(), 3);
        assert_eq!(counts.total(), 2);
    }
}
