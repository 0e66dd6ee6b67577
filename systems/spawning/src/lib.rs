#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting creature spawn commands.
//!
//! A session's population is planned once per game start by splitting the
//! creature budget across kinds according to the session's species mix: the
//! selected character's in survival games, the configured scene mix in
//! ambient ones. Survival sessions spawn that plan once; ambient sessions keep
//! it as a standing target and top up any deficit on a fixed cadence.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shoal_core::{
    CharacterProfile, Command, ConfigurationError, CreatureKind, Event, PlayMode,
    PopulationCounts, SceneBounds, SpeciesMix,
};
use tracing::{debug, warn};

/// Per-kind creature counts produced by splitting a budget across a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    counts: [(CreatureKind, u32); 3],
}

impl Allocation {
    /// Number of creatures planned for the provided kind.
    #[must_use]
    pub fn get(&self, kind: CreatureKind) -> u32 {
        self.counts
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map_or(0, |(_, count)| *count)
    }

    /// Sum of all planned creatures.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|(_, count)| *count).sum()
    }

    /// Iterates over the planned counts in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (CreatureKind, u32)> + '_ {
        self.counts.iter().copied()
    }
}

/// Splits `budget` across creature kinds according to the profile's shares.
pub fn allocate(profile: CharacterProfile, budget: u32) -> Result<Allocation, ConfigurationError> {
    allocate_mix(profile.mix(), budget)
}

/// Splits `budget` across creature kinds according to `mix`.
///
/// Every populated kind except the last receives the floor of its share; the
/// last populated kind receives the remainder, so the counts always sum to
/// `budget`.
pub fn allocate_mix(mix: SpeciesMix, budget: u32) -> Result<Allocation, ConfigurationError> {
    let shares = mix.shares();
    let last_populated = shares
        .iter()
        .rposition(|(_, percent)| *percent > 0)
        .ok_or(ConfigurationError::AllocationMismatch {
            budget,
            allocated: 0,
        })?;

    let mut counts = shares.map(|(kind, _)| (kind, 0));
    let mut assigned: u64 = 0;
    for (index, (kind, percent)) in shares.iter().enumerate() {
        let count = if index == last_populated {
            u64::from(budget).saturating_sub(assigned)
        } else if index > last_populated {
            0
        } else {
            u64::from(budget) * u64::from(*percent) / 100
        };
        assigned += count;
        counts[index] = (*kind, u32::try_from(count).unwrap_or(u32::MAX));
    }

    let allocation = Allocation { counts };
    if allocation.total() != budget {
        return Err(ConfigurationError::AllocationMismatch {
            budget,
            allocated: allocation.total(),
        });
    }
    Ok(allocation)
}

/// Vertical band, as fractions of the scene height, a kind spawns within.
const fn spawn_band(kind: CreatureKind) -> (f32, f32) {
    match kind {
        CreatureKind::Fish => (0.1, 0.9),
        CreatureKind::Squid => (0.2, 0.8),
        CreatureKind::Krill => (0.3, 0.8),
    }
}

/// Base and spread of the render scale a kind spawns with.
///
/// Ambient scenes draw smaller fish to read as background life.
const fn spawn_size(kind: CreatureKind, mode: PlayMode) -> (f32, f32) {
    match (kind, mode) {
        (CreatureKind::Fish, PlayMode::Ambient) => (0.009, 0.07),
        (CreatureKind::Fish, PlayMode::Survival) => (0.05, 0.12),
        (CreatureKind::Squid, _) => (0.08, 0.15),
        (CreatureKind::Krill, _) => (0.02, 0.04),
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    replacement_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided replacement cadence and seed.
    #[must_use]
    pub const fn new(replacement_interval: Duration, rng_seed: u64) -> Self {
        Self {
            replacement_interval,
            rng_seed,
        }
    }
}

/// Pure system that plans the population and emits spawn commands.
#[derive(Debug)]
pub struct Spawning {
    replacement_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
    mode: PlayMode,
    standing_target: Option<Allocation>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            replacement_interval: config.replacement_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            mode: PlayMode::Survival,
            standing_target: None,
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// `capacity` is the number of spawns the world still accepts and
    /// `population` the live creature count per kind.
    pub fn handle(
        &mut self,
        events: &[Event],
        bounds: SceneBounds,
        population: &PopulationCounts,
        capacity: u32,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::GameStarted { mix, mode, .. } => {
                    self.accumulator = Duration::ZERO;
                    self.start(*mix, *mode, bounds, capacity, out);
                }
                Event::SessionReset => {
                    self.accumulator = Duration::ZERO;
                    self.standing_target = None;
                }
                Event::TimeAdvanced { dt } => {
                    accumulated = accumulated.saturating_add(*dt);
                }
                _ => {}
            }
        }

        let Some(target) = self.standing_target else {
            return;
        };
        if accumulated.is_zero() || self.replacement_interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        if self.accumulator < self.replacement_interval {
            return;
        }
        while self.accumulator >= self.replacement_interval {
            self.accumulator -= self.replacement_interval;
        }

        self.replace_deficit(target, bounds, population, capacity, out);
    }

    fn start(
        &mut self,
        mix: SpeciesMix,
        mode: PlayMode,
        bounds: SceneBounds,
        capacity: u32,
        out: &mut Vec<Command>,
    ) {
        self.mode = mode;
        let allocation = match allocate_mix(mix, capacity) {
            Ok(allocation) => allocation,
            Err(error) => {
                warn!(%error, ?mix, "population plan rejected");
                self.standing_target = None;
                return;
            }
        };

        debug!(?mix, budget = capacity, "planning initial population");
        for (kind, count) in allocation.iter() {
            for _ in 0..count {
                out.push(self.spawn_command(kind, bounds));
            }
        }

        self.standing_target = (mode == PlayMode::Ambient).then_some(allocation);
    }

    fn replace_deficit(
        &mut self,
        target: Allocation,
        bounds: SceneBounds,
        population: &PopulationCounts,
        capacity: u32,
        out: &mut Vec<Command>,
    ) {
        let mut remaining = capacity;
        for (kind, wanted) in target.iter() {
            let live = u32::try_from(population.get(kind)).unwrap_or(u32::MAX);
            let deficit = wanted.saturating_sub(live).min(remaining);
            if deficit > 0 {
                debug!(%kind, deficit, "replacing missing creatures");
            }
            for _ in 0..deficit {
                out.push(self.spawn_command(kind, bounds));
            }
            remaining -= deficit;
        }
    }

    fn spawn_command(&mut self, kind: CreatureKind, bounds: SceneBounds) -> Command {
        let (low, high) = spawn_band(kind);
        let (base, spread) = spawn_size(kind, self.mode);
        let height = bounds.height();
        let x = self.rng.gen::<f32>() * bounds.width();
        let y = self.rng.gen::<f32>() * (high - low) * height + low * height;
        let size = self.rng.gen::<f32>() * spread + base;
        Command::SpawnCreature {
            kind,
            position: Vec2::new(x, y),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shark_split_rounds_down_before_remainder() {
        let allocation = allocate(CharacterProfile::Shark, 7).expect("allocation");
        assert_eq!(allocation.get(CreatureKind::Fish), 4);
        assert_eq!(allocation.get(CreatureKind::Squid), 1);
        assert_eq!(allocation.get(CreatureKind::Krill), 2);
    }

    #[test]
    fn remainder_goes_to_last_populated_kind() {
        let allocation = allocate(CharacterProfile::Orca, 7).expect("allocation");
        assert_eq!(allocation.get(CreatureKind::Fish), 3);
        assert_eq!(allocation.get(CreatureKind::Squid), 4);
        assert_eq!(allocation.get(CreatureKind::Krill), 0);
    }

    #[test]
    fn zero_budget_allocates_nothing() {
        let allocation = allocate(CharacterProfile::Sperm, 0).expect("allocation");
        assert_eq!(allocation.total(), 0);
    }

    #[test]
    fn fish_only_mix_spawns_nothing_else() {
        let allocation = allocate_mix(SpeciesMix::FISH_ONLY, 25).expect("allocation");
        assert_eq!(allocation.get(CreatureKind::Fish), 25);
        assert_eq!(allocation.total(), 25);
    }

    #[test]
    fn ambient_fish_use_the_background_size_range() {
        let bounds = SceneBounds::new(800.0, 600.0).expect("valid bounds");
        let mut spawning = Spawning::new(Config::new(Duration::from_millis(500), 4));
        let mut out = Vec::new();
        spawning.handle(
            &[Event::GameStarted {
                profile: None,
                mix: SpeciesMix::FISH_ONLY,
                mode: PlayMode::Ambient,
                bounds,
            }],
            bounds,
            &PopulationCounts::zero(),
            25,
            &mut out,
        );

        assert_eq!(out.len(), 25);
        for command in out {
            match command {
                Command::SpawnCreature { kind, size, .. } => {
                    assert_eq!(kind, CreatureKind::Fish);
                    assert!((0.009..0.08).contains(&size));
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn spawn_commands_respect_kind_bands() {
        let bounds = SceneBounds::new(800.0, 600.0).expect("valid bounds");
        let mut spawning = Spawning::new(Config::new(Duration::from_millis(500), 3));
        for _ in 0..200 {
            for kind in CreatureKind::ALL {
                let (low, high) = spawn_band(kind);
                match spawning.spawn_command(kind, bounds) {
                    Command::SpawnCreature { position, size, .. } => {
                        assert!(position.x >= 0.0 && position.x < 800.0);
                        assert!(position.y >= low * 600.0 && position.y <= high * 600.0);
                        let (base, spread) = spawn_size(kind, PlayMode::Survival);
                        assert!(size >= base && size <= base + spread);
                    }
                    other => panic!("unexpected command {other:?}"),
                }
            }
        }
    }
}
