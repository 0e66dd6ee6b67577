//! Serializable session configuration.

use std::{fs, path::Path, time::Duration};

use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use shoal_core::{ConfigurationError, PlayMode, SpeciesMix, WrapPolicy};
use thiserror::Error;

/// Failure raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`SimulationConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The file parsed but holds out-of-range values.
    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

/// Population policy together with its mode-specific parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModeConfig {
    /// One-shot spawn budget hunted by the player.
    Survival {
        /// Total number of creatures spawned per game.
        #[serde(default = "default_creature_budget")]
        creature_budget: u32,
    },
    /// Standing population topped up on a fixed cadence.
    Ambient {
        /// Population maintained while the scene runs.
        #[serde(default = "default_target_population")]
        target_population: u32,
        /// Cadence of replacement passes, in milliseconds.
        #[serde(default = "default_respawn_interval_ms")]
        respawn_interval_ms: u64,
        /// Decorative bubbles kept on screen.
        #[serde(default = "default_bubble_count")]
        bubble_count: usize,
        /// Species split of the scene; fish only unless configured.
        #[serde(default)]
        composition: SpeciesMix,
    },
}

fn default_creature_budget() -> u32 {
    20
}

fn default_target_population() -> u32 {
    25
}

fn default_respawn_interval_ms() -> u64 {
    500
}

fn default_bubble_count() -> usize {
    2
}

impl ModeConfig {
    /// Survival mode with the default budget.
    #[must_use]
    pub fn survival() -> Self {
        Self::Survival {
            creature_budget: default_creature_budget(),
        }
    }

    /// Ambient mode with default population, cadence and bubbles.
    #[must_use]
    pub fn ambient() -> Self {
        Self::Ambient {
            target_population: default_target_population(),
            respawn_interval_ms: default_respawn_interval_ms(),
            bubble_count: default_bubble_count(),
            composition: SpeciesMix::default(),
        }
    }

    /// Play mode selected by this configuration.
    #[must_use]
    pub fn play_mode(&self) -> PlayMode {
        match self {
            Self::Survival { .. } => PlayMode::Survival,
            Self::Ambient { .. } => PlayMode::Ambient,
        }
    }

    /// Species split of ambient scenes; survival games follow the selected character.
    #[must_use]
    pub fn ambient_mix(&self) -> Option<SpeciesMix> {
        match self {
            Self::Survival { .. } => None,
            Self::Ambient { composition, .. } => Some(*composition),
        }
    }

    /// Spawn budget in survival mode, standing target in ambient mode.
    #[must_use]
    pub fn population(&self) -> u32 {
        match self {
            Self::Survival { creature_budget } => *creature_budget,
            Self::Ambient {
                target_population, ..
            } => *target_population,
        }
    }
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self::survival()
    }
}

/// Tunable parameters of a simulation session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Population policy.
    pub mode: ModeConfig,
    /// Overrides the mode's default wrap policy.
    pub wrap_policy: Option<WrapPolicy>,
    /// Cadence of collision passes, in milliseconds.
    pub collision_interval_ms: u64,
    /// Cadence of player steps while a direction is held, in milliseconds.
    pub player_step_interval_ms: u64,
    /// Pixels covered by one player step.
    pub player_step: f32,
    /// Render scale of the player; the clamping margin is `size * 50`.
    pub player_size: f32,
    /// Collision radius of fish and squid.
    pub solitary_collision_radius: f32,
    /// Collision radius of krill swarms.
    pub swarm_collision_radius: f32,
    /// Seed for every random stream; drawn from the OS when absent.
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: ModeConfig::default(),
            wrap_policy: None,
            collision_interval_ms: 16,
            player_step_interval_ms: 100,
            player_step: 50.0,
            player_size: 0.4,
            solitary_collision_radius: 50.0,
            swarm_collision_radius: 70.0,
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects parameters that would stall or break the simulation.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.collision_interval_ms == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "collision_interval_ms must be positive",
            ));
        }
        if self.player_step_interval_ms == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "player_step_interval_ms must be positive",
            ));
        }
        if !(self.player_step.is_finite() && self.player_step > 0.0) {
            return Err(ConfigurationError::InvalidParameter(
                "player_step must be positive",
            ));
        }
        if !(self.player_size.is_finite() && self.player_size > 0.0) {
            return Err(ConfigurationError::InvalidParameter(
                "player_size must be positive",
            ));
        }
        if !(self.solitary_collision_radius.is_finite() && self.solitary_collision_radius > 0.0)
            || !(self.swarm_collision_radius.is_finite() && self.swarm_collision_radius > 0.0)
        {
            return Err(ConfigurationError::InvalidParameter(
                "collision radii must be positive",
            ));
        }
        match self.mode {
            ModeConfig::Survival { creature_budget: 0 } => Err(
                ConfigurationError::InvalidParameter("creature_budget must be positive"),
            ),
            ModeConfig::Ambient {
                target_population: 0,
                ..
            } => Err(ConfigurationError::InvalidParameter(
                "target_population must be positive",
            )),
            ModeConfig::Ambient {
                respawn_interval_ms: 0,
                ..
            } => Err(ConfigurationError::InvalidParameter(
                "respawn_interval_ms must be positive",
            )),
            ModeConfig::Ambient { composition, .. } => composition.validate(),
            ModeConfig::Survival { .. } => Ok(()),
        }
    }

    /// Wrap policy in effect after applying the override.
    #[must_use]
    pub fn effective_wrap_policy(&self) -> WrapPolicy {
        self.wrap_policy
            .unwrap_or_else(|| self.mode.play_mode().default_wrap_policy())
    }

    /// Cadence of collision passes.
    #[must_use]
    pub fn collision_interval(&self) -> Duration {
        Duration::from_millis(self.collision_interval_ms)
    }

    /// Cadence of player steps.
    #[must_use]
    pub fn player_step_interval(&self) -> Duration {
        Duration::from_millis(self.player_step_interval_ms)
    }

    /// Cadence of ambient replacement passes; zero in survival mode.
    #[must_use]
    pub fn respawn_interval(&self) -> Duration {
        match self.mode {
            ModeConfig::Ambient {
                respawn_interval_ms,
                ..
            } => Duration::from_millis(respawn_interval_ms),
            ModeConfig::Survival { .. } => Duration::ZERO,
        }
    }

    /// Bubbles kept on screen; zero in survival mode.
    #[must_use]
    pub fn bubble_count(&self) -> usize {
        match self.mode {
            ModeConfig::Ambient { bubble_count, .. } => bubble_count,
            ModeConfig::Survival { .. } => 0,
        }
    }

    /// Configured seed, or a fresh one drawn from the operating system.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        self.rng_seed.unwrap_or_else(|| OsRng.next_u64())
    }
}
