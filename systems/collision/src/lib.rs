#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves proximity collisions between the player and creatures.

use std::time::Duration;

use shoal_core::{Command, CreatureKind, CreatureView, Event, PlayerSnapshot};
use tracing::trace;

/// Configuration parameters required to construct the collision system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    check_interval: Duration,
    solitary_radius: f32,
    swarm_radius: f32,
}

impl Config {
    /// Creates a configuration from the check cadence and per-variant radii.
    #[must_use]
    pub const fn new(check_interval: Duration, solitary_radius: f32, swarm_radius: f32) -> Self {
        Self {
            check_interval,
            solitary_radius,
            swarm_radius,
        }
    }

    /// Collision radius applied to creatures of the provided kind.
    #[must_use]
    pub const fn radius(&self, kind: CreatureKind) -> f32 {
        if kind.is_swarm() {
            self.swarm_radius
        } else {
            self.solitary_radius
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_millis(16), 50.0, 70.0)
    }
}

/// Collision resolver that checks the player against every live creature.
#[derive(Debug)]
pub struct Collision {
    config: Config,
    accumulator: Duration,
}

impl Collision {
    /// Creates a new collision system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and immutable views to emit eat commands.
    ///
    /// At most one pass runs per call, since positions do not change between
    /// checks inside one batch of events. Every creature in range is reported.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: Option<&PlayerSnapshot>,
        creatures: &CreatureView,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::GameStarted { .. } | Event::SessionReset => {
                    self.accumulator = Duration::ZERO;
                }
                _ => {}
            }
        }

        let Some(player) = player else {
            self.accumulator = Duration::ZERO;
            return;
        };

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        if self.accumulator < self.config.check_interval {
            return;
        }
        if self.config.check_interval.is_zero() {
            self.accumulator = Duration::ZERO;
        } else {
            while self.accumulator >= self.config.check_interval {
                self.accumulator -= self.config.check_interval;
            }
        }

        self.resolve(player, creatures, out);
    }

    fn resolve(&self, player: &PlayerSnapshot, creatures: &CreatureView, out: &mut Vec<Command>) {
        for creature in creatures.iter() {
            if creature.collided {
                continue;
            }

            let radius = self.config.radius(creature.kind);
            let distance = creature.position.distance(player.position);
            if distance < radius {
                trace!(creature = creature.id.get(), distance, radius, "collision detected");
                out.push(Command::EatCreature {
                    creature: creature.id,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swarms_use_the_wider_radius() {
        let config = Config::default();
        assert_eq!(config.radius(CreatureKind::Fish), 50.0);
        assert_eq!(config.radius(CreatureKind::Squid), 50.0);
        assert_eq!(config.radius(CreatureKind::Krill), 70.0);
    }

    #[test]
    fn waits_for_a_full_interval() {
        let mut collision = Collision::new(Config::default());
        collision.accumulator = Duration::from_millis(10);
        let view = CreatureView::from_snapshots(Vec::new());
        let player = PlayerSnapshot {
            position: glam::Vec2::ZERO,
            size: 0.4,
            moving: None,
        };
        let mut out = Vec::new();
        collision.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(4),
            }],
            Some(&player),
            &view,
            &mut out,
        );
        assert_eq!(collision.accumulator, Duration::from_millis(14));

        collision.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(4),
            }],
            Some(&player),
            &view,
            &mut out,
        );
        assert_eq!(collision.accumulator, Duration::from_millis(2));
    }
}
