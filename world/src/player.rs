//! Player-controlled predator with discrete, held-key stepping.

use std::time::Duration;

use glam::Vec2;
use shoal_core::{Direction, Event, PlayerSnapshot, SceneBounds};

/// Pixels of margin kept per unit of player size.
const MARGIN_PER_SIZE: f32 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Player {
    pub(crate) position: Vec2,
    pub(crate) size: f32,
    pub(crate) moving: Option<Direction>,
    accumulator: Duration,
}

impl Player {
    pub(crate) fn new(position: Vec2, size: f32) -> Self {
        Self {
            position,
            size,
            moving: None,
            accumulator: Duration::ZERO,
        }
    }

    /// Records the held direction; movement starts and stops immediately.
    pub(crate) fn set_direction(&mut self, direction: Option<Direction>) {
        if self.moving != direction {
            self.accumulator = Duration::ZERO;
        }
        self.moving = direction;
    }

    /// Applies one constant displacement per elapsed `interval` while a direction is held.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        interval: Duration,
        step: f32,
        bounds: SceneBounds,
        out_events: &mut Vec<Event>,
    ) {
        let Some(direction) = self.moving else {
            self.accumulator = Duration::ZERO;
            return;
        };

        if interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        while self.accumulator >= interval {
            self.accumulator -= interval;
            let from = self.position;
            let to = self.clamp(from + direction.unit() * step, bounds);
            self.position = to;
            out_events.push(Event::PlayerMoved { from, to });
        }
    }

    pub(crate) fn margin(&self) -> f32 {
        self.size * MARGIN_PER_SIZE
    }

    fn clamp(&self, position: Vec2, bounds: SceneBounds) -> Vec2 {
        let margin = self.margin();
        Vec2::new(
            position.x.min(bounds.width() - margin).max(margin),
            position.y.min(bounds.height() - margin).max(margin),
        )
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            size: self.size,
            moving: self.moving,
        }
    }
}
