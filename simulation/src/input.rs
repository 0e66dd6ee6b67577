//! Input and viewport port owned by the simulation loop.

use std::collections::VecDeque;

use shoal_core::{Command, Direction, InputError};
use tracing::trace;

/// Buffers presentation-layer signals until the next tick boundary.
///
/// Key signals are only accepted while the port is attached; viewport
/// updates are always recorded because the scene must track the window
/// even between games.
#[derive(Debug, Default)]
pub struct InputPort {
    attached: bool,
    pending: VecDeque<Command>,
}

impl InputPort {
    /// Creates a detached port with no pending signals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts accepting key signals.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Stops accepting key signals and discards the ones not yet delivered.
    pub fn detach(&mut self) {
        self.attached = false;
        self.pending.retain(|command| {
            !matches!(
                command,
                Command::PressDirection { .. } | Command::ReleaseDirection { .. }
            )
        });
    }

    /// Reports whether key signals are currently accepted.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Records a key press. Unknown keys are reported and leave the port untouched.
    pub fn key_down(&mut self, key: &str) -> Result<(), InputError> {
        let direction = Direction::from_key(key)?;
        self.press(direction);
        Ok(())
    }

    /// Records a key release. Unknown keys are reported and leave the port untouched.
    pub fn key_up(&mut self, key: &str) -> Result<(), InputError> {
        let direction = Direction::from_key(key)?;
        self.release(direction);
        Ok(())
    }

    /// Records a held direction.
    pub fn press(&mut self, direction: Direction) {
        if self.attached {
            trace!(?direction, "direction pressed");
            self.pending.push_back(Command::PressDirection { direction });
        }
    }

    /// Records a released direction.
    pub fn release(&mut self, direction: Direction) {
        if self.attached {
            trace!(?direction, "direction released");
            self.pending
                .push_back(Command::ReleaseDirection { direction });
        }
    }

    /// Records a new viewport size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.pending
            .push_back(Command::ResizeViewport { width, height });
    }

    /// Yields every pending signal in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.pending.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_port_ignores_keys_but_keeps_viewport() {
        let mut port = InputPort::new();
        port.key_down("ArrowUp").expect("known key");
        port.resize(640.0, 480.0);

        let drained: Vec<_> = port.drain().collect();
        assert_eq!(
            drained,
            vec![Command::ResizeViewport {
                width: 640.0,
                height: 480.0
            }]
        );
    }

    #[test]
    fn unknown_keys_are_reported() {
        let mut port = InputPort::new();
        port.attach();
        assert!(port.key_down("Space").is_err());
        assert_eq!(port.drain().count(), 0);
    }

    #[test]
    fn detach_discards_undelivered_keys() {
        let mut port = InputPort::new();
        port.attach();
        port.key_down("d").expect("known key");
        port.resize(800.0, 600.0);
        port.key_up("d").expect("known key");
        port.detach();

        let drained: Vec<_> = port.drain().collect();
        assert_eq!(drained.len(), 1);
        assert!(!port.is_attached());
    }
}
