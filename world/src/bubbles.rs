//! Decorative bubbles rising through ambient scenes.

use glam::Vec2;
use rand::Rng;
use shoal_core::{BubbleSnapshot, SceneBounds};

/// Height above the top edge at which a bubble is recycled.
const POP_HEIGHT: f32 = -10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bubble {
    position: Vec2,
    speed: f32,
    radius: f32,
    alpha: f32,
}

impl Bubble {
    fn sample<R: Rng + ?Sized>(bounds: SceneBounds, rng: &mut R) -> Self {
        Self {
            position: Vec2::new(
                rng.gen::<f32>() * bounds.width(),
                bounds.height() + rng.gen::<f32>() * 20.0,
            ),
            speed: rng.gen::<f32>() + 0.5,
            radius: rng.gen::<f32>() * 8.0 + 2.0,
            alpha: rng.gen::<f32>() * 0.3 + 0.1,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct BubbleField {
    bubbles: Vec<Bubble>,
}

impl BubbleField {
    pub(crate) fn fill<R: Rng + ?Sized>(&mut self, count: usize, bounds: SceneBounds, rng: &mut R) {
        self.bubbles.clear();
        self.bubbles
            .extend((0..count).map(|_| Bubble::sample(bounds, rng)));
    }

    pub(crate) fn clear(&mut self) {
        self.bubbles.clear();
    }

    pub(crate) fn advance<R: Rng + ?Sized>(&mut self, bounds: SceneBounds, rng: &mut R) {
        for bubble in &mut self.bubbles {
            bubble.position.y -= bubble.speed;
            if bubble.position.y < POP_HEIGHT {
                *bubble = Bubble::sample(bounds, rng);
            }
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<BubbleSnapshot> {
        self.bubbles
            .iter()
            .map(|bubble| BubbleSnapshot {
                position: bubble.position,
                radius: bubble.radius,
                alpha: bubble.alpha,
            })
            .collect()
    }
}
