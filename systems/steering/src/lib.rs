#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded one-dimensional octave noise used to steer creatures.
//!
//! The noise field is a lattice of uniform random values blended with a
//! cosine ease between neighbouring lattice points and summed over several
//! octaves of halving amplitude. It holds no mutable state: creatures own and
//! advance their own phases and only read from the field.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shoal_core::{SteeringNoise, PHASE_PERIOD};

const LATTICE_SIZE: usize = PHASE_PERIOD as usize;
const LATTICE_MASK: u64 = LATTICE_SIZE as u64 - 1;
const DEFAULT_OCTAVES: u32 = 4;
const DEFAULT_FALLOFF: f32 = 0.5;

/// Octave value noise sampled along a single phase axis.
#[derive(Clone)]
pub struct PerlinSteering {
    lattice: Box<[f32]>,
    octaves: u32,
    falloff: f32,
}

impl PerlinSteering {
    /// Builds a noise field whose lattice is drawn from the provided seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    /// Builds a noise field whose lattice is drawn from `rng`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let lattice = (0..LATTICE_SIZE).map(|_| rng.gen::<f32>()).collect();
        Self {
            lattice,
            octaves: DEFAULT_OCTAVES,
            falloff: DEFAULT_FALLOFF,
        }
    }

    /// Adjusts the number of octaves and the amplitude falloff between them.
    ///
    /// At least one octave is always sampled and the falloff is clamped to
    /// `(0, 1)` so the output stays inside `[0, 1]`.
    #[must_use]
    pub fn with_detail(mut self, octaves: u32, falloff: f32) -> Self {
        self.octaves = octaves.max(1);
        self.falloff = if falloff.is_finite() {
            falloff.clamp(f32::EPSILON, 1.0 - f32::EPSILON)
        } else {
            DEFAULT_FALLOFF
        };
        self
    }

    /// Largest value the field can produce.
    #[must_use]
    pub fn peak(&self) -> f32 {
        let mut amplitude = 0.5;
        let mut total = 0.0;
        for _ in 0..self.octaves {
            total += amplitude;
            amplitude *= self.falloff;
        }
        total
    }

    fn lattice_value(&self, index: u64) -> f32 {
        self.lattice[(index & LATTICE_MASK) as usize]
    }
}

impl SteeringNoise for PerlinSteering {
    fn sample(&self, phase: f32) -> f32 {
        if !phase.is_finite() {
            return 0.0;
        }

        let x = phase.abs();
        let mut cell = x.floor() as u64;
        let mut fraction = x - x.floor();
        let mut amplitude = 0.5;
        let mut total = 0.0;

        for _ in 0..self.octaves {
            let weight = scaled_cosine(fraction);
            let start = self.lattice_value(cell);
            let end = self.lattice_value(cell.wrapping_add(1));
            total += (start + weight * (end - start)) * amplitude;

            amplitude *= self.falloff;
            cell = cell.wrapping_shl(1);
            fraction *= 2.0;
            if fraction >= 1.0 {
                cell = cell.wrapping_add(1);
                fraction -= 1.0;
            }
        }

        total
    }
}

impl fmt::Debug for PerlinSteering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerlinSteering")
            .field("lattice_size", &self.lattice.len())
            .field("octaves", &self.octaves)
            .field("falloff", &self.falloff)
            .finish()
    }
}

fn scaled_cosine(t: f32) -> f32 {
    0.5 * (1.0 - (t * std::f32::consts::PI).cos())
}
