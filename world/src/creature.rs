//! Autonomous creature movement driven by smoothed steering noise.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use shoal_core::{
    CreatureId, CreatureKind, CreatureSnapshot, EntityPart, Facing, RenderEntity, SceneBounds,
    SteeringNoise, WrapPolicy, PHASE_PERIOD,
};

/// Distance past a horizontal edge at which a creature wraps.
pub(crate) const WRAP_MARGIN: f32 = 100.0;
/// Distance past the opposite edge at which a wrapped creature re-enters.
pub(crate) const REENTRY_OFFSET: f32 = 50.0;

const PHASE_SPAN: f32 = 1_000.0;
const MEMBER_PHASE_STEP: f32 = 0.01;
const MEMBER_VERTICAL_PHASE_OFFSET: f32 = 500.0;
const MEMBER_DRIFT: f32 = 0.5;
/// Furthest a swarm member may stray from the centroid, in multiples of the swarm's spread.
const MEMBER_LEASH: f32 = 1.0;

/// Fixed per-kind integration constants.
#[derive(Clone, Copy, Debug)]
struct KindTuning {
    horizontal_gain: f32,
    vertical_gain: f32,
    burst_chance: f32,
    burst_multiplier: f32,
}

impl KindTuning {
    const fn for_kind(kind: CreatureKind) -> Self {
        match kind {
            CreatureKind::Fish => Self {
                horizontal_gain: 3.0,
                vertical_gain: 1.5,
                burst_chance: 0.0,
                burst_multiplier: 1.0,
            },
            CreatureKind::Squid => Self {
                horizontal_gain: 3.0,
                vertical_gain: 1.5,
                burst_chance: 0.01,
                burst_multiplier: 3.0,
            },
            CreatureKind::Krill => Self {
                horizontal_gain: 2.0,
                vertical_gain: 1.0,
                burst_chance: 0.0,
                burst_multiplier: 1.0,
            },
        }
    }
}

/// Per-instance randomized steering constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MotionProfile {
    pub(crate) speed_multiplier: f32,
    pub(crate) turn_frequency: f32,
    pub(crate) vertical_tendency: f32,
    pub(crate) min_horizontal_speed: f32,
    /// Angular rate of the cosmetic body pulse; zero for kinds that do not pulse.
    pub(crate) pulse_rate: f32,
}

impl MotionProfile {
    pub(crate) fn sample<R: Rng + ?Sized>(kind: CreatureKind, rng: &mut R) -> Self {
        match kind {
            CreatureKind::Fish => Self {
                speed_multiplier: spread(rng, 0.5, 1.5),
                turn_frequency: spread(rng, 0.01, 0.05),
                vertical_tendency: spread(rng, 0.002, 0.8),
                min_horizontal_speed: spread(rng, 0.3, 0.4),
                pulse_rate: 0.0,
            },
            CreatureKind::Squid => Self {
                speed_multiplier: spread(rng, 0.6, 1.2),
                turn_frequency: spread(rng, 0.02, 0.06),
                vertical_tendency: spread(rng, 0.003, 1.2),
                min_horizontal_speed: spread(rng, 0.2, 0.3),
                pulse_rate: spread(rng, 0.02, 0.05),
            },
            CreatureKind::Krill => Self {
                speed_multiplier: spread(rng, 0.3, 0.8),
                turn_frequency: spread(rng, 0.01, 0.03),
                vertical_tendency: spread(rng, 0.001, 0.5),
                min_horizontal_speed: spread(rng, 0.1, 0.2),
                pulse_rate: 0.0,
            },
        }
    }
}

/// One krill inside a swarm; display-only and never collidable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SwarmMember {
    pub(crate) offset: Vec2,
    pub(crate) phase: f32,
    pub(crate) size: f32,
}

impl SwarmMember {
    fn sample<R: Rng + ?Sized>(rng: &mut R, spread_width: f32, swarm_size: f32) -> Self {
        Self {
            offset: Vec2::new(
                (rng.gen::<f32>() - 0.5) * spread_width,
                (rng.gen::<f32>() - 0.5) * spread_width,
            ),
            phase: rng.gen::<f32>() * PHASE_SPAN,
            size: swarm_size * spread(rng, 0.8, 0.4),
        }
    }

    fn drift(&mut self, noise: &dyn SteeringNoise, leash: f32) {
        self.phase = wrap_phase(self.phase + MEMBER_PHASE_STEP);
        self.offset.x += noise.signed(self.phase) * MEMBER_DRIFT;
        self.offset.y += noise.signed(self.phase + MEMBER_VERTICAL_PHASE_OFFSET) * MEMBER_DRIFT;
        self.offset = self.offset.clamp_length_max(leash);
    }
}

/// Shared inputs for a single movement pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MotionContext<'a> {
    pub(crate) bounds: SceneBounds,
    pub(crate) noise: &'a dyn SteeringNoise,
    pub(crate) wrap_policy: WrapPolicy,
    pub(crate) elapsed: Duration,
}

/// A live creature, solitary or swarm.
#[derive(Clone, Debug)]
pub(crate) struct Creature {
    pub(crate) id: CreatureId,
    pub(crate) kind: CreatureKind,
    pub(crate) position: Vec2,
    pub(crate) size: f32,
    pub(crate) profile: MotionProfile,
    pub(crate) phase: Vec2,
    pub(crate) facing: Facing,
    pub(crate) collided: bool,
    pub(crate) pulse_scale: f32,
    /// Width of the cluster members were scattered over; zero for solitary kinds.
    pub(crate) swarm_spread: f32,
    pub(crate) swarm: Vec<SwarmMember>,
}

impl Creature {
    pub(crate) fn spawn<R: Rng + ?Sized>(
        id: CreatureId,
        kind: CreatureKind,
        position: Vec2,
        size: f32,
        rng: &mut R,
    ) -> Self {
        let profile = MotionProfile::sample(kind, rng);
        let phase = random_phase(rng);
        let facing = if rng.gen_bool(0.5) {
            Facing::Right
        } else {
            Facing::Left
        };

        let (swarm_spread, swarm) = if kind.is_swarm() {
            let count = rng.gen_range(5usize..13);
            let spread_width = spread(rng, 10.0, 30.0);
            let members = (0..count)
                .map(|_| SwarmMember::sample(rng, spread_width, size))
                .collect();
            (spread_width, members)
        } else {
            (0.0, Vec::new())
        };

        Self {
            id,
            kind,
            position,
            size,
            profile,
            phase,
            facing,
            collided: false,
            pulse_scale: 1.0,
            swarm_spread,
            swarm,
        }
    }

    /// Advances the creature by one tick.
    ///
    /// Returns the applied policy when the creature wrapped horizontally.
    /// A creature that has already been caught does not move.
    pub(crate) fn advance<R: Rng + ?Sized>(
        &mut self,
        context: &MotionContext<'_>,
        rng: &mut R,
    ) -> Option<WrapPolicy> {
        if self.collided {
            return None;
        }

        let tuning = KindTuning::for_kind(self.kind);
        let profile = self.profile;
        self.phase = Vec2::new(
            wrap_phase(self.phase.x + profile.turn_frequency),
            wrap_phase(self.phase.y + profile.turn_frequency),
        );

        let mut steer_x = context.noise.signed(self.phase.x) * profile.speed_multiplier;
        let mut steer_y = context.noise.signed(self.phase.y)
            * profile.vertical_tendency
            * profile.speed_multiplier;

        if tuning.burst_chance > 0.0 && rng.gen::<f32>() < tuning.burst_chance {
            steer_x *= tuning.burst_multiplier;
            steer_y *= tuning.burst_multiplier;
        }

        if steer_x.abs() < profile.min_horizontal_speed {
            steer_x = if steer_x >= 0.0 {
                profile.min_horizontal_speed
            } else {
                -profile.min_horizontal_speed
            };
        }

        let mut x = self.position.x + steer_x * tuning.horizontal_gain;
        let mut y = self.position.y + steer_y * tuning.vertical_gain;
        self.facing = Facing::from_velocity(steer_x);

        let width = context.bounds.width();
        let wrapped = if x < -WRAP_MARGIN {
            x = width + REENTRY_OFFSET;
            true
        } else if x > width + WRAP_MARGIN {
            x = -REENTRY_OFFSET;
            true
        } else {
            false
        };

        let surface = context.bounds.surface_level();
        let sand = context.bounds.sand_level();
        if wrapped && context.wrap_policy == WrapPolicy::Respawn {
            self.profile = MotionProfile::sample(self.kind, rng);
            self.phase = random_phase(rng);
            y = rng.gen::<f32>() * (sand - surface) + surface;
        }

        if y < surface {
            y = surface;
            self.phase.y = rng.gen::<f32>() * PHASE_SPAN;
        } else if y > sand {
            y = sand;
            self.phase.y = rng.gen::<f32>() * PHASE_SPAN;
        }

        self.position = Vec2::new(x, y);

        if self.profile.pulse_rate > 0.0 {
            let millis = context.elapsed.as_secs_f32() * 1_000.0;
            self.pulse_scale = (millis * self.profile.pulse_rate).sin() * 0.1 + 0.95;
        }

        let leash = self.swarm_spread * MEMBER_LEASH;
        for member in &mut self.swarm {
            member.drift(context.noise, leash);
        }

        wrapped.then_some(context.wrap_policy)
    }

    pub(crate) fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            facing: self.facing,
            collided: self.collided,
        }
    }

    /// Appends drawable records; swarms contribute one record per member.
    pub(crate) fn render_into(&self, out: &mut Vec<RenderEntity>) {
        if self.swarm.is_empty() {
            out.push(RenderEntity {
                id: self.id,
                kind: self.kind,
                part: EntityPart::Body,
                position: self.position,
                facing: self.facing,
                size_scale: self.size * self.pulse_scale,
            });
            return;
        }

        out.extend(self.swarm.iter().enumerate().map(|(index, member)| RenderEntity {
            id: self.id,
            kind: self.kind,
            part: EntityPart::SwarmMember {
                index: u16::try_from(index).unwrap_or(u16::MAX),
            },
            position: self.position + member.offset,
            facing: self.facing,
            size_scale: member.size,
        }));
    }
}

fn spread<R: Rng + ?Sized>(rng: &mut R, base: f32, span: f32) -> f32 {
    rng.gen::<f32>() * span + base
}

fn wrap_phase(phase: f32) -> f32 {
    phase.rem_euclid(PHASE_PERIOD as f32)
}

fn random_phase<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(rng.gen::<f32>() * PHASE_SPAN, rng.gen::<f32>() * PHASE_SPAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shoal_core::ConstantNoise;

    /// Noise that alternates sharply so clamping is exercised often.
    #[derive(Debug)]
    struct SawtoothNoise;

    impl SteeringNoise for SawtoothNoise {
        fn sample(&self, phase: f32) -> f32 {
            phase.fract().abs()
        }
    }

    fn bounds() -> SceneBounds {
        SceneBounds::new(800.0, 600.0).expect("valid bounds")
    }

    fn context(noise: &dyn SteeringNoise, wrap_policy: WrapPolicy) -> MotionContext<'_> {
        MotionContext {
            bounds: bounds(),
            noise,
            wrap_policy,
            elapsed: Duration::from_millis(16),
        }
    }

    fn spawn(kind: CreatureKind, position: Vec2) -> (Creature, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let creature = Creature::spawn(CreatureId::new(1), kind, position, 0.1, &mut rng);
        (creature, rng)
    }

    #[test]
    fn sampled_profiles_respect_kind_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            let fish = MotionProfile::sample(CreatureKind::Fish, &mut rng);
            assert!((0.5..2.0).contains(&fish.speed_multiplier));
            assert!((0.3..0.7).contains(&fish.min_horizontal_speed));
            assert_eq!(fish.pulse_rate, 0.0);

            let squid = MotionProfile::sample(CreatureKind::Squid, &mut rng);
            assert!((0.02..0.07).contains(&squid.pulse_rate));

            let krill = MotionProfile::sample(CreatureKind::Krill, &mut rng);
            assert!((0.01..0.04).contains(&krill.turn_frequency));
        }
    }

    #[test]
    fn swarms_carry_between_five_and_twelve_members() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for id in 0..50 {
            let krill = Creature::spawn(
                CreatureId::new(id),
                CreatureKind::Krill,
                Vec2::new(100.0, 300.0),
                0.03,
                &mut rng,
            );
            assert!((5..=12).contains(&krill.swarm.len()));
        }
        let (fish, _) = spawn(CreatureKind::Fish, Vec2::new(100.0, 300.0));
        assert!(fish.swarm.is_empty());
    }

    #[test]
    fn neutral_noise_still_drives_minimum_horizontal_speed() {
        let (mut fish, mut rng) = spawn(CreatureKind::Fish, Vec2::new(400.0, 300.0));
        let noise = ConstantNoise(0.5);
        let minimum = fish.profile.min_horizontal_speed;

        let wrapped = fish.advance(&context(&noise, WrapPolicy::Translate), &mut rng);

        assert!(wrapped.is_none());
        assert!((fish.position.x - (400.0 + minimum * 3.0)).abs() < 1e-3);
        assert!((fish.position.y - 300.0).abs() < 1e-3);
        assert_eq!(fish.facing, Facing::Right);
    }

    #[test]
    fn phase_advances_by_turn_frequency() {
        let (mut squid, mut rng) = spawn(CreatureKind::Squid, Vec2::new(400.0, 300.0));
        let before = squid.phase;
        let turn = squid.profile.turn_frequency;
        let noise = ConstantNoise(0.5);

        let _ = squid.advance(&context(&noise, WrapPolicy::Translate), &mut rng);

        assert!((squid.phase.x - (before.x + turn)).abs() < 1e-3);
        assert!((squid.phase.y - (before.y + turn)).abs() < 1e-3);
    }

    #[test]
    fn phase_wraps_at_the_noise_period() {
        let (mut fish, mut rng) = spawn(CreatureKind::Fish, Vec2::new(400.0, 300.0));
        let period = PHASE_PERIOD as f32;
        fish.phase = Vec2::splat(period - 0.001);
        let noise = ConstantNoise(0.5);

        for _ in 0..10_000 {
            let _ = fish.advance(&context(&noise, WrapPolicy::Translate), &mut rng);
            assert!((0.0..period).contains(&fish.phase.x));
            assert!((0.0..period).contains(&fish.phase.y));
        }
    }

    #[test]
    fn leaving_left_edge_reenters_past_right_edge() {
        let (mut fish, mut rng) = spawn(CreatureKind::Fish, Vec2::new(-99.0, 300.0));
        let noise = ConstantNoise(0.0);

        let wrapped = fish.advance(&context(&noise, WrapPolicy::Translate), &mut rng);

        assert_eq!(wrapped, Some(WrapPolicy::Translate));
        assert!((fish.position.x - (800.0 + REENTRY_OFFSET)).abs() < 1e-3);
        assert_eq!(fish.facing, Facing::Left);
    }

    #[test]
    fn leaving_right_edge_reenters_past_left_edge() {
        let (mut fish, mut rng) = spawn(CreatureKind::Fish, Vec2::new(899.5, 300.0));
        let noise = ConstantNoise(1.0);

        let wrapped = fish.advance(&context(&noise, WrapPolicy::Translate), &mut rng);

        assert_eq!(wrapped, Some(WrapPolicy::Translate));
        assert!((fish.position.x + REENTRY_OFFSET).abs() < 1e-3);
    }

    #[test]
    fn translate_wrap_keeps_profile_and_depth() {
        let (mut fish, mut rng) = spawn(CreatureKind::Fish, Vec2::new(-99.0, 300.0));
        let profile = fish.profile;
        let noise = ConstantNoise(0.0);

        let _ = fish.advance(&context(&noise, WrapPolicy::Translate), &mut rng);

        assert_eq!(fish.profile, profile);
    }

    #[test]
    fn respawn_wrap_resamples_profile_and_depth() {
        let (mut fish, mut rng) = spawn(CreatureKind::Fish, Vec2::new(-99.0, 300.0));
        let profile = fish.profile;
        let noise = ConstantNoise(0.0);

        let wrapped = fish.advance(&context(&noise, WrapPolicy::Respawn), &mut rng);

        assert_eq!(wrapped, Some(WrapPolicy::Respawn));
        assert_ne!(fish.profile, profile);
        assert!(bounds().contains_depth(fish.position.y));
        assert!(fish.position.x > 800.0);
    }

    #[test]
    fn hitting_the_sand_snaps_depth_and_reseeds_vertical_phase() {
        let (mut fish, mut rng) = spawn(CreatureKind::Fish, Vec2::new(400.0, 539.9));
        fish.profile.vertical_tendency = 0.8;
        fish.profile.speed_multiplier = 2.0;
        let phase_before = fish.phase.y + fish.profile.turn_frequency;
        let noise = ConstantNoise(1.0);

        let _ = fish.advance(&context(&noise, WrapPolicy::Translate), &mut rng);

        assert_eq!(fish.position.y, bounds().sand_level());
        assert!((fish.phase.y - phase_before).abs() > 1e-6);
    }

    #[test]
    fn depth_never_leaves_the_swimming_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let noise = SawtoothNoise;
        let mut creatures: Vec<Creature> = CreatureKind::ALL
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                Creature::spawn(
                    CreatureId::new(index as u32),
                    *kind,
                    Vec2::new(100.0 * index as f32, 300.0),
                    0.1,
                    &mut rng,
                )
            })
            .collect();

        for tick in 0..5_000u64 {
            let ctx = MotionContext {
                bounds: bounds(),
                noise: &noise,
                wrap_policy: if tick % 2 == 0 {
                    WrapPolicy::Translate
                } else {
                    WrapPolicy::Respawn
                },
                elapsed: Duration::from_millis(tick * 16),
            };
            for creature in &mut creatures {
                let _ = creature.advance(&ctx, &mut rng);
                assert!(bounds().contains_depth(creature.position.y));
                assert!(creature.position.x >= -WRAP_MARGIN - 1.0);
                assert!(creature.position.x <= 800.0 + WRAP_MARGIN + 1.0);
            }
        }
    }

    #[test]
    fn caught_creatures_do_not_move() {
        let (mut fish, mut rng) = spawn(CreatureKind::Fish, Vec2::new(400.0, 300.0));
        fish.collided = true;
        let noise = ConstantNoise(0.9);

        let wrapped = fish.advance(&context(&noise, WrapPolicy::Translate), &mut rng);

        assert!(wrapped.is_none());
        assert_eq!(fish.position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn squid_pulse_stays_in_cosmetic_range() {
        let (mut squid, mut rng) = spawn(CreatureKind::Squid, Vec2::new(400.0, 300.0));
        let noise = ConstantNoise(0.5);
        for tick in 0..200u64 {
            let ctx = MotionContext {
                elapsed: Duration::from_millis(tick * 16),
                ..context(&noise, WrapPolicy::Translate)
            };
            let _ = squid.advance(&ctx, &mut rng);
            assert!((0.85..=1.05).contains(&squid.pulse_scale));
        }
    }

    #[test]
    fn swarm_members_stay_within_their_cluster() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let noise = ConstantNoise(1.0);
        let ctx = context(&noise, WrapPolicy::Translate);
        let mut swarms: Vec<Creature> = (0..20)
            .map(|id| {
                Creature::spawn(
                    CreatureId::new(id),
                    CreatureKind::Krill,
                    Vec2::new(400.0, 300.0),
                    0.03,
                    &mut rng,
                )
            })
            .collect();

        for _ in 0..3_600 {
            for swarm in &mut swarms {
                let _ = swarm.advance(&ctx, &mut rng);
                let leash = swarm.swarm_spread * MEMBER_LEASH;
                for member in &swarm.swarm {
                    assert!(member.offset.length() <= leash + 1e-3);
                    assert!((0.0..PHASE_PERIOD as f32).contains(&member.phase));
                }
            }
        }

        for swarm in &swarms {
            assert!((10.0..=40.0).contains(&swarm.swarm_spread));
            let leash = swarm.swarm_spread * MEMBER_LEASH;
            assert!(swarm
                .swarm
                .iter()
                .all(|member| (member.offset.length() - leash).abs() < 1e-2));
        }
    }

    #[test]
    fn swarms_render_one_entity_per_member() {
        let (krill, _) = spawn(CreatureKind::Krill, Vec2::new(400.0, 300.0));
        let mut out = Vec::new();
        krill.render_into(&mut out);
        assert_eq!(out.len(), krill.swarm.len());
        assert!(out
            .iter()
            .all(|entity| matches!(entity.part, EntityPart::SwarmMember { .. })));

        let (fish, _) = spawn(CreatureKind::Fish, Vec2::new(400.0, 300.0));
        out.clear();
        fish.render_into(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].part, EntityPart::Body);
    }
}
