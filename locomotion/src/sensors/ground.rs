use std::f32::consts::FRAC_1_SQRT_2;

use crate::config::LocomotionConfig;
use crate::constants::{GROUND_RAY_COUNT, GROUND_RAY_LENGTH_FACTOR};
use crate::query::CollisionQuery;
use crate::types::{GroundSample, MovementContext, Point3, UnitVec3, Vec3, world_up};

/// Planar (x, z) directions of the ground rays: 4 cardinal + 4 diagonal.
const PROBE_DIRECTIONS: [(f32, f32); GROUND_RAY_COUNT] = [
    (1.0, 0.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (0.0, 1.0),
    (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (-1.0, 0.0),
    (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (0.0, -1.0),
    (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

/// Multi-ray ground classification.
///
/// Behavior
/// - Casts 8 downward rays from a ring around the base. Origins sit one radius above the
///   feet and each ray is `radius * 1.5` long, so it reaches half a radius below the feet.
/// - Grounded when at least `min_ground_hits` (default 3) rays hit. Fewer hits count as
///   airborne even if the body reports contact, which biases small ledges toward falling.
/// - The normal is the normalized mean of the hit normals, world up when airborne.
/// - After a jump, detection is suppressed for a short window so the actor cannot re-ground
///   before it has lifted off.
#[derive(Clone, Debug)]
pub struct GroundSensor {
    probe_spread: f32,
    min_hits: u8,
    check_distance: f32,
    suppress_window: f32,
    suppress_remaining: f32,
}

impl GroundSensor {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            probe_spread: config.ground_probe_spread,
            min_hits: config.min_ground_hits,
            check_distance: config.ground_check_distance,
            suppress_window: config.jump_ground_suppress,
            suppress_remaining: 0.0,
        }
    }

    /// Ignore the ground for the configured post-jump window.
    pub fn suppress(&mut self) {
        self.suppress_remaining = self.suppress_window;
    }

    #[inline]
    pub fn is_suppressed(&self) -> bool {
        self.suppress_remaining > 0.0
    }

    /// Advance the suppression timer.
    pub fn tick(&mut self, dt: f32) {
        self.suppress_remaining = (self.suppress_remaining - dt).max(0.0);
    }

    /// World-space origins of the 8 ground rays for an actor standing at `base`.
    pub fn probe_origins(&self, base: Point3, radius: f32) -> [Point3; GROUND_RAY_COUNT] {
        let ring = radius * self.probe_spread;
        PROBE_DIRECTIONS.map(|(x, z)| base + Vec3::new(x * ring, radius, z * ring))
    }

    /// Raw ray classification, without suppression or the body cross-check.
    pub fn sample<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &MovementContext,
    ) -> GroundSample {
        let radius = context.radius;
        let length = radius * GROUND_RAY_LENGTH_FACTOR;
        let down = UnitVec3::new_unchecked(-world_up());

        let mut hits: u8 = 0;
        let mut normal_sum = Vec3::zeros();
        for origin in self.probe_origins(context.position, radius) {
            if let Some(hit) = query.cast_ray(origin, down, length) {
                hits += 1;
                normal_sum += hit.normal;
            }
        }

        if hits < self.min_hits {
            return GroundSample::airborne(hits);
        }

        GroundSample {
            grounded: true,
            normal: normal_sum.try_normalize(1.0e-6).unwrap_or_else(world_up),
            support_ray_hits: hits,
        }
    }

    /// Small sphere just under the capsule bottom. Used as a cross-check of the rays.
    pub fn bottom_overlap<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &MovementContext,
    ) -> bool {
        let probe_radius = context.radius * 0.5;
        let center = context.position + world_up() * (probe_radius - self.check_distance);
        query.overlap_sphere(center, probe_radius)
    }

    /// Sample the ground and write the result into the context.
    ///
    /// The context is only grounded when the rays agree with either the capsule-bottom
    /// overlap or the body's own contact report from the previous move.
    pub fn refresh<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &mut MovementContext,
    ) -> GroundSample {
        let sample = if self.is_suppressed() {
            GroundSample::airborne(0)
        } else {
            self.sample(query, context)
        };

        let supported =
            sample.grounded && (context.body_grounded || self.bottom_overlap(query, context));

        context.support_ray_hits = sample.support_ray_hits;
        context.is_grounded = supported;
        context.ground_normal = if supported { sample.normal } else { world_up() };
        context.is_falling = !supported && context.vertical_velocity < 0.0;

        log::trace!(
            "ground: hits={} grounded={} normal={:?}",
            sample.support_ray_hits,
            supported,
            context.ground_normal
        );

        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockWorld, Region};

    fn actor_at(x: f32, y: f32) -> MovementContext {
        MovementContext::new(Point3::new(x, y, 0.0), 0.4, 1.8, 1.6)
    }

    fn sensor() -> GroundSensor {
        GroundSensor::new(&LocomotionConfig::default())
    }

    #[test]
    fn flat_floor_under_all_rays_is_grounded() {
        let world = MockWorld::flat(0.0);
        let sample = sensor().sample(&world, &actor_at(0.0, 0.02));
        assert!(sample.grounded);
        assert_eq!(sample.support_ray_hits, 8);
        assert!((sample.normal - Vec3::y()).norm() < 1.0e-6);
    }

    #[test]
    fn three_hits_are_enough() {
        // Ring offset is 0.36; with the edge at -0.2 only the three -X probes remain over floor.
        let world = MockWorld::default().with_floor(0.0, Region::XBelow(-0.2));
        let sample = sensor().sample(&world, &actor_at(0.0, 0.02));
        assert_eq!(sample.support_ray_hits, 3);
        assert!(sample.grounded);
    }

    #[test]
    fn two_hits_are_airborne_even_if_the_body_reports_contact() {
        // Only the single -X probe (x = -0.36) is over the floor.
        let world = MockWorld::default().with_floor(0.0, Region::XBelow(-0.3));
        let s = sensor();
        let mut ctx = actor_at(0.0, 0.02);
        ctx.body_grounded = true;

        let sample = s.refresh(&world, &mut ctx);
        assert!(sample.support_ray_hits <= 2);
        assert!(!sample.grounded);
        assert!(!ctx.is_grounded);
        assert_eq!(ctx.ground_normal, Vec3::y());
    }

    #[test]
    fn no_hits_fall_back_to_world_up() {
        let world = MockWorld::default();
        let sample = sensor().sample(&world, &actor_at(0.0, 5.0));
        assert!(!sample.grounded);
        assert_eq!(sample.support_ray_hits, 0);
        assert_eq!(sample.normal, Vec3::y());
    }

    #[test]
    fn tilted_floor_normal_matches_the_plane() {
        let angle = 15.0_f32.to_radians();
        let world = MockWorld::tilted(15.0);
        let sample = sensor().sample(&world, &actor_at(0.0, 0.02));
        assert_eq!(sample.support_ray_hits, 8);

        let expected = Vec3::new(angle.sin(), angle.cos(), 0.0);
        assert!((sample.normal - expected).norm() < 1.0e-5);
    }

    #[test]
    fn mixed_floor_averages_only_the_hits() {
        // Flat floor on the -X side, a 15 degree plane on the +X side, nothing in between:
        // the two probes at x = 0 miss.
        let a = 15.0_f32.to_radians();
        let tilted = Vec3::new(-a.sin(), a.cos(), 0.0);
        let world = MockWorld::default()
            .with_floor(0.0, Region::XBelow(-0.2))
            .with_plane(Point3::new(0.0, -0.05, 0.0), tilted, Region::XAbove(0.2));

        let sample = sensor().sample(&world, &actor_at(0.0, 0.02));
        assert_eq!(sample.support_ray_hits, 6);

        let expected = (Vec3::y() * 3.0 + tilted * 3.0).normalize();
        assert!((sample.normal - expected).norm() < 1.0e-5);
    }

    #[test]
    fn grounded_requires_the_body_or_bottom_overlap() {
        let world = MockWorld::flat(0.0);
        let s = sensor();

        // Hovering 0.15 above the floor: rays reach, the 0.1 bottom check does not.
        let mut ctx = actor_at(0.0, 0.15);
        s.refresh(&world, &mut ctx);
        assert!(!ctx.is_grounded);

        ctx.body_grounded = true;
        s.refresh(&world, &mut ctx);
        assert!(ctx.is_grounded);

        let mut resting = actor_at(0.0, 0.02);
        s.refresh(&world, &mut resting);
        assert!(resting.is_grounded);
    }

    #[test]
    fn suppression_hides_the_ground_until_it_expires() {
        let world = MockWorld::flat(0.0);
        let mut s = sensor();
        let mut ctx = actor_at(0.0, 0.02);

        s.suppress();
        s.refresh(&world, &mut ctx);
        assert!(!ctx.is_grounded);

        s.tick(LocomotionConfig::default().jump_ground_suppress + 0.01);
        s.refresh(&world, &mut ctx);
        assert!(ctx.is_grounded);
    }

    #[test]
    fn falling_flag_follows_ground_and_vertical_velocity() {
        let world = MockWorld::default();
        let s = sensor();
        let mut ctx = actor_at(0.0, 3.0);

        ctx.vertical_velocity = 1.0;
        s.refresh(&world, &mut ctx);
        assert!(!ctx.is_falling);

        ctx.vertical_velocity = -1.0;
        s.refresh(&world, &mut ctx);
        assert!(ctx.is_falling);
    }
}
