//! Vertical velocity integration and steep-slope sliding.

use crate::config::LocomotionConfig;
use crate::constants::{GROUND_RAY_LENGTH_FACTOR, MAX_FIXED_STEPS_PER_TICK};
use crate::query::CollisionQuery;
use crate::types::{MovementContext, UnitVec3, Vec3, world_up};

/// Integrates gravity into [`MovementContext::vertical_velocity`] and drives slope sliding.
///
/// - Grounded with a downward vertical velocity: held at `grounded_gravity` so the body keeps
///   pressing into the floor without accumulating speed.
/// - Otherwise `vv += gravity * multiplier * dt`, never below `-terminal_fall_speed`.
/// - While grounded on a surface steeper than the slope limit for longer than the threshold,
///   the actor slides down-slope and its vertical velocity is held at twice the grounded
///   gravity.
///
/// [`GravityIntegrator::step`] runs this in fixed `fixed_dt` steps and integrates the vertical
/// travel into [`MovementContext::vertical_displacement`]; leftover frame time carries over
/// to the next tick.
#[derive(Clone, Debug)]
pub struct GravityIntegrator {
    gravity: f32,
    multiplier: f32,
    grounded_gravity: f32,
    terminal_fall_speed: f32,
    slope_limit_deg: f32,
    slide_threshold: f32,
    slide_speed_per_degree: f32,
    max_slide_speed: f32,
    steep_time: f32,
    fixed_dt: f32,
    accumulator: f32,
}

impl GravityIntegrator {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            gravity: config.gravity,
            multiplier: config.gravity_multiplier,
            grounded_gravity: config.grounded_gravity,
            terminal_fall_speed: config.terminal_fall_speed,
            slope_limit_deg: config.slope_limit_deg,
            slide_threshold: config.slope_slide_threshold,
            slide_speed_per_degree: config.slide_speed_per_degree,
            max_slide_speed: config.max_slide_speed,
            steep_time: 0.0,
            fixed_dt: config.fixed_dt,
            accumulator: 0.0,
        }
    }

    /// Seconds spent continuously on a too-steep surface.
    #[inline]
    pub fn steep_time(&self) -> f32 {
        self.steep_time
    }

    /// Advance the fixed gravity pass by one frame of `dt` seconds.
    ///
    /// Returns the number of fixed steps taken. Each step adds `vv * fixed_dt` to the
    /// context's pending vertical displacement.
    pub fn step<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        context: &mut MovementContext,
        dt: f32,
    ) -> u32 {
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.fixed_dt {
            if steps == MAX_FIXED_STEPS_PER_TICK {
                log::debug!(
                    "gravity pass dropped {:.4}s after {steps} steps",
                    self.accumulator
                );
                self.accumulator = 0.0;
                break;
            }
            self.integrate(query, context, self.fixed_dt);
            context.vertical_displacement += context.vertical_velocity * self.fixed_dt;
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }
        steps
    }

    /// One gravity step of `dt` seconds (vertical velocity and slope state only).
    pub fn integrate<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        context: &mut MovementContext,
        dt: f32,
    ) {
        if context.is_grounded && context.vertical_velocity < 0.0 {
            context.vertical_velocity = self.grounded_gravity;
        } else {
            let accel = self.gravity * self.multiplier;
            context.vertical_velocity =
                (context.vertical_velocity + accel * dt).max(-self.terminal_fall_speed);
        }

        self.update_slope(query, context, dt);
    }

    fn update_slope<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        context: &mut MovementContext,
        dt: f32,
    ) {
        let surface = if context.is_grounded {
            self.surface_below(query, context)
        } else {
            None
        };

        let Some(normal) = surface else {
            self.steep_time = 0.0;
            context.slide_velocity = Vec3::zeros();
            return;
        };

        let angle = surface_angle_deg(normal);
        if angle <= self.slope_limit_deg {
            self.steep_time = 0.0;
            context.slide_velocity = Vec3::zeros();
            return;
        }

        self.steep_time += dt;
        if self.steep_time <= self.slide_threshold {
            context.slide_velocity = Vec3::zeros();
            return;
        }

        context.slide_velocity = slide_direction(normal) * self.slide_speed(angle);
        if !context.is_jumping {
            context.vertical_velocity = 2.0 * self.grounded_gravity;
        }
    }

    /// Normal of the surface straight below the capsule center, if any.
    fn surface_below<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &MovementContext,
    ) -> Option<Vec3> {
        let down = UnitVec3::new_unchecked(-world_up());
        let length = context.center_y + context.radius * GROUND_RAY_LENGTH_FACTOR;
        let hit = query.cast_ray(context.capsule_center(), down, length)?;
        hit.normal.try_normalize(1.0e-6)
    }

    /// Slide speed for a surface `angle_deg` from horizontal.
    #[inline]
    pub fn slide_speed(&self, angle_deg: f32) -> f32 {
        (angle_deg.max(0.0) * self.slide_speed_per_degree).min(self.max_slide_speed)
    }
}

/// Angle between a surface normal and world up, in degrees.
#[inline]
pub fn surface_angle_deg(n: Vec3) -> f32 {
    n.dot(&world_up()).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Unit down-slope direction along a surface with normal `n`.
///
/// `cross(cross(up, n), n)`; zero on flat ground.
pub fn slide_direction(n: Vec3) -> Vec3 {
    world_up()
        .cross(&n)
        .cross(&n)
        .try_normalize(1.0e-6)
        .unwrap_or_else(Vec3::zeros)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_support::MockWorld;
    use crate::types::Point3;

    fn actor() -> MovementContext {
        MovementContext::new(Point3::new(0.0, 0.02, 0.0), 0.4, 1.8, 1.6)
    }

    fn grounded() -> MovementContext {
        let mut ctx = actor();
        ctx.is_grounded = true;
        ctx
    }

    #[test]
    fn grounded_downward_velocity_is_clamped() {
        let world = MockWorld::flat(0.0);
        let config = LocomotionConfig::default();
        let mut g = GravityIntegrator::new(&config);
        let mut ctx = grounded();
        ctx.vertical_velocity = -7.0;

        g.integrate(&world, &mut ctx, 1.0 / 60.0);
        assert_eq!(ctx.vertical_velocity, config.grounded_gravity);
    }

    #[test]
    fn airborne_velocity_accumulates_and_is_terminal_clamped() {
        let world = MockWorld::default();
        let config = LocomotionConfig::default();
        let mut g = GravityIntegrator::new(&config);
        let mut ctx = actor();

        let dt = 0.1;
        g.integrate(&world, &mut ctx, dt);
        let expected = config.gravity * config.gravity_multiplier * dt;
        assert!((ctx.vertical_velocity - expected).abs() < 1.0e-5);

        for _ in 0..1000 {
            g.integrate(&world, &mut ctx, dt);
        }
        assert_eq!(ctx.vertical_velocity, -config.terminal_fall_speed);
    }

    #[test]
    fn rising_grounded_actor_still_gets_gravity() {
        let world = MockWorld::flat(0.0);
        let config = LocomotionConfig::default();
        let mut g = GravityIntegrator::new(&config);
        let mut ctx = grounded();
        ctx.vertical_velocity = config.jump_impulse;

        g.integrate(&world, &mut ctx, 0.01);
        assert!(ctx.vertical_velocity < config.jump_impulse);
        assert!(ctx.vertical_velocity > 0.0);
    }

    #[test]
    fn steep_slope_slides_only_after_the_threshold() {
        let world = MockWorld::tilted(60.0);
        let config = LocomotionConfig::default();
        let mut g = GravityIntegrator::new(&config);
        let mut ctx = grounded();
        let dt = 0.06;

        // 0.2 s threshold: the first three ticks only accumulate.
        for _ in 0..3 {
            g.integrate(&world, &mut ctx, dt);
            assert_eq!(ctx.slide_velocity, Vec3::zeros());
        }

        g.integrate(&world, &mut ctx, dt);
        assert!(ctx.slide_velocity.norm() > 0.0);
        // The plane rises toward -X, so downhill is +X and downward.
        assert!(ctx.slide_velocity.x > 0.0);
        assert!(ctx.slide_velocity.y < 0.0);
        assert_eq!(ctx.vertical_velocity, 2.0 * config.grounded_gravity);
    }

    #[test]
    fn walkable_slope_resets_the_counter() {
        let steep = MockWorld::tilted(60.0);
        let gentle = MockWorld::tilted(20.0);
        let mut g = GravityIntegrator::new(&LocomotionConfig::default());
        let mut ctx = grounded();

        g.integrate(&steep, &mut ctx, 0.1);
        assert!(g.steep_time() > 0.0);

        g.integrate(&gentle, &mut ctx, 0.1);
        assert_eq!(g.steep_time(), 0.0);
        assert_eq!(ctx.slide_velocity, Vec3::zeros());
    }

    #[test]
    fn leaving_the_ground_resets_the_counter() {
        let steep = MockWorld::tilted(60.0);
        let mut g = GravityIntegrator::new(&LocomotionConfig::default());
        let mut ctx = grounded();

        g.integrate(&steep, &mut ctx, 0.1);
        ctx.is_grounded = false;
        g.integrate(&steep, &mut ctx, 0.1);
        assert_eq!(g.steep_time(), 0.0);
    }

    #[test]
    fn slide_direction_is_zero_on_flat_ground() {
        assert_eq!(slide_direction(Vec3::y()), Vec3::zeros());
    }

    proptest! {
        #[test]
        fn slide_speed_never_decreases_with_angle(a in 0.0f32..90.0, b in 0.0f32..90.0) {
            let g = GravityIntegrator::new(&LocomotionConfig::default());
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(g.slide_speed(lo) <= g.slide_speed(hi));
            prop_assert!(g.slide_speed(hi) <= LocomotionConfig::default().max_slide_speed);
        }

        #[test]
        fn slide_direction_points_downhill(angle in 1.0f32..89.0, yaw in 0.0f32..std::f32::consts::TAU) {
            let a = angle.to_radians();
            let (s, c) = yaw.sin_cos();
            let n = Vec3::new(a.sin() * c, a.cos(), a.sin() * s);
            let dir = slide_direction(n);
            prop_assert!((dir.norm() - 1.0).abs() < 1.0e-4);
            prop_assert!(dir.y < 0.0);
            prop_assert!(dir.dot(&n).abs() < 1.0e-4);
        }
    }

    #[test]
    fn fixed_pass_is_independent_of_the_frame_split() {
        let world = MockWorld::default();
        // Binary-exact step so both frame splits land on the same step boundaries.
        let config = LocomotionConfig {
            fixed_dt: 0.25,
            ..LocomotionConfig::default()
        };

        let mut coarse = GravityIntegrator::new(&config);
        let mut a = actor();
        a.vertical_velocity = config.jump_impulse;
        let mut coarse_steps = 0;
        for _ in 0..15 {
            coarse_steps += coarse.step(&world, &mut a, 1.0);
        }

        let mut fine = GravityIntegrator::new(&config);
        let mut b = actor();
        b.vertical_velocity = config.jump_impulse;
        let mut fine_steps = 0;
        for _ in 0..240 {
            fine_steps += fine.step(&world, &mut b, 0.0625);
        }

        assert_eq!(coarse_steps, 60);
        assert_eq!(fine_steps, 60);
        assert_eq!(a.vertical_velocity, b.vertical_velocity);
        assert_eq!(a.vertical_displacement, b.vertical_displacement);
    }

    #[test]
    fn short_frames_wait_for_a_full_step() {
        let world = MockWorld::default();
        let config = LocomotionConfig::default();
        let mut g = GravityIntegrator::new(&config);
        let mut ctx = actor();

        assert_eq!(g.step(&world, &mut ctx, config.fixed_dt * 0.4), 0);
        assert_eq!(ctx.vertical_velocity, 0.0);
        assert_eq!(ctx.vertical_displacement, 0.0);

        assert_eq!(g.step(&world, &mut ctx, config.fixed_dt * 0.7), 1);
        assert!(ctx.vertical_velocity < 0.0);
        let expected = ctx.vertical_velocity * config.fixed_dt;
        assert!((ctx.vertical_displacement - expected).abs() < 1.0e-6);
    }

    #[test]
    fn long_frames_are_capped() {
        let world = MockWorld::default();
        let config = LocomotionConfig::default();
        let mut g = GravityIntegrator::new(&config);
        let mut ctx = actor();

        let steps = g.step(&world, &mut ctx, config.fixed_dt * 100.0);
        assert_eq!(steps, MAX_FIXED_STEPS_PER_TICK);
        assert_eq!(g.step(&world, &mut ctx, 0.0), 0);
    }
}
