use crate::config::LocomotionConfig;
use crate::constants::DIST_EPS;
use crate::query::CollisionQuery;
use crate::types::{InputIntent, MoveOutcome, MovementContext, Vec3, ViewBasis, world_up};

// NOTE: This module only produces velocities and the desired translation. Collision
// resolution belongs to `CollisionQuery::move_character`; ground and step state belong
// to the sensors.

/// Camera-relative planar movement and the final displacement of each tick.
#[derive(Clone, Debug)]
pub struct LocomotionIntegrator {
    walk_speed: f32,
    run_speed: f32,
    crouch_speed: f32,
    smoothing: f32,
    air_control: f32,
}

impl LocomotionIntegrator {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            run_speed: config.run_speed,
            crouch_speed: config.crouch_speed,
            smoothing: config.speed_smoothing,
            air_control: config.air_control,
        }
    }

    #[inline]
    pub fn walk_speed(&self) -> f32 {
        self.walk_speed
    }

    #[inline]
    pub fn run_speed(&self) -> f32 {
        self.run_speed
    }

    #[inline]
    pub fn crouch_speed(&self) -> f32 {
        self.crouch_speed
    }

    /// World-space move direction for this tick's input (zero inside the dead zone).
    pub fn move_direction(view: &ViewBasis, input: &InputIntent) -> Vec3 {
        if input.has_move() {
            view.planar_direction(input.move_axis)
        } else {
            Vec3::zeros()
        }
    }

    /// Exponentially approach `move_direction * speed` on the ground.
    ///
    /// With a zero move direction this decays the planar velocity toward zero.
    pub fn approach(&self, context: &mut MovementContext, speed: f32, dt: f32) {
        let target = context.move_direction * speed;
        let k = 1.0 - (-self.smoothing * dt).exp();
        let mut next = context.horizontal_velocity + (target - context.horizontal_velocity) * k;
        if (target - next).norm() <= DIST_EPS {
            next = target;
        }
        next.y = 0.0;
        context.horizontal_velocity = next;
    }

    /// Airborne steering: input sets the planar velocity scaled by the air control factor;
    /// no input keeps the momentum the actor left the ground with.
    pub fn air_steer(&self, context: &mut MovementContext, run_held: bool) {
        if context.move_direction.norm_squared() <= DIST_EPS * DIST_EPS {
            return;
        }
        let speed = if run_held {
            self.run_speed
        } else {
            self.walk_speed
        };
        let mut velocity = context.move_direction * speed * self.air_control;
        velocity.y = 0.0;
        context.horizontal_velocity = velocity;
    }

    /// Translation wanted for this tick before collisions. The vertical part is whatever
    /// the fixed gravity pass integrated since the last move.
    #[inline]
    pub fn desired_translation(context: &MovementContext, dt: f32) -> Vec3 {
        (context.horizontal_velocity + context.slide_velocity) * dt
            + world_up() * context.vertical_displacement
    }

    /// Move the body and commit the resolved position.
    ///
    /// If less than half of an upward move was achieved while rising, the head hit
    /// something and the vertical velocity is cancelled.
    pub fn apply<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &mut MovementContext,
        dt: f32,
    ) -> MoveOutcome {
        let desired = Self::desired_translation(context, dt);
        context.vertical_displacement = 0.0;
        let outcome = query.move_character(
            context.capsule_center(),
            context.capsule(),
            desired,
            context.step_offset,
            dt,
        );

        context.position += outcome.translation;
        context.body_grounded = outcome.grounded;

        if context.vertical_velocity > 0.0
            && desired.y > DIST_EPS
            && outcome.translation.y < desired.y * 0.5
        {
            log::debug!("head bump, vertical velocity cancelled");
            context.vertical_velocity = 0.0;
        }

        outcome
    }
}
