use crate::config::LocomotionConfig;
use crate::constants::{JUMP_CLEARANCE_IMPULSE_FACTOR, PROBE_SHRINK};
use crate::coyote::CoyoteTimer;
use crate::query::CollisionQuery;
use crate::types::{InputIntent, MovementContext, UnitVec3, world_up};

/// Jump eligibility, buffering and the jump impulse.
///
/// Behavior
/// - A press is remembered for `jump_buffer_time`, so a press slightly before landing (or
///   while the cooldown runs) still fires on the first eligible tick.
/// - Eligible when the coyote counter is positive, the cooldown has elapsed and the body
///   capsule can be swept upward by `height / 2 + impulse * 0.1` without touching anything.
/// - A jump zeroes the vertical velocity before adding the impulse, so a jump out of a
///   fall always has the same strength.
#[derive(Clone, Debug)]
pub struct JumpController {
    impulse: f32,
    cooldown_time: f32,
    cooldown: f32,
    buffer_time: f32,
    buffer: f32,
    pressed: bool,
}

impl JumpController {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            impulse: config.jump_impulse,
            cooldown_time: config.jump_cooldown,
            cooldown: 0.0,
            buffer_time: config.jump_buffer_time,
            buffer: 0.0,
            pressed: false,
        }
    }

    #[inline]
    pub fn impulse(&self) -> f32 {
        self.impulse
    }

    /// Advance timers and record this tick's jump edge.
    pub fn register_input(&mut self, input: &InputIntent, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.buffer = (self.buffer - dt).max(0.0);
        self.pressed = input.jump_pressed;
        if input.jump_pressed {
            self.buffer = self.buffer_time;
        }
    }

    /// A jump was pressed this tick or is still buffered.
    #[inline]
    pub fn is_requested(&self) -> bool {
        self.pressed || self.buffer > 0.0
    }

    #[inline]
    pub fn is_cooling_down(&self) -> bool {
        self.cooldown > 0.0
    }

    /// Nothing above the body within the jump clearance.
    pub fn ceiling_clear<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &MovementContext,
    ) -> bool {
        let mut capsule = context.capsule();
        capsule.radius *= PROBE_SHRINK;
        let distance = context.height * 0.5 + self.impulse * JUMP_CLEARANCE_IMPULSE_FACTOR;
        let up = UnitVec3::new_unchecked(world_up());
        query
            .cast_capsule(context.capsule_center(), capsule, up, distance)
            .is_none()
    }

    pub fn can_jump<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &MovementContext,
    ) -> bool {
        if !CoyoteTimer::is_eligible(context) || self.is_cooling_down() {
            return false;
        }
        if !self.ceiling_clear(query, context) {
            log::log!(
                self.denial_level(),
                "jump denied: no headroom at ({:.2}, {:.2}, {:.2})",
                context.position.x,
                context.position.y,
                context.position.z
            );
            return false;
        }
        true
    }

    /// Warn on the press itself; buffered retries of the same press only log at debug.
    #[inline]
    pub fn denial_level(&self) -> log::Level {
        if self.pressed {
            log::Level::Warn
        } else {
            log::Level::Debug
        }
    }

    /// Apply the impulse. Consumes the buffered press and the coyote counter.
    pub fn perform_jump(&mut self, context: &mut MovementContext) {
        context.vertical_velocity = 0.0;
        context.vertical_velocity += self.impulse;
        context.is_jumping = true;
        CoyoteTimer::consume(context);

        self.cooldown = self.cooldown_time;
        self.buffer = 0.0;
        self.pressed = false;
    }
}
