use serde::Serialize;

use crate::state_machine::Transition;
use crate::types::{LocomotionState, MovementContext, Point3, Vec3};

/// Read-only view of one actor after a tick, for animation, UI and debug traces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovementSnapshot {
    pub state: LocomotionState,
    pub state_name: &'static str,
    pub position: Point3,
    /// Planar + slide velocity in x/z, vertical velocity in y.
    pub velocity: Vec3,
    pub is_grounded: bool,
    pub ground_normal: Vec3,
    pub support_ray_hits: u8,
    pub is_falling: bool,
    pub is_crouching: bool,
    pub is_jumping: bool,
    pub step_offset: f32,
    pub coyote_counter: f32,
    pub height: f32,
    pub camera_height: f32,
}

impl From<&MovementContext> for MovementSnapshot {
    fn from(ctx: &MovementContext) -> Self {
        Self {
            state: ctx.state,
            state_name: ctx.state.name(),
            position: ctx.position,
            velocity: ctx.applied_velocity(),
            is_grounded: ctx.is_grounded,
            ground_normal: ctx.ground_normal,
            support_ray_hits: ctx.support_ray_hits,
            is_falling: ctx.is_falling,
            is_crouching: ctx.is_crouching,
            is_jumping: ctx.is_jumping,
            step_offset: ctx.step_offset,
            coyote_counter: ctx.coyote_counter,
            height: ctx.height,
            camera_height: ctx.camera_height,
        }
    }
}

/// Outcome of [`crate::MovementController::tick`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickReport {
    /// False when the tick was skipped (degenerate `dt`).
    pub simulated: bool,
    pub transition: Option<Transition>,
    pub snapshot: MovementSnapshot,
}
