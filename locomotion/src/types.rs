/*!
Core locomotion types and math aliases shared by the sensors, controllers and the state machine.

This module intentionally contains no algorithms. It defines the data exchanged between:
- the collision query seam (ray/sphere/capsule queries and the move primitive)
- the ground and step sensors
- gravity, jump, crouch and locomotion integration
- the state machine and its observers (animation, UI, debug overlays)

Conventions
- World up is +Y.
- `MovementContext::position` is the actor's base (feet), not the capsule center.
*/

use std::fmt;

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::constants::MOVE_DEADZONE_SQ;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type UnitVec3 = na::Unit<Vec3>;

/// World up (+Y).
#[inline]
pub fn world_up() -> Vec3 {
    Vec3::y()
}

/// Capsule dimensions of the character body.
///
/// half_height is the half-length of the cylinder section (aligned with +Y),
/// so the total capsule height is 2*half_height + 2*radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
}

impl CapsuleSpec {
    /// Build a capsule from a total height (feet to top) and a radius.
    #[inline]
    pub fn from_height(height: f32, radius: f32) -> Self {
        Self {
            radius,
            half_height: (height * 0.5 - radius).max(0.0),
        }
    }
}

/// A single ray hit returned by [`crate::CollisionQuery::cast_ray`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueryHit {
    /// Distance along the ray to the hit (meters).
    pub distance: f32,
    /// World-space hit point.
    pub point: Point3,
    /// World-space surface normal at the hit point.
    pub normal: Vec3,
}

/// Result of the body's move primitive for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Translation actually applied after collision resolution.
    pub translation: Vec3,
    /// Whether the body itself reports ground contact after the move.
    pub grounded: bool,
}

/// Per-frame input snapshot produced by the host's input mapping.
///
/// Edge flags (`*_pressed`) are true only on the tick the button went down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Camera-relative move axis: x = strafe right, y = forward.
    pub move_axis: Vec2,
    pub run_held: bool,
    /// Crouch toggle edge.
    pub crouch_pressed: bool,
    /// Jump edge.
    pub jump_pressed: bool,
}

impl InputIntent {
    #[inline]
    pub fn has_move(&self) -> bool {
        self.move_axis.norm_squared() > MOVE_DEADZONE_SQ
    }
}

/// Camera basis used to turn the 2D move axis into a world direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for ViewBasis {
    /// Looking down +Z with +X to the right.
    fn default() -> Self {
        Self::from_yaw(0.0)
    }
}

impl ViewBasis {
    /// Basis for a camera rotated `yaw` radians about +Y from the default (+Z forward).
    pub fn from_yaw(yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        Self {
            forward: Vec3::new(sin, 0.0, cos),
            right: Vec3::new(cos, 0.0, -sin),
        }
    }

    /// World-space planar direction for a move axis. Length is at most 1.
    ///
    /// The camera vectors are flattened onto XZ first, so pitching the camera does not
    /// slow the actor down.
    pub fn planar_direction(&self, axis: Vec2) -> Vec3 {
        let flat = |v: Vec3| {
            let v = Vec3::new(v.x, 0.0, v.z);
            v.try_normalize(1.0e-6).unwrap_or_else(Vec3::zeros)
        };
        let dir = flat(self.right) * axis.x + flat(self.forward) * axis.y;
        let len_sq = dir.norm_squared();
        if len_sq > 1.0 { dir / len_sq.sqrt() } else { dir }
    }
}

/// Transient result of the ground sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSample {
    pub grounded: bool,
    /// Averaged surface normal of the hits; world up when not grounded.
    pub normal: Vec3,
    pub support_ray_hits: u8,
}

impl GroundSample {
    pub fn airborne(hits: u8) -> Self {
        Self {
            grounded: false,
            normal: world_up(),
            support_ray_hits: hits,
        }
    }
}

/// Transient result of the step sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepDecision {
    /// Something blocks both the low and the raised probes.
    pub wall_blocked: bool,
    /// Only the low probes hit: a ledge short enough to climb.
    pub step_available: bool,
}

impl StepDecision {
    /// Step offset to hand to the body for this tick.
    #[inline]
    pub fn step_offset(&self, min: f32, max: f32) -> f32 {
        if self.step_available { max } else { min }
    }
}

/// Locomotion states. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionState {
    #[default]
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
    Crouch,
}

impl LocomotionState {
    pub const ALL: [LocomotionState; 6] = [
        LocomotionState::Idle,
        LocomotionState::Walk,
        LocomotionState::Run,
        LocomotionState::Jump,
        LocomotionState::Fall,
        LocomotionState::Crouch,
    ];

    /// Stable name consumed by animation and UI.
    pub fn name(self) -> &'static str {
        match self {
            LocomotionState::Idle => "Idle",
            LocomotionState::Walk => "Walk",
            LocomotionState::Run => "Run",
            LocomotionState::Jump => "Jump",
            LocomotionState::Fall => "Fall",
            LocomotionState::Crouch => "Crouch",
        }
    }

    /// States in which the actor is expected to stand on something.
    #[inline]
    pub fn is_grounded_state(self) -> bool {
        !matches!(self, LocomotionState::Jump | LocomotionState::Fall)
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutable per-actor movement state shared by every sensor and controller.
///
/// Exactly one exists per controllable actor. It is owned by that actor's
/// [`crate::MovementController`] and handed by `&mut` to each component in tick order.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementContext {
    /// Base (feet) position in world space.
    pub position: Point3,

    /// Applied planar velocity (Y is always zero).
    pub horizontal_velocity: Vec3,
    /// Signed vertical velocity (m/s).
    pub vertical_velocity: f32,
    /// Down-slope velocity added while sliding on a too-steep surface.
    pub slide_velocity: Vec3,
    /// Vertical travel integrated by the fixed gravity pass, consumed by the next move.
    pub vertical_displacement: f32,

    /// World-space move direction for this tick (length <= 1).
    pub move_direction: Vec3,

    pub is_grounded: bool,
    pub ground_normal: Vec3,
    /// Ground rays that hit this tick.
    pub support_ray_hits: u8,
    /// Ground contact reported by the body after the previous move.
    pub body_grounded: bool,

    pub is_falling: bool,
    pub is_crouching: bool,
    pub is_jumping: bool,

    pub state: LocomotionState,
    pub coyote_counter: f32,
    pub step_offset: f32,

    pub radius: f32,
    /// Current (interpolated) collider height.
    pub height: f32,
    /// Current (interpolated) collider center height above the feet.
    pub center_y: f32,
    /// Current (interpolated) camera height above the feet.
    pub camera_height: f32,
}

impl MovementContext {
    /// A standing, idle actor at `position` with the given body dimensions.
    pub fn new(position: Point3, radius: f32, height: f32, camera_height: f32) -> Self {
        Self {
            position,
            horizontal_velocity: Vec3::zeros(),
            vertical_velocity: 0.0,
            slide_velocity: Vec3::zeros(),
            vertical_displacement: 0.0,
            move_direction: Vec3::zeros(),
            is_grounded: false,
            ground_normal: world_up(),
            support_ray_hits: 0,
            body_grounded: false,
            is_falling: false,
            is_crouching: false,
            is_jumping: false,
            state: LocomotionState::Idle,
            coyote_counter: 0.0,
            step_offset: 0.0,
            radius,
            height,
            center_y: height * 0.5,
            camera_height,
        }
    }

    #[inline]
    pub fn capsule(&self) -> CapsuleSpec {
        CapsuleSpec::from_height(self.height, self.radius)
    }

    #[inline]
    pub fn capsule_center(&self) -> Point3 {
        self.position + world_up() * self.center_y
    }

    /// Center of the capsule's upper hemisphere.
    #[inline]
    pub fn top_sphere_center(&self) -> Point3 {
        self.capsule_center() + world_up() * self.capsule().half_height
    }

    /// Applied velocity as one vector (planar + slide + vertical).
    #[inline]
    pub fn applied_velocity(&self) -> Vec3 {
        self.horizontal_velocity + self.slide_velocity + world_up() * self.vertical_velocity
    }
}
