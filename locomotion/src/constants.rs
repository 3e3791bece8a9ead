/*!
Locomotion defaults and tolerances.

These constants are the defaults behind [`crate::LocomotionConfig`]. Keeping them together
makes tuning easier and keeps the behavior of freshly spawned actors identical across hosts.

Notes
- Distances are in meters, time in seconds, angles in degrees unless the name says otherwise.
- Vertical velocities are signed: negative values move the actor down (-Y).
*/

// ---------------------------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------------------------

/// Radius of the character capsule.
pub const DEFAULT_RADIUS: f32 = 0.4;

/// Total standing height of the capsule (feet to top).
pub const DEFAULT_STANDING_HEIGHT: f32 = 1.8;

/// Total crouching height of the capsule (feet to top).
pub const DEFAULT_CROUCH_HEIGHT: f32 = 1.0;

/// Contact skin kept between the body and its surroundings.
/// Too large creates visible gaps; too small risks jitter on contact.
pub const DEFAULT_SKIN_WIDTH: f32 = 0.02;

/// Camera height above the feet while standing.
pub const DEFAULT_STANDING_CAMERA_HEIGHT: f32 = 1.6;

/// Camera height above the feet while crouching.
pub const DEFAULT_CROUCH_CAMERA_HEIGHT: f32 = 0.85;

// ---------------------------------------------------------------------------------------------
// Speeds
// ---------------------------------------------------------------------------------------------

pub const DEFAULT_WALK_SPEED: f32 = 4.0;
pub const DEFAULT_RUN_SPEED: f32 = 7.0;
pub const DEFAULT_CROUCH_SPEED: f32 = 2.0;

/// Exponential smoothing rate (1/s) used to approach the target planar speed on the ground.
///
/// After `t` seconds the remaining error is `exp(-rate * t)` of the initial one.
pub const DEFAULT_SPEED_SMOOTHING: f32 = 10.0;

/// Air-control multiplier for planar (XZ) movement while airborne.
///
/// Convention:
/// - 1.0 = same planar speed as on the ground
/// - below 1.0 = reduced steering in the air
///
/// Typical values: 0.8 .. 1.25
pub const DEFAULT_AIR_CONTROL: f32 = 0.8;

/// Squared length of the 2D move axis below which input counts as "no move".
pub const MOVE_DEADZONE_SQ: f32 = 1.0e-4;

// ---------------------------------------------------------------------------------------------
// Gravity & slopes
// ---------------------------------------------------------------------------------------------

/// Gravity acceleration (signed, m/s^2).
pub const DEFAULT_GRAVITY: f32 = -9.81;

/// Scale applied on top of `DEFAULT_GRAVITY` for a snappier fall.
pub const DEFAULT_GRAVITY_MULTIPLIER: f32 = 2.0;

/// Small negative vertical velocity held while grounded so the body stays pressed to slopes.
pub const DEFAULT_GROUNDED_GRAVITY: f32 = -2.0;

/// Maximum fall speed magnitude (m/s).
pub const DEFAULT_TERMINAL_FALL_SPEED: f32 = 50.0;

/// Fixed timestep of the gravity pass (seconds).
///
/// Gravity and vertical travel advance in steps of this size whatever the frame `dt` is,
/// so jump arcs are the same at every frame rate.
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;

/// Most gravity steps run in one tick. A longer frame drops the excess time.
pub const MAX_FIXED_STEPS_PER_TICK: u32 = 8;

/// Maximum walkable surface angle (degrees).
pub const DEFAULT_SLOPE_LIMIT_DEG: f32 = 45.0;

/// Time spent on a too-steep surface before sliding starts.
pub const DEFAULT_SLOPE_SLIDE_THRESHOLD: f32 = 0.2;

/// Slide speed gained per degree of surface angle (m/s per degree).
pub const DEFAULT_SLIDE_SPEED_PER_DEGREE: f32 = 0.15;

/// Cap on the slide speed (m/s).
pub const DEFAULT_MAX_SLIDE_SPEED: f32 = 8.0;

// ---------------------------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------------------------

/// Step offset used when a climbable step is detected.
pub const DEFAULT_MAX_STEP_OFFSET: f32 = 0.3;

/// Step offset used when climbing is suppressed.
pub const MIN_STEP_OFFSET: f32 = 0.0;

/// Horizontal spread of the side step probes around the move direction (degrees).
pub const DEFAULT_STEP_PROBE_SPREAD_DEG: f32 = 35.0;

/// Extra reach of the step probes beyond `radius + skin_width`.
pub const DEFAULT_STEP_PROBE_OFFSET: f32 = 0.1;

/// Height above the feet of the lower step probe, so it does not graze the floor.
pub const STEP_PROBE_LIFT: f32 = 0.05;

// ---------------------------------------------------------------------------------------------
// Ground probing
// ---------------------------------------------------------------------------------------------

/// Number of downward ground rays (4 cardinal + 4 diagonal).
pub const GROUND_RAY_COUNT: usize = 8;

/// Ground rays that must hit for the actor to count as grounded.
pub const DEFAULT_MIN_GROUND_HITS: u8 = 3;

/// Distance of the ground ray origins from the capsule axis, as a fraction of the radius.
pub const DEFAULT_GROUND_PROBE_SPREAD: f32 = 0.9;

/// Ground ray length, as a multiple of the radius.
pub const GROUND_RAY_LENGTH_FACTOR: f32 = 1.5;

/// How far below the feet the capsule-bottom overlap check reaches.
pub const DEFAULT_GROUND_CHECK_DISTANCE: f32 = 0.1;

// ---------------------------------------------------------------------------------------------
// Jumping
// ---------------------------------------------------------------------------------------------

/// Upward velocity added by a jump (m/s).
pub const DEFAULT_JUMP_IMPULSE: f32 = 5.0;

/// Minimum time between two jumps.
pub const DEFAULT_JUMP_COOLDOWN: f32 = 0.25;

/// Grace period after leaving the ground during which a jump is still allowed.
pub const DEFAULT_COYOTE_TIME: f32 = 0.2;

/// Window after a jump impulse during which ground detection is ignored.
pub const DEFAULT_JUMP_GROUND_SUPPRESS: f32 = 0.15;

/// How long an ineligible jump press is remembered.
pub const DEFAULT_JUMP_BUFFER_TIME: f32 = 0.12;

/// Fraction of the jump impulse added to the ceiling clearance sweep (`height/2 + impulse * k`).
pub const JUMP_CLEARANCE_IMPULSE_FACTOR: f32 = 0.1;

// ---------------------------------------------------------------------------------------------
// Crouching
// ---------------------------------------------------------------------------------------------

/// Exponential interpolation rate (1/s) for collider height, center and camera height.
pub const DEFAULT_CROUCH_INTERPOLATION_RATE: f32 = 10.0;

/// Shrink applied to probe shapes so they do not start in contact with walls the body touches.
pub const PROBE_SHRINK: f32 = 0.9;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-4;

// ---------------------------------------------------------------------------------------------
// Rapier body
// ---------------------------------------------------------------------------------------------

/// Distance the Rapier character controller snaps down to stay on ground (meters).
pub const DEFAULT_SNAP_TO_GROUND: f32 = 0.2;
