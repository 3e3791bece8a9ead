use crate::config::LocomotionConfig;
use crate::constants::{DIST_EPS, PROBE_SHRINK};
use crate::query::CollisionQuery;
use crate::types::{MovementContext, UnitVec3, world_up};

/// Collider and camera targets for one posture.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Posture {
    height: f32,
    center_y: f32,
    camera_height: f32,
}

/// Crouch toggling with a headroom check before standing back up.
///
/// Height, collider center and camera height chase their targets with a frame-rate
/// independent exponential factor `1 - exp(-rate * dt)`. The feet stay put; the capsule
/// grows and shrinks from the top.
#[derive(Clone, Debug)]
pub struct CrouchController {
    standing: Posture,
    crouching: Posture,
    target: Posture,
    rate: f32,
}

impl CrouchController {
    pub fn new(config: &LocomotionConfig) -> Self {
        let standing = Posture {
            height: config.standing_height,
            center_y: config.standing_height * 0.5,
            camera_height: config.standing_camera_height,
        };
        let crouching = Posture {
            height: config.crouch_height,
            center_y: config.crouch_height * 0.5,
            camera_height: config.crouch_camera_height,
        };
        Self {
            standing,
            crouching,
            target: standing,
            rate: config.crouch_interpolation_rate,
        }
    }

    #[inline]
    pub fn target_height(&self) -> f32 {
        self.target.height
    }

    /// Aim for the crouching posture.
    pub fn handle_crouch(&mut self, context: &mut MovementContext) {
        self.target = self.crouching;
        context.is_crouching = true;
    }

    /// Is there room for the capsule to grow back to standing height?
    pub fn can_stand_up<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &MovementContext,
    ) -> bool {
        let rise = self.standing.height - context.height;
        if rise <= DIST_EPS {
            return true;
        }
        let up = UnitVec3::new_unchecked(world_up());
        query
            .cast_sphere(
                context.top_sphere_center(),
                context.radius * PROBE_SHRINK,
                up,
                rise,
            )
            .is_none()
    }

    /// Aim for the standing posture if there is headroom. Returns whether it did.
    pub fn handle_stand_up<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        context: &mut MovementContext,
    ) -> bool {
        if !self.can_stand_up(query, context) {
            log::debug!("stand-up blocked, staying crouched");
            return false;
        }
        self.target = self.standing;
        context.is_crouching = false;
        true
    }

    /// Move height, center and camera toward the current targets.
    pub fn update(&self, context: &mut MovementContext, dt: f32) {
        let k = 1.0 - (-self.rate * dt).exp();
        context.height = approach(context.height, self.target.height, k);
        context.center_y = approach(context.center_y, self.target.center_y, k);
        context.camera_height = approach(context.camera_height, self.target.camera_height, k);
    }
}

#[inline]
fn approach(current: f32, target: f32, k: f32) -> f32 {
    let next = current + (target - current) * k;
    if (target - next).abs() <= DIST_EPS {
        target
    } else {
        next
    }
}
