use nalgebra::UnitQuaternion;

use crate::config::LocomotionConfig;
use crate::constants::{MIN_STEP_OFFSET, STEP_PROBE_LIFT};
use crate::query::CollisionQuery;
use crate::types::{MovementContext, Point3, StepDecision, UnitVec3, Vec3, world_up};

/// Forward obstacle classification: wall or climbable step.
///
/// Three horizontal rays (straight ahead and `spread` to each side) are cast at two heights:
/// just above the feet and just above the maximum step height. Each level is the OR of its
/// three rays.
///
/// | low | raised | result                      |
/// |-----|--------|-----------------------------|
/// | hit | hit    | wall, step offset = minimum |
/// | hit | clear  | step, step offset = maximum |
/// | clear | any  | clear, step offset = minimum |
#[derive(Clone, Debug)]
pub struct StepSensor {
    spread: f32,
    skin_width: f32,
    probe_offset: f32,
    max_step_offset: f32,
}

impl StepSensor {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            spread: config.step_probe_spread_deg.to_radians(),
            skin_width: config.skin_width,
            probe_offset: config.step_probe_offset,
            max_step_offset: config.max_step_offset,
        }
    }

    #[inline]
    pub fn max_step_offset(&self) -> f32 {
        self.max_step_offset
    }

    /// Planar probe directions for a move direction: center, then both sides.
    fn probe_directions(&self, forward: UnitVec3) -> [UnitVec3; 3] {
        let up = UnitVec3::new_unchecked(world_up());
        let left = UnitQuaternion::from_axis_angle(&up, self.spread);
        let right = UnitQuaternion::from_axis_angle(&up, -self.spread);
        [forward, left * forward, right * forward]
    }

    fn any_hit<Q: CollisionQuery + ?Sized>(
        query: &Q,
        origin: Point3,
        directions: &[UnitVec3; 3],
        length: f32,
    ) -> bool {
        directions
            .iter()
            .any(|dir| query.cast_ray(origin, *dir, length).is_some())
    }

    /// Classify what lies ahead along `move_direction`. A zero direction yields no decision.
    pub fn evaluate_step<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &MovementContext,
        move_direction: Vec3,
    ) -> StepDecision {
        let planar = Vec3::new(move_direction.x, 0.0, move_direction.z);
        let Some(forward) = UnitVec3::try_new(planar, 1.0e-6) else {
            return StepDecision::default();
        };

        let directions = self.probe_directions(forward);
        let length = context.radius + self.skin_width + self.probe_offset;
        let low_origin = context.position + world_up() * STEP_PROBE_LIFT;
        let raised_origin =
            context.position + world_up() * (self.max_step_offset + STEP_PROBE_LIFT);

        let low = Self::any_hit(query, low_origin, &directions, length);
        let raised = Self::any_hit(query, raised_origin, &directions, length);

        log::trace!("step: low={low} raised={raised}");

        StepDecision {
            wall_blocked: low && raised,
            step_available: low && !raised,
        }
    }

    /// Write this tick's step offset into the context.
    ///
    /// Without move input the offset drops to the minimum.
    pub fn refresh<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        context: &mut MovementContext,
    ) -> StepDecision {
        let decision = self.evaluate_step(query, context, context.move_direction);
        let offset = decision.step_offset(MIN_STEP_OFFSET, self.max_step_offset);

        if (offset - context.step_offset).abs() > f32::EPSILON {
            log::debug!("step offset {} -> {}", context.step_offset, offset);
        }
        context.step_offset = offset;
        decision
    }
}
