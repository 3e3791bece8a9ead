use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use crate::config::LocomotionConfig;
use crate::constants::{DEFAULT_SNAP_TO_GROUND, DIST_EPS};
use crate::query::CollisionQuery;
use crate::types::{CapsuleSpec, MoveOutcome, Point3, QueryHit, UnitVec3, Vec3};

/// Character-controller tuning handed to Rapier's KCC on every move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySettings {
    /// Gap kept between the body and the world (meters).
    pub offset: f32,
    /// Steepest climbable slope (radians).
    pub max_slope_climb_angle: f32,
    /// Downward snap distance used when the body is not moving up.
    pub snap_to_ground: f32,
    /// Minimum free width on top of a step for autostep to take it.
    pub autostep_min_width: f32,
}

impl BodySettings {
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            offset: config.skin_width,
            max_slope_climb_angle: config.slope_limit_rad(),
            snap_to_ground: DEFAULT_SNAP_TO_GROUND,
            autostep_min_width: config.radius * 0.5,
        }
    }

    /// KCC for one move. Autostep is only enabled when the step sensor allowed it.
    fn controller(&self, step_offset: f32, rising: bool) -> KinematicCharacterController {
        let autostep = (step_offset > DIST_EPS).then(|| CharacterAutostep {
            max_height: CharacterLength::Absolute(step_offset),
            min_width: CharacterLength::Absolute(self.autostep_min_width),
            include_dynamic_bodies: false,
        });

        KinematicCharacterController {
            offset: CharacterLength::Absolute(self.offset),
            max_slope_climb_angle: self.max_slope_climb_angle,
            // Steep-slope sliding is handled by the gravity integrator.
            min_slope_slide_angle: std::f32::consts::FRAC_PI_2,
            autostep,
            snap_to_ground: (!rising).then_some(CharacterLength::Absolute(self.snap_to_ground)),
            ..KinematicCharacterController::default()
        }
    }
}

/// [`CollisionQuery`] backed by a borrowed Rapier `QueryPipeline`.
///
/// Build one per tick (or per frame) from [`crate::RapierQueryWorld::collision_query`];
/// it only borrows the world.
pub struct RapierCollisionQuery<'a> {
    pipeline: QueryPipeline<'a>,
    settings: BodySettings,
}

impl<'a> RapierCollisionQuery<'a> {
    pub fn new(pipeline: QueryPipeline<'a>, settings: BodySettings) -> Self {
        Self { pipeline, settings }
    }

    #[inline]
    pub fn settings(&self) -> &BodySettings {
        &self.settings
    }

    fn sweep(&self, center: Point3, shape: &dyn Shape, dir: UnitVec3, max_dist: f32) -> Option<f32> {
        let pose = Isometry::translation(center.x, center.y, center.z);
        let velocity = dir.into_inner();
        self.pipeline
            .cast_shape(
                &pose,
                &velocity,
                shape,
                ShapeCastOptions::with_max_time_of_impact(max_dist.max(0.0)),
            )
            .map(|(_, hit)| hit.time_of_impact)
    }
}

impl CollisionQuery for RapierCollisionQuery<'_> {
    fn cast_ray(&self, origin: Point3, dir: UnitVec3, max_dist: f32) -> Option<QueryHit> {
        let ray = Ray::new(origin, dir.into_inner());
        self.pipeline
            .cast_ray_and_get_normal(&ray, max_dist.max(0.0), true)
            .map(|(_, hit)| QueryHit {
                distance: hit.time_of_impact,
                point: ray.point_at(hit.time_of_impact),
                normal: hit.normal,
            })
    }

    fn overlap_sphere(&self, center: Point3, radius: f32) -> bool {
        let pose = Isometry::translation(center.x, center.y, center.z);
        let ball = Ball::new(radius);
        self.pipeline.intersect_shape(pose, &ball).next().is_some()
    }

    fn cast_sphere(
        &self,
        center: Point3,
        radius: f32,
        dir: UnitVec3,
        max_dist: f32,
    ) -> Option<f32> {
        self.sweep(center, &Ball::new(radius), dir, max_dist)
    }

    fn cast_capsule(
        &self,
        center: Point3,
        capsule: CapsuleSpec,
        dir: UnitVec3,
        max_dist: f32,
    ) -> Option<f32> {
        let shape = Capsule::new_y(capsule.half_height, capsule.radius);
        self.sweep(center, &shape, dir, max_dist)
    }

    fn move_character(
        &self,
        center: Point3,
        capsule: CapsuleSpec,
        desired: Vec3,
        step_offset: f32,
        dt: f32,
    ) -> MoveOutcome {
        let kcc = self.settings.controller(step_offset, desired.y > 0.0);
        let shape = Capsule::new_y(capsule.half_height, capsule.radius);
        let pose = Isometry::translation(center.x, center.y, center.z);

        let movement = kcc.move_shape(dt, &self.pipeline, &shape, &pose, desired, |_| {});

        MoveOutcome {
            translation: movement.translation,
            grounded: movement.grounded,
        }
    }
}
