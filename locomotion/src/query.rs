use crate::types::{CapsuleSpec, MoveOutcome, Point3, QueryHit, UnitVec3, Vec3};

/// Environment queries and the body's move primitive.
///
/// The locomotion core never implements collision detection itself; it asks this seam.
/// [`crate::RapierCollisionQuery`] is the Rapier-backed implementation, tests use an
/// analytic mock.
///
/// Notes
/// - All positions and directions are world space, +Y up.
/// - Implementations must ignore the actor's own collider.
/// - Sweeps report the distance travelled before first contact; a shape that already
///   overlaps something at its start reports `Some(0.0)`.
pub trait CollisionQuery {
    /// Cast a ray and return the closest hit within `max_dist`.
    fn cast_ray(&self, origin: Point3, dir: UnitVec3, max_dist: f32) -> Option<QueryHit>;

    /// Does a sphere at `center` overlap any geometry?
    fn overlap_sphere(&self, center: Point3, radius: f32) -> bool;

    /// Sweep a sphere along `dir` for up to `max_dist`.
    fn cast_sphere(&self, center: Point3, radius: f32, dir: UnitVec3, max_dist: f32)
    -> Option<f32>;

    /// Sweep a Y-aligned capsule centered at `center` along `dir` for up to `max_dist`.
    fn cast_capsule(
        &self,
        center: Point3,
        capsule: CapsuleSpec,
        dir: UnitVec3,
        max_dist: f32,
    ) -> Option<f32>;

    /// Move the body capsule centered at `center` by `desired`, resolving collisions.
    ///
    /// `step_offset` is the ledge height the body may climb automatically this tick;
    /// `0.0` disables climbing.
    fn move_character(
        &self,
        center: Point3,
        capsule: CapsuleSpec,
        desired: Vec3,
        step_offset: f32,
        dt: f32,
    ) -> MoveOutcome;
}
