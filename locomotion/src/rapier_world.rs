//! Static Rapier scene used to answer locomotion queries.
//!
//! The locomotion core never simulates the world. It only needs scene queries (rays, shape
//! casts) and Rapier's `KinematicCharacterController`, both of which run against a
//! `QueryPipeline` borrowed from the structures built here.
//!
//! Determinism
//! - Definitions are inserted sorted by `id`, so the same input always builds the same sets.
//! - Statics never move after construction.

use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::prelude::*;

use crate::config::LocomotionConfig;
use crate::rapier_query::{BodySettings, RapierCollisionQuery};

/// One immutable world collider, independent of where the level data came from.
///
/// Hosts map their own level format to this type, then call [`RapierQueryWorld::build`].
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable id; insertion order is sorted by it.
    pub id: u32,
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
}

impl WorldStaticDef {
    /// Unrotated static at `translation`.
    pub fn new(id: u32, translation: Vector<f32>, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Supported static collider shapes. Round and axis-aligned variants are Y-up in the
/// static's local frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShapeDef {
    /// Infinite half-space whose surface normal is the static's local +Y.
    ///
    /// The surface passes through the static's translation, shifted by
    /// `offset_along_normal`.
    Plane { offset_along_normal: f32 },
    Cuboid { half_extents: Vector<f32> },
    Sphere { radius: f32 },
    CapsuleY { radius: f32, half_height: f32 },
    CylinderY { radius: f32, half_height: f32 },
    ConeY { radius: f32, half_height: f32 },
    /// Cuboid whose edges are rounded by `border_radius`; the rounding adds to the extents.
    RoundCuboid { half_extents: Vector<f32>, border_radius: f32 },
    RoundCylinderY { radius: f32, half_height: f32, border_radius: f32 },
    RoundConeY { radius: f32, half_height: f32, border_radius: f32 },
}

/// Rapier sets holding a static world, ready for scene queries.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build the world from static definitions.
    ///
    /// Callers validate the definitions; a non-finite pose or dimension is not rejected here.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in &defs {
            let pose = Isometry::from_parts(Translation3::from(def.translation), def.rotation);
            let body = bodies.insert(RigidBodyBuilder::fixed().pose(pose).build());
            colliders.insert_with_parent(collider_from_def(def), body, &mut bodies);
        }

        log::debug!("built static query world with {} colliders", colliders.len());

        let mut world = Self {
            bodies,
            colliders,
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
        };
        world.refresh_phases();
        world
    }

    /// Run collision detection once (no dynamics) so the broad-phase BVH answers queries.
    fn refresh_phases(&mut self) {
        CollisionPipeline::new().step(
            0.0,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &(),
            &(),
        );
    }

    /// Borrowed query pipeline over the statics.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// [`crate::CollisionQuery`] view of this world for an actor tuned by `config`.
    pub fn collision_query(&self, config: &LocomotionConfig) -> RapierCollisionQuery<'_> {
        RapierCollisionQuery::new(
            self.query_pipeline(QueryFilter::only_fixed()),
            BodySettings::from_config(config),
        )
    }
}

impl ColliderShapeDef {
    /// Rapier shape in the static's local frame.
    pub fn shared_shape(&self) -> SharedShape {
        use ColliderShapeDef as S;
        match *self {
            S::Plane { .. } => SharedShape::halfspace(Vector::y_axis()),
            S::Cuboid { half_extents: h } => SharedShape::cuboid(h.x, h.y, h.z),
            S::Sphere { radius } => SharedShape::ball(radius),
            S::CapsuleY { radius, half_height } => SharedShape::capsule_y(half_height, radius),
            S::CylinderY { radius, half_height } => SharedShape::cylinder(half_height, radius),
            S::ConeY { radius, half_height } => SharedShape::cone(half_height, radius),
            S::RoundCuboid {
                half_extents: h,
                border_radius: b,
            } => SharedShape::round_cuboid(h.x, h.y, h.z, b),
            S::RoundCylinderY {
                radius,
                half_height,
                border_radius: b,
            } => SharedShape::round_cylinder(half_height, radius, b),
            S::RoundConeY {
                radius,
                half_height,
                border_radius: b,
            } => SharedShape::round_cone(half_height, radius, b),
        }
    }

    /// Local offset of the collider from its body. Only planes have one, along local +Y.
    fn local_offset(&self) -> Vector<f32> {
        match *self {
            ColliderShapeDef::Plane {
                offset_along_normal,
            } => Vector::y() * offset_along_normal,
            _ => Vector::zeros(),
        }
    }
}

fn collider_from_def(def: &WorldStaticDef) -> Collider {
    ColliderBuilder::new(def.shape.shared_shape())
        .translation(def.shape.local_offset())
        .build()
}
