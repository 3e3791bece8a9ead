//! Analytic collision world for unit tests.
//!
//! Planes with optional support regions, axis-aligned boxes and a flat ceiling. Queries are
//! exact for rays; sweeps use Minkowski-expanded shapes, which is exact for planes and
//! conservative near box edges. The move primitive only resolves floors and the ceiling.

use crate::query::CollisionQuery;
use crate::types::{CapsuleSpec, MoveOutcome, Point3, QueryHit, UnitVec3, Vec3};

/// Part of a floor plane that exists.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Region {
    Everywhere,
    /// Only where world `x < edge` (a ledge facing +X).
    XBelow(f32),
    /// Only where world `x > edge`.
    XAbove(f32),
}

impl Region {
    fn contains(&self, p: &Point3) -> bool {
        match *self {
            Region::Everywhere => true,
            Region::XBelow(edge) => p.x < edge,
            Region::XAbove(edge) => p.x > edge,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct MockFloor {
    pub point: Point3,
    pub normal: Vec3,
    pub region: Region,
}

impl MockFloor {
    /// Height of the plane at `(x, z)`.
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let n = self.normal;
        self.point.y - (n.x * (x - self.point.x) + n.z * (z - self.point.z)) / n.y
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct MockBox {
    pub min: Point3,
    pub max: Point3,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct MockWorld {
    pub floors: Vec<MockFloor>,
    pub boxes: Vec<MockBox>,
    pub ceiling: Option<f32>,
}

impl MockWorld {
    pub fn flat(height: f32) -> Self {
        Self::default().with_floor(height, Region::Everywhere)
    }

    pub fn with_floor(mut self, height: f32, region: Region) -> Self {
        self.floors.push(MockFloor {
            point: Point3::new(0.0, height, 0.0),
            normal: Vec3::y(),
            region,
        });
        self
    }

    pub fn with_plane(mut self, point: Point3, normal: Vec3, region: Region) -> Self {
        self.floors.push(MockFloor {
            point,
            normal: normal.normalize(),
            region,
        });
        self
    }

    /// Plane through the origin tilted by `angle_deg` about +Z (rising toward -X).
    pub fn tilted(angle_deg: f32) -> Self {
        let a = angle_deg.to_radians();
        Self {
            floors: vec![MockFloor {
                point: Point3::origin(),
                normal: Vec3::new(a.sin(), a.cos(), 0.0),
                region: Region::Everywhere,
            }],
            ..Self::default()
        }
    }

    pub fn with_box(mut self, min: [f32; 3], max: [f32; 3]) -> Self {
        self.boxes.push(MockBox {
            min: Point3::new(min[0], min[1], min[2]),
            max: Point3::new(max[0], max[1], max[2]),
        });
        self
    }

    pub fn with_ceiling(mut self, height: f32) -> Self {
        self.ceiling = Some(height);
        self
    }

    /// Closest hit of a ray against all shapes inflated by `inflate`.
    fn cast(&self, origin: Point3, dir: Vec3, max_dist: f32, inflate: f32) -> Option<QueryHit> {
        let mut best: Option<QueryHit> = None;
        let mut keep = |hit: QueryHit| {
            if hit.distance >= 0.0
                && hit.distance <= max_dist
                && best.map_or(true, |b| hit.distance < b.distance)
            {
                best = Some(hit);
            }
        };

        for floor in &self.floors {
            let denom = floor.normal.dot(&dir);
            if denom >= -1.0e-6 {
                continue;
            }
            let plane_point = floor.point + floor.normal * inflate;
            let t = floor.normal.dot(&(plane_point - origin)) / denom;
            let contact = origin + dir * t - floor.normal * inflate;
            if floor.region.contains(&contact) {
                keep(QueryHit {
                    distance: t,
                    point: origin + dir * t,
                    normal: floor.normal,
                });
            }
        }

        if let Some(ceiling) = self.ceiling {
            if dir.y > 1.0e-6 {
                let t = (ceiling - inflate - origin.y) / dir.y;
                keep(QueryHit {
                    distance: t,
                    point: origin + dir * t,
                    normal: -Vec3::y(),
                });
            }
        }

        for b in &self.boxes {
            if let Some(hit) = ray_aabb(origin, dir, b, inflate) {
                keep(hit);
            }
        }

        best
    }
}

fn ray_aabb(origin: Point3, dir: Vec3, b: &MockBox, inflate: f32) -> Option<QueryHit> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = 0;

    for axis in 0..3 {
        let lo = b.min[axis] - inflate;
        let hi = b.max[axis] + inflate;
        if dir[axis].abs() < 1.0e-9 {
            if origin[axis] < lo || origin[axis] > hi {
                return None;
            }
            continue;
        }
        let mut t0 = (lo - origin[axis]) / dir[axis];
        let mut t1 = (hi - origin[axis]) / dir[axis];
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            enter_axis = axis;
        }
        t_exit = t_exit.min(t1);
    }

    if t_enter > t_exit || t_exit < 0.0 {
        return None;
    }
    // Starting inside counts as an immediate hit.
    let t = t_enter.max(0.0);
    let mut normal = Vec3::zeros();
    normal[enter_axis] = -dir[enter_axis].signum();
    Some(QueryHit {
        distance: t,
        point: origin + dir * t,
        normal,
    })
}

impl CollisionQuery for MockWorld {
    fn cast_ray(&self, origin: Point3, dir: UnitVec3, max_dist: f32) -> Option<QueryHit> {
        self.cast(origin, dir.into_inner(), max_dist, 0.0)
    }

    fn overlap_sphere(&self, center: Point3, radius: f32) -> bool {
        let floor_hit = self.floors.iter().any(|floor| {
            let signed = floor.normal.dot(&(center - floor.point));
            let foot = center - floor.normal * signed;
            signed <= radius && floor.region.contains(&foot)
        });
        let ceiling_hit = self.ceiling.is_some_and(|c| center.y + radius >= c);
        let box_hit = self.boxes.iter().any(|b| {
            let closest = Point3::new(
                center.x.clamp(b.min.x, b.max.x),
                center.y.clamp(b.min.y, b.max.y),
                center.z.clamp(b.min.z, b.max.z),
            );
            (closest - center).norm() <= radius
        });
        floor_hit || ceiling_hit || box_hit
    }

    fn cast_sphere(
        &self,
        center: Point3,
        radius: f32,
        dir: UnitVec3,
        max_dist: f32,
    ) -> Option<f32> {
        if self.overlap_sphere(center, radius) {
            return Some(0.0);
        }
        self.cast(center, dir.into_inner(), max_dist, radius)
            .map(|hit| hit.distance)
    }

    fn cast_capsule(
        &self,
        center: Point3,
        capsule: CapsuleSpec,
        dir: UnitVec3,
        max_dist: f32,
    ) -> Option<f32> {
        let offset = Vec3::y() * capsule.half_height;
        let top = self.cast_sphere(center + offset, capsule.radius, dir, max_dist);
        let bottom = self.cast_sphere(center - offset, capsule.radius, dir, max_dist);
        match (top, bottom) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn move_character(
        &self,
        center: Point3,
        capsule: CapsuleSpec,
        desired: Vec3,
        _step_offset: f32,
        _dt: f32,
    ) -> MoveOutcome {
        let half_extent = capsule.half_height + capsule.radius;
        let mut next = center + desired;
        let mut grounded = false;

        let support = self
            .floors
            .iter()
            .filter(|f| f.region.contains(&next))
            .map(|f| f.height_at(next.x, next.z))
            .fold(f32::NEG_INFINITY, f32::max);

        if support.is_finite() && next.y - half_extent <= support + 1.0e-3 {
            // Only floors the body was above (or just touching) at the start catch it.
            if center.y - half_extent >= support - 0.5 {
                next.y = next.y.max(support + half_extent);
                grounded = true;
            }
        }

        if let Some(ceiling) = self.ceiling {
            next.y = next.y.min(ceiling - half_extent);
        }

        MoveOutcome {
            translation: next - center,
            grounded,
        }
    }
}
