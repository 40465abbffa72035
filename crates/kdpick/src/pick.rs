//! Pick queries: the reusable result record and the picker interface.
//!
//! A [`PickResult`] is scratch space owned by the caller. It is created once
//! by a picker's [`RayPicker::new_pick_result`] and then passed by `&mut` to
//! any number of [`RayPicker::pick`] calls, so queries do not allocate. One
//! result serves one query at a time; concurrent queries need one result
//! each.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use kdpick_math::{Point2, Point3, Tolerance, Vec3};

use crate::error::{KdError, Result};
use crate::intersect::{intersect_triangle, Side, TriangleHit};
use crate::mesh::TriangleMesh;
use crate::ray::Ray;

/// Identity of a picker, used to match results to the picker that made them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickerId(u64);

impl PickerId {
    /// Allocate a fresh, process-unique id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        PickerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A nearest hit, detached from the scratch result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter along the ray.
    pub t: f64,
    /// Euclidean distance from the ray origin.
    pub distance: f64,
    /// Intersection point.
    pub point: Point3,
    /// Index of the triangle in the mesh.
    pub triangle: u32,
    /// Face that was struck.
    pub side: Side,
    /// Barycentric weights of the point for the triangle's three corners.
    pub barycentric: [f64; 3],
}

/// Reusable result of a pick query.
///
/// When `hit` is false the other fields are stale and must not be read.
#[derive(Debug, Clone)]
pub struct PickResult {
    owner: PickerId,
    /// Whether the last query found a hit.
    pub hit: bool,
    /// Parameter along the ray of the hit.
    pub t: f64,
    /// Euclidean distance from the ray origin to the hit.
    pub distance: f64,
    /// Hit point.
    pub point: Point3,
    /// Index of the hit triangle in the mesh.
    pub triangle: u32,
    /// Face that was struck, [`Side::FRONT`] or [`Side::BACK`].
    pub side: Side,
    /// Barycentric weights of the hit point.
    pub barycentric: [f64; 3],
}

impl PickResult {
    pub(crate) fn new(owner: PickerId) -> Self {
        Self {
            owner,
            hit: false,
            t: f64::INFINITY,
            distance: f64::INFINITY,
            point: Point3::origin(),
            triangle: 0,
            side: Side::FRONT,
            barycentric: [0.0; 3],
        }
    }

    /// Check ownership and clear the hit state before a query.
    pub(crate) fn begin(&mut self, picker: PickerId) -> Result<()> {
        if self.owner != picker {
            return Err(KdError::ForeignPickResult);
        }
        self.hit = false;
        self.t = f64::INFINITY;
        Ok(())
    }

    /// Record `hit` if it is closer than the current best.
    pub(crate) fn offer(&mut self, triangle: u32, hit: &TriangleHit, direction_length: f64) -> bool {
        if hit.t >= self.t {
            return false;
        }
        self.hit = true;
        self.t = hit.t;
        self.distance = hit.t * direction_length;
        self.point = hit.point;
        self.triangle = triangle;
        self.side = hit.side;
        self.barycentric = hit.barycentric;
        true
    }

    /// Copy of the hit, if the last query found one.
    pub fn to_hit(&self) -> Option<Hit> {
        self.hit.then_some(Hit {
            t: self.t,
            distance: self.distance,
            point: self.point,
            triangle: self.triangle,
            side: self.side,
            barycentric: self.barycentric,
        })
    }

    /// Unit shading normal at the hit.
    ///
    /// Interpolates vertex normals when all three corners carry one, and
    /// falls back to the face normal otherwise. The normal faces the side
    /// that was struck.
    pub fn normal(&self, mesh: &TriangleMesh) -> Option<Vec3> {
        if !self.hit {
            return None;
        }
        let vertices = mesh.triangle_vertices(self.triangle as usize);
        let interpolated = vertices
            .iter()
            .zip(self.barycentric)
            .try_fold(Vec3::zeros(), |acc, (v, w)| v.normal.map(|n| acc + n * w));
        let normal = interpolated.unwrap_or_else(|| mesh.face_normal(self.triangle as usize));
        let normal = normal.try_normalize(0.0)?;
        Some(if self.side == Side::BACK { -normal } else { normal })
    }

    /// Interpolated texture coordinates at the hit, when all three corners
    /// carry them.
    pub fn uv(&self, mesh: &TriangleMesh) -> Option<Point2> {
        if !self.hit {
            return None;
        }
        let vertices = mesh.triangle_vertices(self.triangle as usize);
        vertices
            .iter()
            .zip(self.barycentric)
            .try_fold(Point2::origin(), |acc, (v, w)| v.uv.map(|uv| acc + uv.coords * w))
    }
}

/// Something that can answer nearest-hit ray queries.
pub trait RayPicker {
    /// Identity stamped on the results this picker creates.
    fn picker_id(&self) -> PickerId;

    /// Find the nearest triangle hit by `ray` on one of `sides`.
    ///
    /// Returns `Ok(true)` and fills `result` on a hit, `Ok(false)` with
    /// `result.hit == false` otherwise. Fails with
    /// [`KdError::ForeignPickResult`] if `result` was created by another
    /// picker.
    fn pick(&self, ray: &Ray, sides: Side, result: &mut PickResult) -> Result<bool>;

    /// Allocate a result for use with [`RayPicker::pick`].
    fn new_pick_result(&self) -> PickResult {
        PickResult::new(self.picker_id())
    }

    /// One-off query that allocates its own result.
    fn pick_nearest(&self, ray: &Ray, sides: Side) -> Option<Hit> {
        let mut result = self.new_pick_result();
        match self.pick(ray, sides, &mut result) {
            Ok(true) => result.to_hit(),
            _ => None,
        }
    }
}

/// Brute-force picker testing every triangle.
///
/// Serves as the reference for the kd-tree and is adequate for meshes of a
/// handful of triangles.
#[derive(Debug, Clone)]
pub struct LinearPicker {
    mesh: Arc<TriangleMesh>,
    corners: Vec<[Point3; 3]>,
    tolerance: Tolerance,
    id: PickerId,
}

impl LinearPicker {
    /// Create a picker over `mesh`.
    pub fn new(mesh: impl Into<Arc<TriangleMesh>>) -> Result<Self> {
        let mesh = mesh.into();
        mesh.validate()?;
        let corners = (0..mesh.triangle_count())
            .map(|t| mesh.triangle_positions(t))
            .collect();
        Ok(Self {
            mesh,
            corners,
            tolerance: Tolerance::DEFAULT,
            id: PickerId::next(),
        })
    }

    /// The mesh being picked.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }
}

impl RayPicker for LinearPicker {
    fn picker_id(&self) -> PickerId {
        self.id
    }

    fn pick(&self, ray: &Ray, sides: Side, result: &mut PickResult) -> Result<bool> {
        result.begin(self.id)?;
        if ray.is_degenerate() {
            return Ok(false);
        }
        let direction_length = ray.direction.norm();
        for (triangle, corners) in self.corners.iter().enumerate() {
            if let Some(hit) = intersect_triangle(ray, corners, &self.tolerance) {
                if sides.intersects(hit.side) {
                    result.offer(triangle as u32, &hit, direction_length);
                }
            }
        }
        Ok(result.hit)
    }
}
