//! The kd-tree and its nearest-hit traversal.

use std::sync::Arc;

use kdpick_math::{Point3, Tolerance, Vec3};
use log::{debug, warn};

use crate::build::Builder;
use crate::error::{KdError, Result};
use crate::intersect::{intersect_triangle, Side};
use crate::mesh::TriangleMesh;
use crate::node::{KdNode, TreeStats};
use crate::pick::{PickResult, PickerId, RayPicker};
use crate::ray::Ray;
use crate::settings::BuildSettings;
use crate::voxel::Voxel;

/// Per-query constants shared by the whole descent.
struct Query<'r> {
    ray: &'r Ray,
    sides: Side,
    /// Slack on leaf interval bounds, in units of `t`.
    eps_t: f64,
    direction_length: f64,
}

/// A kd-tree over a static triangle mesh.
///
/// Built once with the surface area heuristic and exact clipping of
/// straddling triangles; immutable afterwards and safe to query from many
/// threads at once, each with its own [`PickResult`].
#[derive(Debug, Clone)]
pub struct KdTree {
    mesh: Arc<TriangleMesh>,
    corners: Vec<[Point3; 3]>,
    root: KdNode,
    bounds: Voxel,
    max_depth: u8,
    settings: BuildSettings,
    tolerance: Tolerance,
    id: PickerId,
}

impl KdTree {
    /// Build a tree with default settings.
    pub fn build(mesh: impl Into<Arc<TriangleMesh>>) -> Result<Self> {
        Self::build_with(mesh, &BuildSettings::default())
    }

    /// Build a tree with the given settings.
    ///
    /// Fails on invalid settings, on a malformed mesh, and on a mesh with no
    /// triangles.
    pub fn build_with(mesh: impl Into<Arc<TriangleMesh>>, settings: &BuildSettings) -> Result<Self> {
        settings.validate()?;
        let mesh = mesh.into();
        mesh.validate()?;
        let bounds = mesh.bounds().ok_or(KdError::EmptyMesh)?;

        let corners: Vec<[Point3; 3]> = (0..mesh.triangle_count())
            .map(|t| mesh.triangle_positions(t))
            .collect();

        let degenerate = corners
            .iter()
            .filter(|[v0, v1, v2]| (v1 - v0).cross(&(v2 - v0)) == Vec3::zeros())
            .count();
        if degenerate > 0 {
            warn!("{degenerate} of {} triangles are degenerate and will never be hit", corners.len());
        }

        let root = Builder::new(&corners, settings).build_root(bounds);
        let stats = TreeStats::collect(&root, corners.len());
        debug!(
            "built kd-tree: {} triangles, {} nodes ({} internal, {} leaves, {} empty), depth {}, {} references, parallel={}",
            stats.triangles,
            stats.nodes,
            stats.internal_nodes,
            stats.leaves,
            stats.empty_leaves,
            stats.max_depth,
            stats.triangle_references,
            settings.parallel
        );

        Ok(Self {
            mesh,
            corners,
            root,
            bounds,
            max_depth: stats.max_depth,
            settings: settings.clone(),
            tolerance: Tolerance::DEFAULT,
            id: PickerId::next(),
        })
    }

    /// Root node.
    pub fn root(&self) -> &KdNode {
        &self.root
    }

    /// Bounding voxel of the whole mesh.
    pub fn bounds(&self) -> &Voxel {
        &self.bounds
    }

    /// Depth of the deepest node.
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// The indexed mesh.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Settings the tree was built with.
    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Shape statistics.
    pub fn stats(&self) -> TreeStats {
        TreeStats::collect(&self.root, self.corners.len())
    }

    /// Call `f(depth, voxel, triangles)` for every leaf, empty ones included.
    pub fn for_each_leaf<F>(&self, mut f: F)
    where
        F: FnMut(u8, &Voxel, &[u32]),
    {
        self.root.visit_leaves(&self.bounds, &mut f);
    }

    fn traverse(&self, node: &KdNode, t_min: f64, t_max: f64, query: &Query, result: &mut PickResult) -> bool {
        match node {
            KdNode::Empty { .. } => false,
            KdNode::Leaf { triangles, .. } => {
                let lo = t_min - query.eps_t;
                let hi = t_max + query.eps_t;
                let mut found = false;
                for &triangle in triangles {
                    let corners = &self.corners[triangle as usize];
                    if let Some(hit) = intersect_triangle(query.ray, corners, &self.tolerance) {
                        if hit.t >= lo && hit.t <= hi && query.sides.intersects(hit.side) {
                            found |= result.offer(triangle, &hit, query.direction_length);
                        }
                    }
                }
                found
            }
            KdNode::Internal {
                axis,
                position,
                left,
                right,
                ..
            } => {
                let a = axis.index();
                let origin = query.ray.origin[a];
                let direction = query.ray.direction[a];

                if direction == 0.0 {
                    if origin == *position {
                        // The ray runs inside the plane.
                        let in_left = self.traverse(left, t_min, t_max, query, result);
                        let in_right = self.traverse(right, t_min, t_max, query, result);
                        return in_left || in_right;
                    }
                    let near = if origin < *position { left } else { right };
                    return self.traverse(near, t_min, t_max, query, result);
                }

                let (near, far) = if origin < *position || (origin == *position && direction < 0.0) {
                    (left, right)
                } else {
                    (right, left)
                };

                let t_split = (position - origin) / direction;
                if t_split == 0.0 || t_split > t_max || t_split < 0.0 {
                    self.traverse(near, t_min, t_max, query, result)
                } else if t_split < t_min {
                    self.traverse(far, t_min, t_max, query, result)
                } else {
                    self.traverse(near, t_min, t_split, query, result)
                        || self.traverse(far, t_split, t_max, query, result)
                }
            }
        }
    }
}

impl RayPicker for KdTree {
    fn picker_id(&self) -> PickerId {
        self.id
    }

    fn pick(&self, ray: &Ray, sides: Side, result: &mut PickResult) -> Result<bool> {
        result.begin(self.id)?;

        let slack = self.tolerance.linear * (1.0 + self.bounds.size().norm());
        let Some((t_min, t_max)) = ray.intersect_voxel(&self.bounds, slack) else {
            return Ok(false);
        };

        let direction_length = ray.direction.norm();
        let query = Query {
            ray,
            sides,
            eps_t: slack / direction_length,
            direction_length,
        };
        Ok(self.traverse(&self.root, t_min, t_max, &query, result))
    }
}
