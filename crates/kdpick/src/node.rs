//! kd-tree nodes.

use kdpick_math::Axis;
use serde::{Deserialize, Serialize};

use crate::voxel::Voxel;

/// A kd-tree node.
///
/// Nodes do not store their voxel; it is implied by the root bounds and the
/// split planes on the path from the root.
#[derive(Debug, Clone, PartialEq)]
pub enum KdNode {
    /// A region containing no triangles.
    Empty {
        /// Depth of this node (root = 0).
        depth: u8,
    },
    /// A region whose triangles are tested directly.
    Leaf {
        /// Depth of this node (root = 0).
        depth: u8,
        /// Mesh indices of every triangle touching this region, ascending.
        triangles: Vec<u32>,
    },
    /// A region split in two by an axis-aligned plane.
    Internal {
        /// Depth of this node (root = 0).
        depth: u8,
        /// Axis perpendicular to the split plane.
        axis: Axis,
        /// Coordinate of the split plane.
        position: f64,
        /// Child below the plane.
        left: Box<KdNode>,
        /// Child above the plane.
        right: Box<KdNode>,
    },
}

impl KdNode {
    /// Depth of this node (root = 0).
    pub fn depth(&self) -> u8 {
        match self {
            KdNode::Empty { depth } | KdNode::Leaf { depth, .. } | KdNode::Internal { depth, .. } => {
                *depth
            }
        }
    }

    /// Whether this node is a leaf (empty or not).
    pub fn is_leaf(&self) -> bool {
        !matches!(self, KdNode::Internal { .. })
    }

    /// Call `f(depth, voxel, triangles)` for every leaf below this node, in
    /// left-to-right order. Empty nodes are reported with no triangles.
    pub fn visit_leaves<F>(&self, voxel: &Voxel, f: &mut F)
    where
        F: FnMut(u8, &Voxel, &[u32]),
    {
        match self {
            KdNode::Empty { depth } => f(*depth, voxel, &[]),
            KdNode::Leaf { depth, triangles } => f(*depth, voxel, triangles),
            KdNode::Internal {
                axis,
                position,
                left,
                right,
                ..
            } => {
                let (left_voxel, right_voxel) = voxel.split(*axis, *position);
                left.visit_leaves(&left_voxel, f);
                right.visit_leaves(&right_voxel, f);
            }
        }
    }

    fn accumulate(&self, stats: &mut TreeStats) {
        stats.nodes += 1;
        stats.max_depth = stats.max_depth.max(self.depth());
        match self {
            KdNode::Empty { .. } => stats.empty_leaves += 1,
            KdNode::Leaf { triangles, .. } => {
                stats.leaves += 1;
                stats.triangle_references += triangles.len();
            }
            KdNode::Internal { left, right, .. } => {
                stats.internal_nodes += 1;
                left.accumulate(stats);
                right.accumulate(stats);
            }
        }
    }
}

/// Shape statistics of a built tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of triangles in the mesh.
    pub triangles: usize,
    /// Total number of nodes.
    pub nodes: usize,
    /// Number of internal nodes.
    pub internal_nodes: usize,
    /// Number of non-empty leaves.
    pub leaves: usize,
    /// Number of empty leaves.
    pub empty_leaves: usize,
    /// Deepest node depth.
    pub max_depth: u8,
    /// Sum of leaf triangle list lengths.
    pub triangle_references: usize,
    /// Mean triangles per non-empty leaf.
    pub mean_leaf_triangles: f64,
}

impl TreeStats {
    /// Compute statistics for the tree rooted at `root`.
    pub fn collect(root: &KdNode, triangles: usize) -> Self {
        let mut stats = TreeStats {
            triangles,
            ..Default::default()
        };
        root.accumulate(&mut stats);
        if stats.leaves > 0 {
            stats.mean_leaf_triangles = stats.triangle_references as f64 / stats.leaves as f64;
        }
        stats
    }
}
