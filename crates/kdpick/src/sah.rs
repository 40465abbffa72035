//! Surface area heuristic split plane selection.
//!
//! A single sweep over the node's sorted events evaluates every event
//! position on every axis as a candidate plane, keeping running counts of
//! the triangles left of, in, and right of the current plane per axis.

use kdpick_math::Axis;

use crate::event::{EventKind, SplitEvent};
use crate::settings::BuildSettings;
use crate::voxel::Voxel;

/// Child that receives triangles lying exactly in a split plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanarSide {
    /// Triangles in the plane go to the lower child.
    Left,
    /// Triangles in the plane go to the upper child.
    Right,
}

/// A chosen split plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPlane {
    /// Axis perpendicular to the plane.
    pub axis: Axis,
    /// Coordinate of the plane along `axis`.
    pub position: f64,
    /// Where triangles lying in the plane go.
    pub side: PlanarSide,
    /// Estimated cost of splitting here.
    pub cost: f64,
}

/// SAH cost of splitting `voxel` at `position` along `axis`.
///
/// `left` and `right` count the triangles strictly on each side and
/// `planar` those lying in the plane; the planar triangles are assigned to
/// whichever side is cheaper (left on ties).
pub fn split_cost(
    settings: &BuildSettings,
    voxel: &Voxel,
    axis: Axis,
    position: f64,
    left: usize,
    planar: usize,
    right: usize,
) -> (f64, PlanarSide) {
    let area = voxel.surface_area();
    let (left_voxel, right_voxel) = voxel.split(axis, position);
    let p_left = left_voxel.surface_area() / area;
    let p_right = right_voxel.surface_area() / area;

    let cost = |n_left: usize, n_right: usize| {
        let mut c = settings.traversal_cost
            + settings.intersection_cost * (p_left * n_left as f64 + p_right * n_right as f64);
        if n_left == 0 || n_right == 0 {
            c *= settings.empty_bonus;
        }
        c
    };

    let cost_left = cost(left + planar, right);
    let cost_right = cost(left, right + planar);
    if cost_left <= cost_right {
        (cost_left, PlanarSide::Left)
    } else {
        (cost_right, PlanarSide::Right)
    }
}

/// Find the cheapest split plane for a node.
///
/// `events` must be in sweep order and describe exactly `triangle_count`
/// triangles clipped to `voxel`. Only planes strictly inside the voxel are
/// considered. Returns `None` when no plane is cheaper than intersecting
/// every triangle directly.
pub fn select_split(
    events: &[SplitEvent],
    triangle_count: usize,
    voxel: &Voxel,
    settings: &BuildSettings,
) -> Option<SplitPlane> {
    if voxel.surface_area() <= 0.0 {
        return None;
    }

    let mut left = [0usize; 3];
    let mut right = [triangle_count; 3];
    let mut best: Option<SplitPlane> = None;

    let mut i = 0;
    while i < events.len() {
        let axis = events[i].axis;
        let position = events[i].position;
        let mut counts = [0usize; 3];
        while i < events.len() && events[i].axis == axis && events[i].position == position {
            counts[events[i].kind as usize] += 1;
            i += 1;
        }
        let [ending, planar, starting] = counts;

        let a = axis.index();
        right[a] -= planar + ending;

        if voxel.strictly_contains(axis, position) {
            let (cost, side) = split_cost(settings, voxel, axis, position, left[a], planar, right[a]);
            if best.map_or(true, |b| cost < b.cost) {
                best = Some(SplitPlane {
                    axis,
                    position,
                    side,
                    cost,
                });
            }
        }

        left[a] += starting + planar;
    }

    let leaf_cost = settings.intersection_cost * triangle_count as f64;
    best.filter(|plane| plane.cost < leaf_cost)
}
