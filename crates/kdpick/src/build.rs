//! Recursive kd-tree construction.
//!
//! Each node receives its triangles, their split events in sweep order and
//! its voxel. After the SAH sweep picks a plane, triangles are classified
//! from the events on the split axis. Triangles entirely on one side keep
//! their events; straddling triangles are clipped against both children
//! and contribute freshly generated events, which are merged into the
//! children's (still sorted) event lists.

use kdpick_math::{Axis, Point3};
use log::trace;

use crate::clip::{clipped_events, ClipBuffers};
use crate::event::{generate_events, merge_sorted, sort_events, EventKind, SplitEvent};
use crate::node::KdNode;
use crate::sah::{select_split, PlanarSide, SplitPlane};
use crate::settings::BuildSettings;
use crate::voxel::Voxel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Both,
    Left,
    Right,
}

/// Triangles and events handed to one child.
struct ChildInput {
    triangles: Vec<u32>,
    events: Vec<SplitEvent>,
}

/// Builds a kd-tree over a fixed set of triangles.
pub(crate) struct Builder<'a> {
    corners: &'a [[Point3; 3]],
    settings: &'a BuildSettings,
    /// Per-triangle classification scratch, valid only within one node.
    placement: Vec<Placement>,
    buffers: ClipBuffers,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(corners: &'a [[Point3; 3]], settings: &'a BuildSettings) -> Self {
        Self {
            corners,
            settings,
            placement: vec![Placement::Both; corners.len()],
            buffers: ClipBuffers::new(),
        }
    }

    /// Build the whole tree inside `bounds`, which must contain every triangle.
    pub(crate) fn build_root(&mut self, bounds: Voxel) -> KdNode {
        let mut events = Vec::with_capacity(self.corners.len() * 6);
        for (triangle, corners) in self.corners.iter().enumerate() {
            for axis in Axis::ALL {
                generate_events(&mut events, triangle as u32, corners, axis);
            }
        }
        sort_events(&mut events);

        let triangles = (0..self.corners.len() as u32).collect();
        self.build(0, triangles, events, bounds)
    }

    fn build(&mut self, depth: u8, triangles: Vec<u32>, events: Vec<SplitEvent>, voxel: Voxel) -> KdNode {
        if triangles.is_empty() {
            return KdNode::Empty { depth };
        }

        if triangles.len() <= self.settings.max_leaf_triangles || depth >= self.settings.max_depth {
            trace!("leaf at depth {depth}: {} triangles (size or depth cap)", triangles.len());
            return KdNode::Leaf { depth, triangles };
        }

        let Some(plane) = select_split(&events, triangles.len(), &voxel, self.settings) else {
            trace!("leaf at depth {depth}: {} triangles (no cheaper split)", triangles.len());
            return KdNode::Leaf { depth, triangles };
        };

        let (left_voxel, right_voxel) = voxel.split(plane.axis, plane.position);
        let (left, right) = self.partition(&triangles, events, &plane, &left_voxel, &right_voxel);

        trace!(
            "split at depth {depth}: {:?} = {} (cost {:.3}), {} -> {} | {}",
            plane.axis,
            plane.position,
            plane.cost,
            triangles.len(),
            left.triangles.len(),
            right.triangles.len()
        );

        let fork = self.settings.parallel && triangles.len() >= self.settings.parallel_min_triangles;
        drop(triangles);

        let (left_node, right_node) = if fork {
            let corners = self.corners;
            let settings = self.settings;
            rayon::join(
                || self.build(depth + 1, left.triangles, left.events, left_voxel),
                || Builder::new(corners, settings).build(depth + 1, right.triangles, right.events, right_voxel),
            )
        } else {
            (
                self.build(depth + 1, left.triangles, left.events, left_voxel),
                self.build(depth + 1, right.triangles, right.events, right_voxel),
            )
        };

        KdNode::Internal {
            depth,
            axis: plane.axis,
            position: plane.position,
            left: Box::new(left_node),
            right: Box::new(right_node),
        }
    }

    /// Distribute a node's triangles and events between its two children.
    fn partition(
        &mut self,
        triangles: &[u32],
        events: Vec<SplitEvent>,
        plane: &SplitPlane,
        left_voxel: &Voxel,
        right_voxel: &Voxel,
    ) -> (ChildInput, ChildInput) {
        for &t in triangles {
            self.placement[t as usize] = Placement::Both;
        }

        for e in events.iter().filter(|e| e.axis == plane.axis) {
            let placement = match e.kind {
                EventKind::Stop if e.position <= plane.position => Placement::Left,
                EventKind::Start if e.position >= plane.position => Placement::Right,
                EventKind::Planar if e.position < plane.position => Placement::Left,
                EventKind::Planar if e.position > plane.position => Placement::Right,
                EventKind::Planar => match plane.side {
                    PlanarSide::Left => Placement::Left,
                    PlanarSide::Right => Placement::Right,
                },
                _ => continue,
            };
            self.placement[e.triangle as usize] = placement;
        }

        let mut left = ChildInput {
            triangles: Vec::with_capacity(triangles.len()),
            events: Vec::with_capacity(events.len()),
        };
        let mut right = ChildInput {
            triangles: Vec::with_capacity(triangles.len()),
            events: Vec::with_capacity(events.len()),
        };

        for e in events {
            match self.placement[e.triangle as usize] {
                Placement::Left => left.events.push(e),
                Placement::Right => right.events.push(e),
                Placement::Both => {}
            }
        }

        let mut left_fresh = Vec::new();
        let mut right_fresh = Vec::new();
        for &t in triangles {
            match self.placement[t as usize] {
                Placement::Left => left.triangles.push(t),
                Placement::Right => right.triangles.push(t),
                Placement::Both => {
                    let corners = &self.corners[t as usize];
                    if clipped_events(&mut left_fresh, t, corners, left_voxel, &mut self.buffers) {
                        left.triangles.push(t);
                    }
                    if clipped_events(&mut right_fresh, t, corners, right_voxel, &mut self.buffers) {
                        right.triangles.push(t);
                    }
                }
            }
        }

        sort_events(&mut left_fresh);
        sort_events(&mut right_fresh);
        left.events = merge_sorted(left.events, left_fresh);
        right.events = merge_sorted(right.events, right_fresh);

        (left, right)
    }
}
