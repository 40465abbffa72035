//! Split events: where a triangle starts, stops or lies flat along an axis.
//!
//! Events drive both the split plane search and the classification of
//! triangles against the chosen plane, so the builder never keeps a
//! separate list of triangle bounds.

use std::cmp::Ordering;

use kdpick_math::{Axis, Point3};

use crate::voxel::Voxel;

/// Kind of a split event.
///
/// The declaration order is the tie-break used when events share a
/// position and axis: `Stop < Planar < Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// The triangle's extent ends here.
    Stop,
    /// The triangle's extent is this single position.
    Planar,
    /// The triangle's extent begins here.
    Start,
}

/// A candidate split position contributed by one triangle on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitEvent {
    /// Coordinate along `axis`.
    pub position: f64,
    /// Axis the event lies on.
    pub axis: Axis,
    /// Whether the extent starts, stops or is flat here.
    pub kind: EventKind,
    /// Index of the triangle in the mesh.
    pub triangle: u32,
}

impl SplitEvent {
    /// Create an event. Negative zero is normalized so that it groups with
    /// positive zero.
    pub fn new(triangle: u32, axis: Axis, position: f64, kind: EventKind) -> Self {
        Self {
            position: position + 0.0,
            axis,
            kind,
            triangle,
        }
    }

    /// Sweep order: position, then axis, then kind, then triangle.
    pub fn sweep_order(&self, other: &Self) -> Ordering {
        self.position
            .total_cmp(&other.position)
            .then(self.axis.cmp(&other.axis))
            .then(self.kind.cmp(&other.kind))
            .then(self.triangle.cmp(&other.triangle))
    }
}

/// Sort events into sweep order.
pub fn sort_events(events: &mut [SplitEvent]) {
    events.sort_unstable_by(SplitEvent::sweep_order);
}

/// Push the events for the extent `[lo, hi]` of a triangle along `axis`.
///
/// A flat extent yields one `Planar` event, anything else a `Start` and a
/// `Stop`.
pub fn push_extent_events(out: &mut Vec<SplitEvent>, triangle: u32, axis: Axis, lo: f64, hi: f64) {
    if lo == hi {
        out.push(SplitEvent::new(triangle, axis, lo, EventKind::Planar));
    } else {
        out.push(SplitEvent::new(triangle, axis, lo, EventKind::Start));
        out.push(SplitEvent::new(triangle, axis, hi, EventKind::Stop));
    }
}

/// Generate the events of a triangle along one axis from its corners.
pub fn generate_events(out: &mut Vec<SplitEvent>, triangle: u32, corners: &[Point3; 3], axis: Axis) {
    let i = axis.index();
    let lo = corners[0][i].min(corners[1][i]).min(corners[2][i]);
    let hi = corners[0][i].max(corners[1][i]).max(corners[2][i]);
    push_extent_events(out, triangle, axis, lo, hi);
}

/// Generate the events of a triangle on all three axes from a (clipped)
/// extent.
pub fn extent_events(out: &mut Vec<SplitEvent>, triangle: u32, extent: &Voxel) {
    for axis in Axis::ALL {
        push_extent_events(out, triangle, axis, extent.lo(axis), extent.hi(axis));
    }
}

/// Merge two event lists already in sweep order into one.
pub fn merge_sorted(a: Vec<SplitEvent>, b: Vec<SplitEvent>) -> Vec<SplitEvent> {
    if b.is_empty() {
        return a;
    }
    if a.is_empty() {
        return b;
    }

    let mut merged = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter().peekable();
    let mut b = b.into_iter().peekable();
    loop {
        let next = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => {
                if y.sweep_order(x) == Ordering::Less {
                    b.next()
                } else {
                    a.next()
                }
            }
            (Some(_), None) => a.next(),
            (None, Some(_)) => b.next(),
            (None, None) => break,
        };
        merged.extend(next);
    }
    merged
}

/// The distinct triangles referenced by `events`, in ascending order.
pub fn unique_triangles(events: &[SplitEvent]) -> Vec<u32> {
    let mut triangles: Vec<u32> = events
        .iter()
        .filter(|e| e.axis == Axis::X)
        .map(|e| e.triangle)
        .collect();
    triangles.sort_unstable();
    triangles.dedup();
    triangles
}
