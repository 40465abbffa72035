//! Exact clipping of triangles against voxels.
//!
//! A triangle straddling a split plane is clipped as a polygon against all
//! six faces of each child voxel (Sutherland–Hodgman). The bounding box of
//! the clipped polygon is the triangle's true footprint in that child, which
//! is usually much tighter than its bounding box intersected with the voxel.

use kdpick_math::{Axis, Point3};

use crate::event::{extent_events, SplitEvent};
use crate::voxel::Voxel;

/// Reusable polygon storage for clipping.
///
/// Keeping one of these per builder avoids two allocations per clip.
#[derive(Debug, Default)]
pub struct ClipBuffers {
    polygon: Vec<Point3>,
    scratch: Vec<Point3>,
}

impl ClipBuffers {
    /// Create empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices of the polygon produced by the last clip.
    pub fn polygon(&self) -> &[Point3] {
        &self.polygon
    }

    /// Keep the part of the polygon with `coord >= bound` (`above`) or
    /// `coord <= bound` (`!above`).
    fn clip_half_space(&mut self, axis: Axis, bound: f64, above: bool) {
        let a = axis.index();
        let sign = if above { 1.0 } else { -1.0 };
        self.scratch.clear();

        let n = self.polygon.len();
        for i in 0..n {
            let current = self.polygon[i];
            let next = self.polygon[(i + 1) % n];
            let dc = sign * (current[a] - bound);
            let dn = sign * (next[a] - bound);

            if dc >= 0.0 {
                self.scratch.push(current);
            }
            if (dc >= 0.0) != (dn >= 0.0) {
                let t = dc / (dc - dn);
                let mut crossing = current + (next - current) * t;
                crossing[a] = bound;
                self.scratch.push(crossing);
            }
        }

        std::mem::swap(&mut self.polygon, &mut self.scratch);
    }
}

/// Clip a triangle to `voxel` and return the extent of what remains.
///
/// Returns `None` when the triangle does not touch the voxel. The returned
/// extent always lies within `voxel`.
pub fn clip_triangle(corners: &[Point3; 3], voxel: &Voxel, buffers: &mut ClipBuffers) -> Option<Voxel> {
    buffers.polygon.clear();
    buffers.polygon.extend_from_slice(corners);

    for axis in Axis::ALL {
        buffers.clip_half_space(axis, voxel.lo(axis), true);
        buffers.clip_half_space(axis, voxel.hi(axis), false);
        if buffers.polygon.is_empty() {
            return None;
        }
    }

    let mut extent = Voxel::empty();
    for p in &buffers.polygon {
        extent.include_point(&voxel.clamp_point(p));
    }
    Some(extent)
}

/// Clip a triangle to `voxel` and append the events of its clipped extent.
///
/// Returns whether the triangle enters the voxel at all.
pub fn clipped_events(
    out: &mut Vec<SplitEvent>,
    triangle: u32,
    corners: &[Point3; 3],
    voxel: &Voxel,
    buffers: &mut ClipBuffers,
) -> bool {
    match clip_triangle(corners, voxel, buffers) {
        Some(extent) => {
            extent_events(out, triangle, &extent);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn unit_triangle() -> [Point3; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn voxel(min: [f64; 3], max: [f64; 3]) -> Voxel {
        Voxel::new(Point3::from(min), Point3::from(max))
    }

    #[test]
    fn test_inside_keeps_bounds() {
        let mut buffers = ClipBuffers::new();
        let extent = clip_triangle(&unit_triangle(), &voxel([-1.0; 3], [2.0; 3]), &mut buffers).unwrap();
        assert_eq!(extent.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(extent.max, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(buffers.polygon().len(), 3);
    }

    #[test]
    fn test_clip_is_tighter_than_bounding_box() {
        let mut buffers = ClipBuffers::new();
        let right = voxel([0.5, -1.0, -1.0], [2.0, 2.0, 1.0]);
        let extent = clip_triangle(&unit_triangle(), &right, &mut buffers).unwrap();
        assert!((extent.min.x - 0.5).abs() < 1e-12);
        assert!((extent.max.x - 1.0).abs() < 1e-12);
        assert!((extent.max.y - 0.5).abs() < 1e-12);
        assert_eq!(buffers.polygon().len(), 3);
    }

    #[test]
    fn test_corner_clip_produces_pentagon() {
        let mut buffers = ClipBuffers::new();
        let big = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        let box_ = voxel([-1.0, -1.0, -1.0], [3.0, 3.0, 1.0]);
        let extent = clip_triangle(&big, &box_, &mut buffers).unwrap();
        assert_eq!(buffers.polygon().len(), 5);
        assert!((extent.max.x - 3.0).abs() < 1e-12);
        assert!((extent.max.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_outside_is_none() {
        let mut buffers = ClipBuffers::new();
        let away = voxel([2.0, 2.0, -1.0], [3.0, 3.0, 1.0]);
        assert!(clip_triangle(&unit_triangle(), &away, &mut buffers).is_none());

        // Inside the bounding box of the triangle but beyond its hypotenuse.
        let corner = voxel([0.6, 0.6, -1.0], [1.0, 1.0, 1.0]);
        assert!(clip_triangle(&unit_triangle(), &corner, &mut buffers).is_none());
    }

    #[test]
    fn test_clipped_events_regenerated_from_extent() {
        let mut buffers = ClipBuffers::new();
        let mut events = Vec::new();
        let left = voxel([-1.0, -1.0, -1.0], [0.5, 2.0, 1.0]);
        assert!(clipped_events(&mut events, 3, &unit_triangle(), &left, &mut buffers));
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.triangle == 3));
        let z = events.iter().find(|e| e.axis == Axis::Z).unwrap();
        assert_eq!(z.kind, EventKind::Planar);
        let x_stop = events
            .iter()
            .find(|e| e.axis == Axis::X && e.kind == EventKind::Stop)
            .unwrap();
        assert_eq!(x_stop.position, 0.5);

        let away = voxel([5.0; 3], [6.0; 3]);
        assert!(!clipped_events(&mut events, 3, &unit_triangle(), &away, &mut buffers));
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_degenerate_triangle_clips() {
        let mut buffers = ClipBuffers::new();
        let sliver = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        let extent = clip_triangle(&sliver, &voxel([0.5; 3], [1.5; 3]), &mut buffers).unwrap();
        assert!((extent.min.x - 0.5).abs() < 1e-12);
        assert!((extent.max.z - 1.5).abs() < 1e-12);
    }
}
