#![warn(missing_docs)]

//! Nearest-hit ray picking over static triangle meshes.
//!
//! The index is a kd-tree built with the surface area heuristic in
//! O(N log N): split candidates come from a sweep over sorted per-axis
//! events, and triangles straddling a split plane are clipped exactly
//! against each child so they only land in leaves they really touch.
//! Queries descend near child before far child and stop at the first leaf
//! that yields a hit, which is then the nearest one.
//!
//! # Architecture
//!
//! - [`TriangleMesh`] - Vertex arena plus index triples
//! - [`KdTree`] - The index; build once, query from any thread
//! - [`RayPicker`] - Pick interface shared by [`KdTree`] and [`LinearPicker`]
//! - [`PickResult`] - Caller-owned scratch record for one query at a time
//! - [`BuildSettings`] - Heuristic constants and build caps, loadable from TOML
//!
//! # Example
//!
//! ```ignore
//! use kdpick::{KdTree, Ray, RayPicker, Side, TriangleMesh, Vertex};
//! use kdpick_math::{Point3, Vec3};
//!
//! let mut mesh = TriangleMesh::new();
//! let a = mesh.add_vertex(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! let b = mesh.add_vertex(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! let c = mesh.add_vertex(Vertex::new(Point3::new(0.0, 1.0, 0.0)));
//! mesh.add_triangle(a, b, c);
//!
//! let tree = KdTree::build(mesh)?;
//! let mut result = tree.new_pick_result();
//! let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
//! if tree.pick(&ray, Side::BOTH, &mut result)? {
//!     println!("hit triangle {} at {}", result.triangle, result.point);
//! }
//! ```

mod build;
pub mod clip;
mod error;
pub mod event;
pub mod intersect;
pub mod mesh;
pub mod node;
pub mod pick;
mod ray;
pub mod sah;
mod settings;
mod tree;
pub mod voxel;

pub use error::{KdError, Result};
pub use intersect::{Side, TriangleHit};
pub use mesh::{Triangle, TriangleMesh, Vertex};
pub use node::{KdNode, TreeStats};
pub use pick::{Hit, LinearPicker, PickResult, PickerId, RayPicker};
pub use ray::Ray;
pub use settings::BuildSettings;
pub use tree::KdTree;
pub use voxel::Voxel;
