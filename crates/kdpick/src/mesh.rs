//! Triangle mesh input for the kd-tree.
//!
//! Vertices live in a single arena and triangles reference them by index,
//! so vertices shared along edges are stored once.

use kdpick_math::{Point2, Point3, Vec3};

use crate::error::{KdError, Result};
use crate::voxel::Voxel;

/// A mesh vertex: a position with optional shading attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in world space.
    pub position: Point3,
    /// Vertex normal, if the mesh provides one.
    pub normal: Option<Vec3>,
    /// Texture coordinates, if the mesh provides them.
    pub uv: Option<Point2>,
}

impl Vertex {
    /// Create a vertex with only a position.
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            normal: None,
            uv: None,
        }
    }

    /// Attach a vertex normal.
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Attach texture coordinates.
    pub fn with_uv(mut self, uv: Point2) -> Self {
        self.uv = Some(uv);
        self
    }
}

/// A triangle referencing three vertices of its mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    /// Vertex indices, counter-clockwise when seen from the front.
    pub vertices: [u32; 3],
}

impl Triangle {
    /// Create a triangle from three vertex indices.
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }
}

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex arena.
    pub vertices: Vec<Vertex>,
    /// Triangles indexing into `vertices`.
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from flat position and index buffers.
    ///
    /// `positions` holds `[x0, y0, z0, x1, y1, z1, ...]` and `indices` holds
    /// `[i0, i1, i2, ...]`, three per triangle. A trailing partial triangle is
    /// ignored.
    pub fn from_flat(positions: &[f32], indices: &[u32]) -> Self {
        let vertices = positions
            .chunks_exact(3)
            .map(|p| Vertex::new(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)))
            .collect();
        let triangles = indices
            .chunks_exact(3)
            .map(|i| Triangle::new(i[0], i[1], i[2]))
            .collect();
        Self {
            vertices,
            triangles,
        }
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Append a triangle and return its index.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) -> u32 {
        let index = self.triangles.len() as u32;
        self.triangles.push(Triangle::new(a, b, c));
        index
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Check that every index is in range and every position is finite.
    pub fn validate(&self) -> Result<()> {
        if let Some(vertex) = self
            .vertices
            .iter()
            .position(|v| !v.position.coords.iter().all(|c| c.is_finite()))
        {
            return Err(KdError::NonFiniteVertex { vertex });
        }
        let vertex_count = self.vertices.len();
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.vertices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(KdError::InvalidVertexIndex {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// The three vertices of a triangle.
    ///
    /// # Panics
    ///
    /// Panics if `triangle` or one of its vertex indices is out of range.
    pub fn triangle_vertices(&self, triangle: usize) -> [&Vertex; 3] {
        let [a, b, c] = self.triangles[triangle].vertices;
        [
            &self.vertices[a as usize],
            &self.vertices[b as usize],
            &self.vertices[c as usize],
        ]
    }

    /// The three corner positions of a triangle.
    pub fn triangle_positions(&self, triangle: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangle_vertices(triangle);
        [a.position, b.position, c.position]
    }

    /// Non-normalized face normal `(v1 - v0) x (v2 - v0)`.
    pub fn face_normal(&self, triangle: usize) -> Vec3 {
        let [v0, v1, v2] = self.triangle_positions(triangle);
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Bounding voxel of all triangle corners, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Voxel> {
        if self.triangles.is_empty() {
            return None;
        }
        let mut voxel = Voxel::empty();
        for triangle in 0..self.triangles.len() {
            for p in &self.triangle_positions(triangle) {
                voxel.include_point(p);
            }
        }
        Some(voxel)
    }
}
