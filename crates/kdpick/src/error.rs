//! Error types for kd-tree construction and picking.

use thiserror::Error;

/// Errors that can occur while building or querying a kd-tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KdError {
    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A triangle references a vertex outside the vertex arena.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidVertexIndex {
        /// Index of the offending triangle.
        triangle: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex position is NaN or infinite.
    #[error("vertex {vertex} has a non-finite position")]
    NonFiniteVertex {
        /// Index of the offending vertex.
        vertex: usize,
    },

    /// Invalid build settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Build settings could not be parsed.
    #[error("failed to parse settings: {0}")]
    SettingsParse(String),

    /// The pick result was not created by the picker it was passed to.
    #[error("pick result was created by a different picker")]
    ForeignPickResult,
}

/// Result type for kd-tree operations.
pub type Result<T> = std::result::Result<T, KdError>;
