//! Shape generation error types

/// Error returned by the shape generators
///
/// Parameters are validated before anything is allocated, so an error never
/// comes with a partially built mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter (e.g. `"radius"`)
        name: &'static str,
        /// Human-readable explanation including the rejected value
        reason: String,
    },
}

impl ShapeError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ShapeError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Name of the parameter that failed validation
    pub fn parameter(&self) -> &'static str {
        match self {
            ShapeError::InvalidParameter { name, .. } => name,
        }
    }
}

/// Error returned when a shape description cannot be loaded or generated
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse shape description: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Structural defect found by [`MeshBuffer::validate`](crate::MeshBuffer::validate)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("Attribute length mismatch: {vertices} vertices, {normals} normals, {texcoords} texcoords")]
    AttributeLengthMismatch {
        vertices: usize,
        normals: usize,
        texcoords: usize,
    },

    #[error("Index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("Index {index} at position {position} is out of range ({vertex_count} vertices)")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Normal {vertex} has length {length}, expected 1")]
    NonUnitNormal { vertex: usize, length: f32 },
}

/// Positive, finite float check shared by the generators
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<f32, ShapeError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ShapeError::invalid(
            name,
            format!("must be a finite value > 0.0, got {value}"),
        ))
    }
}
