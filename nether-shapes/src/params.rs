//! Shape parameter sets
//!
//! Serializable descriptions of a shape, so callers can keep shape settings in
//! TOML next to their other assets:
//!
//! ```toml
//! shape = "squircle"
//! size = 0.5
//! exponent = 6.0
//! angular_resolution = 48
//! ```
//!
//! Omitted fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ShapeError};
use crate::icosphere::{UvSeam, generate_icosphere_with};
use crate::mesh::MeshBuffer;
use crate::squircle::generate_squircle_with;

/// Icosphere settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcosphereParams {
    /// Sphere radius.
    /// Default: 1.0
    pub radius: f32,

    /// Subdivision depth (0 = icosahedron).
    /// Default: 2
    pub resolution: u32,

    /// Seam handling for texture coordinates.
    /// Default: weld
    pub uv_seam: UvSeam,
}

impl Default for IcosphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            resolution: 2,
            uv_seam: UvSeam::Weld,
        }
    }
}

/// Squircle settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquircleParams {
    /// Half-extent of the shape.
    /// Default: 1.0
    pub size: f32,

    /// Superellipse exponent (2 = circle).
    /// Default: 4.0
    pub exponent: f32,

    /// Segments per ring.
    /// Default: 60
    pub angular_resolution: u32,

    /// Rings from center to edge.
    /// Default: 30
    pub radial_resolution: u32,
}

impl Default for SquircleParams {
    fn default() -> Self {
        Self {
            size: 1.0,
            exponent: 4.0,
            angular_resolution: 60,
            radial_resolution: 30,
        }
    }
}

/// Any supported shape, tagged by `shape = "..."`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeParams {
    Icosphere(IcosphereParams),
    Squircle(SquircleParams),
}

impl ShapeParams {
    /// Parse a shape description from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Generate the described mesh
    pub fn generate(&self) -> Result<MeshBuffer, ShapeError> {
        match self {
            ShapeParams::Icosphere(params) => generate_icosphere_with(params),
            ShapeParams::Squircle(params) => generate_squircle_with(params),
        }
    }

    /// Parse a shape description and generate it in one step
    pub fn generate_from_toml(source: &str) -> Result<MeshBuffer, ConfigError> {
        Ok(Self::from_toml_str(source)?.generate()?)
    }
}

impl From<IcosphereParams> for ShapeParams {
    fn from(params: IcosphereParams) -> Self {
        ShapeParams::Icosphere(params)
    }
}

impl From<SquircleParams> for ShapeParams {
    fn from(params: SquircleParams) -> Self {
        ShapeParams::Squircle(params)
    }
}
