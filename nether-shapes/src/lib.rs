//! Nether-Shapes: procedural parametric meshes for Nethercore
//!
//! Generates renderable mesh data (positions, normals, texture coordinates and
//! triangle indices) for two parametric shapes:
//!
//! - **Icosphere**: a regular icosahedron, recursively subdivided with welded
//!   edge midpoints and projected onto a sphere. Normals are exact radial
//!   directions.
//! - **Squircle**: a flat disc whose outline is a superellipse
//!   `|x|^p + |y|^p = 1`, triangulated as a center fan plus quad strips.
//!
//! Generators are pure functions: parameters in, an owned [`MeshBuffer`] out.
//! Invalid parameters are rejected with [`ShapeError::InvalidParameter`]
//! before anything is allocated.
//!
//! # Usage
//!
//! ```
//! use nether_shapes::{generate_icosphere, generate_squircle};
//!
//! let sphere = generate_icosphere(1.0, 3)?;
//! assert_eq!(sphere.triangle_count(), 20 * 4usize.pow(3));
//!
//! let squircle = generate_squircle(0.5, 4.0, 64, 16)?;
//! let bytes = squircle.vertex_bytes();
//! assert_eq!(bytes.len(), squircle.vertex_count() * 36);
//! # Ok::<(), nether_shapes::ShapeError>(())
//! ```
//!
//! Shape settings can also come from TOML via [`ShapeParams`]:
//!
//! ```
//! use nether_shapes::ShapeParams;
//!
//! let mesh = ShapeParams::generate_from_toml(r#"
//!     shape = "icosphere"
//!     radius = 2.0
//!     resolution = 1
//!     uv_seam = "split"
//! "#)?;
//! assert_eq!(mesh.triangle_count(), 80);
//! # Ok::<(), nether_shapes::ConfigError>(())
//! ```

mod error;
mod icosphere;
mod mesh;
mod packing;
mod params;
mod squircle;

pub use error::{ConfigError, InvariantViolation, ShapeError};
pub use icosphere::{MAX_ICOSPHERE_RESOLUTION, UvSeam, generate_icosphere, generate_icosphere_with};
pub use mesh::{Bounds, MeshBuffer, NORMAL_TOLERANCE};
pub use packing::Vertex;
pub use params::{IcosphereParams, ShapeParams, SquircleParams};
pub use squircle::{
    MIN_ANGULAR_RESOLUTION, MIN_RADIAL_RESOLUTION, generate_squircle, generate_squircle_with,
};
