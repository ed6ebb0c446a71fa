//! Squircle generation
//!
//! Flat disc on the XY plane whose outline is a superellipse (Lamé curve)
//! `|x|^p + |y|^p = 1`. `p = 2` gives a circle, larger exponents approach a
//! square, exponents below 2 pinch towards a diamond/astroid.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::error::{ShapeError, require_positive};
use crate::mesh::MeshBuffer;
use crate::params::SquircleParams;

/// Minimum angular segments for a closed outline
pub const MIN_ANGULAR_RESOLUTION: u32 = 3;

/// Minimum number of rings
pub const MIN_RADIAL_RESOLUTION: u32 = 1;

/// Point on the unit superellipse at angle `theta`
///
/// `x = sgn(cos θ)·|cos θ|^(2/p)`, `y = sgn(sin θ)·|sin θ|^(2/p)`
fn superellipse(theta: f32, exponent: f32) -> Vec2 {
    let k = 2.0 / exponent;
    let (sin, cos) = theta.sin_cos();
    Vec2::new(
        cos.signum() * cos.abs().powf(k),
        sin.signum() * sin.abs().powf(k),
    )
}

/// Outline sample `seg` of `segments`
///
/// Quarter turns are snapped to the axes: sin/cos rounding noise there
/// (~1e-8) would otherwise be raised to the small power `2/p`.
fn outline_point(seg: u32, segments: u32, exponent: f32) -> Vec2 {
    let quarters = 4 * seg as u64;
    if quarters % segments as u64 == 0 {
        return match quarters / segments as u64 {
            0 => Vec2::X,
            1 => Vec2::Y,
            2 => Vec2::NEG_X,
            _ => Vec2::NEG_Y,
        };
    }
    superellipse(seg as f32 / segments as f32 * TAU, exponent)
}

/// Generate a squircle on the XY plane facing +Z
///
/// # Arguments
/// * `size` - Half-extent of the shape (finite, > 0)
/// * `exponent` - Superellipse exponent `p` (finite, > 0; 2 = circle)
/// * `angular_resolution` - Segments per ring (min 3)
/// * `radial_resolution` - Rings from center to edge (min 1)
///
/// # Returns
/// Mesh with `1 + angular * radial` vertices and
/// `angular + 2 * angular * (radial - 1)` triangles
///
/// # UV Mapping
/// The outline is mapped into the unit square: `uv = 0.5 + 0.5 * (x, y) / size`,
/// with the center at (0.5, 0.5).
pub fn generate_squircle(
    size: f32,
    exponent: f32,
    angular_resolution: u32,
    radial_resolution: u32,
) -> Result<MeshBuffer, ShapeError> {
    generate_squircle_with(&SquircleParams {
        size,
        exponent,
        angular_resolution,
        radial_resolution,
    })
}

/// Generate a squircle from a full parameter set
pub fn generate_squircle_with(params: &SquircleParams) -> Result<MeshBuffer, ShapeError> {
    let size = require_positive("size", params.size)?;
    let exponent = require_positive("exponent", params.exponent)?;
    let segments = params.angular_resolution;
    let rings = params.radial_resolution;

    if segments < MIN_ANGULAR_RESOLUTION {
        return Err(ShapeError::invalid(
            "angular_resolution",
            format!("must be >= {MIN_ANGULAR_RESOLUTION}, got {segments}"),
        ));
    }
    if rings < MIN_RADIAL_RESOLUTION {
        return Err(ShapeError::invalid(
            "radial_resolution",
            format!("must be >= {MIN_RADIAL_RESOLUTION}, got {rings}"),
        ));
    }
    let vertex_count = segments
        .checked_mul(rings)
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| {
            ShapeError::invalid(
                "angular_resolution",
                format!("{segments} x {rings} ring vertices exceed the u32 index range"),
            )
        })?;

    let triangle_count = segments as usize * (2 * rings as usize - 1);
    let mut mesh = MeshBuffer::with_capacity(vertex_count as usize, triangle_count);
    let normal = Vec3::Z;

    let center = mesh.add_vertex(Vec3::ZERO, Vec2::splat(0.5), normal);

    // The outline is identical for every ring, only the scale changes
    let outline: Vec<Vec2> = (0..segments)
        .map(|seg| outline_point(seg, segments, exponent))
        .collect();

    for ring in 1..=rings {
        let t = ring as f32 / rings as f32;
        for &point in &outline {
            let p = point * t;
            mesh.add_vertex((p * size).extend(0.0), p * 0.5 + 0.5, normal);
        }
    }

    // Ring r (1-based), segment s -> 1 + (r - 1) * segments + s
    let ring_vertex = |ring: u32, seg: u32| center + 1 + (ring - 1) * segments + seg % segments;

    // Inner fan around the center
    for seg in 0..segments {
        mesh.add_triangle(center, ring_vertex(1, seg), ring_vertex(1, seg + 1));
    }

    // Quad strips between consecutive rings (CCW winding for +Z normal)
    for ring in 2..=rings {
        for seg in 0..segments {
            let i0 = ring_vertex(ring - 1, seg);
            let i1 = ring_vertex(ring - 1, seg + 1);
            let o0 = ring_vertex(ring, seg);
            let o1 = ring_vertex(ring, seg + 1);

            mesh.add_triangle(i0, o0, o1);
            mesh.add_triangle(i0, o1, i1);
        }
    }

    debug!(
        size,
        exponent,
        angular_resolution = segments,
        radial_resolution = rings,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "generated squircle"
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superellipse_circle() {
        for i in 0..16 {
            let theta = i as f32 / 16.0 * TAU;
            let p = superellipse(theta, 2.0);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert!((p - Vec2::new(theta.cos(), theta.sin())).length() < 1e-5);
        }
    }

    #[test]
    fn test_superellipse_lies_on_lame_curve() {
        for exponent in [0.5, 1.0, 3.0, 4.0, 10.0] {
            for i in 0..24 {
                let p = superellipse(i as f32 / 24.0 * TAU, exponent);
                let lhs = p.x.abs().powf(exponent) + p.y.abs().powf(exponent);
                assert!((lhs - 1.0).abs() < 1e-4, "p = {exponent}: {lhs}");
            }
        }
    }

    #[test]
    fn test_high_exponent_approaches_square() {
        let corner = superellipse(TAU / 8.0, 64.0);
        assert!(corner.x > 0.98 && corner.y > 0.98);
    }

    #[test]
    fn test_axis_points_are_exact() {
        for exponent in [2.0, 50.0, 1000.0] {
            assert_eq!(outline_point(0, 8, exponent), Vec2::X);
            assert_eq!(outline_point(2, 8, exponent), Vec2::Y);
            assert_eq!(outline_point(4, 8, exponent), Vec2::NEG_X);
            assert_eq!(outline_point(6, 8, exponent), Vec2::NEG_Y);
        }
        // Not a quarter turn when the segment count is not a multiple of 4
        assert_ne!(outline_point(1, 6, 2.0), Vec2::Y);
    }

    #[test]
    fn test_minimum_fan() {
        let mesh = generate_squircle(1.0, 2.0, 3, 1).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 1]);
    }

    #[test]
    fn test_quad_strip_indices() {
        let mesh = generate_squircle(1.0, 4.0, 4, 2).unwrap();
        // Fan (4) + one strip of 4 quads (8)
        assert_eq!(mesh.triangle_count(), 12);
        // First quad of the strip: inner 1, 2 / outer 5, 6
        assert_eq!(&mesh.indices[12..18], &[1, 5, 6, 1, 6, 2]);
        // Last quad wraps back to segment 0
        assert_eq!(&mesh.indices[30..36], &[4, 8, 5, 4, 5, 1]);
    }

    #[test]
    fn test_center_vertex() {
        let mesh = generate_squircle(3.0, 5.0, 8, 4).unwrap();
        assert_eq!(mesh.vertices[0], [0.0, 0.0, 0.0]);
        assert_eq!(mesh.texcoords[0], [0.5, 0.5]);
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_invalid_parameters() {
        let cases = [
            (generate_squircle(0.0, 2.0, 4, 1), "size"),
            (generate_squircle(-2.0, 2.0, 4, 1), "size"),
            (generate_squircle(1.0, 0.0, 4, 1), "exponent"),
            (generate_squircle(1.0, -3.0, 4, 1), "exponent"),
            (generate_squircle(1.0, f32::NAN, 4, 1), "exponent"),
            (generate_squircle(1.0, 2.0, 2, 1), "angular_resolution"),
            (generate_squircle(1.0, 2.0, 4, 0), "radial_resolution"),
            (generate_squircle(1.0, 2.0, u32::MAX, 2), "angular_resolution"),
        ];

        for (result, name) in cases {
            assert_eq!(result.unwrap_err().parameter(), name);
        }
    }
}
