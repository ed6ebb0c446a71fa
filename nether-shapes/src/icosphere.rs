//! Icosphere generation
//!
//! Recursively subdivided icosahedron projected onto a sphere. Edge midpoints
//! are welded during subdivision, so the welded mesh is a closed manifold with
//! `10 * 4^r + 2` vertices and `20 * 4^r` triangles.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ShapeError, require_positive};
use crate::mesh::MeshBuffer;
use crate::params::IcosphereParams;

/// Highest subdivision depth whose vertex count still fits `u32` indices
pub const MAX_ICOSPHERE_RESOLUTION: u32 = 14;

/// U span above which a triangle is treated as wrapping the longitude seam
const SEAM_SPAN: f32 = 0.5;

/// Distance from the Y axis below which a unit vertex counts as a pole
const POLE_EPSILON: f32 = 1e-6;

/// How texture coordinates are resolved along the longitude seam
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvSeam {
    /// One vertex per sphere position. Triangles crossing the seam
    /// interpolate U across the whole texture.
    #[default]
    Weld,
    /// Duplicate seam and pole vertices so every triangle sees continuous U.
    Split,
}

/// Golden-ratio icosahedron: 12 vertices, 20 counter-clockwise faces
fn icosahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;

    let vertices = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect();

    let faces = vec![
        // 5 faces around vertex 0
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        // 5 adjacent faces
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        // 5 faces around vertex 3
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        // 5 adjacent faces
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    (vertices, faces)
}

/// Per-pass cache of edge midpoints on the unit sphere
///
/// Keyed by the sorted pair of endpoint IDs so both faces sharing an edge get
/// the same midpoint vertex.
struct MidpointCache {
    midpoints: HashMap<(u32, u32), u32>,
}

impl MidpointCache {
    fn with_capacity(edges: usize) -> Self {
        Self {
            midpoints: HashMap::with_capacity(edges),
        }
    }

    fn get_or_insert(&mut self, a: u32, b: u32, vertices: &mut Vec<Vec3>) -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *self.midpoints.entry(key).or_insert_with(|| {
            let mid = (vertices[a as usize] + vertices[b as usize]).normalize();
            vertices.push(mid);
            (vertices.len() - 1) as u32
        })
    }
}

/// Split every face into four, reusing midpoints across shared edges
///
/// For triangle (A, B, C) with midpoints AB, BC, CA the output is
/// (A, AB, CA), (B, BC, AB), (C, CA, BC), (AB, BC, CA), all keeping the
/// winding of the parent.
fn subdivide(vertices: &mut Vec<Vec3>, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
    // Closed triangle mesh: E = 3F / 2
    let mut cache = MidpointCache::with_capacity(faces.len() * 3 / 2);
    let mut subdivided = Vec::with_capacity(faces.len() * 4);

    for &[a, b, c] in faces {
        let ab = cache.get_or_insert(a, b, vertices);
        let bc = cache.get_or_insert(b, c, vertices);
        let ca = cache.get_or_insert(c, a, vertices);

        subdivided.push([a, ab, ca]);
        subdivided.push([b, bc, ab]);
        subdivided.push([c, ca, bc]);
        subdivided.push([ab, bc, ca]);
    }

    subdivided
}

fn is_pole(dir: Vec3) -> bool {
    dir.x.abs() < POLE_EPSILON && dir.z.abs() < POLE_EPSILON
}

/// Equirectangular UV for a unit direction
///
/// Longitude is undefined at the poles; they get U = 0.5.
fn spherical_uv(dir: Vec3) -> Vec2 {
    let u = if is_pole(dir) {
        0.5
    } else {
        dir.z.atan2(dir.x) / TAU + 0.5
    };
    let v = dir.y.clamp(-1.0, 1.0).asin() / PI + 0.5;
    Vec2::new(u, v)
}

/// Redirect seam-wrapping and pole corners to UV-only duplicates
///
/// A triangle whose U span (poles excluded) exceeds [`SEAM_SPAN`] wraps the
/// seam: each corner with U < 0.5 moves to a duplicate at U + 1, one duplicate
/// per source vertex. A pole corner takes the mean U of the other two corners;
/// its first triangle keeps the original vertex, later ones get duplicates.
fn split_uv_seams(mesh: &mut MeshBuffer, faces: &mut [[u32; 3]], poles: &[u32]) {
    let mut wrapped: HashMap<u32, u32> = HashMap::new();
    let mut claimed_poles: Vec<u32> = Vec::with_capacity(poles.len());

    for face in faces.iter_mut() {
        let (min_u, max_u) = face
            .iter()
            .filter(|&&i| !poles.contains(&i))
            .map(|&i| mesh.uv(i).x)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), u| {
                (lo.min(u), hi.max(u))
            });

        if max_u - min_u > SEAM_SPAN {
            for corner in face.iter_mut() {
                if poles.contains(corner) {
                    continue;
                }
                let uv = mesh.uv(*corner);
                if uv.x < 0.5 {
                    let source = *corner;
                    *corner = *wrapped
                        .entry(source)
                        .or_insert_with(|| mesh.duplicate_vertex(source, uv + Vec2::X));
                }
            }
        }

        for k in 0..3 {
            let pole = face[k];
            if !poles.contains(&pole) {
                continue;
            }
            let u = (mesh.uv(face[(k + 1) % 3]).x + mesh.uv(face[(k + 2) % 3]).x) * 0.5;
            let uv = Vec2::new(u, mesh.uv(pole).y);

            if claimed_poles.contains(&pole) {
                face[k] = mesh.duplicate_vertex(pole, uv);
            } else {
                claimed_poles.push(pole);
                mesh.texcoords[pole as usize] = uv.to_array();
            }
        }
    }
}

/// Generate an icosphere with welded vertices and exact radial normals
///
/// # Arguments
/// * `radius` - Sphere radius (finite, > 0)
/// * `resolution` - Subdivision depth (0 = icosahedron, max [`MAX_ICOSPHERE_RESOLUTION`])
///
/// # Returns
/// Mesh with `10 * 4^resolution + 2` vertices and `20 * 4^resolution` triangles
///
/// # UV Mapping
/// - U: `atan2(z, x)` mapped to [0, 1]
/// - V: latitude mapped to [0, 1], 1 at the +Y pole
///
/// # Seam
/// Vertices stay welded across the longitude seam so the mesh keeps the exact
/// vertex counts above (12 at depth 0). Triangles that cross the seam
/// therefore interpolate U across almost the whole texture (worst span
/// ≈ 0.97). For textured rendering use [`generate_icosphere_with`] with
/// [`UvSeam::Split`], which duplicates seam and pole vertices instead.
pub fn generate_icosphere(radius: f32, resolution: u32) -> Result<MeshBuffer, ShapeError> {
    generate_icosphere_with(&IcosphereParams {
        radius,
        resolution,
        uv_seam: UvSeam::Weld,
    })
}

/// Generate an icosphere from a full parameter set
pub fn generate_icosphere_with(params: &IcosphereParams) -> Result<MeshBuffer, ShapeError> {
    let radius = require_positive("radius", params.radius)?;
    let resolution = params.resolution;
    if resolution > MAX_ICOSPHERE_RESOLUTION {
        return Err(ShapeError::invalid(
            "resolution",
            format!("must be <= {MAX_ICOSPHERE_RESOLUTION}, got {resolution}"),
        ));
    }

    let (mut directions, mut faces) = icosahedron();
    for _ in 0..resolution {
        faces = subdivide(&mut directions, &faces);
    }

    let mut mesh = MeshBuffer::with_capacity(directions.len(), faces.len());
    for &dir in &directions {
        mesh.add_vertex(dir * radius, spherical_uv(dir), dir);
    }

    if params.uv_seam == UvSeam::Split {
        let poles: Vec<u32> = directions
            .iter()
            .enumerate()
            .filter(|&(_, &dir)| is_pole(dir))
            .map(|(i, _)| i as u32)
            .collect();
        split_uv_seams(&mut mesh, &mut faces, &poles);
    }

    for [a, b, c] in faces {
        mesh.add_triangle(a, b, c);
    }

    debug!(
        radius,
        resolution,
        uv_seam = ?params.uv_seam,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "generated icosphere"
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icosahedron_is_outward_and_unit() {
        let (vertices, faces) = icosahedron();
        assert_eq!(vertices.len(), 12);
        assert_eq!(faces.len(), 20);

        for v in &vertices {
            assert!((v.length() - 1.0).abs() < 1e-6);
        }
        for &[a, b, c] in &faces {
            let (a, b, c) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn test_subdivide_welds_shared_edges() {
        let (mut vertices, faces) = icosahedron();
        let faces = subdivide(&mut vertices, &faces);

        // One new vertex per edge of the icosahedron
        assert_eq!(vertices.len(), 12 + 30);
        assert_eq!(faces.len(), 80);
        for v in &vertices[12..] {
            assert!((v.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_midpoint_cache_is_order_independent() {
        let mut vertices = vec![Vec3::X, Vec3::Y];
        let mut cache = MidpointCache::with_capacity(1);

        let m0 = cache.get_or_insert(0, 1, &mut vertices);
        let m1 = cache.get_or_insert(1, 0, &mut vertices);
        assert_eq!(m0, m1);
        assert_eq!(vertices.len(), 3);
        assert!((vertices[2] - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_spherical_uv() {
        let uv = spherical_uv(Vec3::X);
        assert!((uv - Vec2::new(0.5, 0.5)).length() < 1e-6);

        let uv = spherical_uv(Vec3::Z);
        assert!((uv - Vec2::new(0.75, 0.5)).length() < 1e-6);

        let uv = spherical_uv(Vec3::Y);
        assert!((uv - Vec2::new(0.5, 1.0)).length() < 1e-6);

        let uv = spherical_uv(Vec3::NEG_Y);
        assert!((uv - Vec2::new(0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_poles_appear_after_first_subdivision() {
        let (mut vertices, faces) = icosahedron();
        assert!(!vertices.iter().any(|&v| is_pole(v)));

        subdivide(&mut vertices, &faces);
        assert_eq!(vertices.iter().filter(|&&v| is_pole(v)).count(), 2);
    }

    #[test]
    fn test_resolution_limit() {
        let err = generate_icosphere(1.0, MAX_ICOSPHERE_RESOLUTION + 1).unwrap_err();
        assert_eq!(err.parameter(), "resolution");
    }

    #[test]
    fn test_invalid_radius() {
        for radius in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = generate_icosphere(radius, 1).unwrap_err();
            assert_eq!(err.parameter(), "radius");
        }
    }

    #[test]
    fn test_split_keeps_topology() {
        let welded = generate_icosphere(1.0, 2).unwrap();
        let split = generate_icosphere_with(&IcosphereParams {
            radius: 1.0,
            resolution: 2,
            uv_seam: UvSeam::Split,
        })
        .unwrap();

        assert_eq!(split.triangle_count(), welded.triangle_count());
        assert!(split.vertex_count() > welded.vertex_count());

        // Every corner still sits on the same sphere position
        for (a, b) in welded.triangles().zip(split.triangles()) {
            for k in 0..3 {
                assert_eq!(welded.vertices[a[k] as usize], split.vertices[b[k] as usize]);
            }
        }
    }

    fn max_u_span(mesh: &MeshBuffer) -> f32 {
        mesh.triangles()
            .map(|tri| {
                let us = tri.map(|i| mesh.uv(i).x);
                us.iter().copied().fold(f32::NEG_INFINITY, f32::max)
                    - us.iter().copied().fold(f32::INFINITY, f32::min)
            })
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_welded_seam_triangles_span_the_texture() {
        let mesh = generate_icosphere(1.0, 2).unwrap();
        assert!(max_u_span(&mesh) > 0.9);
    }

    #[test]
    fn test_split_depth_zero_bound() {
        let mesh = generate_icosphere_with(&IcosphereParams {
            radius: 1.0,
            resolution: 0,
            uv_seam: UvSeam::Split,
        })
        .unwrap();

        assert_eq!(mesh.vertex_count(), 15);
        assert_eq!(mesh.triangle_count(), 20);
        let span = max_u_span(&mesh);
        assert!(span <= 0.75 + 1e-4, "worst span {span}");
    }

    #[test]
    fn test_split_uvs_are_continuous() {
        for resolution in 1..=4 {
            let mesh = generate_icosphere_with(&IcosphereParams {
                radius: 2.0,
                resolution,
                uv_seam: UvSeam::Split,
            })
            .unwrap();

            for tri in mesh.triangles() {
                let us = tri.map(|i| mesh.uv(i).x);
                let span = us.iter().copied().fold(f32::NEG_INFINITY, f32::max)
                    - us.iter().copied().fold(f32::INFINITY, f32::min);
                assert!(span <= SEAM_SPAN, "triangle {tri:?} spans {span}");
            }
        }
    }

    #[test]
    fn test_split_leaves_no_orphans() {
        let mesh = generate_icosphere_with(&IcosphereParams {
            radius: 1.0,
            resolution: 3,
            uv_seam: UvSeam::Split,
        })
        .unwrap();

        let mut used = vec![false; mesh.vertex_count()];
        for &i in &mesh.indices {
            used[i as usize] = true;
        }
        assert!(used.iter().all(|&u| u));
    }
}
