//! Mesh buffer types
//!
//! [`MeshBuffer`] is the single output type of every generator: three parallel
//! per-vertex attribute arrays plus a triangle index list.

use glam::{Vec2, Vec3};

use crate::error::InvariantViolation;

/// Tolerance used by [`MeshBuffer::validate`] for normal lengths
pub const NORMAL_TOLERANCE: f32 = 1e-5;

/// Generated mesh data (unpacked f32 format)
///
/// Vertex IDs index all three attribute arrays. Triangles are stored as
/// consecutive index triples with counter-clockwise winding when viewed from
/// the side their normals point to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    /// Vertex positions as [x, y, z]
    pub vertices: Vec<[f32; 3]>,
    /// Unit vertex normals as [x, y, z]
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates as [u, v]
    pub texcoords: Vec<[f32; 2]>,
    /// Triangle indices (u32, three per triangle)
    pub indices: Vec<u32>,
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Extent along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box center
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl MeshBuffer {
    /// Create empty mesh data
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty mesh data with room for `vertices` vertices and `triangles` triangles
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            texcoords: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Add a vertex and return its ID
    pub fn add_vertex(&mut self, position: Vec3, uv: Vec2, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position.to_array());
        self.normals.push(normal.to_array());
        self.texcoords.push(uv.to_array());
        index
    }

    /// Add a copy of an existing vertex with different texture coordinates
    ///
    /// Position and normal are shared with `source`; only the UV differs.
    ///
    /// # Panics
    /// Panics if `source` is not a vertex of this buffer.
    pub fn duplicate_vertex(&mut self, source: u32, uv: Vec2) -> u32 {
        let index = self.vertices.len() as u32;
        let source = source as usize;
        self.vertices.push(self.vertices[source]);
        self.normals.push(self.normals[source]);
        self.texcoords.push(uv.to_array());
        index
    }

    /// Add a triangle using three vertex IDs
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Position of a vertex
    ///
    /// # Panics
    /// Panics if `vertex` is out of range.
    pub fn position(&self, vertex: u32) -> Vec3 {
        Vec3::from(self.vertices[vertex as usize])
    }

    /// Texture coordinate of a vertex
    ///
    /// # Panics
    /// Panics if `vertex` is out of range.
    pub fn uv(&self, vertex: u32) -> Vec2 {
        Vec2::from(self.texcoords[vertex as usize])
    }

    /// Axis-aligned bounds of all vertex positions
    ///
    /// An empty mesh yields a zero-sized box at the origin.
    pub fn bounds(&self) -> Bounds {
        let mut positions = self.vertices.iter().copied().map(Vec3::from);
        let Some(first) = positions.next() else {
            return Bounds::default();
        };

        positions.fold(
            Bounds {
                min: first,
                max: first,
            },
            |bounds, p| Bounds {
                min: bounds.min.min(p),
                max: bounds.max.max(p),
            },
        )
    }

    /// Check the structural invariants every generated mesh satisfies
    ///
    /// Attribute arrays must be parallel, the index count a multiple of 3,
    /// every index in range and every normal unit length.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let vertex_count = self.vertices.len();
        if self.normals.len() != vertex_count || self.texcoords.len() != vertex_count {
            return Err(InvariantViolation::AttributeLengthMismatch {
                vertices: vertex_count,
                normals: self.normals.len(),
                texcoords: self.texcoords.len(),
            });
        }

        if self.indices.len() % 3 != 0 {
            return Err(InvariantViolation::PartialTriangle(self.indices.len()));
        }

        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= vertex_count)
        {
            return Err(InvariantViolation::IndexOutOfRange {
                position,
                index,
                vertex_count,
            });
        }

        for (vertex, normal) in self.normals.iter().enumerate() {
            let length = Vec3::from(*normal).length();
            if (length - 1.0).abs() > NORMAL_TOLERANCE {
                return Err(InvariantViolation::NonUnitNormal { vertex, length });
            }
        }

        Ok(())
    }

    /// Unnormalized face normal of a triangle (length is twice its area)
    pub fn face_normal(&self, triangle: [u32; 3]) -> Vec3 {
        let p0 = self.position(triangle[0]);
        let p1 = self.position(triangle[1]);
        let p2 = self.position(triangle[2]);
        (p1 - p0).cross(p2 - p0)
    }

    /// Average face normals over topologically shared vertices
    ///
    /// Sharing is decided by vertex ID alone, so UV seam duplicates keep their
    /// own (one-sided) average. Faces are weighted by area. Vertices that no
    /// triangle references get a zero vector.
    pub fn smooth_normals(&self) -> Vec<[f32; 3]> {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.triangles() {
            let face = self.face_normal(tri);
            for &i in &tri {
                accum[i as usize] += face;
            }
        }

        accum
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect()
    }

    /// Expand the mesh so that no two triangles share a vertex
    ///
    /// Each triangle gets its own three vertices (attributes copied), and the
    /// index list becomes `0, 1, 2, ...`.
    pub fn unroll(&self) -> MeshBuffer {
        let mut unrolled = MeshBuffer::with_capacity(self.indices.len(), self.triangle_count());

        for &index in &self.indices {
            let i = index as usize;
            unrolled.vertices.push(self.vertices[i]);
            unrolled.normals.push(self.normals[i]);
            unrolled.texcoords.push(self.texcoords[i]);
        }
        unrolled.indices = (0..self.indices.len() as u32).collect();

        unrolled
    }
}
