//! Interleaved vertex records
//!
//! [`Vertex`] is the 36-byte `position4 / normal3 / uv2` f32 layout that
//! renderers consume directly. Positions carry `w = 1.0`.

use bytemuck::{Pod, Zeroable, cast_slice};

use crate::mesh::MeshBuffer;

/// Interleaved vertex record
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position with w = 1.0
    pub position: [f32; 4],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshBuffer {
    /// Interleave positions, normals and UVs into [`Vertex`] records
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .zip(&self.texcoords)
            .map(|((&[x, y, z], &normal), &uv)| Vertex {
                position: [x, y, z, 1.0],
                normal,
                uv,
            })
            .collect()
    }

    /// Interleaved vertex data as raw bytes
    pub fn vertex_bytes(&self) -> Vec<u8> {
        cast_slice(&self.interleaved()).to_vec()
    }

    /// Index data as raw bytes (u32, native endian)
    pub fn index_bytes(&self) -> &[u8] {
        cast_slice(&self.indices)
    }
}
