use strata_blocks::Face;
use strata_geom::Vec3;

use crate::constants::QUAD_UVS;
use crate::face::{face_corners, face_normal};

/// Shared vertex buffer for one chunk: flat position, normal, UV and RGBA arrays.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Appends four contiguous vertices and returns the index of the first.
    pub fn push_quad(&mut self, corners: [Vec3; 4], n: Vec3, uvs: [(f32, f32); 4], rgba: [u8; 4]) -> u32 {
        let base = self.vertex_count() as u32;
        for i in 0..4 {
            self.pos.extend_from_slice(&corners[i].to_array());
            self.norm.extend_from_slice(&n.to_array());
            self.uv.extend_from_slice(&[uvs[i].0, uvs[i].1]);
            self.col.extend_from_slice(&rgba);
        }
        base
    }

    /// Emits the unit quad for `face` of the cell at `origin` (local coordinates).
    #[inline]
    pub fn add_face(&mut self, face: Face, origin: Vec3, rgba: [u8; 4]) -> u32 {
        self.push_quad(face_corners(face, origin), face_normal(face), QUAD_UVS, rgba)
    }

    /// Returns a slice of interleaved vertex positions (x,y,z per vertex).
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    /// Returns a slice of interleaved vertex normals (x,y,z per vertex).
    pub fn normals(&self) -> &[f32] {
        &self.norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_quads_fit_without_growing() {
        let mut mb = MeshBuild::default();
        mb.reserve_quads(3);
        let caps = (mb.pos.capacity(), mb.norm.capacity(), mb.uv.capacity(), mb.col.capacity());
        assert!(caps.0 >= 36 && caps.1 >= 36 && caps.2 >= 24 && caps.3 >= 48);
        for i in 0..3 {
            let base = mb.add_face(Face::PosY, Vec3::new(i as f32, 0.0, 0.0), [255; 4]);
            assert_eq!(base, i * 4);
        }
        assert_eq!(mb.vertex_count(), 12);
        assert_eq!(
            (mb.pos.capacity(), mb.norm.capacity(), mb.uv.capacity(), mb.col.capacity()),
            caps
        );
    }
}
