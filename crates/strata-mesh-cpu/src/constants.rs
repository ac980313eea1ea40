//! Shared constants for strata-mesh-cpu.

pub(crate) const OPAQUE_ALPHA: u8 = 255;

/// Top faces are never darkened.
pub(crate) const TOP_SHADE: f32 = 1.0;

/// Per-quad UV corners, matching the corner order in `face::FACE_CORNERS`.
pub(crate) const QUAD_UVS: [(f32, f32); 4] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];

/// Triangle pattern relative to a quad's first vertex.
pub(crate) const QUAD_TRIANGLES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub(crate) const INITIAL_QUAD_CAP: usize = 256;
