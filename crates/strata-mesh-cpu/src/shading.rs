//! Static directional face shading with optional per-cell variation.

use strata_blocks::Face;
use strata_world::{ShadingConfig, WorldCell};

use crate::constants::{OPAQUE_ALPHA, TOP_SHADE};

/// Stable hash of a world cell mapped to `[0, 1)`.
#[inline]
pub fn cell_hash01(x: i32, y: i32, z: i32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x8da6_b343)
        ^ (y as u32).wrapping_mul(0xd816_3841)
        ^ (z as u32).wrapping_mul(0xcb1a_b31f);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Axis shade before variation. Shading is tied to world axes.
#[inline]
pub fn base_shade(face: Face, cfg: &ShadingConfig) -> f32 {
    match face {
        Face::PosY => TOP_SHADE,
        Face::NegY => cfg.bottom_shade,
        Face::PosX | Face::NegX => cfg.east_west_shade,
        Face::PosZ | Face::NegZ => cfg.north_south_shade,
    }
}

/// Final shade for a face of the cell at world position `(wx, wy, wz)`, in `[0, 1]`.
pub fn face_shade(face: Face, (wx, wy, wz): WorldCell, cfg: &ShadingConfig) -> f32 {
    if !cfg.enable_face_shading {
        return 1.0;
    }
    let base = base_shade(face, cfg);
    let shade = if cfg.variation_strength > 0.0 {
        base * (1.0 + (cell_hash01(wx, wy, wz) - 0.5) * 2.0 * cfg.variation_strength)
    } else {
        base
    };
    shade.clamp(0.0, 1.0)
}

/// Grey vertex color for a shade value; alpha is always opaque.
#[inline]
pub fn shade_rgba(shade: f32) -> [u8; 4] {
    let v = (shade.clamp(0.0, 1.0) * 255.0).round() as u8;
    [v, v, v, OPAQUE_ALPHA]
}
