//! Conversions between world cells and chunk-local cells.
//!
//! All functions are total: any integer input maps to a result, which may lie
//! outside the chunk. Callers check [`ChunkDims::contains_local`] before indexing.

use serde::{Deserialize, Serialize};

use crate::{ChunkCoord, InvalidDimensions};

pub type WorldCell = (i32, i32, i32);

/// Validated chunk extent. Every dimension is at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 3]", into = "[i64; 3]")]
pub struct ChunkDims {
    sx: usize,
    sy: usize,
    sz: usize,
}

impl ChunkDims {
    pub fn new(sx: i64, sy: i64, sz: i64) -> Result<Self, InvalidDimensions> {
        if sx <= 0 || sy <= 0 || sz <= 0 || sx > i32::MAX as i64 || sy > i32::MAX as i64 || sz > i32::MAX as i64 {
            return Err(InvalidDimensions { sx, sy, sz });
        }
        Ok(Self {
            sx: sx as usize,
            sy: sy as usize,
            sz: sz as usize,
        })
    }

    #[inline]
    pub fn sx(&self) -> usize {
        self.sx
    }

    #[inline]
    pub fn sy(&self) -> usize {
        self.sy
    }

    #[inline]
    pub fn sz(&self) -> usize {
        self.sz
    }

    #[inline]
    pub fn volume(&self) -> usize {
        self.sx * self.sy * self.sz
    }

    #[inline]
    pub fn contains_local(&self, lx: i32, ly: i32, lz: i32) -> bool {
        lx >= 0
            && ly >= 0
            && lz >= 0
            && (lx as usize) < self.sx
            && (ly as usize) < self.sy
            && (lz as usize) < self.sz
    }
}

impl TryFrom<[i64; 3]> for ChunkDims {
    type Error = InvalidDimensions;

    fn try_from(v: [i64; 3]) -> Result<Self, Self::Error> {
        ChunkDims::new(v[0], v[1], v[2])
    }
}

impl From<ChunkDims> for [i64; 3] {
    fn from(d: ChunkDims) -> Self {
        [d.sx as i64, d.sy as i64, d.sz as i64]
    }
}

/// World cell of the chunk's local `(0, 0, 0)`. Wraps at the `i32` limits.
#[inline]
pub fn chunk_origin(coord: ChunkCoord, dims: ChunkDims) -> WorldCell {
    (
        coord.cx.wrapping_mul(dims.sx as i32),
        0,
        coord.cz.wrapping_mul(dims.sz as i32),
    )
}

#[inline]
pub fn world_to_local(coord: ChunkCoord, dims: ChunkDims, (wx, wy, wz): WorldCell) -> WorldCell {
    let (ox, _, oz) = chunk_origin(coord, dims);
    (wx.wrapping_sub(ox), wy, wz.wrapping_sub(oz))
}

#[inline]
pub fn local_to_world(coord: ChunkCoord, dims: ChunkDims, (lx, ly, lz): WorldCell) -> WorldCell {
    let (ox, _, oz) = chunk_origin(coord, dims);
    (ox.wrapping_add(lx), ly, oz.wrapping_add(lz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dims() -> impl Strategy<Value = ChunkDims> {
        (1i64..=32, 1i64..=64, 1i64..=32)
            .prop_map(|(x, y, z)| ChunkDims::new(x, y, z).unwrap())
    }

    proptest! {
        #[test]
        fn local_world_roundtrip_inside(
            d in dims(),
            cx in -100_000i32..100_000,
            cz in -100_000i32..100_000,
            fx in 0.0f64..1.0, fy in 0.0f64..1.0, fz in 0.0f64..1.0,
        ) {
            let coord = ChunkCoord::new(cx, cz);
            let l = (
                (fx * d.sx() as f64) as i32,
                (fy * d.sy() as f64) as i32,
                (fz * d.sz() as f64) as i32,
            );
            prop_assert!(d.contains_local(l.0, l.1, l.2));
            let w = local_to_world(coord, d, l);
            prop_assert_eq!(world_to_local(coord, d, w), l);
            prop_assert_eq!(ChunkCoord::containing(w.0, w.2, d.sx(), d.sz()), coord);
        }

        #[test]
        fn outside_cells_are_not_contained(d in dims(), cx in -1000i32..1000, cz in -1000i32..1000) {
            let coord = ChunkCoord::new(cx, cz);
            let (ox, _, oz) = chunk_origin(coord, d);
            let west = world_to_local(coord, d, (ox - 1, 0, oz));
            let north = world_to_local(coord, d, (ox, 0, oz + d.sz() as i32));
            let above = world_to_local(coord, d, (ox, d.sy() as i32, oz));
            prop_assert!(!d.contains_local(west.0, west.1, west.2));
            prop_assert!(!d.contains_local(north.0, north.1, north.2));
            prop_assert!(!d.contains_local(above.0, above.1, above.2));
        }

        #[test]
        fn mapping_is_total_for_any_coordinate(
            d in dims(),
            cx in any::<i32>(),
            cz in any::<i32>(),
            cell in (any::<i32>(), any::<i32>(), any::<i32>()),
        ) {
            let coord = ChunkCoord::new(cx, cz);
            let local = world_to_local(coord, d, cell);
            prop_assert_eq!(local_to_world(coord, d, local), cell);
        }
    }

    #[test]
    fn extreme_chunk_coordinates_do_not_panic() {
        let d = ChunkDims::new(16, 64, 16).unwrap();
        let far = ChunkCoord::new(i32::MAX / 8, i32::MIN);
        let local = world_to_local(far, d, (0, 0, 0));
        assert_eq!(local_to_world(far, d, local), (0, 0, 0));
        assert_eq!(local_to_world(far, d, (3, 5, 7)).1, 5);
    }

    #[test]
    fn non_positive_dims_rejected() {
        assert!(ChunkDims::new(0, 4, 4).is_err());
        assert!(ChunkDims::new(4, -1, 4).is_err());
        assert_eq!(
            ChunkDims::new(2, 2, 0),
            Err(InvalidDimensions { sx: 2, sy: 2, sz: 0 })
        );
        assert!(ChunkDims::new(1, 1, 1).is_ok());
    }

    #[test]
    fn origin_and_negative_chunks() {
        let d = ChunkDims::new(16, 64, 16).unwrap();
        assert_eq!(chunk_origin(ChunkCoord::new(-1, 2), d), (-16, 0, 32));
        assert_eq!(ChunkCoord::containing(-1, -17, 16, 16), ChunkCoord::new(-1, -2));
        assert_eq!(ChunkCoord::containing(15, 16, 16, 16), ChunkCoord::new(0, 1));
    }
}
