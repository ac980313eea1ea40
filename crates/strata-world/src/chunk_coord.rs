use serde::{Deserialize, Serialize};

/// Column chunk coordinate. Chunks span the full world height, so there is no Y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk holding world column `(wx, wz)`; negative cells round toward -inf.
    #[inline]
    pub fn containing(wx: i32, wz: i32, sx: usize, sz: usize) -> Self {
        Self {
            cx: wx.div_euclid(sx as i32),
            cz: wz.div_euclid(sz as i32),
        }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx.wrapping_add(dx),
            cz: self.cz.wrapping_add(dz),
        }
    }

    /// Chebyshev distance, the metric of a square load radius.
    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        let dx = (i64::from(self.cx) - i64::from(other.cx)).abs();
        let dz = (i64::from(self.cz) - i64::from(other.cz)).abs();
        dx.max(dz).min(i64::from(i32::MAX)) as i32
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}
