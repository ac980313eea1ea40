use serde::{Deserialize, Serialize};
use strata_blocks::BlockType;
use strata_chunk::Chunk;
use strata_world::{ChunkCoord, ChunkDims};

use crate::DeltaError;

/// One deviation from generated content, in chunk-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedCell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub block: BlockType,
}

/// Unit of persistence: every changed cell of one chunk, one entry per cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkDelta {
    pub coord: ChunkCoord,
    pub size: ChunkDims,
    pub cells: Vec<ChangedCell>,
}

impl ChunkDelta {
    pub fn new(coord: ChunkCoord, size: ChunkDims) -> Self {
        Self {
            coord,
            size,
            cells: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Replays `delta` on top of a freshly generated `chunk`, in list order.
///
/// Returns the number of cells written. Cells outside the chunk are skipped.
pub fn load_chunk(delta: &ChunkDelta, chunk: &mut Chunk) -> Result<usize, DeltaError> {
    if delta.size != chunk.dims() {
        return Err(DeltaError::DimensionMismatch {
            expected: chunk.dims(),
            found: delta.size,
        });
    }
    if delta.coord != chunk.coord {
        return Err(DeltaError::CoordMismatch {
            expected: chunk.coord,
            found: delta.coord,
        });
    }
    let mut applied = 0;
    for c in &delta.cells {
        if !chunk.contains_local(c.x, c.y, c.z) {
            log::warn!(
                target: "edit",
                "chunk ({}, {}): skipping out-of-range delta cell ({}, {}, {})",
                delta.coord.cx,
                delta.coord.cz,
                c.x,
                c.y,
                c.z
            );
            continue;
        }
        chunk.set_local(c.x, c.y, c.z, c.block);
        applied += 1;
    }
    Ok(applied)
}
