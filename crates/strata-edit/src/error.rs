use strata_world::{ChunkCoord, ChunkDims};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeltaError {
    #[error("delta was saved for chunk dimensions {found:?}, world uses {expected:?}")]
    DimensionMismatch { expected: ChunkDims, found: ChunkDims },
    #[error("delta belongs to chunk {found:?}, not {expected:?}")]
    CoordMismatch { expected: ChunkCoord, found: ChunkCoord },
    #[error("save file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file json: {0}")]
    Json(#[from] serde_json::Error),
}
