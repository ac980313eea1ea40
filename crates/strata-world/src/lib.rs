//! World sizing, chunk coordinates, and the queries the core consumes.
#![forbid(unsafe_code)]

mod chunk_coord;
pub mod config;
pub mod coords;
mod error;
mod query;
pub mod terrain;

pub use chunk_coord::ChunkCoord;
pub use config::{GenerationConfig, ShadingConfig, WorldConfig};
pub use coords::{ChunkDims, WorldCell};
pub use error::{ConfigError, InvalidDimensions};
pub use query::{CellUnloader, TerrainSource, WorldQuery};
pub use terrain::{FlatTerrain, NoiseTerrain, Terrain};
