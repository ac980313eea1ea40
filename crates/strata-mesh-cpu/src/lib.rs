//! CPU chunk mesher: face culling, static face shading, and per-material batching.
#![forbid(unsafe_code)]

mod build;
mod chunk;
mod constants;
mod emit;
pub mod face;
mod mesh_build;
pub mod shading;
pub mod visibility;

pub use build::{MeshOptions, build_chunk_mesh};
pub use chunk::{ChunkMesh, CollisionMesh, Submesh};
pub use mesh_build::MeshBuild;
pub use strata_blocks::Face;
