//! Block types, faces, and the block/material registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod material;
pub mod registry;
pub mod types;

pub use material::{Material, MaterialCatalog};
pub use registry::{BlockDefinition, BlockRegistry, MaterialResolver};
pub use types::{BlockType, Face, FaceRole, MaterialId};
