use strata_blocks::BlockType;

use crate::{ChunkCoord, WorldCell};

/// Read-only view of the current world, consulted across chunk seams.
pub trait WorldQuery {
    /// Current (post-edit) block type at a world cell.
    fn block_type_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType;

    fn is_block_opaque(&self, ty: BlockType) -> bool;

    /// Number of valid Y levels, `[0, world_height)`.
    fn world_height(&self) -> i32;

    /// External gating (view distance and similar), independent of face culling.
    fn should_render_block(&self, _wx: i32, _wy: i32, _wz: i32) -> bool {
        true
    }
}

/// Deterministic procedural content for a given seed.
pub trait TerrainSource {
    fn generate_block_type_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType;
}

/// Receives the world cells whose geometry went away when a chunk is torn down.
pub trait CellUnloader {
    fn unload_cells(&mut self, cells: &[WorldCell], owner: ChunkCoord);
}

impl<F> TerrainSource for F
where
    F: Fn(i32, i32, i32) -> BlockType,
{
    fn generate_block_type_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        self(wx, wy, wz)
    }
}
