use hashbrown::HashMap;
use strata_blocks::{BlockRegistry, BlockType};
use strata_edit::EditStore;
use strata_world::{ChunkCoord, ChunkDims, TerrainSource, WorldQuery};

use crate::LoadedChunk;

/// The world as the mesher sees it: loaded chunk data, then recorded edits,
/// then generation. A chunk's neighbors look the same whether or not they are loaded.
pub struct WorldView<'a> {
    pub(crate) chunks: &'a HashMap<ChunkCoord, LoadedChunk>,
    pub(crate) edits: &'a EditStore,
    pub(crate) terrain: &'a dyn TerrainSource,
    pub(crate) reg: &'a BlockRegistry,
    pub(crate) dims: ChunkDims,
    pub(crate) height: i32,
}

impl WorldQuery for WorldView<'_> {
    fn block_type_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        if wy < 0 || wy >= self.height {
            return BlockType::EMPTY;
        }
        let coord = ChunkCoord::containing(wx, wz, self.dims.sx(), self.dims.sz());
        if let Some(lc) = self.chunks.get(&coord) {
            return lc.chunk.get_world(wx, wy, wz).unwrap_or(BlockType::EMPTY);
        }
        if let Some(b) = self.edits.get(wx, wy, wz) {
            return b;
        }
        self.terrain.generate_block_type_at(wx, wy, wz)
    }

    fn is_block_opaque(&self, ty: BlockType) -> bool {
        self.reg.is_opaque(ty)
    }

    fn world_height(&self) -> i32 {
        self.height
    }
}
