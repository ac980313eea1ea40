//! Dense per-chunk block storage and generation fill.
#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use strata_blocks::BlockType;
use strata_world::coords::{self, ChunkDims, WorldCell};
use strata_world::{CellUnloader, ChunkCoord, InvalidDimensions, TerrainSource};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error(transparent)]
    InvalidDimensions(#[from] InvalidDimensions),
    #[error("block buffer holds {found} cells but the chunk needs {expected}")]
    BufferLength { expected: usize, found: usize },
}

/// One column chunk: a dense `sx * sy * sz` block array plus the world cells
/// it has produced geometry for.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    dims: ChunkDims,
    blocks: Vec<BlockType>,
    rendered: BTreeSet<WorldCell>,
}

impl Chunk {
    /// All-empty chunk.
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        Self {
            coord,
            dims,
            blocks: vec![BlockType::EMPTY; dims.volume()],
            rendered: BTreeSet::new(),
        }
    }

    /// Like [`Chunk::new`] but validates raw dimensions first.
    pub fn with_size(coord: ChunkCoord, sx: i64, sy: i64, sz: i64) -> Result<Self, ChunkError> {
        Ok(Self::new(coord, ChunkDims::new(sx, sy, sz)?))
    }

    pub fn from_blocks(
        coord: ChunkCoord,
        dims: ChunkDims,
        blocks: Vec<BlockType>,
    ) -> Result<Self, ChunkError> {
        if blocks.len() != dims.volume() {
            return Err(ChunkError::BufferLength {
                expected: dims.volume(),
                found: blocks.len(),
            });
        }
        Ok(Self {
            coord,
            dims,
            blocks,
            rendered: BTreeSet::new(),
        })
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Linear index of an in-bounds local cell, x-major then y then z.
    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.dims.sy() + y) * self.dims.sz() + z
    }

    #[inline]
    pub fn contains_local(&self, x: i32, y: i32, z: i32) -> bool {
        self.dims.contains_local(x, y, z)
    }

    /// Block at a local cell; out-of-range reads are empty.
    #[inline]
    pub fn get_local(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !self.contains_local(x, y, z) {
            return BlockType::EMPTY;
        }
        self.blocks[self.idx(x as usize, y as usize, z as usize)]
    }

    /// Writes a local cell; out-of-range writes are ignored.
    #[inline]
    pub fn set_local(&mut self, x: i32, y: i32, z: i32, ty: BlockType) {
        if !self.contains_local(x, y, z) {
            return;
        }
        let i = self.idx(x as usize, y as usize, z as usize);
        self.blocks[i] = ty;
    }

    #[inline]
    pub fn origin(&self) -> WorldCell {
        coords::chunk_origin(self.coord, self.dims)
    }

    #[inline]
    pub fn world_to_local(&self, cell: WorldCell) -> WorldCell {
        coords::world_to_local(self.coord, self.dims, cell)
    }

    #[inline]
    pub fn local_to_world(&self, cell: WorldCell) -> WorldCell {
        coords::local_to_world(self.coord, self.dims, cell)
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (lx, ly, lz) = self.world_to_local((wx, wy, wz));
        self.contains_local(lx, ly, lz)
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockType> {
        let (lx, ly, lz) = self.world_to_local((wx, wy, wz));
        self.contains_local(lx, ly, lz)
            .then(|| self.get_local(lx, ly, lz))
    }

    /// Writes a world cell if this chunk owns it. Returns whether it did.
    pub fn set_world(&mut self, wx: i32, wy: i32, wz: i32, ty: BlockType) -> bool {
        let (lx, ly, lz) = self.world_to_local((wx, wy, wz));
        if !self.contains_local(lx, ly, lz) {
            return false;
        }
        self.set_local(lx, ly, lz, ty);
        true
    }

    #[inline]
    pub fn has_non_empty(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_empty())
    }

    #[inline]
    pub fn is_all_empty(&self) -> bool {
        !self.has_non_empty()
    }

    /// Overwrites every cell from the terrain source, in index order.
    pub fn fill_from(&mut self, terrain: &(impl TerrainSource + ?Sized)) -> ChunkOccupancy {
        let (ox, _, oz) = self.origin();
        let (sx, sy, sz) = (self.dims.sx(), self.dims.sy(), self.dims.sz());
        let mut has_blocks = false;
        for x in 0..sx {
            for y in 0..sy {
                for z in 0..sz {
                    let ty = terrain.generate_block_type_at(ox + x as i32, y as i32, oz + z as i32);
                    has_blocks |= !ty.is_empty();
                    let i = self.idx(x, y, z);
                    self.blocks[i] = ty;
                }
            }
        }
        if has_blocks {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        }
    }

    // --- rendered-cell tracking ---

    pub fn rendered_cells(&self) -> impl Iterator<Item = &WorldCell> + '_ {
        self.rendered.iter()
    }

    pub fn rendered_len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_rendered(&self, cell: WorldCell) -> bool {
        self.rendered.contains(&cell)
    }

    /// Replaces the rendered set after a rebuild.
    pub fn replace_rendered(&mut self, cells: impl IntoIterator<Item = WorldCell>) {
        self.rendered.clear();
        self.rendered.extend(cells);
    }

    /// Hands every rendered cell to the unloader, then forgets them.
    /// Block data is left intact; dropping the chunk discards it.
    pub fn teardown(&mut self, sink: &mut (impl CellUnloader + ?Sized)) -> usize {
        let cells: Vec<WorldCell> = std::mem::take(&mut self.rendered).into_iter().collect();
        let n = cells.len();
        if n > 0 {
            sink.unload_cells(&cells, self.coord);
        }
        log::debug!(target: "chunk", "teardown ({}, {}) released {} cells", self.coord.cx, self.coord.cz, n);
        n
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

/// Allocates a chunk and fills it from procedural generation.
pub fn generate_chunk(
    coord: ChunkCoord,
    dims: ChunkDims,
    terrain: &(impl TerrainSource + ?Sized),
) -> (Chunk, ChunkOccupancy) {
    let mut chunk = Chunk::new(coord, dims);
    let occupancy = chunk.fill_from(terrain);
    (chunk, occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(Vec<(Vec<WorldCell>, ChunkCoord)>);

    impl CellUnloader for Recorder {
        fn unload_cells(&mut self, cells: &[WorldCell], owner: ChunkCoord) {
            self.0.push((cells.to_vec(), owner));
        }
    }

    #[test]
    fn teardown_reports_rendered_cells_once() {
        let mut c = Chunk::with_size(ChunkCoord::new(1, -1), 2, 2, 2).unwrap();
        c.replace_rendered([(2, 0, -2), (3, 1, -1), (2, 0, -2)]);
        let mut sink = Recorder(Vec::new());
        assert_eq!(c.teardown(&mut sink), 2);
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].0, vec![(2, 0, -2), (3, 1, -1)]);
        assert_eq!(sink.0[0].1, ChunkCoord::new(1, -1));
        assert_eq!(c.rendered_len(), 0);

        // Nothing left: the sink is not called again.
        assert_eq!(c.teardown(&mut sink), 0);
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn fill_from_uses_world_coordinates() {
        let dims = ChunkDims::new(2, 3, 2).unwrap();
        let terrain = |wx: i32, wy: i32, wz: i32| {
            if wy == 0 && wx == -2 && wz == 3 {
                BlockType(7)
            } else {
                BlockType::EMPTY
            }
        };
        let (c, occ) = generate_chunk(ChunkCoord::new(-1, 1), dims, &terrain);
        assert!(occ.has_blocks());
        assert_eq!(c.get_local(0, 0, 1), BlockType(7));
        assert_eq!(c.get_world(-2, 0, 3), Some(BlockType(7)));
        assert_eq!(c.blocks().iter().filter(|b| !b.is_empty()).count(), 1);

        let (empty, occ) = generate_chunk(ChunkCoord::new(5, 5), dims, &terrain);
        assert!(occ.is_empty());
        assert!(empty.is_all_empty());
    }

    #[test]
    fn invalid_sizes_fail_eagerly() {
        assert!(matches!(
            Chunk::with_size(ChunkCoord::default(), 0, 4, 4),
            Err(ChunkError::InvalidDimensions(_))
        ));
        assert!(Chunk::with_size(ChunkCoord::default(), 4, 4, -4).is_err());
        let dims = ChunkDims::new(2, 2, 2).unwrap();
        assert_eq!(
            Chunk::from_blocks(ChunkCoord::default(), dims, vec![BlockType::EMPTY; 7]).unwrap_err(),
            ChunkError::BufferLength { expected: 8, found: 7 }
        );
    }
}
