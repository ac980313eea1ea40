//! Persistent world edits (deltas from generation) and rebuild revisions.
#![forbid(unsafe_code)]

mod delta;
mod error;
mod save;

pub use delta::{ChangedCell, ChunkDelta, load_chunk};
pub use error::DeltaError;
pub use save::WorldSave;

use std::collections::{BTreeMap, HashMap};

use strata_blocks::BlockType;
use strata_chunk::Chunk;
use strata_world::coords::{chunk_origin, world_to_local};
use strata_world::{ChunkCoord, ChunkDims, WorldCell};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditStoreStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
    pub rev_entries: usize,
    pub built_entries: usize,
}

/// Chunk-aware edit store with simple change tracking.
///
/// Cells are keyed by chunk, then by local coordinate, so each cell holds at
/// most one entry and saved lists come out in a stable order.
pub struct EditStore {
    dims: ChunkDims,
    inner: HashMap<ChunkCoord, BTreeMap<WorldCell, BlockType>>,
    // Change-tracking
    rev: HashMap<ChunkCoord, u64>,   // latest requested change affecting chunk
    built: HashMap<ChunkCoord, u64>, // last built rev for chunk
    counter: u64,
}

impl EditStore {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            inner: HashMap::new(),
            rev: HashMap::new(),
            built: HashMap::new(),
            counter: 0,
        }
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn stats(&self) -> EditStoreStats {
        EditStoreStats {
            chunk_entries: self.inner.len(),
            block_edits: self.inner.values().map(|m| m.len()).sum(),
            rev_entries: self.rev.len(),
            built_entries: self.built.len(),
        }
    }

    #[inline]
    pub fn chunk_of(&self, wx: i32, wz: i32) -> ChunkCoord {
        ChunkCoord::containing(wx, wz, self.dims.sx(), self.dims.sz())
    }

    pub fn get(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockType> {
        let coord = self.chunk_of(wx, wz);
        let local = world_to_local(coord, self.dims, (wx, wy, wz));
        self.inner.get(&coord).and_then(|m| m.get(&local).copied())
    }

    /// Records the latest block at a world cell. Writing back the generated
    /// value drops the entry. Returns whether the cell now differs from generation.
    pub fn record_change(&mut self, (wx, wy, wz): WorldCell, new: BlockType, generated: BlockType) -> bool {
        let coord = self.chunk_of(wx, wz);
        let local = world_to_local(coord, self.dims, (wx, wy, wz));
        if new == generated {
            if let Some(m) = self.inner.get_mut(&coord) {
                m.remove(&local);
                if m.is_empty() {
                    self.inner.remove(&coord);
                }
            }
            return false;
        }
        self.inner.entry(coord).or_default().insert(local, new);
        true
    }

    pub fn has_changes(&self, coord: ChunkCoord) -> bool {
        self.inner.contains_key(&coord)
    }

    /// Changed cells of one chunk in local coordinates, ordered by (x, y, z).
    pub fn changes_in(&self, coord: ChunkCoord) -> impl Iterator<Item = (WorldCell, BlockType)> + '_ {
        self.inner
            .get(&coord)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (*k, *v)))
    }

    pub fn delta_for(&self, coord: ChunkCoord) -> ChunkDelta {
        let mut delta = ChunkDelta::new(coord, self.dims);
        delta.cells = self
            .changes_in(coord)
            .map(|((x, y, z), block)| ChangedCell { x, y, z, block })
            .collect();
        delta
    }

    /// Delta record for a loaded chunk, declaring the chunk's own dimensions.
    pub fn save_chunk(&self, chunk: &Chunk) -> ChunkDelta {
        let mut delta = self.delta_for(chunk.coord);
        delta.size = chunk.dims();
        delta
    }

    /// Replaces this chunk's entries with a saved record. Duplicate cells in the
    /// record collapse to the last one listed.
    pub fn insert_delta(&mut self, delta: ChunkDelta) -> Result<usize, DeltaError> {
        if delta.size != self.dims {
            return Err(DeltaError::DimensionMismatch {
                expected: self.dims,
                found: delta.size,
            });
        }
        let mut cells = BTreeMap::new();
        for c in delta.cells {
            if self.dims.contains_local(c.x, c.y, c.z) {
                cells.insert((c.x, c.y, c.z), c.block);
            }
        }
        let n = cells.len();
        if cells.is_empty() {
            self.inner.remove(&delta.coord);
        } else {
            self.inner.insert(delta.coord, cells);
        }
        Ok(n)
    }

    /// Every chunk with outstanding changes, ordered by coordinate.
    pub fn to_world_save(&self) -> WorldSave {
        let mut coords: Vec<ChunkCoord> = self.inner.keys().copied().collect();
        coords.sort();
        WorldSave {
            chunk_size: self.dims,
            chunks: coords.into_iter().map(|c| self.delta_for(c)).collect(),
        }
    }

    /// Merges a save file. Records whose dimensions disagree are dropped with a
    /// warning; a file saved for different chunk dimensions is rejected whole.
    /// Returns the chunks that were imported.
    pub fn import_save(&mut self, save: WorldSave) -> Result<Vec<ChunkCoord>, DeltaError> {
        if save.chunk_size != self.dims {
            return Err(DeltaError::DimensionMismatch {
                expected: self.dims,
                found: save.chunk_size,
            });
        }
        let mut imported = Vec::with_capacity(save.chunks.len());
        for delta in save.chunks {
            let coord = delta.coord;
            match self.insert_delta(delta) {
                Ok(_) => imported.push(coord),
                Err(e) => {
                    log::warn!(target: "edit", "rejecting delta for chunk ({}, {}): {}", coord.cx, coord.cz, e)
                }
            }
        }
        Ok(imported)
    }

    // --- change tracking ---

    fn next_stamp(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1).max(1);
        self.counter
    }

    /// Marks one chunk as changed without an edit (e.g. after importing deltas).
    pub fn bump(&mut self, coord: ChunkCoord) -> u64 {
        let stamp = self.next_stamp();
        self.rev.insert(coord, stamp);
        stamp
    }

    /// Change-tracking: mark the chunk containing (wx,wz) and any neighbor across
    /// a border the cell touches. Returns a new monotonically increasing stamp.
    pub fn bump_region_around(&mut self, wx: i32, wz: i32) -> u64 {
        let stamp = self.next_stamp();
        for key in self.affected_chunks(wx, wz) {
            self.rev.insert(key, stamp);
        }
        stamp
    }

    /// Chunks whose faces can change when the cell at (wx, *, wz) changes.
    pub fn affected_chunks(&self, wx: i32, wz: i32) -> Vec<ChunkCoord> {
        let coord = self.chunk_of(wx, wz);
        let (x0, _, z0) = chunk_origin(coord, self.dims);
        let (lx, lz) = (wx - x0, wz - z0);
        let (sx, sz) = (self.dims.sx() as i32, self.dims.sz() as i32);

        let mut affected = vec![coord];
        if lx == 0 {
            affected.push(coord.offset(-1, 0));
        }
        if lx == sx - 1 {
            affected.push(coord.offset(1, 0));
        }
        if lz == 0 {
            affected.push(coord.offset(0, -1));
        }
        if lz == sz - 1 {
            affected.push(coord.offset(0, 1));
        }
        affected
    }

    pub fn get_rev(&self, coord: ChunkCoord) -> u64 {
        self.rev.get(&coord).copied().unwrap_or(0)
    }

    pub fn mark_built(&mut self, coord: ChunkCoord, rev: u64) {
        // Only update if this is a newer revision
        let e = self.built.entry(coord).or_insert(0);
        if rev > *e {
            *e = rev;
        }
    }

    pub fn built_rev(&self, coord: ChunkCoord) -> u64 {
        self.built.get(&coord).copied().unwrap_or(0)
    }

    /// Check if a chunk needs rebuilding
    pub fn needs_rebuild(&self, coord: ChunkCoord) -> bool {
        self.get_rev(coord) > self.built_rev(coord)
    }

    /// Drops the built stamp of an unloaded chunk. Edits are kept.
    pub fn forget_built(&mut self, coord: ChunkCoord) {
        self.built.remove(&coord);
    }
}
