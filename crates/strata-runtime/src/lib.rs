//! Single-threaded chunk lifecycle: load, edit, debounced rebuild, unload.
#![forbid(unsafe_code)]

mod job;
mod view;

pub use job::{BuildJob, JobKind, JobOut};
pub use view::WorldView;

use hashbrown::HashMap;
use strata_blocks::{BlockRegistry, BlockType};
use strata_chunk::Chunk;
use strata_edit::{DeltaError, EditStore, WorldSave};
use strata_mesh_cpu::{ChunkMesh, MeshOptions};
use strata_world::{
    CellUnloader, ChunkCoord, ChunkDims, ConfigError, ShadingConfig, TerrainSource, WorldConfig,
    WorldQuery,
};

use crate::job::{generate_with_edits, process_build_job};

/// A chunk that is ready for display: data plus the mesh built from it.
pub struct LoadedChunk {
    pub chunk: Chunk,
    pub mesh: ChunkMesh,
    pub built_rev: u64,
}

pub struct ChunkWorld {
    dims: ChunkDims,
    height: i32,
    shading: ShadingConfig,
    reg: BlockRegistry,
    terrain: Box<dyn TerrainSource>,
    edits: EditStore,
    chunks: HashMap<ChunkCoord, LoadedChunk>,
    mesh_opts: MeshOptions,
    pending_edits: usize,
}

impl ChunkWorld {
    pub fn new(
        cfg: &WorldConfig,
        reg: BlockRegistry,
        terrain: Box<dyn TerrainSource>,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let dims = cfg.dims()?;
        // Cells above the chunk column don't exist, so they must read as empty
        // both while a chunk loads and once it is loaded.
        let height = cfg.world_height().min(dims.sy() as i32);
        if height < cfg.world_height() {
            log::warn!(
                target: "runtime",
                "world_height {} exceeds chunk height {}; clamping",
                cfg.world_height(),
                dims.sy()
            );
        }
        Ok(Self {
            dims,
            height,
            shading: cfg.shading.clone(),
            reg,
            terrain,
            edits: EditStore::new(dims),
            chunks: HashMap::new(),
            mesh_opts: MeshOptions::default(),
            pending_edits: 0,
        })
    }

    pub fn with_mesh_options(mut self, opts: MeshOptions) -> Self {
        self.mesh_opts = opts;
        self
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Effective column height: the configured height, capped at the chunk height.
    pub fn world_height(&self) -> i32 {
        self.height
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    pub fn edits(&self) -> &EditStore {
        &self.edits
    }

    pub fn view(&self) -> WorldView<'_> {
        WorldView {
            chunks: &self.chunks,
            edits: &self.edits,
            terrain: self.terrain.as_ref(),
            reg: &self.reg,
            dims: self.dims,
            height: self.height,
        }
    }

    #[inline]
    pub fn chunk_of(&self, wx: i32, wz: i32) -> ChunkCoord {
        ChunkCoord::containing(wx, wz, self.dims.sx(), self.dims.sz())
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Loaded chunk coordinates in sorted order.
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        v.sort();
        v
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord).map(|lc| &lc.chunk)
    }

    /// Current mesh of a loaded chunk.
    pub fn mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.chunks.get(&coord).map(|lc| &lc.mesh)
    }

    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        self.view().block_type_at(wx, wy, wz)
    }

    /// Generates the chunk, replays its edits and meshes it. The chunk only
    /// becomes visible once all three are done. Returns false if already loaded.
    pub fn load(&mut self, coord: ChunkCoord) -> bool {
        if self.is_loaded(coord) {
            return false;
        }
        let job = BuildJob {
            coord,
            rev: self.edits.get_rev(coord),
            kind: JobKind::Load,
        };
        match process_build_job(self, job) {
            Some(out) => self.apply(out),
            None => false,
        }
    }

    /// Hands every rendered cell to `sink`, then drops the chunk and its mesh.
    pub fn unload(&mut self, coord: ChunkCoord, sink: &mut (impl CellUnloader + ?Sized)) -> bool {
        let Some(lc) = self.chunks.get_mut(&coord) else {
            return false;
        };
        let released = lc.chunk.teardown(sink);
        self.chunks.remove(&coord);
        self.edits.forget_built(coord);
        log::info!(
            target: "runtime",
            "unloaded chunk ({}, {}) released_cells={}",
            coord.cx,
            coord.cz,
            released
        );
        true
    }

    /// Loads every chunk within `radius` (Chebyshev) of `center` and unloads the rest.
    /// Returns (loaded, unloaded) counts.
    pub fn update_radius(
        &mut self,
        center: ChunkCoord,
        radius: i32,
        sink: &mut (impl CellUnloader + ?Sized),
    ) -> (usize, usize) {
        let mut unloaded = 0;
        for coord in self.loaded_coords() {
            if coord.chebyshev(center) > radius && self.unload(coord, sink) {
                unloaded += 1;
            }
        }
        let mut loaded = 0;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if self.load(center.offset(dx, dz)) {
                    loaded += 1;
                }
            }
        }
        (loaded, unloaded)
    }

    /// Writes a block and records it as an edit. The mesh is not rebuilt until
    /// `flush_rebuilds`. Returns false for cells outside the world column.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, ty: BlockType) -> bool {
        if wy < 0 || wy >= self.height {
            return false;
        }
        let coord = self.chunk_of(wx, wz);
        if let Some(lc) = self.chunks.get_mut(&coord) {
            lc.chunk.set_world(wx, wy, wz, ty);
        }
        let generated = self.terrain.generate_block_type_at(wx, wy, wz);
        self.edits.record_change((wx, wy, wz), ty, generated);
        let rev = self.edits.bump_region_around(wx, wz);
        self.pending_edits += 1;
        log::debug!(
            target: "edit",
            "set ({}, {}, {}) = {} rev={}",
            wx,
            wy,
            wz,
            ty.code(),
            rev
        );
        true
    }

    /// Loaded chunks whose latest revision has not been built, sorted.
    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|c| self.edits.needs_rebuild(*c))
            .collect();
        v.sort();
        v
    }

    /// Builds a replacement mesh for a loaded chunk without installing it.
    pub fn build(&self, coord: ChunkCoord) -> Option<JobOut> {
        if !self.is_loaded(coord) {
            return None;
        }
        let job = BuildJob {
            coord,
            rev: self.edits.get_rev(coord),
            kind: JobKind::Edit,
        };
        process_build_job(self, job)
    }

    /// Installs a finished build in one step. Results for chunks that have
    /// since been unloaded, or older than the installed mesh, are discarded.
    pub fn apply(&mut self, out: JobOut) -> bool {
        let JobOut {
            coord,
            rev,
            kind,
            mesh,
            chunk,
            occupancy,
            t_gen_ms,
            t_mesh_ms,
        } = out;
        match kind {
            JobKind::Load => {
                let Some(mut chunk) = chunk else {
                    return false;
                };
                if self.chunks.contains_key(&coord) {
                    return false;
                }
                chunk.replace_rendered(mesh.rendered_cells.iter().copied());
                self.edits.mark_built(coord, rev);
                log::info!(
                    target: "runtime",
                    "loaded chunk ({}, {}) occupancy={:?} quads={} gen_ms={} mesh_ms={}",
                    coord.cx,
                    coord.cz,
                    occupancy,
                    mesh.quad_count(),
                    t_gen_ms,
                    t_mesh_ms
                );
                self.chunks.insert(
                    coord,
                    LoadedChunk {
                        chunk,
                        mesh,
                        built_rev: rev,
                    },
                );
                true
            }
            JobKind::Edit => {
                let Some(lc) = self.chunks.get_mut(&coord) else {
                    log::debug!(target: "runtime", "discarding build for unloaded chunk ({}, {})", coord.cx, coord.cz);
                    return false;
                };
                if rev < lc.built_rev {
                    log::debug!(
                        target: "runtime",
                        "discarding stale build for ({}, {}) rev={} built={}",
                        coord.cx,
                        coord.cz,
                        rev,
                        lc.built_rev
                    );
                    return false;
                }
                lc.chunk.replace_rendered(mesh.rendered_cells.iter().copied());
                lc.mesh = mesh;
                lc.built_rev = rev;
                self.edits.mark_built(coord, rev);
                true
            }
        }
    }

    /// Rebuilds each dirty chunk once, however many edits touched it.
    pub fn flush_rebuilds(&mut self) -> usize {
        let mut rebuilt = 0;
        for coord in self.dirty_chunks() {
            if let Some(out) = self.build(coord) {
                if self.apply(out) {
                    rebuilt += 1;
                }
            }
        }
        if self.pending_edits > 0 || rebuilt > 0 {
            log::debug!(
                target: "runtime",
                "coalesced {} edit(s) into {} rebuild(s)",
                self.pending_edits,
                rebuilt
            );
        }
        self.pending_edits = 0;
        rebuilt
    }

    /// All outstanding edits as a save file.
    pub fn save(&self) -> WorldSave {
        self.edits.to_world_save()
    }

    /// Merges saved edits. Loaded chunks they touch are regenerated with the
    /// edits applied and queued for rebuild along with their neighbors.
    pub fn import_save(&mut self, save: WorldSave) -> Result<usize, DeltaError> {
        let imported = self.edits.import_save(save)?;
        for &coord in &imported {
            if self.is_loaded(coord) {
                let (mut fresh, _) = generate_with_edits(coord, self.dims, self.terrain.as_ref(), &self.edits);
                if let Some(lc) = self.chunks.get_mut(&coord) {
                    fresh.replace_rendered(lc.chunk.rendered_cells().copied());
                    lc.chunk = fresh;
                }
            }
            for (dx, dz) in [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)] {
                self.edits.bump(coord.offset(dx, dz));
            }
        }
        log::info!(target: "runtime", "imported edits for {} chunk(s)", imported.len());
        Ok(imported.len())
    }
}
