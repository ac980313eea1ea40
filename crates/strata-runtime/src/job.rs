use std::time::Instant;

use strata_chunk::{Chunk, ChunkOccupancy, generate_chunk};
use strata_edit::{EditStore, load_chunk};
use strata_mesh_cpu::{ChunkMesh, build_chunk_mesh};
use strata_world::{ChunkCoord, ChunkDims, TerrainSource};

use crate::ChunkWorld;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    /// First build after generation.
    Load,
    /// Rebuild of an already loaded chunk.
    Edit,
}

#[derive(Clone, Copy, Debug)]
pub struct BuildJob {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub kind: JobKind,
}

/// A finished build. Nothing in the world changes until it is applied.
pub struct JobOut {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub kind: JobKind,
    pub mesh: ChunkMesh,
    /// Freshly generated chunk for `Load` jobs.
    pub chunk: Option<Chunk>,
    pub occupancy: ChunkOccupancy,
    /// Generation plus delta replay.
    pub t_gen_ms: u32,
    pub t_mesh_ms: u32,
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Generates a chunk and replays its recorded edits on top.
pub(crate) fn generate_with_edits(
    coord: ChunkCoord,
    dims: ChunkDims,
    terrain: &dyn TerrainSource,
    edits: &EditStore,
) -> (Chunk, ChunkOccupancy) {
    let (mut chunk, occupancy) = generate_chunk(coord, dims, terrain);
    if !edits.has_changes(coord) {
        return (chunk, occupancy);
    }
    let delta = edits.delta_for(coord);
    if let Err(e) = load_chunk(&delta, &mut chunk) {
        log::warn!(
            target: "runtime",
            "chunk ({}, {}): dropping saved edits: {}",
            coord.cx,
            coord.cz,
            e
        );
        return (chunk, occupancy);
    }
    let occupancy = if chunk.has_non_empty() {
        ChunkOccupancy::Populated
    } else {
        ChunkOccupancy::Empty
    };
    (chunk, occupancy)
}

/// Runs a job to completion against the current world state.
/// Returns `None` for an edit job whose chunk is no longer loaded.
pub(crate) fn process_build_job(world: &ChunkWorld, job: BuildJob) -> Option<JobOut> {
    let BuildJob { coord, rev, kind } = job;
    let view = world.view();
    let mut t_gen_ms = 0;

    let fresh = match kind {
        JobKind::Load => {
            let t0 = Instant::now();
            let generated = generate_with_edits(coord, world.dims, world.terrain.as_ref(), &world.edits);
            t_gen_ms = elapsed_ms(t0);
            Some(generated)
        }
        JobKind::Edit => None,
    };

    let t0 = Instant::now();
    let (mesh, chunk, occupancy) = match fresh {
        Some((chunk, occupancy)) => {
            let mesh = build_chunk_mesh(&chunk, &view, &world.reg, &world.shading, world.mesh_opts);
            (mesh, Some(chunk), occupancy)
        }
        None => {
            let lc = world.chunks.get(&coord)?;
            let occupancy = if lc.chunk.has_non_empty() {
                ChunkOccupancy::Populated
            } else {
                ChunkOccupancy::Empty
            };
            let mesh = build_chunk_mesh(&lc.chunk, &view, &world.reg, &world.shading, world.mesh_opts);
            (mesh, None, occupancy)
        }
    };
    let t_mesh_ms = elapsed_ms(t0);

    Some(JobOut {
        coord,
        rev,
        kind,
        mesh,
        chunk,
        occupancy,
        t_gen_ms,
        t_mesh_ms,
    })
}
