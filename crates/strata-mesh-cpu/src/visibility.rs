//! Face culling against neighbors, including across chunk seams.

use strata_blocks::{BlockType, Face};
use strata_chunk::Chunk;
use strata_world::{WorldCell, WorldQuery};

/// Block adjacent to local cell `(lx, ly, lz)` across `face`.
///
/// Neighbors inside the chunk come from the chunk array. Anything outside is
/// asked of `world`, except Y outside `[0, world_height)` which counts as empty.
#[inline]
pub fn neighbor_block<W>(chunk: &Chunk, world: &W, (lx, ly, lz): WorldCell, face: Face) -> BlockType
where
    W: WorldQuery + ?Sized,
{
    let (dx, dy, dz) = face.delta();
    let (nx, ny, nz) = (lx + dx, ly + dy, lz + dz);
    if chunk.contains_local(nx, ny, nz) {
        return chunk.get_local(nx, ny, nz);
    }
    if ny < 0 || ny >= world.world_height() {
        return BlockType::EMPTY;
    }
    let (wx, wy, wz) = chunk.local_to_world((nx, ny, nz));
    world.block_type_at(wx, wy, wz)
}

/// A face is drawn when its neighbor is empty or lets light through.
#[inline]
pub fn face_visible<W>(chunk: &Chunk, world: &W, cell: WorldCell, face: Face) -> bool
where
    W: WorldQuery + ?Sized,
{
    let nb = neighbor_block(chunk, world, cell, face);
    nb.is_empty() || !world.is_block_opaque(nb)
}
