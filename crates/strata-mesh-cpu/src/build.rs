use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use strata_blocks::{BlockType, Face, MaterialId, MaterialResolver};
use strata_chunk::Chunk;
use strata_geom::{Aabb, Vec3};
use strata_world::{ShadingConfig, WorldQuery};

use crate::chunk::{ChunkMesh, CollisionMesh};
use crate::emit::{emit_quad_indices, finish_groups};
use crate::mesh_build::MeshBuild;
use crate::shading::{face_shade, shade_rgba};
use crate::visibility::face_visible;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshOptions {
    /// Also produce a collision triangle mesh from the render geometry.
    pub build_collider: bool,
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Face-specific material, falling back to the block's default.
#[inline]
fn resolve_material<M>(materials: &M, block: BlockType, face: Face) -> Option<MaterialId>
where
    M: MaterialResolver + ?Sized,
{
    materials
        .face_material(block, face)
        .or_else(|| materials.block_material(block))
}

/// Builds the render mesh for one chunk.
///
/// Cells are visited x, then y, then z; faces in `Face::ALL` order. Each visible
/// face becomes one shaded unit quad in the shared vertex buffer, with its two
/// triangles appended to the submesh of its material. Faces whose material can't
/// be resolved are skipped and reported once per build.
pub fn build_chunk_mesh<W, M>(
    chunk: &Chunk,
    world: &W,
    materials: &M,
    shading: &ShadingConfig,
    opts: MeshOptions,
) -> ChunkMesh
where
    W: WorldQuery + ?Sized,
    M: MaterialResolver + ?Sized,
{
    if chunk.is_all_empty() {
        return ChunkMesh::empty(chunk.coord);
    }
    let start = Instant::now();
    let dims = chunk.dims();
    let mut verts = MeshBuild::default();
    // Surface-heavy terrain exposes about one face per solid cell.
    let solid = chunk.blocks().iter().filter(|b| !b.is_empty()).count();
    verts.reserve_quads(solid);
    let mut groups: HashMap<MaterialId, Vec<u32>> = HashMap::new();
    let mut rendered_cells = Vec::new();
    let mut missing: BTreeSet<(BlockType, Face)> = BTreeSet::new();
    let mut dropped_faces = 0usize;

    for x in 0..dims.sx() as i32 {
        for y in 0..dims.sy() as i32 {
            for z in 0..dims.sz() as i32 {
                let here = chunk.get_local(x, y, z);
                if here.is_empty() {
                    continue;
                }
                let world_cell = chunk.local_to_world((x, y, z));
                let (wx, wy, wz) = world_cell;
                if !world.should_render_block(wx, wy, wz) {
                    continue;
                }
                let origin = Vec3::new(x as f32, y as f32, z as f32);
                let mut emitted = false;
                for face in Face::ALL {
                    if !face_visible(chunk, world, (x, y, z), face) {
                        continue;
                    }
                    let Some(mid) = resolve_material(materials, here, face) else {
                        dropped_faces += 1;
                        missing.insert((here, face));
                        continue;
                    };
                    let rgba = shade_rgba(face_shade(face, world_cell, shading));
                    let base = verts.add_face(face, origin, rgba);
                    emit_quad_indices(&mut groups, mid, base);
                    emitted = true;
                }
                if emitted {
                    rendered_cells.push(world_cell);
                }
            }
        }
    }

    if !missing.is_empty() {
        log::warn!(
            target: "mesh",
            "chunk ({}, {}): dropped {} face(s) with no material; block/face pairs: {:?}",
            chunk.coord.cx,
            chunk.coord.cz,
            dropped_faces,
            missing
        );
    }

    let submeshes = finish_groups(groups, materials);
    let collider = opts
        .build_collider
        .then(|| CollisionMesh::from_parts(&verts, &submeshes));
    let mesh = ChunkMesh {
        coord: chunk.coord,
        bbox: Aabb::from_positions(&verts.pos),
        vertices: verts,
        submeshes,
        collider,
        dropped_faces,
        rendered_cells,
    };
    log::debug!(
        target: "mesh",
        "chunk ({}, {}) built: quads={} submeshes={} cells={} ms={}",
        mesh.coord.cx,
        mesh.coord.cz,
        mesh.quad_count(),
        mesh.submeshes.len(),
        mesh.rendered_cells.len(),
        elapsed_ms(start)
    );
    mesh
}
