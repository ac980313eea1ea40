use strata_blocks::MaterialId;
use strata_geom::{Aabb, Vec3};
use strata_world::{ChunkCoord, WorldCell};

use crate::mesh_build::MeshBuild;

/// Triangles drawn with one material, indexing the chunk's shared vertex buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Submesh {
    pub material: MaterialId,
    pub name: String,
    pub indices: Vec<u32>,
}

impl Submesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Triangle soup for physics, built from the same geometry as the render mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl CollisionMesh {
    pub(crate) fn from_parts(verts: &MeshBuild, submeshes: &[Submesh]) -> Self {
        let positions = verts
            .pos
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        let indices = submeshes.iter().flat_map(|s| s.indices.iter().copied()).collect();
        Self { positions, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Output of one chunk build. Positions are chunk-local; place the mesh at the
/// chunk origin to render it.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub vertices: MeshBuild,
    pub submeshes: Vec<Submesh>,
    pub collider: Option<CollisionMesh>,
    /// Visible faces skipped because their block had no material for them.
    pub dropped_faces: usize,
    /// World cells that produced at least one face.
    pub rendered_cells: Vec<WorldCell>,
}

impl ChunkMesh {
    pub fn empty(coord: ChunkCoord) -> Self {
        Self {
            coord,
            bbox: Aabb::EMPTY,
            vertices: MeshBuild::default(),
            submeshes: Vec::new(),
            collider: None,
            dropped_faces: 0,
            rendered_cells: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.vertex_count() / 4
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(Submesh::triangle_count).sum()
    }

    pub fn submesh(&self, material: MaterialId) -> Option<&Submesh> {
        self.submeshes.iter().find(|s| s.material == material)
    }
}
