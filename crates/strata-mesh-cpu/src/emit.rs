use std::collections::HashMap;

use strata_blocks::{MaterialId, MaterialResolver};

use crate::chunk::Submesh;
use crate::constants::{INITIAL_QUAD_CAP, QUAD_TRIANGLES};

// Index sink keyed by material; vertices live in the shared MeshBuild.
pub trait BuildSink {
    fn indices_mut(&mut self, mid: MaterialId) -> &mut Vec<u32>;
}

impl BuildSink for HashMap<MaterialId, Vec<u32>> {
    #[inline]
    fn indices_mut(&mut self, mid: MaterialId) -> &mut Vec<u32> {
        self.entry(mid)
            .or_insert_with(|| Vec::with_capacity(INITIAL_QUAD_CAP * QUAD_TRIANGLES.len()))
    }
}

/// Appends the two triangles of the quad starting at vertex `base`.
#[inline]
pub(crate) fn emit_quad_indices(sink: &mut impl BuildSink, mid: MaterialId, base: u32) {
    sink.indices_mut(mid).extend(QUAD_TRIANGLES.iter().map(|i| base + i));
}

/// Turns material groups into submeshes ordered by material name, then id.
pub(crate) fn finish_groups<M>(groups: HashMap<MaterialId, Vec<u32>>, materials: &M) -> Vec<Submesh>
where
    M: MaterialResolver + ?Sized,
{
    let mut out: Vec<Submesh> = groups
        .into_iter()
        .filter(|(_, idx)| !idx.is_empty())
        .map(|(material, indices)| Submesh {
            material,
            name: materials.material_name(material).unwrap_or_default().to_string(),
            indices,
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name).then(a.material.cmp(&b.material)));
    out
}
