use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig, MaterialsDef};
use super::material::MaterialCatalog;
use super::types::{BlockType, Face, FaceRole, MaterialId};

/// Material lookups consumed by the mesher.
pub trait MaterialResolver {
    /// Material for this exact `(block, face)` pair, if one is configured.
    fn face_material(&self, block: BlockType, face: Face) -> Option<MaterialId>;
    /// The block's default material.
    fn block_material(&self, block: BlockType) -> Option<MaterialId>;
    /// Display name used to order submeshes; `None` sorts as the empty string.
    fn material_name(&self, id: MaterialId) -> Option<&str>;
}

#[derive(Default, Clone, Debug)]
pub struct CompiledMaterials {
    pub all: Option<MaterialId>,
    pub top: Option<MaterialId>,
    pub bottom: Option<MaterialId>,
    pub side: Option<MaterialId>,
}

impl CompiledMaterials {
    /// Per-face override only; the `all` default is resolved separately.
    pub fn material_for(&self, role: FaceRole) -> Option<MaterialId> {
        match role {
            FaceRole::Top => self.top,
            FaceRole::Bottom => self.bottom,
            FaceRole::Side => self.side,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockDefinition {
    pub id: BlockType,
    pub name: String,
    pub opaque: bool,
    pub materials: CompiledMaterials,
}

#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub materials: MaterialCatalog,
    pub blocks: Vec<Option<BlockDefinition>>,
    pub by_name: HashMap<String, BlockType>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        let mut reg = Self {
            materials: MaterialCatalog::new(),
            blocks: Vec::new(),
            by_name: HashMap::new(),
        };
        reg.insert(air_definition());
        reg
    }

    #[inline]
    pub fn get(&self, id: BlockType) -> Option<&BlockDefinition> {
        self.blocks.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockType> {
        self.by_name.get(name).copied()
    }

    /// Opacity predicate. Empty and unregistered types are never opaque.
    #[inline]
    pub fn is_opaque(&self, id: BlockType) -> bool {
        !id.is_empty() && self.get(id).is_some_and(|b| b.opaque)
    }

    pub fn load_from_paths(
        materials_path: impl AsRef<Path>,
        blocks_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let materials = MaterialCatalog::from_path(materials_path)?;
        let blocks_toml = fs::read_to_string(blocks_path)?;
        let blocks_cfg: BlocksConfig = toml::from_str(&blocks_toml)?;
        Self::from_configs(materials, blocks_cfg)
    }

    pub fn from_toml_strs(materials: &str, blocks: &str) -> Result<Self, Box<dyn Error>> {
        let materials = MaterialCatalog::from_toml_str(materials)?;
        let blocks_cfg: BlocksConfig = toml::from_str(blocks)?;
        Self::from_configs(materials, blocks_cfg)
    }

    pub fn from_configs(
        materials: MaterialCatalog,
        cfg: BlocksConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry {
            materials,
            blocks: Vec::new(),
            by_name: HashMap::new(),
        };
        reg.insert(air_definition());
        let mut next_id: u16 = 1;
        for def in cfg.blocks.into_iter() {
            let id = match def.id {
                Some(id) => id,
                None => {
                    while reg.get(BlockType(next_id)).is_some() {
                        next_id = next_id
                            .checked_add(1)
                            .ok_or("block id space exhausted")?;
                    }
                    next_id
                }
            };
            if id == 0 {
                if def.name != "air" {
                    return Err(format!("block id 0 is reserved for air, got '{}'", def.name).into());
                }
                // Redefining air is allowed but it stays empty.
                continue;
            }
            if reg.get(BlockType(id)).is_some() {
                return Err(format!("duplicate block id {} ('{}')", id, def.name).into());
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("duplicate block name '{}'", def.name).into());
            }
            let compiled = compile_block(&reg.materials, def, id);
            reg.insert(compiled);
        }
        Ok(reg)
    }

    /// Registers (or replaces) a block definition in code.
    pub fn insert(&mut self, def: BlockDefinition) {
        let ix = def.id.0 as usize;
        if self.blocks.len() <= ix {
            self.blocks.resize(ix + 1, None);
        }
        self.by_name.insert(def.name.clone(), def.id);
        self.blocks[ix] = Some(def);
    }

    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }
}

impl MaterialResolver for BlockRegistry {
    fn face_material(&self, block: BlockType, face: Face) -> Option<MaterialId> {
        self.get(block)?.materials.material_for(face.role())
    }

    fn block_material(&self, block: BlockType) -> Option<MaterialId> {
        self.get(block)?.materials.all
    }

    fn material_name(&self, id: MaterialId) -> Option<&str> {
        self.materials.get(id).map(|m| m.key.as_str())
    }
}

fn air_definition() -> BlockDefinition {
    BlockDefinition {
        id: BlockType::EMPTY,
        name: "air".to_string(),
        opaque: false,
        materials: CompiledMaterials::default(),
    }
}

fn compile_block(materials: &MaterialCatalog, def: BlockDef, id: u16) -> BlockDefinition {
    let mats = compile_materials(materials, &def.name, def.materials);
    BlockDefinition {
        id: BlockType(id),
        name: def.name,
        opaque: def.opaque.unwrap_or(true),
        materials: mats,
    }
}

fn compile_materials(
    materials: &MaterialCatalog,
    block: &str,
    def: Option<MaterialsDef>,
) -> CompiledMaterials {
    let Some(def) = def else {
        return CompiledMaterials::default();
    };
    let resolve = |key: Option<String>| -> Option<MaterialId> {
        let key = key?;
        let id = materials.get_id(&key);
        if id.is_none() {
            log::warn!("block '{}' references unknown material '{}'", block, key);
        }
        id
    };
    CompiledMaterials {
        all: resolve(def.all),
        top: resolve(def.top),
        bottom: resolve(def.bottom),
        side: resolve(def.side),
    }
}
