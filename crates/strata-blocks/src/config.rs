use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub id: Option<u16>,
    /// Defaults to `true`. Non-opaque blocks (foliage, glass) let neighbor faces show through.
    pub opaque: Option<bool>,
    pub materials: Option<MaterialsDef>,
}

/// Material keys for a block: `all` is the default, the rest are per-face overrides.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MaterialsDef {
    pub all: Option<String>,
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub side: Option<String>,
}
