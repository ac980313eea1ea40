//! Reference terrain generators used by the driver and benches.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_blocks::{BlockRegistry, BlockType};

use crate::config::{GenerationConfig, Mode};
use crate::{ConfigError, TerrainSource};

/// Solid layer of one block type from `y = 0` up to `thickness`.
#[derive(Clone, Debug)]
pub struct FlatTerrain {
    pub thickness: i32,
    pub block: BlockType,
}

impl TerrainSource for FlatTerrain {
    fn generate_block_type_at(&self, _wx: i32, wy: i32, _wz: i32) -> BlockType {
        if wy >= 0 && wy < self.thickness {
            self.block
        } else {
            BlockType::EMPTY
        }
    }
}

/// Heightmap terrain: stone, a filler band, then one surface cell.
pub struct NoiseTerrain {
    noise: FastNoiseLite,
    base_height: i32,
    amplitude: f32,
    surface: BlockType,
    filler: BlockType,
    filler_depth: i32,
    stone: BlockType,
}

impl NoiseTerrain {
    #[inline]
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let h = self.noise.get_noise_2d(wx as f32, wz as f32);
        self.base_height + (h * self.amplitude).round() as i32
    }
}

impl TerrainSource for NoiseTerrain {
    fn generate_block_type_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        if wy < 0 {
            return BlockType::EMPTY;
        }
        let h = self.height_at(wx, wz);
        if wy >= h {
            BlockType::EMPTY
        } else if wy == h - 1 {
            self.surface
        } else if wy >= h - 1 - self.filler_depth {
            self.filler
        } else {
            self.stone
        }
    }
}

pub enum Terrain {
    Flat(FlatTerrain),
    Noise(NoiseTerrain),
}

impl Terrain {
    pub fn from_config(cfg: &GenerationConfig, reg: &BlockRegistry) -> Result<Self, ConfigError> {
        let lookup = |name: &str| {
            reg.id_by_name(name)
                .ok_or_else(|| ConfigError::Invalid(format!("generation references unknown block '{}'", name)))
        };
        Ok(match cfg.mode {
            Mode::Flat => Terrain::Flat(FlatTerrain {
                thickness: cfg.flat.thickness,
                block: lookup(&cfg.flat.block)?,
            }),
            Mode::Noise => {
                let mut noise = FastNoiseLite::with_seed(cfg.seed);
                noise.set_noise_type(Some(NoiseType::OpenSimplex2));
                noise.set_frequency(Some(cfg.noise.frequency));
                Terrain::Noise(NoiseTerrain {
                    noise,
                    base_height: cfg.noise.base_height,
                    amplitude: cfg.noise.amplitude,
                    surface: lookup(&cfg.noise.surface)?,
                    filler: lookup(&cfg.noise.filler)?,
                    filler_depth: cfg.noise.filler_depth.max(0),
                    stone: lookup(&cfg.noise.stone)?,
                })
            }
        })
    }
}

impl TerrainSource for Terrain {
    fn generate_block_type_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        match self {
            Terrain::Flat(t) => t.generate_block_type_at(wx, wy, wz),
            Terrain::Noise(t) => t.generate_block_type_at(wx, wy, wz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::config::{BlockDef, BlocksConfig};
    use strata_blocks::MaterialCatalog;

    fn registry() -> BlockRegistry {
        let blocks = ["stone", "dirt", "grass"]
            .iter()
            .enumerate()
            .map(|(i, n)| BlockDef {
                name: n.to_string(),
                id: Some(i as u16 + 1),
                opaque: None,
                materials: None,
            })
            .collect();
        BlockRegistry::from_configs(MaterialCatalog::new(), BlocksConfig { blocks }).unwrap()
    }

    #[test]
    fn flat_fills_thickness_only() {
        let t = FlatTerrain {
            thickness: 2,
            block: BlockType(1),
        };
        assert_eq!(t.generate_block_type_at(5, 0, -3), BlockType(1));
        assert_eq!(t.generate_block_type_at(5, 1, -3), BlockType(1));
        assert_eq!(t.generate_block_type_at(5, 2, -3), BlockType::EMPTY);
        assert_eq!(t.generate_block_type_at(5, -1, -3), BlockType::EMPTY);
    }

    #[test]
    fn noise_columns_are_layered_and_deterministic() {
        let reg = registry();
        let cfg = GenerationConfig::default();
        let a = Terrain::from_config(&cfg, &reg).unwrap();
        let b = Terrain::from_config(&cfg, &reg).unwrap();
        let Terrain::Noise(n) = &a else {
            panic!("default mode is noise");
        };
        for (wx, wz) in [(0, 0), (-17, 40), (123, -9)] {
            let h = n.height_at(wx, wz);
            assert_eq!(a.generate_block_type_at(wx, h - 1, wz), reg.id_by_name("grass").unwrap());
            assert_eq!(a.generate_block_type_at(wx, h - 2, wz), reg.id_by_name("dirt").unwrap());
            assert_eq!(a.generate_block_type_at(wx, 0, wz), reg.id_by_name("stone").unwrap());
            assert!(a.generate_block_type_at(wx, h, wz).is_empty());
            for y in 0..h + 2 {
                assert_eq!(a.generate_block_type_at(wx, y, wz), b.generate_block_type_at(wx, y, wz));
            }
        }
    }

    #[test]
    fn unknown_block_name_is_a_config_error() {
        let reg = registry();
        let mut cfg = GenerationConfig::default();
        cfg.noise.surface = "moss".into();
        assert!(matches!(Terrain::from_config(&cfg, &reg), Err(ConfigError::Invalid(_))));
    }
}
