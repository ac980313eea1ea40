use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_world::ChunkDims;

use crate::{ChunkDelta, DeltaError};

/// Whole-world edit file: every chunk that still differs from generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSave {
    pub chunk_size: ChunkDims,
    pub chunks: Vec<ChunkDelta>,
}

impl WorldSave {
    pub fn to_json(&self) -> Result<String, DeltaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, DeltaError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), DeltaError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, DeltaError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn cell_count(&self) -> usize {
        self.chunks.iter().map(|c| c.cells.len()).sum()
    }
}
