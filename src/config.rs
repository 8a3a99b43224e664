//! TOML configuration
//!
//! ```toml
//! [tiles]
//! tile_dir = "/data/tiles"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::storage::FsTileStorage;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    pub tiles: TilesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TilesConfig {
    /// Root of the tile directory tree
    pub tile_dir: PathBuf,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn storage(&self) -> FsTileStorage {
        FsTileStorage::new(&self.tiles.tile_dir)
    }
}
