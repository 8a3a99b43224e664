//! Sources of raw tile bytes

mod archive;
mod fs;

use bytes::Bytes;
use rustc_hash::FxHashMap;

use crate::graph_id::GraphId;
use crate::hierarchy::TileHierarchy;

pub use archive::ZipTileStorage;
pub use fs::{file_suffix, tile_id_from_path, FsTileStorage};

/// Fetches the bytes of a tile by its base id.
///
/// One call per load, no retries. `None` means the tile is not available,
/// whatever the reason.
pub trait TileStorage {
    fn read_tile(&self, id: GraphId, hierarchy: &TileHierarchy) -> Option<Bytes>;

    fn tile_exists(&self, id: GraphId, hierarchy: &TileHierarchy) -> bool {
        self.read_tile(id, hierarchy).is_some()
    }
}

/// Tiles held in memory, keyed by base id
#[derive(Debug, Clone, Default)]
pub struct MemoryTileStorage {
    tiles: FxHashMap<GraphId, Bytes>,
}

impl MemoryTileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: GraphId, bytes: impl Into<Bytes>) {
        self.tiles.insert(id.tile_base(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileStorage for MemoryTileStorage {
    fn read_tile(&self, id: GraphId, _hierarchy: &TileHierarchy) -> Option<Bytes> {
        self.tiles.get(&id.tile_base()).cloned()
    }

    fn tile_exists(&self, id: GraphId, _hierarchy: &TileHierarchy) -> bool {
        self.tiles.contains_key(&id.tile_base())
    }
}
