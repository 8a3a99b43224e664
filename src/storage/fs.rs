//! Tiles stored as files under a directory tree
//!
//! A tile lives at `<tile_dir>/<suffix>`, where the suffix spells
//! `level * 10^k + tile_id` in groups of three digits, one directory per
//! group: tile 756425 of level 2 is `2/000/756/425.gph`. `k` is the digit
//! count of the level's largest tile id, rounded up to a multiple of three,
//! so every tile of a level has the same depth.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, warn};

use super::TileStorage;
use crate::error::StorageError;
use crate::graph_id::GraphId;
use crate::hierarchy::TileHierarchy;

pub(super) const EXTENSION: &str = "gph";

#[derive(Debug, Clone)]
pub struct FsTileStorage {
    tile_dir: PathBuf,
}

impl FsTileStorage {
    pub fn new(tile_dir: impl Into<PathBuf>) -> Self {
        Self {
            tile_dir: tile_dir.into(),
        }
    }

    pub fn tile_dir(&self) -> &Path {
        &self.tile_dir
    }

    pub fn tile_path(&self, id: GraphId, hierarchy: &TileHierarchy) -> Result<PathBuf, StorageError> {
        Ok(self.tile_dir.join(file_suffix(id, hierarchy)?))
    }

    /// Ids of all tile files below the tile directory, sorted
    pub fn find_tiles(&self, hierarchy: &TileHierarchy) -> Result<Vec<GraphId>, StorageError> {
        let mut files = Vec::new();
        for level in 0..=hierarchy.transit_level() {
            let dir = self.tile_dir.join(level.to_string());
            if dir.is_dir() {
                collect_tile_files(&dir, &mut files)?;
            }
        }
        let mut ids = files
            .iter()
            .map(|path| tile_id_from_path(path, &self.tile_dir))
            .collect::<Result<Vec<_>, _>>()?;
        ids.sort();
        Ok(ids)
    }
}

impl TileStorage for FsTileStorage {
    fn read_tile(&self, id: GraphId, hierarchy: &TileHierarchy) -> Option<Bytes> {
        let path = match self.tile_path(id, hierarchy) {
            Ok(path) => path,
            Err(err) => {
                debug!(%id, error = %err, "no file location for tile");
                return None;
            }
        };
        match std::fs::read(&path) {
            Ok(bytes) => Some(Bytes::from(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "tile file not found");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read tile file");
                None
            }
        }
    }

    fn tile_exists(&self, id: GraphId, hierarchy: &TileHierarchy) -> bool {
        self.tile_path(id, hierarchy)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }
}

fn collect_tile_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_tile_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

/// Relative path of a tile file, e.g. `2/000/756/425.gph`
pub fn file_suffix(id: GraphId, hierarchy: &TileHierarchy) -> Result<String, StorageError> {
    let level = hierarchy
        .tiling_for(id.level())
        .ok_or(StorageError::UnknownLevel(id.level()))?;

    let mut digits = level.tiles.max_tile_id().to_string().len() as u32;
    if digits % 3 != 0 {
        digits += 3 - digits % 3;
    }
    let scale = 10u64.pow(digits);

    // level 0 would lose its leading zero, so spell it as 1 and patch it back
    let lead = if id.level() == 0 { 1 } else { id.level() as u64 };
    let number = (lead * scale + id.tile_id() as u64).to_string();

    let split = number.len() % 3;
    let mut suffix = String::with_capacity(number.len() * 4 / 3 + 5);
    for (i, ch) in number.chars().enumerate() {
        if i > 0 && i >= split && (i - split) % 3 == 0 {
            suffix.push('/');
        }
        suffix.push(ch);
    }
    if id.level() == 0 {
        suffix.replace_range(0..1, "0");
    }
    suffix.push('.');
    suffix.push_str(EXTENSION);
    Ok(suffix)
}

/// Tile base id encoded in the path of a tile file below `tile_dir`
pub fn tile_id_from_path(path: &Path, tile_dir: &Path) -> Result<GraphId, StorageError> {
    let relative = path
        .strip_prefix(tile_dir)
        .map_err(|_| StorageError::OutsideTileDir {
            path: path.to_path_buf(),
            tile_dir: tile_dir.to_path_buf(),
        })?;
    let invalid = || StorageError::InvalidPath(path.to_path_buf());

    let name = relative.to_str().ok_or_else(invalid)?;
    let name = name.trim_matches(|c: char| "/.gph".contains(c));
    let tokens: Vec<&str> = name.split('/').collect();
    if tokens.len() < 2 {
        return Err(invalid());
    }

    let level: u32 = tokens[0].parse().map_err(|_| invalid())?;
    let mut tile_id: u64 = 0;
    for token in &tokens[1..] {
        let group: u64 = token.parse().map_err(|_| invalid())?;
        tile_id = tile_id * 1000 + group;
    }
    let tile_id = u32::try_from(tile_id).map_err(|_| invalid())?;
    Ok(GraphId::new(tile_id, level, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::TileBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_file_suffix() {
        let h = TileHierarchy::default();
        assert_eq!(file_suffix(GraphId::new(756_425, 2, 0), &h).unwrap(), "2/000/756/425.gph");
        assert_eq!(file_suffix(GraphId::new(2, 2, 0), &h).unwrap(), "2/000/000/002.gph");
        assert_eq!(file_suffix(GraphId::new(4049, 0, 0), &h).unwrap(), "0/004/049.gph");
        assert_eq!(file_suffix(GraphId::new(0, 0, 0), &h).unwrap(), "0/000/000.gph");
        assert_eq!(file_suffix(GraphId::new(64_799, 1, 0), &h).unwrap(), "1/064/799.gph");
        // transit tiles use the level 0 grid
        assert_eq!(file_suffix(GraphId::new(3015, 3, 0), &h).unwrap(), "3/003/015.gph");
        assert!(matches!(
            file_suffix(GraphId::new(1, 5, 0), &h),
            Err(StorageError::UnknownLevel(5))
        ));
    }

    #[test]
    fn test_tile_id_from_path() {
        let dir = Path::new("/data/tiles");
        let id = tile_id_from_path(Path::new("/data/tiles/2/000/756/425.gph"), dir).unwrap();
        assert_eq!(id, GraphId::new(756_425, 2, 0));
        let id = tile_id_from_path(Path::new("/data/tiles/0/004/049.gph"), dir).unwrap();
        assert_eq!(id, GraphId::new(4049, 0, 0));

        assert!(matches!(
            tile_id_from_path(Path::new("/other/2/000/756/425.gph"), dir),
            Err(StorageError::OutsideTileDir { .. })
        ));
        assert!(matches!(
            tile_id_from_path(Path::new("/data/tiles/425.gph"), dir),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            tile_id_from_path(Path::new("/data/tiles/2/abc/425.gph"), dir),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_suffix_and_path_agree() {
        let h = TileHierarchy::default();
        let dir = Path::new("/tiles");
        for id in [
            GraphId::new(0, 0, 0),
            GraphId::new(4049, 0, 0),
            GraphId::new(12_345, 1, 0),
            GraphId::new(1_036_799, 2, 0),
            GraphId::new(77, 3, 0),
        ] {
            let path = dir.join(file_suffix(id, &h).unwrap());
            assert_eq!(tile_id_from_path(&path, dir).unwrap(), id);
        }
    }

    #[test]
    fn test_read_write_and_find() {
        let tmp = TempDir::new().unwrap();
        let h = TileHierarchy::default();
        let storage = FsTileStorage::new(tmp.path());
        let ids = [GraphId::new(756_425, 2, 0), GraphId::new(4049, 0, 0)];
        for id in ids {
            let path = storage.tile_path(id, &h).unwrap();
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, TileBuilder::new(id).nodes(1).build()).unwrap();
        }
        std::fs::write(tmp.path().join("README"), "not a tile").unwrap();

        assert!(storage.tile_exists(ids[0], &h));
        assert!(!storage.tile_exists(GraphId::new(1, 2, 0), &h));
        assert!(storage.read_tile(ids[1], &h).is_some());
        assert!(storage.read_tile(GraphId::new(1, 2, 0), &h).is_none());
        assert!(storage.read_tile(GraphId::new(1, 6, 0), &h).is_none());

        let found = storage.find_tiles(&h).unwrap();
        assert_eq!(found, vec![GraphId::new(4049, 0, 0), GraphId::new(756_425, 2, 0)]);
    }
}
