//! Tiles packed into one zip archive
//!
//! Entries are named with the same suffix scheme as the directory tree, so
//! tile 756425 of level 2 is the entry `2/000/756/425.gph`. The archive is
//! opened for each call; nothing is cached between reads.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use super::fs::{file_suffix, tile_id_from_path, EXTENSION};
use super::TileStorage;
use crate::error::StorageError;
use crate::graph_id::GraphId;
use crate::hierarchy::TileHierarchy;

#[derive(Debug, Clone)]
pub struct ZipTileStorage {
    archive_path: PathBuf,
}

impl ZipTileStorage {
    pub fn new(archive_path: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: archive_path.into(),
        }
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    fn open(&self) -> Result<ZipArchive<File>, StorageError> {
        let file = File::open(&self.archive_path)?;
        Ok(ZipArchive::new(file)?)
    }

    /// Ids of all tile entries in the archive, sorted
    pub fn find_tiles(&self) -> Result<Vec<GraphId>, StorageError> {
        let archive = self.open()?;
        let mut ids = archive
            .file_names()
            .filter(|name| Path::new(name).extension().is_some_and(|ext| ext == EXTENSION))
            .map(|name| tile_id_from_path(Path::new(name), Path::new("")))
            .collect::<Result<Vec<_>, _>>()?;
        ids.sort();
        Ok(ids)
    }
}

impl TileStorage for ZipTileStorage {
    fn read_tile(&self, id: GraphId, hierarchy: &TileHierarchy) -> Option<Bytes> {
        let name = match file_suffix(id, hierarchy) {
            Ok(name) => name,
            Err(err) => {
                debug!(%id, error = %err, "no archive entry for tile");
                return None;
            }
        };
        let mut archive = match self.open() {
            Ok(archive) => archive,
            Err(err) => {
                warn!(archive = %self.archive_path.display(), error = %err, "failed to open tile archive");
                return None;
            }
        };
        let mut entry = match archive.by_name(&name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                debug!(entry = %name, "tile not in archive");
                return None;
            }
            Err(err) => {
                warn!(entry = %name, error = %err, "failed to read tile archive entry");
                return None;
            }
        };

        let mut buf = Vec::with_capacity(entry.size() as usize);
        if let Err(err) = entry.read_to_end(&mut buf) {
            warn!(entry = %name, error = %err, "failed to extract tile");
            return None;
        }
        Some(Bytes::from(buf))
    }

    fn tile_exists(&self, id: GraphId, hierarchy: &TileHierarchy) -> bool {
        let Ok(name) = file_suffix(id, hierarchy) else {
            return false;
        };
        self.open()
            .map(|archive| archive.file_names().any(|entry| entry == name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    use super::*;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_read_and_find_tiles_in_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tiles.zip");
        write_archive(
            &path,
            &[
                ("2/000/756/425.gph", &b"local"[..]),
                ("0/003/015.gph", &b"highway"[..]),
                ("README", &b"not a tile"[..]),
            ],
        );

        let hierarchy = TileHierarchy::default();
        let storage = ZipTileStorage::new(&path);
        let local = GraphId::new(756_425, 2, 0);
        assert_eq!(
            storage.read_tile(local.with_id(9), &hierarchy).as_deref(),
            Some(&b"local"[..])
        );
        assert!(storage.tile_exists(GraphId::new(3015, 0, 0), &hierarchy));
        assert!(!storage.tile_exists(GraphId::new(3016, 0, 0), &hierarchy));
        assert!(storage.read_tile(GraphId::new(3016, 0, 0), &hierarchy).is_none());

        assert_eq!(
            storage.find_tiles().unwrap(),
            vec![GraphId::new(3015, 0, 0), local]
        );
    }

    #[test]
    fn test_missing_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = ZipTileStorage::new(tmp.path().join("absent.zip"));
        let hierarchy = TileHierarchy::default();
        assert!(storage.read_tile(GraphId::new(3015, 0, 0), &hierarchy).is_none());
        assert!(!storage.tile_exists(GraphId::new(3015, 0, 0), &hierarchy));
        assert!(matches!(storage.find_tiles(), Err(StorageError::Io(_))));
    }
}
