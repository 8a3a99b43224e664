//! Error types for tile decoding
//!
//! Hard failures (corrupt data, out-of-range indexes) are reported through
//! [`TileError`]. Lookups that legitimately find nothing, such as an edge with
//! no signs, return empty collections or `None` instead.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Kind of fixed-size record a failed lookup was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Node,
    DirectedEdge,
    Admin,
    TransitStop,
    TransitRoute,
    TransitSchedule,
    EdgeBin,
}

impl RecordKind {
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Node => "node",
            RecordKind::DirectedEdge => "directed edge",
            RecordKind::Admin => "admin",
            RecordKind::TransitStop => "transit stop",
            RecordKind::TransitRoute => "transit route",
            RecordKind::TransitSchedule => "transit schedule",
            RecordKind::EdgeBin => "edge bin",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while decoding or querying a tile
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileError {
    #[error("{kind} index out of bounds: {tile_id},{level},{index} count={count}")]
    OutOfRange {
        kind: RecordKind,
        index: u64,
        count: u32,
        tile_id: u32,
        level: u32,
    },

    #[error("text offset {offset} exceeds size of text list ({size} bytes)")]
    TextRange { offset: u32, size: usize },

    #[error("text at offset {offset} is not valid UTF-8")]
    InvalidText { offset: u32 },

    #[error("malformed tile {level}/{tile_id}: {reason}")]
    Malformed {
        tile_id: u32,
        level: u32,
        reason: String,
    },

    #[error("edge info at offset {offset} is truncated: {reason}")]
    EdgeInfo { offset: u32, reason: &'static str },
}

/// Errors raised while mapping tile ids to storage locations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not compute a file suffix for non-existent level {0}")]
    UnknownLevel(u32),

    #[error("file name {} does not belong to tile directory {}", path.display(), tile_dir.display())]
    OutsideTileDir { path: PathBuf, tile_dir: PathBuf },

    #[error("invalid tile path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid tile archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T, E = TileError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_carries_coordinates() {
        let err = TileError::OutOfRange {
            kind: RecordKind::Node,
            index: 12,
            count: 10,
            tile_id: 3015,
            level: 2,
        };
        assert_eq!(
            err.to_string(),
            "node index out of bounds: 3015,2,12 count=10"
        );
    }

    #[test]
    fn test_text_range_message() {
        let err = TileError::TextRange { offset: 99, size: 40 };
        assert!(err.to_string().contains("exceeds size of text list"));
    }
}
