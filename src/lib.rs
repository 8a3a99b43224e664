//! Tessera tile - decoder for tiled routing graph data
//!
//! A tile packs one geographic cell of a routing graph into a single flat
//! buffer: nodes, directed edges, access restrictions, transit schedules,
//! signs, administrative areas, spatial edge bins and a shared text pool.
//! [`GraphTile`] overlays bounds-checked record access on such a buffer
//! without copying it.
//!
//! ```no_run
//! use tessera_tile::{FsTileStorage, GraphTile, TileHierarchy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hierarchy = TileHierarchy::default();
//! let storage = FsTileStorage::new("/data/tiles");
//! let id = hierarchy.graph_id(-76.5, 40.5, 2);
//! let tile = GraphTile::load(&storage, &hierarchy, id)?;
//! if !tile.is_empty() {
//!     let node = tile.node(0)?;
//!     println!("first node at {},{}", node.lat(), node.lon());
//! }
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod formats;
pub mod graph_id;
pub mod hierarchy;
pub mod storage;
pub mod tile;

#[cfg(test)]
mod fixture;

pub use calendar::ServiceDay;
pub use config::Config;
pub use error::{ConfigError, RecordKind, Result, StorageError, TileError};
pub use graph_id::GraphId;
pub use hierarchy::TileHierarchy;
pub use storage::{FsTileStorage, MemoryTileStorage, TileStorage, ZipTileStorage};
pub use tile::{DepartureFilter, GraphTile, OneStopIndex, TileIndexPair};
