//! Tile hierarchy - level metadata and the coordinate to tile id mapping
//!
//! Each level covers the world with a regular grid of square tiles. Tile ids
//! are row-major: `row * columns + column`, starting at the south-west corner.

use std::collections::BTreeMap;

use geo::{coord, Rect};

use crate::graph_id::GraphId;

/// Bins per tile side; each tile carries `BIN_DIM * BIN_DIM` edge bins.
pub const BIN_DIM: usize = 5;
pub const BIN_COUNT: usize = BIN_DIM * BIN_DIM;

/// Level number of transit tiles in the default hierarchy.
pub const TRANSIT_LEVEL: u32 = 3;

/// Road importance assigned to a hierarchy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    ServiceOther,
}

/// Regular grid of square tiles over a bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tiles {
    bounds: Rect<f64>,
    tile_size: f64,
    columns: u32,
    rows: u32,
}

impl Tiles {
    pub fn new(bounds: Rect<f64>, tile_size: f64) -> Self {
        let columns = (bounds.width() / tile_size).ceil() as u32;
        let rows = (bounds.height() / tile_size).ceil() as u32;
        Self {
            bounds,
            tile_size,
            columns,
            rows,
        }
    }

    pub fn world(tile_size: f64) -> Self {
        Self::new(world_bounds(), tile_size)
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn max_tile_id(&self) -> u32 {
        self.columns * self.rows - 1
    }

    /// Tile containing the coordinate, or `None` outside the grid
    pub fn tile_id(&self, lon: f64, lat: f64) -> Option<u32> {
        let min = self.bounds.min();
        let max = self.bounds.max();
        if !(min.x..=max.x).contains(&lon) || !(min.y..=max.y).contains(&lat) {
            return None;
        }
        let column = (((lon - min.x) / self.tile_size) as u32).min(self.columns - 1);
        let row = (((lat - min.y) / self.tile_size) as u32).min(self.rows - 1);
        Some(row * self.columns + column)
    }

    pub fn tile_bounds(&self, tile_id: u32) -> Rect<f64> {
        let row = tile_id / self.columns;
        let column = tile_id % self.columns;
        let min = self.bounds.min();
        let x = min.x + column as f64 * self.tile_size;
        let y = min.y + row as f64 * self.tile_size;
        Rect::new(
            coord! { x: x, y: y },
            coord! { x: x + self.tile_size, y: y + self.tile_size },
        )
    }
}

fn world_bounds() -> Rect<f64> {
    Rect::new(coord! { x: -180.0, y: -90.0 }, coord! { x: 180.0, y: 90.0 })
}

/// One level of the hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct TileLevel {
    pub level: u8,
    pub importance: RoadClass,
    pub name: String,
    pub tiles: Tiles,
}

#[derive(Debug, Clone)]
pub struct TileHierarchy {
    levels: BTreeMap<u8, TileLevel>,
}

impl Default for TileHierarchy {
    /// Highway (4°), arterial (1°) and local (0.25°) levels over the whole world.
    fn default() -> Self {
        Self::from_levels([
            TileLevel {
                level: 0,
                importance: RoadClass::Primary,
                name: "highway".to_string(),
                tiles: Tiles::world(4.0),
            },
            TileLevel {
                level: 1,
                importance: RoadClass::Tertiary,
                name: "arterial".to_string(),
                tiles: Tiles::world(1.0),
            },
            TileLevel {
                level: 2,
                importance: RoadClass::ServiceOther,
                name: "local".to_string(),
                tiles: Tiles::world(0.25),
            },
        ])
    }
}

impl TileHierarchy {
    pub fn from_levels(levels: impl IntoIterator<Item = TileLevel>) -> Self {
        Self {
            levels: levels.into_iter().map(|l| (l.level, l)).collect(),
        }
    }

    pub fn levels(&self) -> &BTreeMap<u8, TileLevel> {
        &self.levels
    }

    pub fn level(&self, level: u32) -> Option<&TileLevel> {
        u8::try_from(level).ok().and_then(|l| self.levels.get(&l))
    }

    /// Transit tiles live one level past the last road level.
    pub fn transit_level(&self) -> u32 {
        self.levels
            .keys()
            .next_back()
            .map_or(TRANSIT_LEVEL, |&l| l as u32 + 1)
    }

    /// Level whose grid tiles the given level. The transit level has no grid of
    /// its own and uses the first level's.
    pub fn tiling_for(&self, level: u32) -> Option<&TileLevel> {
        self.level(level).or_else(|| {
            if level == self.transit_level() {
                self.levels.values().next()
            } else {
                None
            }
        })
    }

    /// Tile base id for a coordinate at a level; invalid for unknown levels or
    /// coordinates outside the world.
    pub fn graph_id(&self, lon: f64, lat: f64, level: u32) -> GraphId {
        self.level(level)
            .and_then(|tl| tl.tiles.tile_id(lon, lat))
            .map_or(GraphId::INVALID, |tile_id| GraphId::new(tile_id, level, 0))
    }
}
