//! One-stop identifier index of transit tiles
//!
//! Stops, routes and operators are referred to from outside the tile by
//! external "one-stop" strings. The index maps those strings back to
//! `(tile id, ordinal)` pairs: stop ordinals for stops, line ids for routes
//! and operators.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::GraphTile;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileIndexPair {
    pub tile_id: u32,
    pub index: u32,
}

impl TileIndexPair {
    pub fn new(tile_id: u32, index: u32) -> Self {
        Self { tile_id, index }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OneStopIndex {
    stops: FxHashMap<String, TileIndexPair>,
    routes: FxHashMap<String, Vec<TileIndexPair>>,
    operators: FxHashMap<String, Vec<TileIndexPair>>,
}

impl OneStopIndex {
    /// Scan every stop and every departure of `tile` once.
    ///
    /// A stop id seen twice keeps the later stop. Route and operator lists
    /// get one entry per departure, so a line appears as often as it departs.
    pub(crate) fn build(tile: &GraphTile, tile_id: u32) -> Result<Self> {
        let mut index = Self::default();

        for i in 0..tile.layout.stops.count() {
            let stop = tile.transit_stop(i)?;
            let one_stop = tile.text(stop.one_stop_offset)?;
            index
                .stops
                .insert(one_stop.to_string(), TileIndexPair::new(tile_id, i));
        }

        for i in 0..tile.layout.departures.count() {
            let Some(departure) = tile.departure_at(i) else {
                break;
            };
            let route = tile.transit_route(departure.route_index as u32)?;
            let pair = TileIndexPair::new(tile_id, departure.line_id);
            index
                .routes
                .entry(tile.text(route.one_stop_offset)?.to_string())
                .or_default()
                .push(pair);
            index
                .operators
                .entry(tile.text(route.op_one_stop_offset)?.to_string())
                .or_default()
                .push(pair);
        }

        Ok(index)
    }

    pub fn stops(&self) -> &FxHashMap<String, TileIndexPair> {
        &self.stops
    }

    pub fn routes(&self) -> &FxHashMap<String, Vec<TileIndexPair>> {
        &self.routes
    }

    pub fn operators(&self) -> &FxHashMap<String, Vec<TileIndexPair>> {
        &self.operators
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.routes.is_empty() && self.operators.is_empty()
    }
}

impl GraphTile {
    pub fn stop_one_stops(&self) -> &FxHashMap<String, TileIndexPair> {
        self.onestops().stops()
    }

    pub fn route_one_stops(&self) -> &FxHashMap<String, Vec<TileIndexPair>> {
        self.onestops().routes()
    }

    pub fn operator_one_stops(&self) -> &FxHashMap<String, Vec<TileIndexPair>> {
        self.onestops().operators()
    }
}
