//! Decoded view over one tile buffer
//!
//! A [`GraphTile`] owns the raw bytes and a [`Layout`] that places every
//! section inside them. Records are decoded on access, after a bounds check
//! against the section's count; nothing is copied out at load time except the
//! one-stop index of transit tiles.

mod layout;
mod onestop;
mod search;
mod transit;

use bytes::Bytes;
use geo::Rect;
use tracing::debug;

use crate::error::{RecordKind, Result, TileError};
use crate::formats::{
    self, text::text_at, AccessRestriction, Admin, AdminInfo, DirectedEdge, EdgeInfo, NodeInfo,
    Sign, SignInfo, TileHeader, TransitRoute, TransitSchedule, TransitStop,
};
use crate::graph_id::GraphId;
use crate::hierarchy::{TileHierarchy, BIN_COUNT, BIN_DIM, TRANSIT_LEVEL};
use crate::storage::TileStorage;

pub use layout::{Layout, Section};
pub use onestop::{OneStopIndex, TileIndexPair};
pub use transit::DepartureFilter;

use search::equal_range;

#[derive(Debug, Clone)]
pub struct GraphTile {
    id: GraphId,
    bytes: Bytes,
    header: TileHeader,
    layout: Layout,
    onestops: OneStopIndex,
}

impl GraphTile {
    /// Tile with no data. Every accessor reports out-of-range or not-found.
    pub fn empty(id: GraphId) -> Self {
        Self {
            id: id.tile_base(),
            bytes: Bytes::new(),
            header: TileHeader::default(),
            layout: Layout::default(),
            onestops: OneStopIndex::default(),
        }
    }

    /// Decode a tile buffer. An empty buffer gives the empty tile; a buffer
    /// whose sections do not fit is `Malformed`.
    ///
    /// Transit tiles are recognised by the default hierarchy's transit level
    /// ([`TRANSIT_LEVEL`]); use [`GraphTile::from_bytes_in`] for another
    /// hierarchy.
    pub fn from_bytes(id: GraphId, bytes: impl Into<Bytes>) -> Result<Self> {
        Self::decode(id, bytes.into(), TRANSIT_LEVEL)
    }

    /// Decode a tile buffer, taking the transit level from `hierarchy`
    pub fn from_bytes_in(
        id: GraphId,
        bytes: impl Into<Bytes>,
        hierarchy: &TileHierarchy,
    ) -> Result<Self> {
        Self::decode(id, bytes.into(), hierarchy.transit_level())
    }

    /// Fetch and decode a tile. Invalid ids and tiles missing from storage
    /// give the empty tile.
    pub fn load<S>(storage: &S, hierarchy: &TileHierarchy, id: GraphId) -> Result<Self>
    where
        S: TileStorage + ?Sized,
    {
        if !id.is_valid() {
            debug!(%id, "not loading tile for invalid graph id");
            return Ok(Self::empty(id));
        }
        match storage.read_tile(id.tile_base(), hierarchy) {
            Some(bytes) => Self::from_bytes_in(id, bytes, hierarchy),
            None => {
                debug!(tile = %id.tile_base(), "tile not found");
                Ok(Self::empty(id))
            }
        }
    }

    fn decode(id: GraphId, bytes: Bytes, transit_level: u32) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self::empty(id));
        }
        let (header, layout) = Layout::resolve(&bytes).map_err(|reason| TileError::Malformed {
            tile_id: id.tile_id(),
            level: id.level(),
            reason,
        })?;

        let mut tile = Self {
            id: if header.graph_id.is_valid() { header.graph_id } else { id.tile_base() },
            bytes,
            header,
            layout,
            onestops: OneStopIndex::default(),
        };
        if tile.id.level() == transit_level {
            tile.onestops = OneStopIndex::build(&tile, tile.id.tile_id())?;
        }

        debug!(
            tile = %tile.id,
            size = tile.size(),
            nodes = tile.header.node_count,
            edges = tile.header.directed_edge_count,
            departures = tile.header.departure_count,
            "loaded tile"
        );
        Ok(tile)
    }

    /// Buffer length in bytes; 0 for the empty tile
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base id of the tile
    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn header(&self) -> &TileHeader {
        &self.header
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub(crate) fn onestops(&self) -> &OneStopIndex {
        &self.onestops
    }

    fn out_of_range(&self, kind: RecordKind, index: u64, count: u32) -> TileError {
        TileError::OutOfRange {
            kind,
            index,
            count,
            tile_id: self.id.tile_id(),
            level: self.id.level(),
        }
    }

    fn edge_out_of_range(&self, index: u64) -> TileError {
        self.out_of_range(
            RecordKind::DirectedEdge,
            index,
            self.layout.directed_edges.count(),
        )
    }

    fn record<T>(
        &self,
        kind: RecordKind,
        section: &Section,
        index: u64,
        decode: fn(&[u8]) -> T,
    ) -> Result<T> {
        u32::try_from(index)
            .ok()
            .and_then(|i| section.record(&self.bytes, i))
            .map(decode)
            .ok_or_else(|| self.out_of_range(kind, index, section.count()))
    }

    pub fn node(&self, index: u32) -> Result<NodeInfo> {
        self.record(RecordKind::Node, &self.layout.nodes, index as u64, NodeInfo::decode)
    }

    /// Node named by a graph id. The id is assumed to belong to this tile;
    /// the error carries the id's own coordinates.
    pub fn node_by_id(&self, id: GraphId) -> Result<NodeInfo> {
        self.record(RecordKind::Node, &self.layout.nodes, id.id(), NodeInfo::decode)
            .map_err(|err| with_coordinates(err, id))
    }

    pub fn directed_edge(&self, index: u32) -> Result<DirectedEdge> {
        self.record(
            RecordKind::DirectedEdge,
            &self.layout.directed_edges,
            index as u64,
            DirectedEdge::decode,
        )
    }

    pub fn directed_edge_by_id(&self, id: GraphId) -> Result<DirectedEdge> {
        self.record(
            RecordKind::DirectedEdge,
            &self.layout.directed_edges,
            id.id(),
            DirectedEdge::decode,
        )
        .map_err(|err| with_coordinates(err, id))
    }

    /// Outbound edges of a node, with the ordinal of the first one
    pub fn directed_edges_from(&self, node_index: u32) -> Result<(u32, Vec<DirectedEdge>)> {
        let node = self.node(node_index)?;
        let range = node.edge_range().ok_or_else(|| {
            self.edge_out_of_range(node.edge_index as u64 + node.edge_count as u64)
        })?;
        let edges = range
            .map(|i| self.directed_edge(i))
            .collect::<Result<Vec<_>>>()?;
        Ok((node.edge_index, edges))
    }

    /// Ordinal of the edge running opposite to `edge`. The end node must be
    /// in this tile.
    pub fn opposing_edge_index(&self, edge: &DirectedEdge) -> Result<u32> {
        let end = self.node_by_id(edge.endnode)?;
        end.edge_index
            .checked_add(edge.opp_index as u32)
            .ok_or_else(|| self.edge_out_of_range(end.edge_index as u64 + edge.opp_index as u64))
    }

    pub fn opposing_edge_id(&self, edge: &DirectedEdge) -> Result<GraphId> {
        let index = self.opposing_edge_index(edge)?;
        Ok(edge.endnode.with_id(index as u64))
    }

    pub fn edge_info(&self, edge: &DirectedEdge) -> Result<EdgeInfo<'_>> {
        EdgeInfo::decode(self.edge_info_region(), edge.edgeinfo_offset, self.text_pool())
    }

    pub fn names(&self, edge: &DirectedEdge) -> Result<Vec<&str>> {
        self.edge_info(edge)?.names()
    }

    fn edge_info_region(&self) -> &[u8] {
        self.bytes.get(self.layout.edge_info.clone()).unwrap_or_default()
    }

    fn text_pool(&self) -> &[u8] {
        self.bytes.get(self.layout.text.clone()).unwrap_or_default()
    }

    /// NUL-terminated string at `offset` in the text pool
    pub fn text(&self, offset: u32) -> Result<&str> {
        text_at(self.text_pool(), offset)
    }

    pub fn admin(&self, index: u32) -> Result<Admin> {
        self.record(RecordKind::Admin, &self.layout.admins, index as u64, Admin::decode)
    }

    pub fn admin_info(&self, index: u32) -> Result<AdminInfo> {
        let admin = self.admin(index)?;
        Ok(AdminInfo {
            country_text: self.text(admin.country_offset)?.to_string(),
            state_text: self.text(admin.state_offset)?.to_string(),
            country_iso: admin.country_iso(),
            state_iso: admin.state_iso(),
        })
    }

    pub fn transit_stop(&self, index: u32) -> Result<TransitStop> {
        self.record(
            RecordKind::TransitStop,
            &self.layout.stops,
            index as u64,
            TransitStop::decode,
        )
    }

    pub fn transit_route(&self, index: u32) -> Result<TransitRoute> {
        self.record(
            RecordKind::TransitRoute,
            &self.layout.routes,
            index as u64,
            TransitRoute::decode,
        )
    }

    pub fn transit_schedule(&self, index: u32) -> Result<TransitSchedule> {
        self.record(
            RecordKind::TransitSchedule,
            &self.layout.schedules,
            index as u64,
            TransitSchedule::decode,
        )
    }

    fn sign_at(&self, index: u32) -> Option<Sign> {
        self.layout.signs.record(&self.bytes, index).map(Sign::decode)
    }

    fn restriction_at(&self, index: u32) -> Option<AccessRestriction> {
        self.layout
            .access_restrictions
            .record(&self.bytes, index)
            .map(AccessRestriction::decode)
    }

    /// Signs of a directed edge, in tile order. An edge without signs gives an
    /// empty list.
    pub fn signs(&self, edge_index: u32) -> Result<Vec<SignInfo>> {
        let count = self.layout.signs.count();
        let Some(run) = equal_range(count, Some(edge_index), |i| {
            self.sign_at(i).map(|s| s.edge_index)
        }) else {
            debug!(tile = %self.id, edge_index, "no signs found");
            return Ok(Vec::new());
        };
        run.filter_map(|i| self.sign_at(i))
            .map(|sign| -> Result<SignInfo> {
                Ok(SignInfo {
                    sign_type: sign.sign_type,
                    text: self.text(sign.text_offset)?.to_string(),
                })
            })
            .collect()
    }

    /// Access restrictions of a directed edge affecting any of `modes`
    pub fn access_restrictions(&self, edge_index: u32, modes: u16) -> Vec<AccessRestriction> {
        let count = self.layout.access_restrictions.count();
        let restrictions: Vec<_> = equal_range(count, Some(edge_index), |i| {
            self.restriction_at(i).map(|r| r.edge_index)
        })
        .into_iter()
        .flatten()
        .filter_map(|i| self.restriction_at(i))
        .filter(|r| r.applies_to(modes))
        .collect();
        if restrictions.is_empty() {
            debug!(tile = %self.id, edge_index, modes, "no access restrictions found");
        }
        restrictions
    }

    /// Graph ids in edge bin `index` (row-major, `BIN_DIM` per row)
    pub fn bin(&self, index: usize) -> Result<Vec<GraphId>> {
        let (start, end) = self
            .header
            .bin_range(index)
            .filter(|_| !self.is_empty())
            .ok_or_else(|| self.out_of_range(RecordKind::EdgeBin, index as u64, BIN_COUNT as u32))?;
        (start..end)
            .map(|i| {
                self.layout
                    .edge_bins
                    .record(&self.bytes, i)
                    .map(|r| GraphId::from_raw(formats::u64_at(r, 0)))
                    .ok_or_else(|| {
                        self.out_of_range(RecordKind::EdgeBin, i as u64, self.layout.edge_bins.count())
                    })
            })
            .collect()
    }

    pub fn bin_at(&self, column: usize, row: usize) -> Result<Vec<GraphId>> {
        if column >= BIN_DIM || row >= BIN_DIM {
            let index = (row as u64)
                .saturating_mul(BIN_DIM as u64)
                .saturating_add(column as u64);
            return Err(self.out_of_range(RecordKind::EdgeBin, index, BIN_COUNT as u32));
        }
        self.bin(row * BIN_DIM + column)
    }

    /// Geographic extent of the tile, from its level's grid
    pub fn bounding_box(&self, hierarchy: &TileHierarchy) -> Option<Rect<f64>> {
        let level = hierarchy.tiling_for(self.id.level())?;
        Some(level.tiles.tile_bounds(self.id.tile_id()))
    }
}

fn with_coordinates(err: TileError, id: GraphId) -> TileError {
    match err {
        TileError::OutOfRange {
            kind, index, count, ..
        } => TileError::OutOfRange {
            kind,
            index,
            count,
            tile_id: id.tile_id(),
            level: id.level(),
        },
        other => other,
    }
}
