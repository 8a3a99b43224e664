//! In-memory tile assembler for unit tests

use crate::formats::edge_info::encode_shape;
use crate::formats::header::HEADER_SIZE;
use crate::formats::{
    AccessRestriction, Admin, DirectedEdge, NodeInfo, Sign, TileHeader, TransitDeparture,
    TransitRoute, TransitSchedule, TransitStop,
};
use crate::graph_id::GraphId;
use crate::hierarchy::BIN_COUNT;

pub(crate) struct TileBuilder {
    graph_id: GraphId,
    date_created: u32,
    nodes: Vec<NodeInfo>,
    edges: Vec<DirectedEdge>,
    restrictions: Vec<AccessRestriction>,
    departures: Vec<TransitDeparture>,
    stops: Vec<TransitStop>,
    routes: Vec<TransitRoute>,
    schedules: Vec<TransitSchedule>,
    signs: Vec<Sign>,
    admins: Vec<Admin>,
    bins: Vec<Vec<GraphId>>,
    edge_info: Vec<u8>,
    text: Vec<u8>,
}

impl TileBuilder {
    pub fn new(graph_id: GraphId) -> Self {
        Self {
            graph_id,
            date_created: 0,
            nodes: Vec::new(),
            edges: Vec::new(),
            restrictions: Vec::new(),
            departures: Vec::new(),
            stops: Vec::new(),
            routes: Vec::new(),
            schedules: Vec::new(),
            signs: Vec::new(),
            admins: Vec::new(),
            bins: vec![Vec::new(); BIN_COUNT],
            edge_info: Vec::new(),
            // offset 0 is the empty string
            text: vec![0],
        }
    }

    pub fn date_created(mut self, days: u32) -> Self {
        self.date_created = days;
        self
    }

    /// Add `n` nodes, each with one outbound edge at the matching ordinal
    pub fn nodes(mut self, n: u32) -> Self {
        for _ in 0..n {
            let i = self.nodes.len() as u32;
            self.nodes.push(NodeInfo {
                lat_fxp: 400_000_000 + i as i32,
                lon_fxp: -760_000_000 - i as i32,
                edge_index: i,
                edge_count: 1,
                admin_index: 0,
                access: 0xff,
                node_type: 0,
                flags: 0,
            });
        }
        self
    }

    pub fn node(mut self, node: NodeInfo) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add `n` default edges ending at this tile's node 0
    pub fn edges(mut self, n: u32) -> Self {
        for _ in 0..n {
            let i = self.edges.len() as u32;
            self.edges.push(DirectedEdge {
                endnode: self.graph_id.with_id(0),
                length_m: 100 + i,
                ..Default::default()
            });
        }
        self
    }

    pub fn edge(mut self, edge: DirectedEdge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn restriction(mut self, restriction: AccessRestriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    pub fn departure(mut self, departure: TransitDeparture) -> Self {
        self.departures.push(departure);
        self
    }

    pub fn stop(mut self, stop: TransitStop) -> Self {
        self.stops.push(stop);
        self
    }

    pub fn route(mut self, route: TransitRoute) -> Self {
        self.routes.push(route);
        self
    }

    pub fn schedule(mut self, schedule: TransitSchedule) -> Self {
        self.schedules.push(schedule);
        self
    }

    pub fn sign(mut self, sign: Sign) -> Self {
        self.signs.push(sign);
        self
    }

    pub fn admin(mut self, admin: Admin) -> Self {
        self.admins.push(admin);
        self
    }

    pub fn bin(mut self, index: usize, id: GraphId) -> Self {
        self.bins[index].push(id);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.add_text(text);
        self
    }

    /// Append a string to the text pool and return its offset
    pub fn add_text(&mut self, text: &str) -> u32 {
        let offset = self.text.len() as u32;
        self.text.extend_from_slice(text.as_bytes());
        self.text.push(0);
        offset
    }

    /// Append an edge info block and return its offset in the edge info region
    pub fn add_edge_info(&mut self, way_id: u64, names: &[&str], shape: &[(f64, f64)]) -> u32 {
        let offsets: Vec<u32> = names.iter().map(|name| self.add_text(name)).collect();
        let encoded = encode_shape(shape);
        let offset = self.edge_info.len() as u32;
        self.edge_info.extend_from_slice(&way_id.to_le_bytes());
        let packed = offsets.len() as u32 | (encoded.len() as u32) << 4;
        self.edge_info.extend_from_slice(&packed.to_le_bytes());
        for name in offsets {
            self.edge_info.extend_from_slice(&name.to_le_bytes());
        }
        self.edge_info.extend_from_slice(&encoded);
        offset
    }

    pub fn build(self) -> Vec<u8> {
        let mut header = TileHeader {
            graph_id: self.graph_id,
            date_created: self.date_created,
            node_count: self.nodes.len() as u32,
            directed_edge_count: self.edges.len() as u32,
            access_restriction_count: self.restrictions.len() as u32,
            departure_count: self.departures.len() as u32,
            stop_count: self.stops.len() as u32,
            route_count: self.routes.len() as u32,
            schedule_count: self.schedules.len() as u32,
            sign_count: self.signs.len() as u32,
            admin_count: self.admins.len() as u32,
            ..Default::default()
        };
        let mut end = 0u32;
        for (i, bin) in self.bins.iter().enumerate() {
            end += bin.len() as u32;
            header.bin_offsets[i] = end;
        }

        let mut body = Vec::new();
        self.nodes.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        self.edges.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        self.restrictions.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        self.departures.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        self.stops.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        self.routes.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        self.schedules.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        self.signs.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        self.admins.iter().for_each(|r| body.extend_from_slice(&r.encode()));
        for id in self.bins.iter().flatten() {
            body.extend_from_slice(&id.value().to_le_bytes());
        }

        header.edgeinfo_offset = (HEADER_SIZE + body.len()) as u32;
        header.textlist_offset = header.edgeinfo_offset + self.edge_info.len() as u32;

        let mut buf = header.encode().to_vec();
        buf.extend_from_slice(&body);
        buf.extend_from_slice(&self.edge_info);
        buf.extend_from_slice(&self.text);
        buf
    }
}
