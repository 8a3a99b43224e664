//! Section layout of a tile buffer
//!
//! Fixed-size sections follow the header in a fixed order, each starting where
//! the previous one ends. The edge info region and text pool are anchored by
//! absolute offsets in the header instead.

use std::ops::Range;

use crate::formats::{self, admin, directed_edge, header, node, sign, transit, TileHeader};

/// A run of `count` records of `stride` bytes starting at byte `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Section {
    start: usize,
    count: u32,
    stride: usize,
}

impl Section {
    fn new(start: usize, count: u32, stride: usize) -> Option<Self> {
        (count as usize).checked_mul(stride)?.checked_add(start)?;
        Some(Self { start, count, stride })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn len_bytes(&self) -> usize {
        self.count as usize * self.stride
    }

    pub fn end(&self) -> usize {
        self.start + self.len_bytes()
    }

    /// Bytes of record `index`, or `None` past the end of the section
    pub fn record<'a>(&self, buf: &'a [u8], index: u32) -> Option<&'a [u8]> {
        if index >= self.count {
            return None;
        }
        let at = self.start + index as usize * self.stride;
        buf.get(at..at + self.stride)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub nodes: Section,
    pub directed_edges: Section,
    pub access_restrictions: Section,
    pub departures: Section,
    pub stops: Section,
    pub routes: Section,
    pub schedules: Section,
    pub signs: Section,
    pub admins: Section,
    pub edge_bins: Section,
    pub edge_info: Range<usize>,
    pub text: Range<usize>,
}

impl Layout {
    /// Read the header and place every section, checking that all of them fit
    /// inside a buffer of `len` bytes.
    pub fn resolve(buf: &[u8]) -> Result<(TileHeader, Layout), String> {
        let header = TileHeader::decode(buf)
            .ok_or_else(|| format!("{} bytes is too short for a tile header", buf.len()))?;
        if header.magic != header::MAGIC {
            return Err(format!("bad magic 0x{:08X}", header.magic));
        }
        if header.version != header::VERSION {
            return Err(format!("unsupported version {}", header.version));
        }
        if header.bin_offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err("edge bin offsets are not sorted".to_string());
        }

        let mut cursor = header::HEADER_SIZE;
        let mut next = |name: &str, count: u32, stride: usize| {
            let section = Section::new(cursor, count, stride)
                .filter(|s| s.end() <= buf.len())
                .ok_or_else(|| format!("{name} section ({count} records) overruns the buffer"))?;
            cursor = section.end();
            Ok::<_, String>(section)
        };

        let nodes = next("node", header.node_count, node::RECORD_SIZE)?;
        let directed_edges = next(
            "directed edge",
            header.directed_edge_count,
            directed_edge::RECORD_SIZE,
        )?;
        let access_restrictions = next(
            "access restriction",
            header.access_restriction_count,
            formats::access_restriction::RECORD_SIZE,
        )?;
        let departures = next("departure", header.departure_count, transit::DEPARTURE_SIZE)?;
        let stops = next("stop", header.stop_count, transit::STOP_SIZE)?;
        let routes = next("route", header.route_count, transit::ROUTE_SIZE)?;
        let schedules = next("schedule", header.schedule_count, transit::SCHEDULE_SIZE)?;
        let signs = next("sign", header.sign_count, sign::RECORD_SIZE)?;
        let admins = next("admin", header.admin_count, admin::RECORD_SIZE)?;
        let edge_bins = next("edge bin", header.edge_bin_count(), formats::EDGE_BIN_SIZE)?;

        let edgeinfo_offset = header.edgeinfo_offset as usize;
        let textlist_offset = header.textlist_offset as usize;
        if edgeinfo_offset < edge_bins.end() {
            return Err(format!(
                "edge info offset {edgeinfo_offset} overlaps fixed sections ending at {}",
                edge_bins.end()
            ));
        }
        if textlist_offset < edgeinfo_offset || textlist_offset > buf.len() {
            return Err(format!(
                "text list offset {textlist_offset} outside [{edgeinfo_offset}, {}]",
                buf.len()
            ));
        }

        let layout = Layout {
            nodes,
            directed_edges,
            access_restrictions,
            departures,
            stops,
            routes,
            schedules,
            signs,
            admins,
            edge_bins,
            edge_info: edgeinfo_offset..textlist_offset,
            text: textlist_offset..buf.len(),
        };
        Ok((header, layout))
    }

    /// Bytes taken by the header and all fixed-size sections
    pub fn fixed_len(&self) -> usize {
        self.edge_bins.end().max(header::HEADER_SIZE)
    }
}
