//! Tile header
//!
//! Format (little-endian, 256 bytes):
//!
//!   magic:             u32 = 0x4C495454  // "TTIL"
//!   version:           u16 = 1
//!   reserved:          u16
//!   graph_id:          u64   // tile base id
//!   date_created:      u32   // days since 2014-01-01
//!   node_count:        u32
//!   directed_edge_count: u32
//!   access_restriction_count: u32
//!   departure_count:   u32
//!   stop_count:        u32
//!   route_count:       u32
//!   schedule_count:    u32
//!   sign_count:        u32
//!   admin_count:       u32
//!   edgeinfo_offset:   u32   // absolute byte offset of the edge info region
//!   textlist_offset:   u32   // absolute byte offset of the text pool
//!   bin_offsets:       [u32; 25]  // end ordinal of each edge bin
//!   reserved:          [u8; 92]

use super::le::{put, u16_at, u32_at, u64_at};
use crate::graph_id::GraphId;
use crate::hierarchy::BIN_COUNT;

pub const MAGIC: u32 = 0x4C49_5454; // "TTIL"
pub const VERSION: u16 = 1;
pub const HEADER_SIZE: usize = 256;

const BIN_OFFSETS_AT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileHeader {
    pub magic: u32,
    pub version: u16,
    pub graph_id: GraphId,
    pub date_created: u32,
    pub node_count: u32,
    pub directed_edge_count: u32,
    pub access_restriction_count: u32,
    pub departure_count: u32,
    pub stop_count: u32,
    pub route_count: u32,
    pub schedule_count: u32,
    pub sign_count: u32,
    pub admin_count: u32,
    pub edgeinfo_offset: u32,
    pub textlist_offset: u32,
    pub bin_offsets: [u32; BIN_COUNT],
}

impl Default for TileHeader {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            graph_id: GraphId::INVALID,
            date_created: 0,
            node_count: 0,
            directed_edge_count: 0,
            access_restriction_count: 0,
            departure_count: 0,
            stop_count: 0,
            route_count: 0,
            schedule_count: 0,
            sign_count: 0,
            admin_count: 0,
            edgeinfo_offset: HEADER_SIZE as u32,
            textlist_offset: HEADER_SIZE as u32,
            bin_offsets: [0; BIN_COUNT],
        }
    }
}

impl TileHeader {
    /// Decode a header from the first `HEADER_SIZE` bytes of `buf`.
    ///
    /// Returns `None` when the buffer is shorter than a header. Magic and
    /// version are not checked here.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let buf = buf.get(..HEADER_SIZE)?;
        let mut bin_offsets = [0u32; BIN_COUNT];
        for (i, end) in bin_offsets.iter_mut().enumerate() {
            *end = u32_at(buf, BIN_OFFSETS_AT + i * 4);
        }
        Some(Self {
            magic: u32_at(buf, 0),
            version: u16_at(buf, 4),
            graph_id: GraphId::from_raw(u64_at(buf, 8)),
            date_created: u32_at(buf, 16),
            node_count: u32_at(buf, 20),
            directed_edge_count: u32_at(buf, 24),
            access_restriction_count: u32_at(buf, 28),
            departure_count: u32_at(buf, 32),
            stop_count: u32_at(buf, 36),
            route_count: u32_at(buf, 40),
            schedule_count: u32_at(buf, 44),
            sign_count: u32_at(buf, 48),
            admin_count: u32_at(buf, 52),
            edgeinfo_offset: u32_at(buf, 56),
            textlist_offset: u32_at(buf, 60),
            bin_offsets,
        })
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        put(&mut buf, 0, &self.magic.to_le_bytes());
        put(&mut buf, 4, &self.version.to_le_bytes());
        put(&mut buf, 8, &self.graph_id.value().to_le_bytes());
        put(&mut buf, 16, &self.date_created.to_le_bytes());
        let counts = [
            self.node_count,
            self.directed_edge_count,
            self.access_restriction_count,
            self.departure_count,
            self.stop_count,
            self.route_count,
            self.schedule_count,
            self.sign_count,
            self.admin_count,
            self.edgeinfo_offset,
            self.textlist_offset,
        ];
        for (i, value) in counts.iter().enumerate() {
            put(&mut buf, 20 + i * 4, &value.to_le_bytes());
        }
        for (i, end) in self.bin_offsets.iter().enumerate() {
            put(&mut buf, BIN_OFFSETS_AT + i * 4, &end.to_le_bytes());
        }
        buf
    }

    /// Number of edge bin entries, the end of the last bin
    pub fn edge_bin_count(&self) -> u32 {
        self.bin_offsets[BIN_COUNT - 1]
    }

    /// Ordinal range `[start, end)` of bin `index`
    pub fn bin_range(&self, index: usize) -> Option<(u32, u32)> {
        let end = *self.bin_offsets.get(index)?;
        let start = if index == 0 { 0 } else { self.bin_offsets[index - 1] };
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let mut header = TileHeader {
            graph_id: GraphId::new(3015, 2, 0),
            node_count: 7,
            admin_count: 2,
            textlist_offset: 1024,
            ..Default::default()
        };
        header.bin_offsets[24] = 9;

        let bytes = header.encode();
        assert_eq!(&bytes[0..4], b"TTIL");
        assert_eq!(u32_at(&bytes, 20), 7);
        assert_eq!(u32_at(&bytes, 52), 2);
        assert_eq!(u32_at(&bytes, 60), 1024);
        assert_eq!(u32_at(&bytes, 160), 9);
        assert!(bytes[164..].iter().all(|&b| b == 0));

        let decoded = TileHeader::decode(&bytes).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.edge_bin_count(), 9);
    }

    #[test]
    fn test_short_buffer_has_no_header() {
        assert!(TileHeader::decode(&[0u8; HEADER_SIZE - 1]).is_none());
    }

    #[test]
    fn test_bin_ranges() {
        let mut header = TileHeader::default();
        for (i, end) in header.bin_offsets.iter_mut().enumerate() {
            *end = (i as u32 + 1) * 2;
        }
        assert_eq!(header.bin_range(0), Some((0, 2)));
        assert_eq!(header.bin_range(3), Some((6, 8)));
        assert_eq!(header.bin_range(25), None);
    }
}
