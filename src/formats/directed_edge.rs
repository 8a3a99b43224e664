//! Directed edge records
//!
//! Record (32 bytes):
//!   endnode:         u64   // GraphId of the end node
//!   edgeinfo_offset: u32   // into the edge info region
//!   length_m:        u32
//!   opp_index:       u16   // ordinal of the opposing edge among the end node's edges
//!   forward_access:  u16
//!   reverse_access:  u16
//!   speed_kph:       u8
//!   use:             u8
//!   line_id:         u32   // transit line, 0 if none
//!   flags:           u8    // bit0=signs, bit1=access restrictions, bit2=shortcut, bit3=transit line
//!   reserved:        [u8; 3]

use serde::Serialize;

use super::le::{put, u16_at, u32_at, u64_at, u8_at};
use crate::graph_id::GraphId;

pub const RECORD_SIZE: usize = 32;

pub const FLAG_SIGN: u8 = 1 << 0;
pub const FLAG_ACCESS_RESTRICTION: u8 = 1 << 1;
pub const FLAG_SHORTCUT: u8 = 1 << 2;
pub const FLAG_TRANSIT_LINE: u8 = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectedEdge {
    pub endnode: GraphId,
    pub edgeinfo_offset: u32,
    pub length_m: u32,
    pub opp_index: u16,
    pub forward_access: u16,
    pub reverse_access: u16,
    pub speed_kph: u8,
    #[serde(rename = "use")]
    pub edge_use: u8,
    pub line_id: u32,
    pub flags: u8,
}

impl DirectedEdge {
    pub fn decode(record: &[u8]) -> Self {
        Self {
            endnode: GraphId::from_raw(u64_at(record, 0)),
            edgeinfo_offset: u32_at(record, 8),
            length_m: u32_at(record, 12),
            opp_index: u16_at(record, 16),
            forward_access: u16_at(record, 18),
            reverse_access: u16_at(record, 20),
            speed_kph: u8_at(record, 22),
            edge_use: u8_at(record, 23),
            line_id: u32_at(record, 24),
            flags: u8_at(record, 28),
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        put(&mut buf, 0, &self.endnode.value().to_le_bytes());
        put(&mut buf, 8, &self.edgeinfo_offset.to_le_bytes());
        put(&mut buf, 12, &self.length_m.to_le_bytes());
        put(&mut buf, 16, &self.opp_index.to_le_bytes());
        put(&mut buf, 18, &self.forward_access.to_le_bytes());
        put(&mut buf, 20, &self.reverse_access.to_le_bytes());
        buf[22] = self.speed_kph;
        buf[23] = self.edge_use;
        put(&mut buf, 24, &self.line_id.to_le_bytes());
        buf[28] = self.flags;
        buf
    }

    pub fn has_signs(&self) -> bool {
        self.flags & FLAG_SIGN != 0
    }

    pub fn has_access_restrictions(&self) -> bool {
        self.flags & FLAG_ACCESS_RESTRICTION != 0
    }

    pub fn is_shortcut(&self) -> bool {
        self.flags & FLAG_SHORTCUT != 0
    }

    pub fn is_transit_line(&self) -> bool {
        self.flags & FLAG_TRANSIT_LINE != 0
    }
}

impl Default for DirectedEdge {
    fn default() -> Self {
        Self {
            endnode: GraphId::INVALID,
            edgeinfo_offset: 0,
            length_m: 0,
            opp_index: 0,
            forward_access: 0,
            reverse_access: 0,
            speed_kph: 0,
            edge_use: 0,
            line_id: 0,
            flags: 0,
        }
    }
}
