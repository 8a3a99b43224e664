//! Node records
//!
//! Record (24 bytes):
//!   lat_fxp:     i32   // 1e-7 deg
//!   lon_fxp:     i32
//!   edge_index:  u32   // first outbound directed edge
//!   edge_count:  u16
//!   admin_index: u16
//!   access:      u16   // access mode mask
//!   node_type:   u8
//!   flags:       u8
//!   reserved:    [u8; 4]

use serde::Serialize;

use super::le::{i32_at, put, u16_at, u32_at, u8_at};

pub const RECORD_SIZE: usize = 24;

const COORD_SCALE: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub lat_fxp: i32,
    pub lon_fxp: i32,
    pub edge_index: u32,
    pub edge_count: u16,
    pub admin_index: u16,
    pub access: u16,
    pub node_type: u8,
    pub flags: u8,
}

impl NodeInfo {
    pub fn decode(record: &[u8]) -> Self {
        Self {
            lat_fxp: i32_at(record, 0),
            lon_fxp: i32_at(record, 4),
            edge_index: u32_at(record, 8),
            edge_count: u16_at(record, 12),
            admin_index: u16_at(record, 14),
            access: u16_at(record, 16),
            node_type: u8_at(record, 18),
            flags: u8_at(record, 19),
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        put(&mut buf, 0, &self.lat_fxp.to_le_bytes());
        put(&mut buf, 4, &self.lon_fxp.to_le_bytes());
        put(&mut buf, 8, &self.edge_index.to_le_bytes());
        put(&mut buf, 12, &self.edge_count.to_le_bytes());
        put(&mut buf, 14, &self.admin_index.to_le_bytes());
        put(&mut buf, 16, &self.access.to_le_bytes());
        buf[18] = self.node_type;
        buf[19] = self.flags;
        buf
    }

    pub fn lat(&self) -> f64 {
        self.lat_fxp as f64 * COORD_SCALE
    }

    pub fn lon(&self) -> f64 {
        self.lon_fxp as f64 * COORD_SCALE
    }

    /// Ordinal range of the outbound edges, `None` if it does not fit in `u32`
    pub fn edge_range(&self) -> Option<std::ops::Range<u32>> {
        let end = self.edge_index.checked_add(self.edge_count as u32)?;
        Some(self.edge_index..end)
    }
}
