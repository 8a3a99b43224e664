//! Access restriction records
//!
//! Record (16 bytes):
//!   edge_index:   u32   // owning directed edge ordinal; array sorted by this
//!   type:         u8    // AccessType
//!   days_of_week: u8    // Sunday = bit 0
//!   modes:        u16   // access mode mask, see `access`
//!   value:        u64   // meaning depends on type (limit, time window, ...)

use serde::Serialize;

use super::le::{put, u16_at, u32_at, u64_at, u8_at};

pub const RECORD_SIZE: usize = 16;

/// Travel mode bits shared by nodes, edges and restrictions
pub mod access {
    pub const AUTO: u16 = 1;
    pub const PEDESTRIAN: u16 = 2;
    pub const BICYCLE: u16 = 4;
    pub const TRUCK: u16 = 8;
    pub const EMERGENCY: u16 = 16;
    pub const TAXI: u16 = 32;
    pub const BUS: u16 = 64;
    pub const HOV: u16 = 128;
    pub const ALL: u16 = 0xff;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    Hazmat,
    MaxHeight,
    MaxWidth,
    MaxLength,
    MaxWeight,
    MaxAxleLoad,
    TimedAllowed,
    TimedDenied,
    DestinationAllowed,
    Unknown(u8),
}

impl From<u8> for AccessType {
    fn from(value: u8) -> Self {
        match value {
            0 => AccessType::Hazmat,
            1 => AccessType::MaxHeight,
            2 => AccessType::MaxWidth,
            3 => AccessType::MaxLength,
            4 => AccessType::MaxWeight,
            5 => AccessType::MaxAxleLoad,
            6 => AccessType::TimedAllowed,
            7 => AccessType::TimedDenied,
            8 => AccessType::DestinationAllowed,
            other => AccessType::Unknown(other),
        }
    }
}

impl From<AccessType> for u8 {
    fn from(value: AccessType) -> u8 {
        match value {
            AccessType::Hazmat => 0,
            AccessType::MaxHeight => 1,
            AccessType::MaxWidth => 2,
            AccessType::MaxLength => 3,
            AccessType::MaxWeight => 4,
            AccessType::MaxAxleLoad => 5,
            AccessType::TimedAllowed => 6,
            AccessType::TimedDenied => 7,
            AccessType::DestinationAllowed => 8,
            AccessType::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessRestriction {
    pub edge_index: u32,
    pub access_type: AccessType,
    pub days_of_week: u8,
    pub modes: u16,
    pub value: u64,
}

impl AccessRestriction {
    pub fn decode(record: &[u8]) -> Self {
        Self {
            edge_index: u32_at(record, 0),
            access_type: AccessType::from(u8_at(record, 4)),
            days_of_week: u8_at(record, 5),
            modes: u16_at(record, 6),
            value: u64_at(record, 8),
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        put(&mut buf, 0, &self.edge_index.to_le_bytes());
        buf[4] = self.access_type.into();
        buf[5] = self.days_of_week;
        put(&mut buf, 6, &self.modes.to_le_bytes());
        put(&mut buf, 8, &self.value.to_le_bytes());
        buf
    }

    /// Whether the restriction affects any of the given modes
    pub fn applies_to(&self, modes: u16) -> bool {
        self.modes & modes != 0
    }
}
