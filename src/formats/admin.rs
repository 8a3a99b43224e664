//! Administrative area records
//!
//! Record (16 bytes):
//!   country_offset: u32   // country name in the text pool
//!   state_offset:   u32   // state name in the text pool
//!   country_iso:    [u8; 2]
//!   state_iso:      [u8; 3]
//!   reserved:       [u8; 3]

use serde::Serialize;

use super::le::{put, u32_at};

pub const RECORD_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admin {
    pub country_offset: u32,
    pub state_offset: u32,
    pub country_iso: [u8; 2],
    pub state_iso: [u8; 3],
}

impl Admin {
    pub fn decode(record: &[u8]) -> Self {
        Self {
            country_offset: u32_at(record, 0),
            state_offset: u32_at(record, 4),
            country_iso: [record[8], record[9]],
            state_iso: [record[10], record[11], record[12]],
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        put(&mut buf, 0, &self.country_offset.to_le_bytes());
        put(&mut buf, 4, &self.state_offset.to_le_bytes());
        put(&mut buf, 8, &self.country_iso);
        put(&mut buf, 10, &self.state_iso);
        buf
    }

    pub fn country_iso(&self) -> String {
        iso_code(&self.country_iso)
    }

    pub fn state_iso(&self) -> String {
        iso_code(&self.state_iso)
    }
}

// ISO codes are NUL padded
fn iso_code(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Admin record with names resolved from the text pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminInfo {
    pub country_text: String,
    pub state_text: String,
    pub country_iso: String,
    pub state_iso: String,
}
