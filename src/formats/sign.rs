//! Sign records
//!
//! Record (12 bytes):
//!   edge_index:  u32   // owning directed edge ordinal; array sorted by this
//!   type:        u8    // SignType
//!   reserved:    [u8; 3]
//!   text_offset: u32   // into the text pool

use serde::Serialize;

use super::le::{put, u32_at, u8_at};

pub const RECORD_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignType {
    ExitNumber,
    ExitBranch,
    ExitToward,
    ExitName,
    Unknown(u8),
}

impl From<u8> for SignType {
    fn from(value: u8) -> Self {
        match value {
            0 => SignType::ExitNumber,
            1 => SignType::ExitBranch,
            2 => SignType::ExitToward,
            3 => SignType::ExitName,
            other => SignType::Unknown(other),
        }
    }
}

impl From<SignType> for u8 {
    fn from(value: SignType) -> u8 {
        match value {
            SignType::ExitNumber => 0,
            SignType::ExitBranch => 1,
            SignType::ExitToward => 2,
            SignType::ExitName => 3,
            SignType::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sign {
    pub edge_index: u32,
    pub sign_type: SignType,
    pub text_offset: u32,
}

impl Sign {
    pub fn decode(record: &[u8]) -> Self {
        Self {
            edge_index: u32_at(record, 0),
            sign_type: SignType::from(u8_at(record, 4)),
            text_offset: u32_at(record, 8),
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        put(&mut buf, 0, &self.edge_index.to_le_bytes());
        buf[4] = self.sign_type.into();
        put(&mut buf, 8, &self.text_offset.to_le_bytes());
        buf
    }
}

/// Sign with its text resolved from the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInfo {
    pub sign_type: SignType,
    pub text: String,
}
