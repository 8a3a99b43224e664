//! Text pool lookup
//!
//! The pool is a run of NUL-terminated strings. Records refer to a string by
//! the byte offset of its first character.

use crate::error::{Result, TileError};

/// String starting at `offset`, up to the next NUL or the end of the pool
pub fn text_at(pool: &[u8], offset: u32) -> Result<&str> {
    let rest = pool.get(offset as usize..).filter(|rest| !rest.is_empty()).ok_or(
        TileError::TextRange {
            offset,
            size: pool.len(),
        },
    )?;
    let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    std::str::from_utf8(&rest[..end]).map_err(|_| TileError::InvalidText { offset })
}
