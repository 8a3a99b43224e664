//! Edge info blocks
//!
//! Variable-length block shared by both directions of an edge, addressed by
//! the directed edge's `edgeinfo_offset` within the edge info region:
//!
//!   way_id:        u64
//!   packed:        u32   // bits 0..4 name_count, bits 4..20 encoded_shape_size
//!   name_offsets:  [u32; name_count]   // into the text pool
//!   encoded_shape: [u8; encoded_shape_size]
//!
//! The shape is a sequence of zig-zag varints (7 bits per byte), delta-coded
//! lat/lon pairs at 1e-6 degrees.

use geo::{coord, LineString};
use serde::Serialize;

use super::le::{u32_at, u64_at};
use super::text::text_at;
use crate::error::{Result, TileError};

const FIXED_SIZE: usize = 12;
const SHAPE_SCALE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeInfo<'a> {
    offset: u32,
    way_id: u64,
    name_offsets: &'a [u8],
    encoded_shape: &'a [u8],
    text: &'a [u8],
}

impl<'a> EdgeInfo<'a> {
    /// Decode the block at `offset` within `region`, resolving names
    /// against `text`.
    pub fn decode(region: &'a [u8], offset: u32, text: &'a [u8]) -> Result<Self> {
        let truncated = |reason| TileError::EdgeInfo { offset, reason };
        let block = region
            .get(offset as usize..)
            .filter(|b| b.len() >= FIXED_SIZE)
            .ok_or_else(|| truncated("fixed fields extend past the edge info region"))?;

        let way_id = u64_at(block, 0);
        let packed = u32_at(block, 8);
        let name_count = (packed & 0xf) as usize;
        let shape_size = ((packed >> 4) & 0xffff) as usize;

        let names_end = FIXED_SIZE + name_count * 4;
        let name_offsets = block
            .get(FIXED_SIZE..names_end)
            .ok_or_else(|| truncated("name offsets extend past the edge info region"))?;
        let encoded_shape = block
            .get(names_end..names_end + shape_size)
            .ok_or_else(|| truncated("shape extends past the edge info region"))?;

        Ok(Self {
            offset,
            way_id,
            name_offsets,
            encoded_shape,
            text,
        })
    }

    pub fn way_id(&self) -> u64 {
        self.way_id
    }

    pub fn name_count(&self) -> usize {
        self.name_offsets.len() / 4
    }

    pub fn name_offset(&self, index: usize) -> Option<u32> {
        (index < self.name_count()).then(|| u32_at(self.name_offsets, index * 4))
    }

    pub fn names(&self) -> Result<Vec<&'a str>> {
        (0..self.name_count())
            .map(|i| text_at(self.text, u32_at(self.name_offsets, i * 4)))
            .collect()
    }

    pub fn encoded_shape(&self) -> &'a [u8] {
        self.encoded_shape
    }

    pub fn shape(&self) -> Result<LineString<f64>> {
        decode_shape(self.encoded_shape).ok_or(TileError::EdgeInfo {
            offset: self.offset,
            reason: "encoded shape ends mid-value",
        })
    }

    /// Owned summary with names resolved, for display
    pub fn summary(&self) -> Result<EdgeInfoSummary> {
        let shape = self.shape()?;
        Ok(EdgeInfoSummary {
            way_id: self.way_id,
            names: self.names()?.into_iter().map(str::to_owned).collect(),
            shape: shape.coords().map(|c| [c.x, c.y]).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeInfoSummary {
    pub way_id: u64,
    pub names: Vec<String>,
    /// `[lon, lat]` pairs
    pub shape: Vec<[f64; 2]>,
}

fn decode_shape(mut bytes: &[u8]) -> Option<LineString<f64>> {
    let mut coords = Vec::new();
    let (mut lat, mut lon) = (0i64, 0i64);
    while !bytes.is_empty() {
        lat += next_value(&mut bytes)?;
        lon += next_value(&mut bytes)?;
        coords.push(coord! { x: lon as f64 * SHAPE_SCALE, y: lat as f64 * SHAPE_SCALE });
    }
    Some(LineString::new(coords))
}

fn next_value(bytes: &mut &[u8]) -> Option<i64> {
    let mut result = 0u64;
    let mut shift = 0;
    loop {
        let (&byte, rest) = bytes.split_first()?;
        *bytes = rest;
        result |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift >= 64 {
            return None;
        }
    }
    Some(((result >> 1) as i64) ^ -((result & 1) as i64))
}

/// Encode a shape the way tiles store it
#[cfg(test)]
pub(crate) fn encode_shape(points: &[(f64, f64)]) -> Vec<u8> {
    let mut out = Vec::new();
    let (mut last_lat, mut last_lon) = (0i64, 0i64);
    for &(lon, lat) in points {
        let lat = (lat / SHAPE_SCALE).round() as i64;
        let lon = (lon / SHAPE_SCALE).round() as i64;
        for delta in [lat - last_lat, lon - last_lon] {
            let mut value = ((delta << 1) ^ (delta >> 63)) as u64;
            while value >= 0x80 {
                out.push((value as u8 & 0x7f) | 0x80);
                value >>= 7;
            }
            out.push(value as u8);
        }
        last_lat = lat;
        last_lon = lon;
    }
    out
}
