//! Identifier of a node or edge within the tiled, hierarchical graph
//!
//! Packed into 64 bits (little-endian bit order):
//!   bits  0..24  tile id
//!   bits 24..27  hierarchy level
//!   bits 27..64  ordinal within the tile

use std::fmt;
use std::ops::Add;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Maximum number of hierarchy levels (0-6 usable).
pub const MAX_GRAPH_HIERARCHY: u32 = 7;

const MAX_TILE_ID: u32 = 16_777_215;
const MAX_ID: u64 = 68_719_476_735;
const INVALID_VALUE: u64 = u32::MAX as u64;

const TILE_BITS: u32 = 24;
const LEVEL_BITS: u32 = 3;
const TILE_MASK: u64 = (1 << TILE_BITS) - 1;
const LEVEL_MASK: u64 = (1 << LEVEL_BITS) - 1;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphId(u64);

impl GraphId {
    pub const INVALID: GraphId = GraphId(INVALID_VALUE);

    /// Build an id from its parts. Fields outside their bit range are zeroed.
    pub fn new(tile_id: u32, level: u32, id: u64) -> Self {
        let tile_id = if tile_id < MAX_TILE_ID { tile_id } else { 0 };
        let level = if level < MAX_GRAPH_HIERARCHY { level } else { 0 };
        let id = if id < MAX_ID { id } else { 0 };
        GraphId(tile_id as u64 | (level as u64) << TILE_BITS | id << (TILE_BITS + LEVEL_BITS))
    }

    pub const fn from_raw(value: u64) -> Self {
        GraphId(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    pub fn tile_id(&self) -> u32 {
        (self.0 & TILE_MASK) as u32
    }

    pub fn level(&self) -> u32 {
        ((self.0 >> TILE_BITS) & LEVEL_MASK) as u32
    }

    pub fn id(&self) -> u64 {
        self.0 >> (TILE_BITS + LEVEL_BITS)
    }

    pub fn is_valid(&self) -> bool {
        self.0 != INVALID_VALUE
    }

    /// The id with the ordinal dropped, naming the tile itself
    pub fn tile_base(&self) -> GraphId {
        GraphId::new(self.tile_id(), self.level(), 0)
    }

    pub fn with_id(&self, id: u64) -> GraphId {
        GraphId::new(self.tile_id(), self.level(), id)
    }
}

impl Default for GraphId {
    fn default() -> Self {
        GraphId::INVALID
    }
}

impl Add<u64> for GraphId {
    type Output = GraphId;

    fn add(self, offset: u64) -> GraphId {
        self.with_id(self.id() + offset)
    }
}

impl From<GraphId> for u64 {
    fn from(id: GraphId) -> u64 {
        id.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level(), self.tile_id(), self.id())
    }
}

impl fmt::Debug for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "GraphId({self})")
        } else {
            f.write_str("GraphId(invalid)")
        }
    }
}

impl Serialize for GraphId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_valid() {
            return serializer.serialize_none();
        }
        let mut state = serializer.serialize_struct("GraphId", 3)?;
        state.serialize_field("level", &self.level())?;
        state.serialize_field("tile_id", &self.tile_id())?;
        state.serialize_field("id", &self.id())?;
        state.end()
    }
}
