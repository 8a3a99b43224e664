//! Binary layouts of the records packed into a tile
//!
//! All multi-byte fields are little-endian. Fixed-size records expose
//! `decode` over a slice of exactly `RECORD_SIZE` bytes and a matching
//! `encode`.

mod le;

pub mod access_restriction;
pub mod admin;
pub mod directed_edge;
pub mod edge_info;
pub mod header;
pub mod node;
pub mod sign;
pub mod text;
pub mod transit;

pub use access_restriction::{access, AccessRestriction, AccessType};
pub use admin::{Admin, AdminInfo};
pub use directed_edge::DirectedEdge;
pub use edge_info::{EdgeInfo, EdgeInfoSummary};
pub use header::TileHeader;
pub use node::NodeInfo;
pub use sign::{Sign, SignInfo, SignType};
pub use transit::{TransitDeparture, TransitRoute, TransitSchedule, TransitStop};

/// Size of an edge bin entry, a raw `GraphId`
pub const EDGE_BIN_SIZE: usize = 8;

pub(crate) use le::u64_at;
