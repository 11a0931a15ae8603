//! Serde-deserializable buffer layout description.
//!
//! Lets a frame layout ship in a configuration file (for example JSON) and be
//! converted into core `bitframe` types.

use serde::{Deserialize, Serialize};

/// A byte range of the packer buffer.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct RegionDef {
    /// Offset of the first byte of the region.
    pub offset: usize,
    /// Length of the region in bytes.
    pub len: usize,
}

/// Buffer capacity and the two cursor regions.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct LayoutDef {
    /// Total buffer size in bytes.
    pub capacity: usize,
    /// Region built up by appends.
    pub outgoing: RegionDef,
    /// Region consumed by extracts. Defaults to the outgoing region.
    #[serde(default)]
    pub incoming: Option<RegionDef>,
}
