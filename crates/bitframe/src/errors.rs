//! Error types for bit packing and unpacking.

use thiserror::Error;

/// Errors produced by [crate::bits::copy_bits] and [crate::packer::BitPacker].
///
/// All of them are caller errors reported at the call that would overflow.
/// The failing call leaves cursors and buffer contents unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Moving a cursor by `requested` bits would pass the end of its region,
    /// or the end of the data received into the incoming region.
    #[error("capacity exceeded: {requested} bits requested, {available} available")]
    CapacityExceeded { requested: usize, available: usize },
    /// A caller-provided slice is too short for the requested bit range.
    #[error("bit range is out of bounds of the provided slice")]
    OutOfBounds,
    /// More than 64 bits were requested through a `u64`-valued helper.
    #[error("{requested} bits requested, at most 64 fit in a value")]
    TooManyBits { requested: usize },
    /// A region does not fit in the buffer or has its end before its start.
    #[error("region does not fit in a buffer of {capacity} bytes")]
    InvalidRegion { capacity: usize },
}
