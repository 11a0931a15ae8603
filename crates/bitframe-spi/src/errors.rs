//! Error types for SPI transactions.

use bitframe::FrameError;
use thiserror::Error;

/// Errors produced by [crate::master::SpiMaster].
#[derive(Debug, Error)]
pub enum SpiError<E> {
    /// Packing, unpacking or layout error from the frame buffer.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
    /// The transport failed to send or receive.
    #[error("transport error: {0}")]
    Transport(#[source] E),
}

/// Errors produced by [crate::transport::MemoryTransport].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryTransportError {
    /// A queued response does not fit into the incoming region.
    #[error("response of {len} bytes does not fit into {capacity} bytes")]
    ResponseTooLarge { len: usize, capacity: usize },
}
