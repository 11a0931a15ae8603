//! Transport sink the frame buffer is handed to at each transaction boundary.

use std::collections::VecDeque;

use crate::errors::MemoryTransportError;

/// Delivers finished frames to a physical transport and fills incoming data back.
///
/// Implementations may write to a memory-mapped peripheral, a DMA engine, a
/// socket or a file. Incoming bytes must use the same LSB-first bit order as
/// [bitframe::bits::copy_bits].
pub trait Transport {
    type Error: std::error::Error;

    /// Sends `frame` (control header followed by the outgoing region).
    fn send(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Fills the start of `incoming` and returns how many bytes were delivered.
    fn receive(&mut self, incoming: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn send(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        (**self).send(frame)
    }

    fn receive(&mut self, incoming: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).receive(incoming)
    }
}

/// In-memory transport: records sent frames and replays queued responses.
///
/// # Example
///
/// ```
/// use bitframe_spi::transport::{MemoryTransport, Transport};
///
/// let mut transport = MemoryTransport::new();
/// transport.push_response(vec![0xAB]);
///
/// transport.send(&[1, 2, 3]).unwrap();
/// let mut incoming = [0u8; 4];
/// assert_eq!(transport.receive(&mut incoming).unwrap(), 1);
/// assert_eq!(incoming[0], 0xAB);
/// assert_eq!(transport.sent(), &[vec![1, 2, 3]]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    sent: Vec<Vec<u8>>,
    responses: VecDeque<Vec<u8>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues bytes for the next [Transport::receive].
    pub fn push_response(&mut self, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.responses.push_back(bytes.into());
        self
    }

    /// Every frame sent so far, oldest first.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    pub fn last_sent(&self) -> Option<&[u8]> {
        self.sent.last().map(Vec::as_slice)
    }

    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }
}

impl Transport for MemoryTransport {
    type Error = MemoryTransportError;

    fn send(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.sent.push(frame.to_vec());
        Ok(())
    }

    /// Copies the next queued response; delivers nothing when the queue is empty.
    fn receive(&mut self, incoming: &mut [u8]) -> Result<usize, Self::Error> {
        let Some(response) = self.responses.front() else {
            return Ok(0);
        };

        if response.len() > incoming.len() {
            return Err(MemoryTransportError::ResponseTooLarge {
                len: response.len(),
                capacity: incoming.len(),
            });
        }

        incoming[..response.len()].copy_from_slice(response);
        let len = response.len();
        self.responses.pop_front();

        Ok(len)
    }
}
