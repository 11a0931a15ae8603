//! SpiMaster: drives one transaction at a time over a [Transport].

use bitframe::{BitPacker, FrameError, Region, Scalar};

use crate::{
    control::{CONTROL_LEN, ControlBlock},
    errors::SpiError,
    transport::Transport,
};

/// Sizes of the regions behind the control header.
///
/// The buffer is laid out as `[control header | outgoing | incoming]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpiLayout {
    /// Bytes available for appended data.
    pub outgoing_len: usize,
    /// Bytes available for data received on read transactions.
    pub incoming_len: usize,
}

impl Default for SpiLayout {
    fn default() -> Self {
        SpiLayout {
            outgoing_len: 2048,
            incoming_len: 2048,
        }
    }
}

impl SpiLayout {
    pub fn outgoing(&self) -> Region {
        Region::new(CONTROL_LEN, self.outgoing_len)
    }

    pub fn incoming(&self) -> Region {
        Region::new(CONTROL_LEN + self.outgoing_len, self.incoming_len)
    }

    /// Total buffer size, or `None` if it does not fit in `usize`.
    pub fn capacity(&self) -> Option<usize> {
        CONTROL_LEN
            .checked_add(self.outgoing_len)?
            .checked_add(self.incoming_len)
    }
}

/// Builds frames with a [BitPacker] and hands them to a [Transport].
///
/// Each [SpiMaster::transfer] writes the control header, sends header and
/// outgoing region, receives into the incoming region when the read flag is
/// set, and rewinds both cursors for the next transaction.
///
/// # Example
///
/// ```
/// use bitframe_spi::{master::SpiMaster, transport::MemoryTransport};
///
/// let mut spi = SpiMaster::new(MemoryTransport::new()).unwrap();
/// spi.control_mut()
///     .set_slave(0)
///     .set_outgoing_element_size(8)
///     .set_num_outgoing_elements(3);
///
/// spi.append_value(1u8).unwrap();
/// spi.append_value(2u8).unwrap();
/// spi.append_value(3u8).unwrap();
/// spi.transfer().unwrap();
///
/// let sent = spi.transport().last_sent().unwrap();
/// assert_eq!(&sent[12..15], &[1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct SpiMaster<T: Transport> {
    packer: BitPacker,
    control: ControlBlock,
    layout: SpiLayout,
    transport: T,
}

impl<T: Transport> SpiMaster<T> {
    /// Creates a master with the default [SpiLayout].
    pub fn new(transport: T) -> Result<Self, FrameError> {
        Self::with_layout(transport, SpiLayout::default())
    }

    pub fn with_layout(transport: T, layout: SpiLayout) -> Result<Self, FrameError> {
        let capacity = layout
            .capacity()
            .ok_or(FrameError::InvalidRegion { capacity: usize::MAX })?;
        let packer = BitPacker::with_regions(capacity, layout.outgoing(), layout.incoming())?;

        Ok(SpiMaster {
            packer,
            control: ControlBlock::default(),
            layout,
            transport,
        })
    }

    /// Runs one transaction and returns the number of bytes received.
    ///
    /// Cursors are reset only when the transfer succeeds, so a failed transfer
    /// can be retried with the same frame.
    pub fn transfer(&mut self) -> Result<usize, SpiError<T::Error>> {
        let written_bits = self.packer.write_cursor();
        let expected_bits = self.control.expected_outgoing_bits();
        if written_bits > expected_bits {
            tracing::warn!(
                written_bits,
                expected_bits,
                "frame is longer than the control header announces"
            );
        }

        self.control.try_encode(self.packer.buffer_mut())?;

        let frame_len = self.layout.incoming().offset;
        self.transport
            .send(&self.packer.buffer()[..frame_len])
            .map_err(SpiError::Transport)?;

        // Only this transaction's delivery is readable.
        self.packer.clear_received();

        let mut received = 0;
        if self.control.read {
            received = self
                .transport
                .receive(self.packer.incoming_mut())
                .map_err(SpiError::Transport)?;
            self.packer.mark_received(received)?;

            let expected_bits = self.control.expected_incoming_bits();
            tracing::trace!(received, expected_bits, "received incoming data");
            if received * 8 < expected_bits {
                tracing::warn!(
                    received_bits = received * 8,
                    expected_bits,
                    "received less data than the control header asks for"
                );
            }
        }

        tracing::debug!(
            slave = self.control.slave,
            sent = frame_len,
            written_bits,
            received,
            "spi transfer complete"
        );

        self.packer.reset();

        Ok(received)
    }

    pub fn append(
        &mut self,
        num_bits: usize,
        source: &[u8],
        source_start_bit: usize,
    ) -> Result<(), FrameError> {
        self.packer.append(num_bits, source, source_start_bit)
    }

    pub fn extract(
        &mut self,
        num_bits: usize,
        destination: &mut [u8],
        destination_start_bit: usize,
    ) -> Result<(), FrameError> {
        self.packer.extract(num_bits, destination, destination_start_bit)
    }

    pub fn append_bits(&mut self, num_bits: usize, value: u64) -> Result<(), FrameError> {
        self.packer.append_bits(num_bits, value)
    }

    pub fn extract_bits(&mut self, num_bits: usize) -> Result<u64, FrameError> {
        self.packer.extract_bits(num_bits)
    }

    pub fn append_value<V: Scalar>(&mut self, value: V) -> Result<(), FrameError> {
        self.packer.append_value(value)
    }

    pub fn extract_value<V: Scalar>(&mut self) -> Result<V, FrameError> {
        self.packer.extract_value()
    }

    /// Rewinds both cursors without transferring.
    pub fn reset(&mut self) {
        self.packer.reset();
    }

    pub fn control(&self) -> &ControlBlock {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut ControlBlock {
        &mut self.control
    }

    pub fn layout(&self) -> SpiLayout {
        self.layout
    }

    pub fn packer(&self) -> &BitPacker {
        &self.packer
    }

    /// Direct access to the packer, e.g. for the typed `append_u16`-style helpers.
    pub fn packer_mut(&mut self) -> &mut BitPacker {
        &mut self.packer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}
