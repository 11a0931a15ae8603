//! BitPacker: fixed-capacity byte buffer with independent write and read bit cursors.

use crate::{
    bits::{self, bytes_for_bits, sign_extend},
    errors::FrameError,
    region::Region,
};

/// Packs outgoing bits into and unpacks incoming bits from an owned byte buffer.
///
/// Appends advance the write cursor through the outgoing region, extracts advance
/// the read cursor through the incoming region. The two regions may be the same
/// bytes (see [BitPacker::new]) or separate ranges of the buffer
/// (see [BitPacker::with_regions]).
///
/// Extracts are limited by the data received into the incoming region: either
/// marked with [BitPacker::mark_received] after a transport fill, or, when the
/// regions overlap, written there by appends since the last [BitPacker::reset].
///
/// # Example
///
/// ```
/// use bitframe::packer::BitPacker;
///
/// let mut packer = BitPacker::new(4);
/// packer.append_bits(3, 0b101).unwrap();
/// packer.append_bits(5, 0b10110).unwrap();
/// assert_eq!(packer.frame(), &[0xB5]);
///
/// assert_eq!(packer.extract_bits(3).unwrap(), 0b101);
/// assert_eq!(packer.extract_bits(5).unwrap(), 0b10110);
/// ```
#[derive(Debug, Clone)]
pub struct BitPacker {
    buffer: Box<[u8]>,
    outgoing: Region,
    incoming: Region,
    write_cursor: usize,
    read_cursor: usize,
    received_bits: usize,
    looped_bits: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::LayoutDef> for BitPacker {
    type Error = FrameError;

    fn try_from(value: crate::serde::LayoutDef) -> Result<Self, Self::Error> {
        let outgoing: Region = value.outgoing.into();
        let incoming = value.incoming.map(Region::from).unwrap_or(outgoing);

        BitPacker::with_regions(value.capacity, outgoing, incoming)
    }
}

impl BitPacker {
    /// Creates a zeroed buffer of `capacity` bytes where both regions span the whole buffer.
    pub fn new(capacity: usize) -> Self {
        let whole = Region::new(0, capacity);
        BitPacker {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            outgoing: whole,
            incoming: whole,
            write_cursor: 0,
            read_cursor: 0,
            received_bits: 0,
            looped_bits: 0,
        }
    }

    /// Creates a zeroed buffer of `capacity` bytes with explicit outgoing and incoming regions.
    pub fn with_regions(
        capacity: usize,
        outgoing: impl Into<Region>,
        incoming: impl Into<Region>,
    ) -> Result<Self, FrameError> {
        let outgoing = outgoing.into();
        let incoming = incoming.into();

        for region in [outgoing, incoming] {
            if region.end().is_none_or(|end| end > capacity) {
                return Err(FrameError::InvalidRegion { capacity });
            }
        }

        Ok(BitPacker {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            outgoing,
            incoming,
            write_cursor: 0,
            read_cursor: 0,
            received_bits: 0,
            looped_bits: 0,
        })
    }

    /// Copies `num_bits` bits of `source`, starting at `source_start_bit`, to the write cursor.
    pub fn append(
        &mut self,
        num_bits: usize,
        source: &[u8],
        source_start_bit: usize,
    ) -> Result<(), FrameError> {
        let available = self.remaining_write_bits();
        if num_bits > available {
            return Err(FrameError::CapacityExceeded {
                requested: num_bits,
                available,
            });
        }

        let region = self.outgoing.range();
        bits::copy_bits(
            num_bits,
            source,
            source_start_bit,
            &mut self.buffer[region],
            self.write_cursor,
        )?;

        self.write_cursor += num_bits;
        self.track_loopback();

        Ok(())
    }

    /// Copies `num_bits` bits from the read cursor into `destination`, starting at
    /// `destination_start_bit`.
    pub fn extract(
        &mut self,
        num_bits: usize,
        destination: &mut [u8],
        destination_start_bit: usize,
    ) -> Result<(), FrameError> {
        let available = self.remaining_read_bits();
        if num_bits > available {
            return Err(FrameError::CapacityExceeded {
                requested: num_bits,
                available,
            });
        }

        bits::copy_bits(
            num_bits,
            &self.buffer[self.incoming.range()],
            self.read_cursor,
            destination,
            destination_start_bit,
        )?;

        self.read_cursor += num_bits;

        Ok(())
    }

    /// Appends the low `num_bits` of `value`.
    pub fn append_bits(&mut self, num_bits: usize, value: u64) -> Result<(), FrameError> {
        if num_bits > 64 {
            return Err(FrameError::TooManyBits {
                requested: num_bits,
            });
        }

        self.append(num_bits, &value.to_le_bytes(), 0)
    }

    /// Extracts `num_bits` as an unsigned value. Bits above `num_bits` are zero.
    pub fn extract_bits(&mut self, num_bits: usize) -> Result<u64, FrameError> {
        if num_bits > 64 {
            return Err(FrameError::TooManyBits {
                requested: num_bits,
            });
        }

        let mut bytes = [0u8; 8];
        self.extract(num_bits, &mut bytes, 0)?;

        Ok(u64::from_le_bytes(bytes))
    }

    /// Extracts `num_bits` and sign-extends them from the highest extracted bit.
    pub fn extract_signed(&mut self, num_bits: usize) -> Result<i64, FrameError> {
        let raw = self.extract_bits(num_bits)?;

        Ok(sign_extend(raw, num_bits))
    }

    /// Moves both cursors back to the start of their regions. Buffer contents are kept.
    ///
    /// Data marked with [BitPacker::mark_received] stays readable. Bits that only
    /// became readable by appending into an overlapping incoming region do not.
    pub fn reset(&mut self) {
        self.write_cursor = 0;
        self.read_cursor = 0;
        self.looped_bits = 0;
    }

    /// Records that the first `num_bytes` of the incoming region hold received data.
    pub fn mark_received(&mut self, num_bytes: usize) -> Result<(), FrameError> {
        if num_bytes > self.incoming.len {
            return Err(FrameError::CapacityExceeded {
                requested: num_bytes * 8,
                available: self.incoming.bits(),
            });
        }

        self.received_bits = num_bytes * 8;

        Ok(())
    }

    /// Forgets any received data; extracts fail until more is received or appended.
    pub fn clear_received(&mut self) {
        self.received_bits = 0;
        self.looped_bits = 0;
    }

    /// When the regions overlap, bits appended into the incoming region become readable.
    fn track_loopback(&mut self) {
        if !self.outgoing.overlaps(&self.incoming) {
            return;
        }

        let written_end = self.outgoing.offset * 8 + self.write_cursor;
        let incoming_start = self.incoming.offset * 8;
        if written_end > incoming_start {
            self.looped_bits = (written_end - incoming_start).min(self.incoming.bits());
        }
    }

    /// Total buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    pub fn outgoing_region(&self) -> Region {
        self.outgoing
    }

    pub fn incoming_region(&self) -> Region {
        self.incoming
    }

    /// Bits that can still be appended before the outgoing region is full.
    pub fn remaining_write_bits(&self) -> usize {
        self.outgoing.bits() - self.write_cursor
    }

    /// Bits that can still be extracted from received data.
    pub fn remaining_read_bits(&self) -> usize {
        self.received_bits()
            .min(self.incoming.bits())
            .saturating_sub(self.read_cursor)
    }

    /// Bits of valid data in the incoming region.
    pub fn received_bits(&self) -> usize {
        self.received_bits.max(self.looped_bits)
    }

    /// Bytes touched by appends since the last reset, counting a partial last byte.
    pub fn written_bytes(&self) -> usize {
        bytes_for_bits(self.write_cursor)
    }

    /// The whole outgoing region.
    pub fn outgoing(&self) -> &[u8] {
        &self.buffer[self.outgoing.range()]
    }

    /// The written prefix of the outgoing region.
    pub fn frame(&self) -> &[u8] {
        &self.outgoing()[..self.written_bytes()]
    }

    /// The whole incoming region.
    pub fn incoming(&self) -> &[u8] {
        &self.buffer[self.incoming.range()]
    }

    /// The incoming region, for a transport to fill before [BitPacker::mark_received].
    pub fn incoming_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[self.incoming.range()]
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// The whole buffer, e.g. for a header serializer writing a reserved prefix.
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_packs_lsb_first() {
        let mut packer = BitPacker::new(2);
        packer.append_bits(3, 0b101).unwrap();
        packer.append_bits(5, 0b10110).unwrap();

        assert_eq!(packer.buffer()[0], 0xB5);
        assert_eq!(packer.write_cursor(), 8);
    }

    #[test]
    fn test_append_with_source_start_bit() {
        let mut packer = BitPacker::new(1);
        packer.append(4, &[0b1100_0000], 4).unwrap();

        assert_eq!(packer.buffer()[0], 0b1100);
        assert_eq!(packer.write_cursor(), 4);
    }

    #[test]
    fn test_append_full_word_then_reset() {
        let mut packer = BitPacker::new(8);
        packer.append(32, &0xFFFF_FFFFu32.to_le_bytes(), 0).unwrap();
        assert_eq!(packer.write_cursor(), 32);
        assert_eq!(packer.frame(), &[0xFF; 4]);

        packer.reset();
        assert_eq!(packer.write_cursor(), 0);
        assert_eq!(&packer.buffer()[..4], &[0xFF; 4]);
        assert_eq!(&packer.buffer()[4..], &[0x00; 4]);
    }

    #[test]
    fn test_append_overwrites_leftover_data() {
        let mut packer = BitPacker::new(1);
        packer.append_bits(8, 0xFF).unwrap();
        packer.reset();
        packer.append_bits(4, 0b0000).unwrap();

        assert_eq!(packer.buffer()[0], 0xF0);
    }

    #[test]
    fn test_append_capacity_exceeded() {
        let mut packer = BitPacker::new(1);
        packer.append_bits(5, 0b11111).unwrap();

        assert_eq!(
            packer.append_bits(4, 0).unwrap_err(),
            FrameError::CapacityExceeded {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(packer.write_cursor(), 5);
        assert_eq!(packer.buffer()[0], 0b11111);
    }

    #[test]
    fn test_append_short_source() {
        let mut packer = BitPacker::new(4);

        assert_eq!(
            packer.append(9, &[0xFF], 0).unwrap_err(),
            FrameError::OutOfBounds
        );
        assert_eq!(packer.write_cursor(), 0);
    }

    #[test]
    fn test_append_too_many_bits() {
        let mut packer = BitPacker::new(16);

        assert_eq!(
            packer.append_bits(65, 0).unwrap_err(),
            FrameError::TooManyBits { requested: 65 }
        );
    }

    #[test]
    fn test_extract_more_than_written() {
        let mut packer = BitPacker::new(4);
        packer.append_bits(8, 0xAB).unwrap();

        assert_eq!(
            packer.extract_bits(9).unwrap_err(),
            FrameError::CapacityExceeded {
                requested: 9,
                available: 8
            }
        );
        assert_eq!(packer.read_cursor(), 0);
        assert_eq!(packer.extract_bits(8).unwrap(), 0xAB);
    }

    #[test]
    fn test_extract_into_destination_offset() {
        let mut packer = BitPacker::new(1);
        packer.append_bits(4, 0b1001).unwrap();

        let mut destination = [0xFFu8; 1];
        packer.extract(4, &mut destination, 2).unwrap();

        assert_eq!(destination[0], 0b1110_0111);
        assert_eq!(packer.read_cursor(), 4);
    }

    #[test]
    fn test_extract_signed() {
        let mut packer = BitPacker::new(1);
        packer.append_bits(3, 0b110).unwrap();
        packer.append_bits(3, 0b010).unwrap();

        assert_eq!(packer.extract_signed(3).unwrap(), -2);
        assert_eq!(packer.extract_signed(3).unwrap(), 2);
    }

    #[test]
    fn test_reset_rewinds_both_cursors() {
        let mut packer = BitPacker::new(2);
        packer.append_bits(12, 0xABC).unwrap();
        packer.extract_bits(4).unwrap();

        packer.reset();
        assert_eq!(packer.write_cursor(), 0);
        assert_eq!(packer.read_cursor(), 0);
        assert_eq!(packer.buffer(), &[0xBC, 0x0A]);

        packer.append_bits(12, 0xABC).unwrap();
        assert_eq!(packer.extract_bits(12).unwrap(), 0xABC);
    }

    #[test]
    fn test_reset_drops_appended_read_limit() {
        let mut packer = BitPacker::new(8);
        packer.append_bits(32, 0xDEAD_BEEF).unwrap();
        packer.reset();
        packer.append_bits(8, 0x11).unwrap();

        assert_eq!(
            packer.extract_bits(32).unwrap_err(),
            FrameError::CapacityExceeded {
                requested: 32,
                available: 8
            }
        );
        assert_eq!(packer.read_cursor(), 0);
        assert_eq!(packer.extract_bits(8).unwrap(), 0x11);
    }

    #[test]
    fn test_reset_keeps_marked_data_in_shared_region() {
        let mut packer = BitPacker::new(2);
        packer.buffer_mut().copy_from_slice(&[0x34, 0x12]);
        packer.mark_received(2).unwrap();
        packer.append_bits(4, 0xF).unwrap();

        packer.reset();
        assert_eq!(packer.remaining_read_bits(), 16);
        assert_eq!(packer.extract_bits(16).unwrap(), 0x123F);
    }

    #[test]
    fn test_separate_regions() {
        let mut packer = BitPacker::with_regions(8, Region::new(0, 4), Region::new(4, 4)).unwrap();
        packer.append_bits(16, 0xBEEF).unwrap();
        assert_eq!(&packer.buffer()[..2], &[0xEF, 0xBE]);

        assert_eq!(packer.remaining_read_bits(), 0);
        assert!(matches!(
            packer.extract_bits(1),
            Err(FrameError::CapacityExceeded { .. })
        ));

        packer.incoming_mut()[..2].copy_from_slice(&[0x34, 0x12]);
        packer.mark_received(2).unwrap();
        assert_eq!(packer.extract_bits(16).unwrap(), 0x1234);
        assert_eq!(packer.remaining_read_bits(), 0);
    }

    #[test]
    fn test_mark_received_beyond_region() {
        let mut packer = BitPacker::with_regions(8, Region::new(0, 4), Region::new(4, 4)).unwrap();

        assert_eq!(
            packer.mark_received(5).unwrap_err(),
            FrameError::CapacityExceeded {
                requested: 40,
                available: 32
            }
        );
        assert_eq!(packer.received_bits(), 0);
    }

    #[test]
    fn test_received_data_survives_reset() {
        let mut packer = BitPacker::with_regions(4, Region::new(0, 2), Region::new(2, 2)).unwrap();
        packer.incoming_mut().copy_from_slice(&[0x01, 0x02]);
        packer.mark_received(2).unwrap();
        packer.extract_bits(8).unwrap();

        packer.reset();
        assert_eq!(packer.extract_bits(16).unwrap(), 0x0201);

        packer.clear_received();
        assert_eq!(packer.remaining_read_bits(), 0);
    }

    #[test]
    fn test_partially_overlapping_regions() {
        let mut packer = BitPacker::with_regions(4, Region::new(0, 3), Region::new(2, 2)).unwrap();
        packer.append_bits(16, 0xFFFF).unwrap();
        assert_eq!(packer.received_bits(), 0);

        packer.append_bits(4, 0b1010).unwrap();
        assert_eq!(packer.received_bits(), 4);
        assert_eq!(packer.extract_bits(4).unwrap(), 0b1010);
    }

    #[test]
    fn test_invalid_region() {
        assert_eq!(
            BitPacker::with_regions(4, Region::new(0, 5), Region::new(0, 4)).unwrap_err(),
            FrameError::InvalidRegion { capacity: 4 }
        );
        assert_eq!(
            BitPacker::with_regions(4, Region::new(0, 4), Region::new(usize::MAX, 2)).unwrap_err(),
            FrameError::InvalidRegion { capacity: 4 }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_layout_def() {
        let layout: crate::serde::LayoutDef = serde_json::from_str(
            r#"{ "capacity": 8, "outgoing": { "offset": 0, "len": 4 }, "incoming": { "offset": 4, "len": 4 } }"#,
        )
        .unwrap();
        let packer = BitPacker::try_from(layout).unwrap();
        assert_eq!(packer.outgoing_region(), Region::new(0, 4));
        assert_eq!(packer.incoming_region(), Region::new(4, 4));

        let shared: crate::serde::LayoutDef =
            serde_json::from_str(r#"{ "capacity": 2, "outgoing": { "offset": 0, "len": 2 } }"#)
                .unwrap();
        let packer = BitPacker::try_from(shared).unwrap();
        assert_eq!(packer.incoming_region(), Region::new(0, 2));
    }

    #[test]
    fn test_written_bytes_and_frame() {
        let mut packer = BitPacker::new(4);
        assert!(packer.frame().is_empty());

        packer.append_bits(9, 0x1FF).unwrap();
        assert_eq!(packer.written_bytes(), 2);
        assert_eq!(packer.frame(), &[0xFF, 0x01]);
    }
}
