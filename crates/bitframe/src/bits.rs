//! Low-level bit copy and manipulation utilities for byte slices.
//!
//! Bits are addressed in LSB-first order: bit 0 is the low bit of the first byte,
//! bit 8 is the low bit of the second byte.

use crate::errors::FrameError;

/// Number of bytes needed to hold `bits` bits.
pub const fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Returns true if `len` bits starting at `start_bit` fit into `data`.
fn fits(data: &[u8], start_bit: usize, len: usize) -> bool {
    start_bit
        .checked_add(len)
        .is_some_and(|end| end <= data.len() * 8)
}

/// Copies `num_bits` bits from `source` into `destination`. LSB-first.
///
/// `source_start_bit` and `destination_start_bit` are absolute bit positions in
/// their slices: the whole-byte part selects the starting byte and the remainder
/// selects the bit inside it.
///
/// Every destination bit in the range is written. A set source bit is OR-ed in,
/// a clear one is masked out, so leftover data from a previous frame never leaks
/// through. Bits outside the range are not touched.
///
/// Both ranges are checked before anything is written; on [FrameError::OutOfBounds]
/// `destination` is unchanged.
pub fn copy_bits(
    num_bits: usize,
    source: &[u8],
    source_start_bit: usize,
    destination: &mut [u8],
    destination_start_bit: usize,
) -> Result<(), FrameError> {
    if !fits(source, source_start_bit, num_bits)
        || !fits(destination, destination_start_bit, num_bits)
    {
        return Err(FrameError::OutOfBounds);
    }

    let mut read_byte = source_start_bit / 8;
    let mut read_bit = source_start_bit % 8;
    let mut write_byte = destination_start_bit / 8;
    let mut write_bit = destination_start_bit % 8;

    for _ in 0..num_bits {
        if read_bit == 8 {
            read_bit = 0;
            read_byte += 1;
        }

        if write_bit == 8 {
            write_bit = 0;
            write_byte += 1;
        }

        let read_mask = 1u8 << read_bit;
        let write_mask = 1u8 << write_bit;

        if source[read_byte] & read_mask != 0 {
            destination[write_byte] |= write_mask;
        } else {
            destination[write_byte] &= !write_mask;
        }

        read_bit += 1;
        write_bit += 1;
    }

    Ok(())
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: usize) -> i64 {
    if bits == 0 {
        return 0;
    }

    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}
