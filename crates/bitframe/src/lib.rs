//! # bitframe
//!
//! Bit-level framing over a fixed-capacity byte buffer.
//!
//! A [BitPacker] packs values of arbitrary, non-byte-aligned bit widths into an
//! outgoing region and unpacks them from an incoming region, keeping a separate
//! write cursor and read cursor across calls. Bits are placed LSB-first: bit 0 is
//! the least significant bit of the first byte. Overflowing a region is reported
//! as [FrameError::CapacityExceeded] and never truncated.
//!
//! ## Example
//!
//! ```
//! use bitframe::BitPacker;
//!
//! let mut packer = BitPacker::new(8);
//! packer.append_bits(3, 0b101).unwrap();
//! packer.append_bits(5, 0b10110).unwrap();
//! packer.append_u16(0xBEEF).unwrap();
//! assert_eq!(packer.frame(), &[0xB5, 0xEF, 0xBE]);
//!
//! assert_eq!(packer.extract_bits(8).unwrap(), 0xB5);
//! assert_eq!(packer.extract_u16().unwrap(), 0xBEEF);
//!
//! packer.reset();
//! assert_eq!(packer.write_cursor(), 0);
//! ```

pub mod bits;
pub mod errors;
pub mod packer;
pub mod region;
pub mod scalar;
#[cfg(feature = "serde")]
pub mod serde;

pub use errors::FrameError;
pub use packer::BitPacker;
pub use region::Region;
pub use scalar::Scalar;
