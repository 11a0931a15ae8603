//! Typed append/extract over [BitPacker] for fixed-width scalars.
//!
//! Values are laid out little-endian, so bit `i` of a value lands at cursor + `i`.

use crate::{errors::FrameError, packer::BitPacker};

/// A fixed-width value that can be appended to or extracted from a [BitPacker].
pub trait Scalar: Copy {
    /// Width of the value in bits.
    const BITS: usize;

    /// Little-endian byte representation.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    fn to_le_bytes(self) -> Self::Bytes;

    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const BITS: usize = std::mem::size_of::<$ty>() * 8;

                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

macro_rules! typed_accessors {
    ($($ty:ty => $append:ident, $extract:ident;)*) => {
        $(
            #[doc = concat!("Appends a `", stringify!($ty), "` at the write cursor.")]
            pub fn $append(&mut self, value: $ty) -> Result<(), FrameError> {
                self.append_value(value)
            }

            #[doc = concat!("Extracts a `", stringify!($ty), "` at the read cursor.")]
            pub fn $extract(&mut self) -> Result<$ty, FrameError> {
                self.extract_value()
            }
        )*
    };
}

impl BitPacker {
    /// Appends all [Scalar::BITS] bits of `value`.
    pub fn append_value<T: Scalar>(&mut self, value: T) -> Result<(), FrameError> {
        self.append(T::BITS, value.to_le_bytes().as_ref(), 0)
    }

    /// Extracts [Scalar::BITS] bits as a `T`.
    pub fn extract_value<T: Scalar>(&mut self) -> Result<T, FrameError> {
        let mut bytes = T::Bytes::default();
        self.extract(T::BITS, bytes.as_mut(), 0)?;

        Ok(T::from_le_bytes(bytes))
    }

    typed_accessors! {
        u8 => append_u8, extract_u8;
        u16 => append_u16, extract_u16;
        u32 => append_u32, extract_u32;
        u64 => append_u64, extract_u64;
        i8 => append_i8, extract_i8;
        i16 => append_i16, extract_i16;
        i32 => append_i32, extract_i32;
        i64 => append_i64, extract_i64;
        f32 => append_f32, extract_f32;
        f64 => append_f64, extract_f64;
    }
}
