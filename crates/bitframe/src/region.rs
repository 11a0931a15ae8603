//! Byte ranges of a [crate::packer::BitPacker] buffer that cursors move through.

use std::ops::Range;

/// A contiguous byte range inside the packer buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    /// First byte of the region.
    pub offset: usize,
    /// Length of the region in bytes.
    pub len: usize,
}

#[cfg(feature = "serde")]
impl From<crate::serde::RegionDef> for Region {
    fn from(value: crate::serde::RegionDef) -> Self {
        Region::new(value.offset, value.len)
    }
}

impl From<Range<usize>> for Region {
    fn from(range: Range<usize>) -> Self {
        Region {
            offset: range.start,
            len: range.end.saturating_sub(range.start),
        }
    }
}

impl Region {
    pub fn new(offset: usize, len: usize) -> Self {
        Region { offset, len }
    }

    /// One past the last byte, or `None` if it does not fit in `usize`.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.len)
    }

    /// Capacity of the region in bits, saturating at `usize::MAX`.
    pub fn bits(&self) -> usize {
        self.len.saturating_mul(8)
    }

    /// Byte range of the region; the end saturates at `usize::MAX`.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset.saturating_add(self.len)
    }

    /// True if the two regions share at least one byte.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.len > 0
            && other.len > 0
            && self.offset < other.offset.saturating_add(other.len)
            && other.offset < self.offset.saturating_add(self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_range() {
        assert_eq!(Region::from(4..12), Region::new(4, 8));
    }

    #[test]
    fn test_bits() {
        assert_eq!(Region::new(0, 3).bits(), 24);
    }

    #[test]
    fn test_huge_region_saturates() {
        let region = Region::new(usize::MAX, 2);
        assert_eq!(region.end(), None);
        assert_eq!(region.range(), usize::MAX..usize::MAX);
        assert_eq!(Region::new(0, usize::MAX).bits(), usize::MAX);
    }

    #[test]
    fn test_overlaps() {
        let a = Region::new(0, 4);
        assert!(a.overlaps(&Region::new(3, 4)));
        assert!(!a.overlaps(&Region::new(4, 4)));
        assert!(!a.overlaps(&Region::new(2, 0)));
    }
}
