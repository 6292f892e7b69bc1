//! Raw Byte Sources
//!
//! The decoder never touches physical memory itself. It asks a
//! [`RawSource`] for a byte range and works on the returned buffer.
//! Mapping `/dev/mem`, reading sysfs or asking firmware are the caller's job.

use crate::error::{DmiError, Result};

use alloc::vec::Vec;

/// Supplier of raw physical-memory bytes
pub trait RawSource {
    /// Return `length` bytes starting at physical address `base`
    ///
    /// Fails with [`DmiError::SourceUnavailable`] when the range cannot be read.
    fn read(&self, base: u32, length: u32) -> Result<Vec<u8>>;
}

impl<S: RawSource + ?Sized> RawSource for &S {
    fn read(&self, base: u32, length: u32) -> Result<Vec<u8>> {
        (**self).read(base, length)
    }
}

/// A memory region captured in a [`MemoryImage`]
#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    base: u32,
    bytes: Vec<u8>,
}

impl Region {
    fn end(&self) -> u64 {
        self.base as u64 + self.bytes.len() as u64
    }
}

/// In-memory byte source built from captured regions
///
/// Useful for firmware dumps and for tests. A read succeeds only when the
/// whole requested range lies inside a single region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImage {
    regions: Vec<Region>,
}

impl MemoryImage {
    /// Create an empty image
    pub fn new() -> Self {
        Self { regions: Vec::new() }
    }

    /// Add a region at `base`
    pub fn with_region(mut self, base: u32, bytes: Vec<u8>) -> Self {
        self.insert(base, bytes);
        self
    }

    /// Add a region at `base`
    pub fn insert(&mut self, base: u32, bytes: Vec<u8>) {
        self.regions.push(Region { base, bytes });
    }

    /// Number of regions
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl RawSource for MemoryImage {
    fn read(&self, base: u32, length: u32) -> Result<Vec<u8>> {
        let start = base as u64;
        let end = start + length as u64;

        self.regions
            .iter()
            .find(|r| r.base as u64 <= start && end <= r.end())
            .map(|r| {
                let from = (start - r.base as u64) as usize;
                r.bytes[from..from + length as usize].to_vec()
            })
            .ok_or(DmiError::SourceUnavailable { base, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_read_inside_region() {
        let image = MemoryImage::new().with_region(0x1000, vec![1, 2, 3, 4, 5]);
        assert_eq!(image.read(0x1001, 3), Ok(vec![2, 3, 4]));
        assert_eq!(image.read(0x1000, 0), Ok(vec![]));
    }

    #[test]
    fn test_read_outside_region() {
        let image = MemoryImage::new().with_region(0x1000, vec![0; 16]);
        assert_eq!(
            image.read(0x1008, 16),
            Err(DmiError::SourceUnavailable { base: 0x1008, length: 16 })
        );
        assert!(image.read(0x0, 1).is_err());
    }

    #[test]
    fn test_read_through_reference() {
        let image = MemoryImage::new().with_region(0, vec![7; 4]);
        let by_ref: &dyn RawSource = &image;
        assert_eq!(by_ref.read(2, 2), Ok(vec![7, 7]));
    }
}
