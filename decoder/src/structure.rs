//! Structure Records and String Pools
//!
//! A structure record is a 4-byte header, the type-specific formatted area,
//! and a pool of NUL-terminated strings closed by an extra NUL. Records
//! borrow from the table buffer; nothing here allocates except
//! [`StringPool::get`], which hands back owned text.

use alloc::borrow::ToOwned;
use alloc::string::String;

use crate::error::{DmiError, Result};

/// Text returned for string index 0
pub const NOT_SPECIFIED: &str = "Not Specified";

// =============================================================================
// STRUCTURE HEADER
// =============================================================================

/// SMBIOS structure header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructureHeader {
    /// Structure type
    pub structure_type: u8,
    /// Header plus formatted area, excluding the string pool
    pub length: u8,
    /// Handle
    pub handle: u16,
}

impl StructureHeader {
    /// Size
    pub const SIZE: usize = 4;

    /// Inactive structure type
    pub const INACTIVE: u8 = 126;

    /// End-of-table structure type
    pub const END_OF_TABLE: u8 = 127;

    /// Parse from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }

        Some(Self {
            structure_type: bytes[0],
            length: bytes[1],
            handle: u16::from_le_bytes([bytes[2], bytes[3]]),
        })
    }

    /// Length field covers at least the header itself
    pub fn is_well_formed(&self) -> bool {
        self.length as usize >= Self::SIZE
    }

    /// Whether this header marks the end of the table
    pub fn is_end_of_table(&self) -> bool {
        self.structure_type == Self::END_OF_TABLE
    }
}

// =============================================================================
// STRING POOL
// =============================================================================

/// Strings trailing a record's formatted area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringPool<'a> {
    data: &'a [u8],
}

impl<'a> StringPool<'a> {
    /// Create from the bytes that follow the formatted area
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Resolve a 1-based string index
    ///
    /// Index 0 is reserved and yields [`NOT_SPECIFIED`]. Text is decoded
    /// lossily; firmware strings are nominally ASCII but not always.
    pub fn get(&self, index: u8) -> Result<String> {
        if index == 0 {
            return Ok(NOT_SPECIFIED.to_owned());
        }

        self.iter()
            .nth(index as usize - 1)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .ok_or(DmiError::StringIndexOutOfRange {
                index,
                available: self.count(),
            })
    }

    /// Number of strings in the pool
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Iterate raw strings, without their terminators
    pub fn iter(&self) -> StringPoolIter<'a> {
        StringPoolIter { data: self.data, pos: 0 }
    }

    /// Raw pool bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}

/// String pool iterator
#[derive(Debug, Clone)]
pub struct StringPoolIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for StringPoolIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        // An empty string is the pool terminator
        if self.pos >= self.data.len() || self.data[self.pos] == 0 {
            return None;
        }

        let rest = &self.data[self.pos..];
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        self.pos += end + 1;
        Some(&rest[..end])
    }
}

// =============================================================================
// STRUCTURE RECORD
// =============================================================================

/// One record borrowed from the structure table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureRecord<'a> {
    /// Parsed header
    pub header: StructureHeader,
    /// Byte offset of the record within the table
    pub offset: usize,
    raw: &'a [u8],
}

impl<'a> StructureRecord<'a> {
    /// Build a record over `raw`, which starts at the header
    ///
    /// `raw` must hold at least `header.length` bytes.
    pub(crate) fn new(header: StructureHeader, offset: usize, raw: &'a [u8]) -> Self {
        Self { header, offset, raw }
    }

    /// Header plus formatted area
    pub fn formatted(&self) -> &'a [u8] {
        &self.raw[..self.formatted_len()]
    }

    /// String pool following the formatted area
    pub fn strings(&self) -> StringPool<'a> {
        StringPool::new(&self.raw[self.formatted_len()..])
    }

    /// Whole record including the string pool terminator
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Total bytes the record occupies in the table
    pub fn total_len(&self) -> usize {
        self.raw.len()
    }

    fn formatted_len(&self) -> usize {
        (self.header.length as usize).min(self.raw.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_from_bytes() {
        let header = StructureHeader::from_bytes(&[17, 0x28, 0x34, 0x12]).unwrap();
        assert_eq!(header.structure_type, 17);
        assert_eq!(header.length, 0x28);
        assert_eq!(header.handle, 0x1234);
        assert!(header.is_well_formed());
        assert!(StructureHeader::from_bytes(&[1, 2, 3]).is_none());
        assert!(!StructureHeader::from_bytes(&[1, 3, 0, 0]).unwrap().is_well_formed());
    }

    #[test]
    fn test_string_index_zero() {
        assert_eq!(StringPool::new(b"\0\0").get(0).unwrap(), NOT_SPECIFIED);
        assert_eq!(StringPool::new(b"Acme\0\0").get(0).unwrap(), NOT_SPECIFIED);
        assert_eq!(StringPool::new(&[]).get(0).unwrap(), NOT_SPECIFIED);
    }

    #[test]
    fn test_string_lookup() {
        let pool = StringPool::new(b"Acme\0Widget\01.0\0\0");
        assert_eq!(pool.count(), 3);
        assert_eq!(pool.get(1).unwrap(), "Acme");
        assert_eq!(pool.get(2).unwrap(), "Widget");
        assert_eq!(pool.get(3).unwrap(), "1.0");
        assert_eq!(
            pool.get(4),
            Err(DmiError::StringIndexOutOfRange { index: 4, available: 3 })
        );
    }

    #[test]
    fn test_empty_pool() {
        let pool = StringPool::new(b"\0\0");
        assert_eq!(pool.count(), 0);
        assert_eq!(
            pool.get(1),
            Err(DmiError::StringIndexOutOfRange { index: 1, available: 0 })
        );
    }

    #[test]
    fn test_unterminated_pool() {
        // Truncated buffer: last string runs to the end
        let pool = StringPool::new(b"One\0Two");
        assert_eq!(pool.count(), 2);
        assert_eq!(pool.get(2).unwrap(), "Two");
    }

    #[test]
    fn test_record_views() {
        let raw = [1u8, 5, 0x00, 0x01, 0xAA, b'x', 0, 0];
        let header = StructureHeader::from_bytes(&raw).unwrap();
        let record = StructureRecord::new(header, 0x10, &raw);
        assert_eq!(record.formatted(), &raw[..5]);
        assert_eq!(record.strings().get(1).unwrap(), "x");
        assert_eq!(record.total_len(), 8);
        assert_eq!(record.offset, 0x10);
    }
}
