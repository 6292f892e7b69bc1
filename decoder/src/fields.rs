//! Field Extraction
//!
//! Every per-type decoder reads its formatted area through a [`FieldReader`].
//! All reads are bounds-checked against the record's declared length and
//! decode multi-byte values little-endian. Fields added in later SMBIOS
//! revisions are read with the `opt_*` family, which reports absence instead
//! of failing when an older, shorter record ends before them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::entry::SmbiosVersion;
use crate::error::{DmiError, Result};
use crate::structure::{StringPool, StructureRecord};

/// Display text for enumerated values outside the defined set
pub const OUT_OF_SPEC: &str = "<OUT OF SPEC>";

// =============================================================================
// FIELD READER
// =============================================================================

/// Bounds-checked view of one record's formatted area
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    data: &'a [u8],
    strings: StringPool<'a>,
    version: SmbiosVersion,
}

impl<'a> FieldReader<'a> {
    /// Create a reader for `record`, decoded under `version`
    pub fn new(record: &StructureRecord<'a>, version: SmbiosVersion) -> Self {
        Self {
            data: record.formatted(),
            strings: record.strings(),
            version,
        }
    }

    /// Declared length (header plus formatted area)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the formatted area is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// SMBIOS version the table was published under
    pub fn version(&self) -> SmbiosVersion {
        self.version
    }

    /// String pool of the record
    pub fn strings(&self) -> StringPool<'a> {
        self.strings
    }

    /// Whether `size` bytes at `offset` lie inside the record
    pub fn has(&self, offset: usize, size: usize) -> bool {
        offset
            .checked_add(size)
            .map_or(false, |end| end <= self.data.len())
    }

    fn malformed(&self, offset: usize, field: &'static str) -> DmiError {
        DmiError::MalformedRecord {
            field,
            offset,
            length: self.data.len(),
        }
    }

    /// `N` bytes at `offset`, or `None` past the end of the record
    fn peek<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        if !self.has(offset, N) {
            return None;
        }
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[offset..offset + N]);
        Some(buf)
    }

    /// Raw bytes at `offset`
    pub fn bytes(&self, offset: usize, size: usize, field: &'static str) -> Result<&'a [u8]> {
        if !self.has(offset, size) {
            return Err(self.malformed(offset, field));
        }
        Ok(&self.data[offset..offset + size])
    }

    /// BYTE at `offset`
    pub fn byte(&self, offset: usize, field: &'static str) -> Result<u8> {
        self.opt_byte(offset).ok_or_else(|| self.malformed(offset, field))
    }

    /// WORD at `offset`
    pub fn word(&self, offset: usize, field: &'static str) -> Result<u16> {
        self.opt_word(offset).ok_or_else(|| self.malformed(offset, field))
    }

    /// DWORD at `offset`
    pub fn dword(&self, offset: usize, field: &'static str) -> Result<u32> {
        self.opt_dword(offset).ok_or_else(|| self.malformed(offset, field))
    }

    /// QWORD at `offset`
    pub fn qword(&self, offset: usize, field: &'static str) -> Result<u64> {
        self.opt_qword(offset).ok_or_else(|| self.malformed(offset, field))
    }

    /// Fixed-size byte array at `offset`
    pub fn array<const N: usize>(&self, offset: usize, field: &'static str) -> Result<[u8; N]> {
        self.peek(offset).ok_or_else(|| self.malformed(offset, field))
    }

    /// String referenced by the index stored at `offset`
    pub fn string(&self, offset: usize, field: &'static str) -> Result<String> {
        let index = self.byte(offset, field)?;
        self.strings.get(index)
    }

    /// The first `count` strings of the pool
    pub fn string_list(&self, count: u8) -> Result<Vec<String>> {
        (1..=count).map(|index| self.strings.get(index)).collect()
    }

    // -------------------------------------------------------------------------
    // Optional fields
    // -------------------------------------------------------------------------

    /// BYTE at `offset` if the record is long enough
    pub fn opt_byte(&self, offset: usize) -> Option<u8> {
        self.peek::<1>(offset).map(|[b]| b)
    }

    /// WORD at `offset` if the record is long enough
    pub fn opt_word(&self, offset: usize) -> Option<u16> {
        self.peek(offset).map(u16::from_le_bytes)
    }

    /// DWORD at `offset` if the record is long enough
    pub fn opt_dword(&self, offset: usize) -> Option<u32> {
        self.peek(offset).map(u32::from_le_bytes)
    }

    /// QWORD at `offset` if the record is long enough
    pub fn opt_qword(&self, offset: usize) -> Option<u64> {
        self.peek(offset).map(u64::from_le_bytes)
    }

    /// String at `offset` if the record is long enough
    ///
    /// A present index that points past the pool is still an error.
    pub fn opt_string(&self, offset: usize, field: &'static str) -> Result<Option<String>> {
        self.opt_byte(offset).map(|_| self.string(offset, field)).transpose()
    }
}

// =============================================================================
// BCD
// =============================================================================

/// Decode little-endian packed BCD; each nibble is one decimal digit
///
/// The low nibble of the first byte is the units digit. Returns `None` if any
/// nibble is above 9 or the value does not fit in 64 bits.
pub fn bcd_decode(bytes: &[u8]) -> Option<u64> {
    let mut value = 0u64;
    let mut scale = 1u64;
    for &byte in bytes {
        for nibble in [byte & 0x0F, byte >> 4] {
            if nibble > 9 {
                return None;
            }
            value = value.checked_add(u64::from(nibble).checked_mul(scale)?)?;
            scale = scale.saturating_mul(10);
        }
    }
    Some(value)
}

/// Decode a single BCD byte (0x00-0x99)
pub fn bcd_u8(byte: u8) -> Option<u8> {
    bcd_decode(&[byte]).map(|value| value as u8)
}

// =============================================================================
// UUID
// =============================================================================

/// System UUID (type 1, offset 0x08)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemUuid {
    /// All bytes zero
    NotPresent,
    /// All bytes 0xFF
    NotSettable,
    /// UUID bytes in display order
    Id([u8; 16]),
}

impl SystemUuid {
    /// Interpret 16 stored bytes
    ///
    /// From 2.6 onwards the first three fields are stored little-endian and
    /// are swapped into display order here; older tables store them as shown.
    pub fn from_bytes(bytes: [u8; 16], version: SmbiosVersion) -> Self {
        if bytes.iter().all(|&b| b == 0x00) {
            return Self::NotPresent;
        }
        if bytes.iter().all(|&b| b == 0xFF) {
            return Self::NotSettable;
        }

        let mut id = bytes;
        if version.at_least(2, 6) {
            id[0..4].reverse();
            id[4..6].reverse();
            id[6..8].reverse();
        }
        Self::Id(id)
    }

    /// UUID bytes in display order, if one is present
    pub fn as_bytes(&self) -> Option<&[u8; 16]> {
        match self {
            Self::Id(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for SystemUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Self::NotPresent => return f.write_str("Not present"),
            Self::NotSettable => return f.write_str("Not settable"),
            Self::Id(id) => id,
        };
        for (i, byte) in id.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Declare an enumerated field with an explicit out-of-spec fallback
///
/// Each variant maps one raw value to its display name. Values outside the
/// list decode to `OutOfSpec(raw)` instead of failing.
macro_rules! dmi_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $repr:ty {
            $( $variant:ident = $value:literal => $text:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = $text]
                $variant,
            )*
            /// Value outside the defined set
            OutOfSpec($repr),
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                match value {
                    $( $value => Self::$variant, )*
                    other => Self::OutOfSpec(other),
                }
            }
        }

        impl $name {
            /// Raw encoded value
            pub fn raw(self) -> $repr {
                match self {
                    $( Self::$variant => $value, )*
                    Self::OutOfSpec(value) => value,
                }
            }

            /// Display name
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )*
                    Self::OutOfSpec(_) => $crate::fields::OUT_OF_SPEC,
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

pub(crate) use dmi_enum;
