//! Error types for the DMI decoder
//!
//! Errors fall into two groups. Table-level errors (the byte source failed,
//! no entry point, a short entry point) abort a decode. Record-level errors
//! (a malformed record, a bad string reference) only fail the record that
//! produced them and are collected as [`RecordError`]s on the decoded table.

use core::fmt;

/// Result type for decoder operations
pub type Result<T> = core::result::Result<T, DmiError>;

/// Decoder error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DmiError {
    // =========================================================================
    // Table-level errors
    // =========================================================================

    /// The raw byte source could not supply the requested range
    SourceUnavailable {
        /// Physical base address requested
        base: u32,
        /// Number of bytes requested
        length: u32,
    },

    /// No `_SM_` anchor in the scanned window
    AnchorNotFound,

    /// The anchor was found but too few bytes follow it
    MalformedEntryPoint {
        /// Bytes available from the anchor onwards
        available: usize,
    },

    /// An entry point checksum did not sum to zero
    ChecksumMismatch {
        /// Which checksum failed
        field: &'static str,
    },

    // =========================================================================
    // Record-level errors
    // =========================================================================

    /// A record header or field lies outside the record's bytes
    MalformedRecord {
        /// Field being read
        field: &'static str,
        /// Byte offset of the field from the start of the record
        offset: usize,
        /// Bytes actually available to the read
        length: usize,
    },

    /// A string reference points past the end of the string pool
    StringIndexOutOfRange {
        /// 1-based string index stored in the record
        index: u8,
        /// Number of strings present in the pool
        available: usize,
    },
}

impl DmiError {
    /// Whether this error aborts the whole decode
    ///
    /// Record-level errors never do; the walker moves on to the next record.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. }
                | Self::AnchorNotFound
                | Self::MalformedEntryPoint { .. }
                | Self::ChecksumMismatch { .. }
        )
    }

    /// Get error name as string
    pub fn name(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Self::AnchorNotFound => "ANCHOR_NOT_FOUND",
            Self::MalformedEntryPoint { .. } => "MALFORMED_ENTRY_POINT",
            Self::ChecksumMismatch { .. } => "CHECKSUM_MISMATCH",
            Self::MalformedRecord { .. } => "MALFORMED_RECORD",
            Self::StringIndexOutOfRange { .. } => "STRING_INDEX_OUT_OF_RANGE",
        }
    }
}

impl fmt::Display for DmiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable { base, length } => {
                write!(f, "source unavailable ({:#x} bytes at {:#010x})", length, base)
            }
            Self::AnchorNotFound => write!(f, "no SMBIOS entry point found"),
            Self::MalformedEntryPoint { available } => {
                write!(f, "malformed entry point ({} bytes available)", available)
            }
            Self::ChecksumMismatch { field } => write!(f, "{} checksum mismatch", field),
            Self::MalformedRecord { field, offset, length } => write!(
                f,
                "malformed record: field '{}' at offset {:#x} exceeds {} available bytes",
                field, offset, length
            ),
            Self::StringIndexOutOfRange { index, available } => write!(
                f,
                "string index {} out of range ({} strings present)",
                index, available
            ),
        }
    }
}

/// A record-local failure, with enough context to find the record again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Byte offset of the record within the structure table
    pub offset: usize,
    /// Type code from the record header
    pub structure_type: u8,
    /// Handle from the record header
    pub handle: u16,
    /// What went wrong
    pub error: DmiError,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type {} handle {:#06x} at offset {:#x}: {}",
            self.structure_type, self.handle, self.offset, self.error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_fatal_classification() {
        assert!(DmiError::AnchorNotFound.is_fatal());
        assert!(DmiError::SourceUnavailable { base: 0xF0000, length: 0x10000 }.is_fatal());
        assert!(!DmiError::StringIndexOutOfRange { index: 3, available: 2 }.is_fatal());
        assert!(!DmiError::MalformedRecord { field: "uuid", offset: 8, length: 8 }.is_fatal());
    }

    #[test]
    fn test_record_error_display() {
        let err = RecordError {
            offset: 0x40,
            structure_type: 17,
            handle: 0x1100,
            error: DmiError::MalformedRecord { field: "speed", offset: 0x15, length: 0x15 },
        };
        let text = err.to_string();
        assert!(text.starts_with("type 17 handle 0x1100 at offset 0x40"));
        assert!(text.contains("'speed'"));
    }
}
