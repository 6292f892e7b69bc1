//! # DMI Decoder - SMBIOS Structure Table Decoding
//!
//! Finds the SMBIOS 2.x entry point in a firmware memory window, walks the
//! structure table it points at and decodes every record into typed values.
//!
//! ## Pipeline
//!
//! - [`RawSource`]: supplies physical-memory bytes (a mapped `/dev/mem`, a
//!   firmware dump, a [`MemoryImage`] in tests)
//! - [`EntryPoint`]: anchor scan and checksum validation
//! - [`TableWalker`]: header/string-pool framing of the structure table
//! - [`decode_structure`]: per-type field decoding
//! - [`DecodedTable`]: the result, indexed by type code and by handle
//!
//! A record that fails to decode is reported on the table and skipped; it
//! never aborts the walk. Only source, anchor and (optionally) checksum
//! failures fail a whole decode.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod config;
pub mod entry;
pub mod error;
pub mod fields;
pub mod source;
pub mod structure;
pub mod table;
pub mod types;
pub mod walker;

pub use config::{ChecksumPolicy, DecoderConfig, Retention};
pub use entry::{EntryPoint, SmbiosVersion};
pub use error::{DmiError, RecordError, Result};
pub use fields::{bcd_decode, bcd_u8, FieldReader, SystemUuid};
pub use source::{MemoryImage, RawSource};
pub use structure::{StringPool, StructureHeader, StructureRecord};
pub use table::{decode, global, init_global, DecodedRecord, DecodedTable, Decoder};
pub use types::*;
pub use walker::{TableWalker, WalkEnd};
