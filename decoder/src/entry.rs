//! SMBIOS Entry Point
//!
//! The 32-bit entry point is a fixed 0x1F-byte structure found on a
//! paragraph boundary in the legacy BIOS window. It carries the SMBIOS version
//! and the physical location of the structure table.
//!
//! ```text
//! 0x00  "_SM_"              0x10  "_DMI_"
//! 0x04  checksum            0x15  intermediate checksum
//! 0x05  entry point length  0x16  structure table length (u16)
//! 0x06  major version       0x18  structure table address (u32)
//! 0x07  minor version       0x1C  number of structures (u16)
//! 0x08  max structure size  0x1E  BCD revision
//! 0x0A  entry point revision
//! 0x0B  formatted area (5)
//! ```

use core::fmt;

use crate::error::{DmiError, Result};
use crate::fields::bcd_u8;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Entry point anchor
pub const SMBIOS_ANCHOR: [u8; 4] = *b"_SM_";

/// Intermediate (legacy DMI) anchor
pub const DMI_ANCHOR: [u8; 5] = *b"_DMI_";

/// Offset where the intermediate structure starts
const INTERMEDIATE_OFFSET: usize = 0x10;

// =============================================================================
// SMBIOS VERSION
// =============================================================================

/// SMBIOS specification version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SmbiosVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl SmbiosVersion {
    /// Create a version
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether this version is at least `major.minor`
    pub const fn at_least(self, major: u8, minor: u8) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }
}

impl fmt::Display for SmbiosVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// SMBIOS 2.x entry point (32-bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    /// Anchor string "_SM_"
    pub anchor: [u8; 4],
    /// Checksum
    pub checksum: u8,
    /// Entry point length
    pub length: u8,
    /// Major version
    pub major_version: u8,
    /// Minor version
    pub minor_version: u8,
    /// Size of the largest structure
    pub max_structure_size: u16,
    /// Entry point revision
    pub entry_point_revision: u8,
    /// Formatted area (revision specific)
    pub formatted_area: [u8; 5],
    /// Intermediate anchor "_DMI_"
    pub intermediate_anchor: [u8; 5],
    /// Intermediate checksum
    pub intermediate_checksum: u8,
    /// Structure table length in bytes
    pub table_length: u16,
    /// Structure table physical address
    pub table_address: u32,
    /// Number of structures in the table
    pub structure_count: u16,
    /// BCD revision
    pub bcd_revision: u8,
    /// Entry point checksum summed to zero
    pub checksum_valid: bool,
    /// Intermediate checksum summed to zero
    pub intermediate_checksum_valid: bool,
}

static_assertions::const_assert_eq!(EntryPoint::SIZE, 0x1F);

impl EntryPoint {
    /// Size of the fixed fields
    pub const SIZE: usize = 31;

    /// Parse from bytes starting at the anchor
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SMBIOS_ANCHOR.len() || bytes[..4] != SMBIOS_ANCHOR {
            return Err(DmiError::AnchorNotFound);
        }
        if bytes.len() < Self::SIZE {
            return Err(DmiError::MalformedEntryPoint { available: bytes.len() });
        }

        let length = bytes[0x05];
        let covered = (length as usize).clamp(Self::SIZE, bytes.len());

        Ok(Self {
            anchor: SMBIOS_ANCHOR,
            checksum: bytes[0x04],
            length,
            major_version: bytes[0x06],
            minor_version: bytes[0x07],
            max_structure_size: u16::from_le_bytes([bytes[0x08], bytes[0x09]]),
            entry_point_revision: bytes[0x0A],
            formatted_area: [bytes[0x0B], bytes[0x0C], bytes[0x0D], bytes[0x0E], bytes[0x0F]],
            intermediate_anchor: [bytes[0x10], bytes[0x11], bytes[0x12], bytes[0x13], bytes[0x14]],
            intermediate_checksum: bytes[0x15],
            table_length: u16::from_le_bytes([bytes[0x16], bytes[0x17]]),
            table_address: u32::from_le_bytes([bytes[0x18], bytes[0x19], bytes[0x1A], bytes[0x1B]]),
            structure_count: u16::from_le_bytes([bytes[0x1C], bytes[0x1D]]),
            bcd_revision: bytes[0x1E],
            checksum_valid: checksum(&bytes[..covered]) == 0,
            intermediate_checksum_valid: checksum(&bytes[INTERMEDIATE_OFFSET..Self::SIZE]) == 0,
        })
    }

    /// Scan `window` for the anchor and parse the entry point there
    ///
    /// Candidates are tried every `alignment` bytes; 1 checks every offset.
    /// The first anchor found is used. Returns the offset of the
    /// anchor within the window together with the parsed entry point.
    pub fn locate(window: &[u8], alignment: usize) -> Result<(usize, Self)> {
        let step = alignment.max(1);
        let offset = (0..window.len())
            .step_by(step)
            .find(|&i| window[i..].starts_with(&SMBIOS_ANCHOR))
            .ok_or(DmiError::AnchorNotFound)?;

        log::trace!("SMBIOS anchor at window offset {:#x}", offset);
        Self::parse(&window[offset..]).map(|ep| (offset, ep))
    }

    /// SMBIOS version declared by the entry point
    pub fn version(&self) -> SmbiosVersion {
        SmbiosVersion::new(self.major_version, self.minor_version)
    }

    /// Whether the intermediate anchor reads "_DMI_"
    pub fn has_dmi_anchor(&self) -> bool {
        self.intermediate_anchor == DMI_ANCHOR
    }

    /// BCD revision as (major, minor), e.g. 0x28 -> (2, 8)
    pub fn bcd_revision(&self) -> Option<(u8, u8)> {
        bcd_u8(self.bcd_revision).map(|value| (value / 10, value % 10))
    }
}

/// Byte sum modulo 256
fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{DecoderConfig, PARAGRAPH_ALIGNMENT};
    use alloc::vec;
    use alloc::vec::Vec;

    /// Build a valid entry point with both checksums fixed up
    pub(crate) fn build_entry_point(major: u8, minor: u8, table_length: u16, table_address: u32, count: u16) -> Vec<u8> {
        let mut ep = vec![0u8; EntryPoint::SIZE];
        ep[..4].copy_from_slice(&SMBIOS_ANCHOR);
        ep[0x05] = EntryPoint::SIZE as u8;
        ep[0x06] = major;
        ep[0x07] = minor;
        ep[0x08..0x0A].copy_from_slice(&0x0100u16.to_le_bytes());
        ep[0x10..0x15].copy_from_slice(&DMI_ANCHOR);
        ep[0x16..0x18].copy_from_slice(&table_length.to_le_bytes());
        ep[0x18..0x1C].copy_from_slice(&table_address.to_le_bytes());
        ep[0x1C..0x1E].copy_from_slice(&count.to_le_bytes());
        ep[0x1E] = (major << 4) | (minor & 0x0F);

        let inter = checksum(&ep[0x10..EntryPoint::SIZE]);
        ep[0x15] = 0u8.wrapping_sub(inter);
        let total = checksum(&ep);
        ep[0x04] = 0u8.wrapping_sub(total);
        ep
    }

    #[test]
    fn test_parse_fields() {
        let bytes = build_entry_point(2, 8, 0x0456, 0x000E_1000, 42);
        let ep = EntryPoint::parse(&bytes).unwrap();
        assert_eq!(ep.version(), SmbiosVersion::new(2, 8));
        assert_eq!(ep.max_structure_size, 0x0100);
        assert_eq!(ep.table_length, 0x0456);
        assert_eq!(ep.table_address, 0x000E_1000);
        assert_eq!(ep.structure_count, 42);
        assert_eq!(ep.bcd_revision(), Some((2, 8)));
        assert!(ep.has_dmi_anchor());
        assert!(ep.checksum_valid);
        assert!(ep.intermediate_checksum_valid);
    }

    #[test]
    fn test_bad_checksum_detected() {
        let mut bytes = build_entry_point(2, 7, 0x100, 0x1000, 1);
        bytes[0x1C] ^= 0xFF;
        let ep = EntryPoint::parse(&bytes).unwrap();
        assert!(!ep.checksum_valid);
        assert!(!ep.intermediate_checksum_valid);
    }

    #[test]
    fn test_short_entry_point() {
        let bytes = build_entry_point(2, 8, 0, 0, 0);
        assert_eq!(
            EntryPoint::parse(&bytes[..20]),
            Err(DmiError::MalformedEntryPoint { available: 20 })
        );
    }

    #[test]
    fn test_locate_aligned() {
        let mut window = vec![0u8; 0x100];
        // Decoy on an odd offset is skipped by paragraph scanning
        window[0x13..0x17].copy_from_slice(b"_SM_");
        let ep = build_entry_point(3, 0, 0x20, 0x2000, 2);
        window[0x40..0x40 + ep.len()].copy_from_slice(&ep);

        let (offset, parsed) = EntryPoint::locate(&window, 16).unwrap();
        assert_eq!(offset, 0x40);
        assert_eq!(parsed.table_address, 0x2000);

        // Byte-wise scanning hits the decoy first, which is too short to be valid
        assert_eq!(
            EntryPoint::locate(&window[..0x30], 1),
            Err(DmiError::MalformedEntryPoint { available: 0x1D })
        );
    }

    #[test]
    fn test_locate_unaligned_with_default_step() {
        let mut window = vec![0u8; 0x100];
        let ep = build_entry_point(2, 7, 0x80, 0x000E_0000, 9);
        window[0x25..0x25 + ep.len()].copy_from_slice(&ep);

        let (offset, parsed) = EntryPoint::locate(&window, DecoderConfig::new().anchor_alignment).unwrap();
        assert_eq!(offset, 0x25);
        assert_eq!(parsed.version(), SmbiosVersion::new(2, 7));
        assert_eq!(EntryPoint::locate(&window, PARAGRAPH_ALIGNMENT), Err(DmiError::AnchorNotFound));
    }

    #[test]
    fn test_anchor_not_found() {
        let window = vec![0xAAu8; 0x400];
        assert_eq!(EntryPoint::locate(&window, 16), Err(DmiError::AnchorNotFound));
        assert_eq!(EntryPoint::locate(&[], 16), Err(DmiError::AnchorNotFound));
    }

    #[test]
    fn test_version_ordering() {
        assert!(SmbiosVersion::new(2, 6).at_least(2, 6));
        assert!(SmbiosVersion::new(3, 0).at_least(2, 6));
        assert!(!SmbiosVersion::new(2, 5).at_least(2, 6));
        assert!(SmbiosVersion::new(2, 10) > SmbiosVersion::new(2, 9));
    }
}
