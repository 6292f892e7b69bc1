//! BIOS Information (Type 0) and BIOS Language (Type 13)

use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::error::Result;
use crate::fields::FieldReader;

// =============================================================================
// CHARACTERISTICS
// =============================================================================

bitflags! {
    /// BIOS characteristics (offset 0x0A)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BiosCharacteristics: u64 {
        /// Characteristics not supported
        const NOT_SUPPORTED = 1 << 3;
        /// ISA supported
        const ISA = 1 << 4;
        /// MCA supported
        const MCA = 1 << 5;
        /// EISA supported
        const EISA = 1 << 6;
        /// PCI supported
        const PCI = 1 << 7;
        /// PC Card (PCMCIA) supported
        const PCMCIA = 1 << 8;
        /// Plug and Play supported
        const PNP = 1 << 9;
        /// APM supported
        const APM = 1 << 10;
        /// BIOS is upgradeable (flash)
        const UPGRADEABLE = 1 << 11;
        /// BIOS shadowing allowed
        const SHADOWING = 1 << 12;
        /// VL-VESA supported
        const VLB = 1 << 13;
        /// ESCD support available
        const ESCD = 1 << 14;
        /// Boot from CD supported
        const BOOT_FROM_CD = 1 << 15;
        /// Selectable boot supported
        const SELECTABLE_BOOT = 1 << 16;
        /// BIOS ROM is socketed
        const ROM_SOCKETED = 1 << 17;
        /// Boot from PC Card supported
        const BOOT_FROM_PCMCIA = 1 << 18;
        /// EDD specification supported
        const EDD = 1 << 19;
        /// Japanese floppy for NEC 9800 1.2 MB
        const FLOPPY_NEC_9800 = 1 << 20;
        /// Japanese floppy for Toshiba 1.2 MB
        const FLOPPY_TOSHIBA = 1 << 21;
        /// 5.25" / 360 KB floppy services
        const FLOPPY_525_360K = 1 << 22;
        /// 5.25" / 1.2 MB floppy services
        const FLOPPY_525_1200K = 1 << 23;
        /// 3.5" / 720 KB floppy services
        const FLOPPY_35_720K = 1 << 24;
        /// 3.5" / 2.88 MB floppy services
        const FLOPPY_35_2880K = 1 << 25;
        /// Print screen service
        const PRINT_SCREEN = 1 << 26;
        /// 8042 keyboard services
        const KEYBOARD_8042 = 1 << 27;
        /// Serial services
        const SERIAL = 1 << 28;
        /// Printer services
        const PRINTER = 1 << 29;
        /// CGA/mono video services
        const CGA_MONO_VIDEO = 1 << 30;
        /// NEC PC-98
        const NEC_PC98 = 1 << 31;
    }
}

bitflags! {
    /// BIOS characteristics extension byte 1 (offset 0x12)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BiosCharacteristicsExt1: u8 {
        /// ACPI supported
        const ACPI = 1 << 0;
        /// USB legacy supported
        const USB_LEGACY = 1 << 1;
        /// AGP supported
        const AGP = 1 << 2;
        /// I2O boot supported
        const I2O_BOOT = 1 << 3;
        /// LS-120 boot supported
        const LS120_BOOT = 1 << 4;
        /// ATAPI ZIP drive boot supported
        const ATAPI_ZIP_BOOT = 1 << 5;
        /// IEEE 1394 boot supported
        const IEEE1394_BOOT = 1 << 6;
        /// Smart battery supported
        const SMART_BATTERY = 1 << 7;
    }
}

bitflags! {
    /// BIOS characteristics extension byte 2 (offset 0x13)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BiosCharacteristicsExt2: u8 {
        /// BIOS boot specification supported
        const BIOS_BOOT_SPEC = 1 << 0;
        /// Function key-initiated network boot
        const NETWORK_BOOT_KEY = 1 << 1;
        /// Targeted content distribution
        const TARGETED_CONTENT = 1 << 2;
        /// UEFI specification supported
        const UEFI = 1 << 3;
        /// SMBIOS table describes a virtual machine
        const VIRTUAL_MACHINE = 1 << 4;
        /// Manufacturing mode supported
        const MANUFACTURING_MODE_SUPPORTED = 1 << 5;
        /// Manufacturing mode enabled
        const MANUFACTURING_MODE_ENABLED = 1 << 6;
    }
}

/// Major/minor release pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FirmwareRelease {
    /// Major release
    pub major: u8,
    /// Minor release
    pub minor: u8,
}

impl FirmwareRelease {
    /// 0xFF in both bytes means the release is not reported
    fn from_pair(major: Option<u8>, minor: Option<u8>) -> Option<Self> {
        match (major?, minor?) {
            (0xFF, 0xFF) => None,
            (major, minor) => Some(Self { major, minor }),
        }
    }
}

// =============================================================================
// BIOS INFORMATION (TYPE 0)
// =============================================================================

/// BIOS Information (Type 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiosInformation {
    /// Vendor
    pub vendor: String,
    /// Version
    pub version: String,
    /// Segment of the BIOS start address (0 on UEFI systems)
    pub starting_address_segment: u16,
    /// Release date (mm/dd/yyyy)
    pub release_date: String,
    /// Raw ROM size byte, (n+1) * 64 KiB
    pub rom_size: u8,
    /// Characteristics
    pub characteristics: BiosCharacteristics,
    /// Extension byte 1 (2.4+)
    pub characteristics_ext1: Option<BiosCharacteristicsExt1>,
    /// Extension byte 2 (2.4+)
    pub characteristics_ext2: Option<BiosCharacteristicsExt2>,
    /// System BIOS release (2.4+)
    pub bios_release: Option<FirmwareRelease>,
    /// Embedded controller firmware release (2.4+)
    pub ec_release: Option<FirmwareRelease>,
    /// Extended ROM size word (3.1+)
    pub extended_rom_size: Option<u16>,
}

impl BiosInformation {
    /// Parse from a type 0 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            vendor: r.string(0x04, "vendor")?,
            version: r.string(0x05, "version")?,
            starting_address_segment: r.word(0x06, "starting_address_segment")?,
            release_date: r.string(0x08, "release_date")?,
            rom_size: r.byte(0x09, "rom_size")?,
            characteristics: BiosCharacteristics::from_bits_retain(r.qword(0x0A, "characteristics")?),
            characteristics_ext1: r.opt_byte(0x12).map(BiosCharacteristicsExt1::from_bits_retain),
            characteristics_ext2: r.opt_byte(0x13).map(BiosCharacteristicsExt2::from_bits_retain),
            bios_release: FirmwareRelease::from_pair(r.opt_byte(0x14), r.opt_byte(0x15)),
            ec_release: FirmwareRelease::from_pair(r.opt_byte(0x16), r.opt_byte(0x17)),
            extended_rom_size: r.opt_word(0x18),
        })
    }

    /// ROM size in bytes
    ///
    /// A size byte of 0xFF defers to the 3.1 extended size, whose bits 15:14
    /// select MiB (00) or GiB (01).
    pub fn rom_size_bytes(&self) -> Option<u64> {
        match (self.rom_size, self.extended_rom_size) {
            (0xFF, Some(ext)) => {
                let size = u64::from(ext & 0x3FFF);
                match ext >> 14 {
                    0 => Some(size << 20),
                    1 => Some(size << 30),
                    _ => None,
                }
            }
            (n, _) => Some((u64::from(n) + 1) << 16),
        }
    }

    /// Size of the runtime image below 1 MiB, in bytes
    pub fn runtime_size(&self) -> Option<u32> {
        match self.starting_address_segment {
            0 => None,
            segment => Some((0x1_0000 - u32::from(segment)) << 4),
        }
    }
}

// =============================================================================
// BIOS LANGUAGE (TYPE 13)
// =============================================================================

/// BIOS Language Information (Type 13)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiosLanguage {
    /// Installable languages
    pub languages: Vec<String>,
    /// Abbreviated format (2.1+)
    pub abbreviated: Option<bool>,
    /// Currently installed language
    pub current_language: String,
}

impl BiosLanguage {
    /// Parse from a type 13 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let count = r.byte(0x04, "installable_languages")?;
        let abbreviated = if r.version().at_least(2, 1) {
            r.opt_byte(0x05).map(|flags| flags & 0x01 != 0)
        } else {
            None
        };

        Ok(Self {
            languages: r.string_list(count)?,
            abbreviated,
            current_language: r.string(0x15, "current_language")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SmbiosVersion;
    use crate::error::DmiError;
    use crate::types::tests::decode_one;
    use crate::types::DecodedStructure;
    use alloc::vec;

    fn bios_body(rom_size: u8, segment: u16, tail: &[u8]) -> Vec<u8> {
        let mut body = vec![1, 2];
        body.extend_from_slice(&segment.to_le_bytes());
        body.push(3);
        body.push(rom_size);
        body.extend_from_slice(&((1u64 << 7) | (1 << 11) | (1 << 15)).to_le_bytes());
        body.extend_from_slice(tail);
        body
    }

    fn bios(body: &[u8]) -> BiosInformation {
        match decode_one(body, 0, &["Acme", "1.02", "03/04/2020"], SmbiosVersion::new(3, 2)).unwrap() {
            DecodedStructure::Bios(b) => b,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bios_legacy_layout() {
        let b = bios(&bios_body(0x0F, 0xE000, &[]));
        assert_eq!(b.vendor, "Acme");
        assert_eq!(b.version, "1.02");
        assert_eq!(b.release_date, "03/04/2020");
        assert!(b.characteristics.contains(BiosCharacteristics::PCI | BiosCharacteristics::UPGRADEABLE));
        assert!(b.characteristics.contains(BiosCharacteristics::BOOT_FROM_CD));
        assert_eq!(b.rom_size_bytes(), Some(1 << 20));
        assert_eq!(b.runtime_size(), Some(128 * 1024));
        assert_eq!(b.characteristics_ext1, None);
        assert_eq!(b.bios_release, None);
    }

    #[test]
    fn test_bios_extended_rom_size() {
        let tail = [0x03, 0x0C, 5, 17, 0xFF, 0xFF, 0x20, 0x00];
        let b = bios(&bios_body(0xFF, 0, &tail));
        assert_eq!(b.rom_size_bytes(), Some(32 << 20));
        assert_eq!(b.runtime_size(), None);
        let ext2 = b.characteristics_ext2.unwrap();
        assert!(ext2.contains(BiosCharacteristicsExt2::UEFI));
        assert!(!ext2.contains(BiosCharacteristicsExt2::NETWORK_BOOT_KEY));
        assert_eq!(b.bios_release, Some(FirmwareRelease { major: 5, minor: 17 }));
        assert_eq!(b.ec_release, None);

        let gib = bios(&bios_body(0xFF, 0, &[0, 0, 0, 0, 0, 0, 0x02, 0x40]));
        assert_eq!(gib.rom_size_bytes(), Some(2 << 30));
    }

    #[test]
    fn test_bios_truncated() {
        let err = decode_one(&[1, 2, 0, 0xE0, 3], 0, &["a", "b", "c"], SmbiosVersion::new(2, 8)).unwrap_err();
        assert_eq!(err, DmiError::MalformedRecord { field: "rom_size", offset: 0x09, length: 9 });
    }

    #[test]
    fn test_bios_language() {
        let mut body = vec![2, 0x01];
        body.extend_from_slice(&[0; 15]);
        body.push(2);
        let decoded = decode_one(&body, 13, &["en|US|iso8859-1", "fr|FR|iso8859-1"], SmbiosVersion::new(2, 8)).unwrap();
        let lang = decoded.as_structure::<BiosLanguage>().unwrap();
        assert_eq!(lang.languages.len(), 2);
        assert_eq!(lang.current_language, "fr|FR|iso8859-1");
        assert_eq!(lang.abbreviated, Some(true));
    }
}
