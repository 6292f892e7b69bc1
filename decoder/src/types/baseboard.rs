//! Baseboard Information (Type 2) and on-board devices (Types 10, 41)

use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};
use crate::types::PciAddress;

// =============================================================================
// BASEBOARD INFORMATION (TYPE 2)
// =============================================================================

bitflags! {
    /// Baseboard feature flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BoardFeatures: u8 {
        /// Hosting board (motherboard)
        const HOSTING = 1 << 0;
        /// Requires at least one daughter board
        const REQUIRES_DAUGHTER = 1 << 1;
        /// Removable
        const REMOVABLE = 1 << 2;
        /// Replaceable
        const REPLACEABLE = 1 << 3;
        /// Hot swappable
        const HOT_SWAPPABLE = 1 << 4;
    }
}

dmi_enum! {
    /// Baseboard type
    pub enum BoardType: u8 {
        Unknown = 0x01 => "Unknown",
        Other = 0x02 => "Other",
        ServerBlade = 0x03 => "Server Blade",
        ConnectivitySwitch = 0x04 => "Connectivity Switch",
        SystemManagementModule = 0x05 => "System Management Module",
        ProcessorModule = 0x06 => "Processor Module",
        IoModule = 0x07 => "I/O Module",
        MemoryModule = 0x08 => "Memory Module",
        DaughterBoard = 0x09 => "Daughter Board",
        Motherboard = 0x0A => "Motherboard",
        ProcessorMemoryModule = 0x0B => "Processor+Memory Module",
        ProcessorIoModule = 0x0C => "Processor+I/O Module",
        InterconnectBoard = 0x0D => "Interconnect Board",
    }
}

/// Base Board Information (Type 2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseboardInformation {
    /// Manufacturer
    pub manufacturer: String,
    /// Product
    pub product: String,
    /// Version
    pub version: String,
    /// Serial number
    pub serial_number: String,
    /// Asset tag
    pub asset_tag: Option<String>,
    /// Feature flags
    pub features: Option<BoardFeatures>,
    /// Location in chassis
    pub location_in_chassis: Option<String>,
    /// Handle of the enclosing chassis
    pub chassis_handle: Option<u16>,
    /// Board type
    pub board_type: Option<BoardType>,
    /// Handles of contained structures
    pub contained_handles: Vec<u16>,
}

impl BaseboardInformation {
    /// Parse from a type 2 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let mut contained_handles = Vec::new();
        if let Some(count) = r.opt_byte(0x0E) {
            for i in 0..count as usize {
                contained_handles.push(r.word(0x0F + i * 2, "contained_object_handles")?);
            }
        }

        Ok(Self {
            manufacturer: r.string(0x04, "manufacturer")?,
            product: r.string(0x05, "product")?,
            version: r.string(0x06, "version")?,
            serial_number: r.string(0x07, "serial_number")?,
            asset_tag: r.opt_string(0x08, "asset_tag")?,
            features: r.opt_byte(0x09).map(BoardFeatures::from_bits_retain),
            location_in_chassis: r.opt_string(0x0A, "location_in_chassis")?,
            chassis_handle: r.opt_word(0x0B),
            board_type: r.opt_byte(0x0D).map(BoardType::from),
            contained_handles,
        })
    }
}

// =============================================================================
// ON BOARD DEVICES (TYPE 10)
// =============================================================================

dmi_enum! {
    /// On-board device type (bits 6:0)
    pub enum OnboardDeviceType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Video = 0x03 => "Video",
        ScsiController = 0x04 => "SCSI Controller",
        Ethernet = 0x05 => "Ethernet",
        TokenRing = 0x06 => "Token Ring",
        Sound = 0x07 => "Sound",
        PataController = 0x08 => "PATA Controller",
        SataController = 0x09 => "SATA Controller",
        SasController = 0x0A => "SAS Controller",
        WirelessLan = 0x0B => "Wireless LAN",
        Bluetooth = 0x0C => "Bluetooth",
        Wwan = 0x0D => "WWAN",
        Emmc = 0x0E => "eMMC (embedded Multi-Media Controller)",
        NvmeController = 0x0F => "NVMe Controller",
        UfsController = 0x10 => "UFS Controller",
    }
}

/// One device from an On Board Devices record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardDevice {
    /// Device type
    pub device_type: OnboardDeviceType,
    /// Device enabled (bit 7)
    pub enabled: bool,
    /// Description
    pub description: String,
}

/// On Board Devices Information (Type 10)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardDevices {
    /// Devices, (length - 4) / 2 entries
    pub devices: Vec<OnboardDevice>,
}

impl OnboardDevices {
    /// Parse from a type 10 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let count = r.len().saturating_sub(4) / 2;
        let devices = (0..count)
            .map(|i| {
                let offset = 0x04 + i * 2;
                let kind = r.byte(offset, "device_type")?;
                Ok(OnboardDevice {
                    device_type: OnboardDeviceType::from(kind & 0x7F),
                    enabled: kind & 0x80 != 0,
                    description: r.string(offset + 1, "description")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { devices })
    }
}

// =============================================================================
// ONBOARD DEVICES EXTENDED INFORMATION (TYPE 41)
// =============================================================================

/// Onboard Devices Extended Information (Type 41)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardDeviceExtended {
    /// Reference designation
    pub reference_designation: String,
    /// Device type
    pub device_type: OnboardDeviceType,
    /// Device enabled
    pub enabled: bool,
    /// Instance among devices of this type
    pub instance: u8,
    /// PCI location, when the segment group is not 0xFFFF
    pub address: Option<PciAddress>,
}

impl OnboardDeviceExtended {
    /// Parse from a type 41 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let kind = r.byte(0x05, "device_type")?;
        let segment = r.word(0x07, "segment_group")?;
        let bus = r.byte(0x09, "bus_number")?;
        let devfn = r.byte(0x0A, "device_function")?;

        Ok(Self {
            reference_designation: r.string(0x04, "reference_designation")?,
            device_type: OnboardDeviceType::from(kind & 0x7F),
            enabled: kind & 0x80 != 0,
            instance: r.byte(0x06, "device_type_instance")?,
            address: (segment != 0xFFFF).then(|| PciAddress::from_raw(segment, bus, devfn)),
        })
    }
}
