//! System Enclosure or Chassis (Type 3)

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};
use crate::types::BoardType;

dmi_enum! {
    /// Chassis type (bits 6:0 of offset 0x05)
    pub enum ChassisType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Desktop = 0x03 => "Desktop",
        LowProfileDesktop = 0x04 => "Low Profile Desktop",
        PizzaBox = 0x05 => "Pizza Box",
        MiniTower = 0x06 => "Mini Tower",
        Tower = 0x07 => "Tower",
        Portable = 0x08 => "Portable",
        Laptop = 0x09 => "Laptop",
        Notebook = 0x0A => "Notebook",
        HandHeld = 0x0B => "Hand Held",
        DockingStation = 0x0C => "Docking Station",
        AllInOne = 0x0D => "All In One",
        SubNotebook = 0x0E => "Sub Notebook",
        SpaceSaving = 0x0F => "Space-saving",
        LunchBox = 0x10 => "Lunch Box",
        MainServerChassis = 0x11 => "Main Server Chassis",
        ExpansionChassis = 0x12 => "Expansion Chassis",
        SubChassis = 0x13 => "Sub Chassis",
        BusExpansionChassis = 0x14 => "Bus Expansion Chassis",
        PeripheralChassis = 0x15 => "Peripheral Chassis",
        RaidChassis = 0x16 => "RAID Chassis",
        RackMountChassis = 0x17 => "Rack Mount Chassis",
        SealedCasePc = 0x18 => "Sealed-case PC",
        MultiSystem = 0x19 => "Multi-system",
        CompactPci = 0x1A => "CompactPCI",
        AdvancedTca = 0x1B => "AdvancedTCA",
        Blade = 0x1C => "Blade",
        BladeEnclosure = 0x1D => "Blade Enclosing",
        Tablet = 0x1E => "Tablet",
        Convertible = 0x1F => "Convertible",
        Detachable = 0x20 => "Detachable",
        IotGateway = 0x21 => "IoT Gateway",
        EmbeddedPc = 0x22 => "Embedded PC",
        MiniPc = 0x23 => "Mini PC",
        StickPc = 0x24 => "Stick PC",
    }
}

dmi_enum! {
    /// Boot-up, power supply and thermal state
    pub enum ChassisState: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Safe = 0x03 => "Safe",
        Warning = 0x04 => "Warning",
        Critical = 0x05 => "Critical",
        NonRecoverable = 0x06 => "Non-recoverable",
    }
}

dmi_enum! {
    /// Chassis security status
    pub enum ChassisSecurityStatus: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        None = 0x03 => "None",
        ExternalInterfaceLockedOut = 0x04 => "External Interface Locked Out",
        ExternalInterfaceEnabled = 0x05 => "External Interface Enabled",
    }
}

/// What a contained element describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainedElementType {
    /// A baseboard type (selector bit clear)
    Board(BoardType),
    /// An SMBIOS structure type (selector bit set)
    Structure(u8),
}

/// An element held in the chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainedElement {
    /// Element type
    pub element_type: ContainedElementType,
    /// Minimum number of this element
    pub minimum: u8,
    /// Maximum number of this element
    pub maximum: u8,
}

/// System Enclosure or Chassis (Type 3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChassisInformation {
    /// Manufacturer
    pub manufacturer: String,
    /// Chassis type
    pub chassis_type: ChassisType,
    /// Chassis lock present (bit 7)
    pub lock_present: bool,
    /// Version
    pub version: String,
    /// Serial number
    pub serial_number: String,
    /// Asset tag
    pub asset_tag: String,
    /// State at last boot (2.1+)
    pub boot_up_state: Option<ChassisState>,
    /// Power supply state at last boot (2.1+)
    pub power_supply_state: Option<ChassisState>,
    /// Thermal state at last boot (2.1+)
    pub thermal_state: Option<ChassisState>,
    /// Security status (2.1+)
    pub security_status: Option<ChassisSecurityStatus>,
    /// OEM-defined (2.3+)
    pub oem_defined: Option<u32>,
    /// Height in rack units, 0 if unspecified (2.3+)
    pub height: Option<u8>,
    /// Number of power cords, 0 if unspecified (2.3+)
    pub power_cords: Option<u8>,
    /// Contained elements (2.3+)
    pub contained_elements: Vec<ContainedElement>,
    /// SKU number (2.7+)
    pub sku_number: Option<String>,
}

impl ChassisInformation {
    /// Parse from a type 3 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let kind = r.byte(0x05, "chassis_type")?;

        let count = r.opt_byte(0x13).unwrap_or(0) as usize;
        let record_len = r.opt_byte(0x14).unwrap_or(0) as usize;
        let mut contained_elements = Vec::with_capacity(count);
        for i in 0..count {
            let base = 0x15 + i * record_len;
            let element = r.bytes(base, record_len.max(3), "contained_elements")?;
            let selector = element[0];
            let element_type = if selector & 0x80 != 0 {
                ContainedElementType::Structure(selector & 0x7F)
            } else {
                ContainedElementType::Board(BoardType::from(selector & 0x7F))
            };
            contained_elements.push(ContainedElement {
                element_type,
                minimum: element[1],
                maximum: element[2],
            });
        }

        Ok(Self {
            manufacturer: r.string(0x04, "manufacturer")?,
            chassis_type: ChassisType::from(kind & 0x7F),
            lock_present: kind & 0x80 != 0,
            version: r.string(0x06, "version")?,
            serial_number: r.string(0x07, "serial_number")?,
            asset_tag: r.string(0x08, "asset_tag")?,
            boot_up_state: r.opt_byte(0x09).map(ChassisState::from),
            power_supply_state: r.opt_byte(0x0A).map(ChassisState::from),
            thermal_state: r.opt_byte(0x0B).map(ChassisState::from),
            security_status: r.opt_byte(0x0C).map(ChassisSecurityStatus::from),
            oem_defined: r.opt_dword(0x0D),
            height: r.opt_byte(0x11),
            power_cords: r.opt_byte(0x12),
            contained_elements,
            sku_number: r.opt_string(0x15 + count * record_len, "sku_number")?,
        })
    }
}
