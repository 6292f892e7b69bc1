//! Group associations, event log, pointing device, remote access and
//! additional information (Types 14, 15, 21, 30, 40)

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{DmiError, Result};
use crate::fields::{dmi_enum, FieldReader};

// =============================================================================
// GROUP ASSOCIATIONS (TYPE 14)
// =============================================================================

/// A member of a group association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupItem {
    /// Structure type of the member
    pub structure_type: u8,
    /// Handle of the member
    pub handle: u16,
}

/// Group Associations (Type 14)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssociations {
    /// Group name
    pub name: String,
    /// Members, (length - 5) / 3 entries
    pub items: Vec<GroupItem>,
}

impl GroupAssociations {
    /// Parse from a type 14 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let count = r.len().saturating_sub(5) / 3;
        let items = (0..count)
            .map(|i| {
                let offset = 0x05 + i * 3;
                Ok(GroupItem {
                    structure_type: r.byte(offset, "item_type")?,
                    handle: r.word(offset + 1, "item_handle")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: r.string(0x04, "group_name")?,
            items,
        })
    }
}

// =============================================================================
// SYSTEM EVENT LOG (TYPE 15)
// =============================================================================

dmi_enum! {
    /// Event log access method
    pub enum LogAccessMethod: u8 {
        IndexedIo8Bit = 0x00 => "Indexed I/O, one 8-bit index port, one 8-bit data port",
        IndexedIo2x8Bit = 0x01 => "Indexed I/O, two 8-bit index ports, one 8-bit data port",
        IndexedIo16Bit = 0x02 => "Indexed I/O, one 16-bit index port, one 8-bit data port",
        MemoryMapped = 0x03 => "Memory-mapped physical 32-bit address",
        GpnvFunctions = 0x04 => "General-purpose non-volatile data functions",
    }
}

dmi_enum! {
    /// Event log header format
    pub enum LogHeaderFormat: u8 {
        NoHeader = 0x00 => "No Header",
        Type1 = 0x01 => "Type 1 log header",
    }
}

/// Where the event log lives, interpreted per access method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMethodAddress {
    /// Index and data I/O port addresses
    IndexedIo {
        /// Index port
        index: u16,
        /// Data port
        data: u16,
    },
    /// 32-bit physical address
    Physical(u32),
    /// GPNV handle
    GpnvHandle(u16),
    /// OEM-specific method, raw address dword
    Oem(u32),
}

impl AccessMethodAddress {
    fn decode(method: LogAccessMethod, raw: u32) -> Self {
        match method {
            LogAccessMethod::IndexedIo8Bit | LogAccessMethod::IndexedIo2x8Bit | LogAccessMethod::IndexedIo16Bit => {
                Self::IndexedIo {
                    index: raw as u16,
                    data: (raw >> 16) as u16,
                }
            }
            LogAccessMethod::MemoryMapped => Self::Physical(raw),
            LogAccessMethod::GpnvFunctions => Self::GpnvHandle(raw as u16),
            LogAccessMethod::OutOfSpec(_) => Self::Oem(raw),
        }
    }
}

/// A supported event log type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLogDescriptor {
    /// Log type
    pub log_type: u8,
    /// Variable data format type
    pub data_format: u8,
}

/// System Event Log (Type 15)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEventLog {
    /// Length of the log area in bytes
    pub area_length: u16,
    /// Offset of the log header from the access address
    pub header_start_offset: u16,
    /// Offset of the first log entry from the access address
    pub data_start_offset: u16,
    /// Access method
    pub access_method: LogAccessMethod,
    /// Log area valid (status bit 0)
    pub valid: bool,
    /// Log area full (status bit 1)
    pub full: bool,
    /// Change token
    pub change_token: u32,
    /// Access address
    pub address: AccessMethodAddress,
    /// Header format (2.1+)
    pub header_format: Option<LogHeaderFormat>,
    /// Supported log type descriptors (2.1+)
    pub descriptors: Vec<EventLogDescriptor>,
}

impl SystemEventLog {
    /// Parse from a type 15 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let access_method = LogAccessMethod::from(r.byte(0x0A, "access_method")?);
        let status = r.byte(0x0B, "log_status")?;

        let count = r.opt_byte(0x15).unwrap_or(0) as usize;
        let descriptor_len = r.opt_byte(0x16).unwrap_or(2) as usize;
        let mut descriptors = Vec::with_capacity(count);
        for i in 0..count {
            let entry = r.bytes(0x17 + i * descriptor_len, descriptor_len.max(2), "log_type_descriptors")?;
            descriptors.push(EventLogDescriptor {
                log_type: entry[0],
                data_format: entry[1],
            });
        }

        Ok(Self {
            area_length: r.word(0x04, "log_area_length")?,
            header_start_offset: r.word(0x06, "log_header_start_offset")?,
            data_start_offset: r.word(0x08, "log_data_start_offset")?,
            access_method,
            valid: status & 0x01 != 0,
            full: status & 0x02 != 0,
            change_token: r.dword(0x0C, "log_change_token")?,
            address: AccessMethodAddress::decode(access_method, r.dword(0x10, "access_method_address")?),
            header_format: r.opt_byte(0x14).map(LogHeaderFormat::from),
            descriptors,
        })
    }
}

// =============================================================================
// BUILT-IN POINTING DEVICE (TYPE 21)
// =============================================================================

dmi_enum! {
    /// Pointing device type
    pub enum PointingDeviceType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Mouse = 0x03 => "Mouse",
        TrackBall = 0x04 => "Track Ball",
        TrackPoint = 0x05 => "Track Point",
        GlidePoint = 0x06 => "Glide Point",
        TouchPad = 0x07 => "Touch Pad",
        TouchScreen = 0x08 => "Touch Screen",
        OpticalSensor = 0x09 => "Optical Sensor",
    }
}

dmi_enum! {
    /// Pointing device interface
    pub enum PointingDeviceInterface: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Serial = 0x03 => "Serial",
        Ps2 = 0x04 => "PS/2",
        Infrared = 0x05 => "Infrared",
        HpHil = 0x06 => "HP-HIL",
        BusMouse = 0x07 => "Bus mouse",
        AppleDesktopBus = 0x08 => "ADB (Apple Desktop Bus)",
        BusMouseDb9 = 0xA0 => "Bus mouse DB-9",
        BusMouseMicroDin = 0xA1 => "Bus mouse micro-DIN",
        Usb = 0xA2 => "USB",
        I2c = 0xA3 => "I2C",
        Spi = 0xA4 => "SPI",
    }
}

/// Built-in Pointing Device (Type 21)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltInPointingDevice {
    /// Device type
    pub device_type: PointingDeviceType,
    /// Interface
    pub interface: PointingDeviceInterface,
    /// Number of buttons
    pub buttons: u8,
}

impl BuiltInPointingDevice {
    /// Parse from a type 21 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            device_type: PointingDeviceType::from(r.byte(0x04, "type")?),
            interface: PointingDeviceInterface::from(r.byte(0x05, "interface")?),
            buttons: r.byte(0x06, "number_of_buttons")?,
        })
    }
}

// =============================================================================
// OUT-OF-BAND REMOTE ACCESS (TYPE 30)
// =============================================================================

/// Out-of-band Remote Access (Type 30)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfBandRemoteAccess {
    /// Manufacturer of the remote access facility
    pub manufacturer: String,
    /// Inbound connections enabled
    pub inbound_enabled: bool,
    /// Outbound connections enabled
    pub outbound_enabled: bool,
}

impl OutOfBandRemoteAccess {
    /// Parse from a type 30 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let connections = r.byte(0x05, "connections")?;
        Ok(Self {
            manufacturer: r.string(0x04, "manufacturer_name")?,
            inbound_enabled: connections & 0x01 != 0,
            outbound_enabled: connections & 0x02 != 0,
        })
    }
}

// =============================================================================
// ADDITIONAL INFORMATION (TYPE 40)
// =============================================================================

/// One additional information entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalInformationEntry {
    /// Handle of the referenced structure
    pub referenced_handle: u16,
    /// Offset of the referenced field within that structure
    pub referenced_offset: u8,
    /// Description
    pub string: String,
    /// Enumerated value or updated field content
    pub value: Vec<u8>,
}

/// Additional Information (Type 40)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalInformation {
    /// Entries
    pub entries: Vec<AdditionalInformationEntry>,
}

impl AdditionalInformation {
    /// Parse from a type 40 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let count = r.byte(0x04, "number_of_entries")?;
        let mut entries = Vec::with_capacity(count as usize);
        let mut offset = 0x05;
        for _ in 0..count {
            let entry_len = r.byte(offset, "entry_length")? as usize;
            if entry_len < 5 {
                return Err(DmiError::MalformedRecord {
                    field: "entry_length",
                    offset,
                    length: r.len(),
                });
            }
            entries.push(AdditionalInformationEntry {
                referenced_handle: r.word(offset + 1, "referenced_handle")?,
                referenced_offset: r.byte(offset + 3, "referenced_offset")?,
                string: r.string(offset + 4, "string")?,
                value: r.bytes(offset + 5, entry_len - 5, "value")?.to_vec(),
            });
            offset += entry_len;
        }

        Ok(Self { entries })
    }
}
