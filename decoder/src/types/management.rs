//! Management devices and controllers
//! (Types 34, 35, 36, 38, 42, 43)

use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};
use crate::types::handle_ref;

// =============================================================================
// MANAGEMENT DEVICE (TYPES 34, 35, 36)
// =============================================================================

dmi_enum! {
    /// Management device type
    pub enum ManagementDeviceType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Lm75 = 0x03 => "LM75",
        Lm78 = 0x04 => "LM78",
        Lm79 = 0x05 => "LM79",
        Lm80 = 0x06 => "LM80",
        Lm81 = 0x07 => "LM81",
        Adm9240 = 0x08 => "ADM9240",
        Ds1780 = 0x09 => "DS1780",
        Maxim1617 = 0x0A => "MAX1617",
        Gl518Sm = 0x0B => "GL518SM",
        W83781D = 0x0C => "W83781D",
        Ht82H791 = 0x0D => "HT82H791",
    }
}

dmi_enum! {
    /// Management device address type
    pub enum ManagementAddressType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        IoPort = 0x03 => "I/O Port",
        Memory = 0x04 => "Memory",
        SmBus = 0x05 => "SM Bus",
    }
}

/// Management Device (Type 34)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementDevice {
    /// Description
    pub description: String,
    /// Device type
    pub device_type: ManagementDeviceType,
    /// Device address
    pub address: u32,
    /// Address type
    pub address_type: ManagementAddressType,
}

impl ManagementDevice {
    /// Parse from a type 34 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            description: r.string(0x04, "description")?,
            device_type: ManagementDeviceType::from(r.byte(0x05, "type")?),
            address: r.dword(0x06, "address")?,
            address_type: ManagementAddressType::from(r.byte(0x0A, "address_type")?),
        })
    }
}

/// Management Device Component (Type 35)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementDeviceComponent {
    /// Description
    pub description: String,
    /// Handle of the management device
    pub device_handle: u16,
    /// Handle of the probe or cooling device this component reads
    pub component_handle: u16,
    /// Handle of the threshold data, `None` if not provided
    pub threshold_handle: Option<u16>,
}

impl ManagementDeviceComponent {
    /// Parse from a type 35 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            description: r.string(0x04, "description")?,
            device_handle: r.word(0x05, "management_device_handle")?,
            component_handle: r.word(0x07, "component_handle")?,
            threshold_handle: r.opt_word(0x09).and_then(handle_ref),
        })
    }
}

/// Management Device Threshold Data (Type 36)
///
/// Each threshold is `None` when reported as 0x8000 (unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagementDeviceThreshold {
    /// Lower non-critical threshold
    pub lower_non_critical: Option<i16>,
    /// Upper non-critical threshold
    pub upper_non_critical: Option<i16>,
    /// Lower critical threshold
    pub lower_critical: Option<i16>,
    /// Upper critical threshold
    pub upper_critical: Option<i16>,
    /// Lower non-recoverable threshold
    pub lower_non_recoverable: Option<i16>,
    /// Upper non-recoverable threshold
    pub upper_non_recoverable: Option<i16>,
}

impl ManagementDeviceThreshold {
    /// Parse from a type 36 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let threshold = |offset: usize, field: &'static str| -> Result<Option<i16>> {
            let raw = r.word(offset, field)?;
            Ok((raw != 0x8000).then_some(raw as i16))
        };
        Ok(Self {
            lower_non_critical: threshold(0x04, "lower_threshold_non_critical")?,
            upper_non_critical: threshold(0x06, "upper_threshold_non_critical")?,
            lower_critical: threshold(0x08, "lower_threshold_critical")?,
            upper_critical: threshold(0x0A, "upper_threshold_critical")?,
            lower_non_recoverable: threshold(0x0C, "lower_threshold_non_recoverable")?,
            upper_non_recoverable: threshold(0x0E, "upper_threshold_non_recoverable")?,
        })
    }
}

// =============================================================================
// IPMI DEVICE INFORMATION (TYPE 38)
// =============================================================================

dmi_enum! {
    /// IPMI BMC interface type
    pub enum IpmiInterfaceType: u8 {
        Unknown = 0x00 => "Unknown",
        Kcs = 0x01 => "KCS (Keyboard Control Style)",
        Smic = 0x02 => "SMIC (Server Management Interface Chip)",
        Bt = 0x03 => "BT (Block Transfer)",
        Ssif = 0x04 => "SSIF (SMBus System Interface)",
    }
}

/// Address space of the IPMI base address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpmiAddress {
    /// I/O space
    Io(u64),
    /// Memory-mapped
    Memory(u64),
    /// SMBus slave address (SSIF)
    SmBus(u8),
}

/// Register spacing for KCS, SMIC and BT interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterSpacing {
    /// Successive byte boundaries
    Byte,
    /// 32-bit boundaries
    Dword,
    /// 16-byte boundaries
    Paragraph,
    /// Reserved encoding
    Reserved,
}

/// Interrupt information, present when the modifier declares it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpmiInterrupt {
    /// Active high (otherwise active low)
    pub active_high: bool,
    /// Level triggered (otherwise edge)
    pub level_triggered: bool,
    /// Interrupt number, `None` if unspecified
    pub number: Option<u8>,
}

/// IPMI Device Information (Type 38)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpmiDeviceInformation {
    /// Interface type
    pub interface_type: IpmiInterfaceType,
    /// IPMI specification revision (major, minor)
    pub specification_revision: (u8, u8),
    /// I2C slave address of the BMC
    pub i2c_slave_address: u8,
    /// Bus ID of the non-volatile storage device, `None` if absent
    pub nv_storage_address: Option<u8>,
    /// Base address with the least significant bit applied
    pub base_address: IpmiAddress,
    /// Register spacing (extended layout only)
    pub register_spacing: Option<RegisterSpacing>,
    /// Interrupt information (extended layout only)
    pub interrupt: Option<IpmiInterrupt>,
}

impl IpmiDeviceInformation {
    /// Parse from a type 38 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let interface_type = IpmiInterfaceType::from(r.byte(0x04, "interface_type")?);
        let revision = r.byte(0x05, "ipmi_specification_revision")?;
        let nv_storage = r.byte(0x07, "nv_storage_device_address")?;
        let base = r.qword(0x08, "base_address")?;
        let modifier = r.opt_byte(0x10);

        let base_address = if interface_type == IpmiInterfaceType::Ssif {
            IpmiAddress::SmBus((base >> 1) as u8)
        } else {
            // Bit 0 of the stored address selects the space; the modifier carries the real LS bit
            let ls_bit = modifier.map_or(0, |m| u64::from((m >> 4) & 1));
            let address = (base & !1) | ls_bit;
            if base & 1 != 0 {
                IpmiAddress::Io(address)
            } else {
                IpmiAddress::Memory(address)
            }
        };

        let register_spacing = modifier
            .filter(|_| interface_type != IpmiInterfaceType::Ssif)
            .map(|m| match m >> 6 {
                0 => RegisterSpacing::Byte,
                1 => RegisterSpacing::Dword,
                2 => RegisterSpacing::Paragraph,
                _ => RegisterSpacing::Reserved,
            });
        let interrupt = modifier.filter(|m| m & 0x08 != 0).map(|m| IpmiInterrupt {
            active_high: m & 0x02 != 0,
            level_triggered: m & 0x01 != 0,
            number: r.opt_byte(0x11).filter(|&irq| irq != 0),
        });

        Ok(Self {
            interface_type,
            specification_revision: (revision >> 4, revision & 0x0F),
            i2c_slave_address: r.byte(0x06, "i2c_slave_address")?,
            nv_storage_address: (nv_storage != 0xFF).then_some(nv_storage),
            base_address,
            register_spacing,
            interrupt,
        })
    }
}

// =============================================================================
// MANAGEMENT CONTROLLER HOST INTERFACE (TYPE 42)
// =============================================================================

dmi_enum! {
    /// Management controller host interface type
    pub enum HostInterfaceType: u8 {
        Kcs = 0x02 => "KCS: Keyboard Controller Style",
        Uart8250 = 0x03 => "8250 UART Register Compatible",
        Uart16450 = 0x04 => "16450 UART Register Compatible",
        Uart16550 = 0x05 => "16550/16550A UART Register Compatible",
        Uart16650 = 0x06 => "16650/16650A UART Register Compatible",
        Uart16750 = 0x07 => "16750/16750A UART Register Compatible",
        Uart16850 = 0x08 => "16850/16850A UART Register Compatible",
        Network = 0x40 => "Network Host Interface",
        Oem = 0xF0 => "OEM",
    }
}

dmi_enum! {
    /// Protocol carried over a host interface
    pub enum HostProtocolType: u8 {
        Ipmi = 0x02 => "IPMI",
        Mctp = 0x03 => "MCTP",
        RedfishOverIp = 0x04 => "Redfish over IP",
        Oem = 0xF0 => "OEM",
    }
}

/// One protocol record of a host interface (3.0+)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProtocolRecord {
    /// Protocol type
    pub protocol_type: HostProtocolType,
    /// Protocol-specific data
    pub data: Vec<u8>,
}

/// Management Controller Host Interface (Type 42)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementControllerHostInterface {
    /// Interface type
    pub interface_type: HostInterfaceType,
    /// Interface-specific data
    pub interface_data: Vec<u8>,
    /// Protocol records, empty before 3.0
    pub protocols: Vec<HostProtocolRecord>,
}

impl ManagementControllerHostInterface {
    /// Parse from a type 42 record
    ///
    /// Before 3.0 everything after the type byte is interface data; from 3.0
    /// the data is length-prefixed and followed by protocol records.
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let interface_type = HostInterfaceType::from(r.byte(0x04, "interface_type")?);

        if !r.version().at_least(3, 0) {
            let interface_data = r.bytes(0x05, r.len().saturating_sub(0x05), "interface_data")?.to_vec();
            return Ok(Self {
                interface_type,
                interface_data,
                protocols: Vec::new(),
            });
        }

        let data_len = r.byte(0x05, "interface_data_length")? as usize;
        let interface_data = r.bytes(0x06, data_len, "interface_data")?.to_vec();

        let mut offset = 0x06 + data_len;
        let count = r.opt_byte(offset).unwrap_or(0);
        offset += 1;
        let mut protocols = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let protocol_type = HostProtocolType::from(r.byte(offset, "protocol_type")?);
            let len = r.byte(offset + 1, "protocol_data_length")? as usize;
            let data = r.bytes(offset + 2, len, "protocol_data")?.to_vec();
            protocols.push(HostProtocolRecord { protocol_type, data });
            offset += 2 + len;
        }

        Ok(Self {
            interface_type,
            interface_data,
            protocols,
        })
    }
}

// =============================================================================
// TPM DEVICE (TYPE 43)
// =============================================================================

bitflags! {
    /// TPM device characteristics
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TpmCharacteristics: u64 {
        /// Characteristics not supported
        const NOT_SUPPORTED = 1 << 2;
        /// Family configurable via firmware update
        const FAMILY_CONFIGURABLE_FIRMWARE = 1 << 3;
        /// Family configurable via platform software support
        const FAMILY_CONFIGURABLE_SOFTWARE = 1 << 4;
        /// Family configurable via OEM proprietary mechanism
        const FAMILY_CONFIGURABLE_OEM = 1 << 5;
    }
}

/// TPM Device (Type 43)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TpmDevice {
    /// Vendor ID, as stored (typically four ASCII bytes)
    pub vendor_id: [u8; 4],
    /// TPM specification version (major, minor)
    pub spec_version: (u8, u8),
    /// Firmware version 1
    pub firmware_version_1: u32,
    /// Firmware version 2
    pub firmware_version_2: u32,
    /// Description
    pub description: String,
    /// Characteristics
    pub characteristics: TpmCharacteristics,
    /// OEM-defined
    pub oem_defined: u32,
}

impl TpmDevice {
    /// Parse from a type 43 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            vendor_id: r.array::<4>(0x04, "vendor_id")?,
            spec_version: (r.byte(0x08, "major_spec_version")?, r.byte(0x09, "minor_spec_version")?),
            firmware_version_1: r.dword(0x0A, "firmware_version_1")?,
            firmware_version_2: r.dword(0x0E, "firmware_version_2")?,
            description: r.string(0x12, "description")?,
            characteristics: TpmCharacteristics::from_bits_retain(r.qword(0x13, "characteristics")?),
            oem_defined: r.dword(0x1B, "oem_defined")?,
        })
    }

    /// Vendor ID as text, trailing NULs removed
    pub fn vendor_name(&self) -> String {
        let end = self.vendor_id.iter().position(|&b| b == 0).unwrap_or(self.vendor_id.len());
        String::from_utf8_lossy(&self.vendor_id[..end]).into_owned()
    }
}
