//! Structure Type Decoders
//!
//! One `parse` per SMBIOS structure layout, grouped by family. Dispatch from
//! type code to decoder is a single `match` generated below; there is no
//! runtime registration.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::entry::SmbiosVersion;
use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};
use crate::structure::{StructureHeader, StructureRecord};

pub mod baseboard;
pub mod bios;
pub mod chassis;
pub mod management;
pub mod memory;
pub mod misc;
pub mod power;
pub mod probes;
pub mod processor;
pub mod slots;
pub mod system;

pub use baseboard::*;
pub use bios::*;
pub use chassis::*;
pub use management::*;
pub use memory::*;
pub use misc::*;
pub use power::*;
pub use probes::*;
pub use processor::*;
pub use slots::*;
pub use system::*;

// =============================================================================
// STRUCTURE TYPES
// =============================================================================

dmi_enum! {
    /// SMBIOS structure type codes
    pub enum StructureType: u8 {
        BiosInformation = 0 => "BIOS Information",
        SystemInformation = 1 => "System Information",
        BaseboardInformation = 2 => "Base Board Information",
        Chassis = 3 => "Chassis Information",
        Processor = 4 => "Processor Information",
        MemoryController = 5 => "Memory Controller Information",
        MemoryModule = 6 => "Memory Module Information",
        Cache = 7 => "Cache Information",
        PortConnector = 8 => "Port Connector Information",
        SystemSlots = 9 => "System Slots",
        OnboardDevices = 10 => "On Board Devices Information",
        OemStrings = 11 => "OEM Strings",
        SystemConfigurationOptions = 12 => "System Configuration Options",
        BiosLanguage = 13 => "BIOS Language Information",
        GroupAssociations = 14 => "Group Associations",
        SystemEventLog = 15 => "System Event Log",
        PhysicalMemoryArray = 16 => "Physical Memory Array",
        MemoryDevice = 17 => "Memory Device",
        MemoryError32 = 18 => "32-bit Memory Error Information",
        MemoryArrayMappedAddress = 19 => "Memory Array Mapped Address",
        MemoryDeviceMappedAddress = 20 => "Memory Device Mapped Address",
        BuiltInPointingDevice = 21 => "Built-in Pointing Device",
        PortableBattery = 22 => "Portable Battery",
        SystemReset = 23 => "System Reset",
        HardwareSecurity = 24 => "Hardware Security",
        SystemPowerControls = 25 => "System Power Controls",
        VoltageProbe = 26 => "Voltage Probe",
        CoolingDevice = 27 => "Cooling Device",
        TemperatureProbe = 28 => "Temperature Probe",
        CurrentProbe = 29 => "Electrical Current Probe",
        OutOfBandRemoteAccess = 30 => "Out-of-band Remote Access",
        BootIntegrityServices = 31 => "Boot Integrity Services Entry Point",
        SystemBoot = 32 => "System Boot Information",
        MemoryError64 = 33 => "64-bit Memory Error Information",
        ManagementDevice = 34 => "Management Device",
        ManagementDeviceComponent = 35 => "Management Device Component",
        ManagementDeviceThresholdData = 36 => "Management Device Threshold Data",
        MemoryChannel = 37 => "Memory Channel",
        IpmiDevice = 38 => "IPMI Device Information",
        SystemPowerSupply = 39 => "System Power Supply",
        AdditionalInformation = 40 => "Additional Information",
        OnboardDevicesExtended = 41 => "Onboard Devices Extended Information",
        ManagementControllerHostInterface = 42 => "Management Controller Host Interface",
        TpmDevice = 43 => "TPM Device",
        ProcessorAdditional = 44 => "Processor Additional Information",
        FirmwareInventory = 45 => "Firmware Inventory Information",
        StringProperty = 46 => "String Property",
        Inactive = 126 => "Inactive",
        EndOfTable = 127 => "End Of Table",
    }
}

impl StructureType {
    /// Codes 128-255 are reserved for OEM structures
    pub fn is_oem(self) -> bool {
        self.raw() >= 128
    }
}

// =============================================================================
// SHARED FIELD TYPES
// =============================================================================

/// A handle reference, with 0xFFFF meaning "none"
pub(crate) fn handle_ref(raw: u16) -> Option<u16> {
    (raw != 0xFFFF).then_some(raw)
}

/// PCI segment/bus/device/function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PciAddress {
    /// Segment group number
    pub segment: u16,
    /// Bus number
    pub bus: u8,
    /// Device number (bits 7:3 of the device/function byte)
    pub device: u8,
    /// Function number (bits 2:0 of the device/function byte)
    pub function: u8,
}

impl PciAddress {
    /// Build from the packed device/function byte
    pub fn from_raw(segment: u16, bus: u8, device_function: u8) -> Self {
        Self {
            segment,
            bus,
            device: device_function >> 3,
            function: device_function & 0x07,
        }
    }
}

impl fmt::Display for PciAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:02x}:{:02x}.{:x}",
            self.segment, self.bus, self.device, self.function
        )
    }
}

/// A structure kept as raw bytes because no layout is known for its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStructure {
    /// Header as read from the table
    pub header: StructureHeader,
    /// Header plus formatted area
    pub formatted: Vec<u8>,
    /// Strings from the pool
    pub strings: Vec<String>,
}

impl RawStructure {
    /// Copy a record out of the table buffer
    pub fn from_record(record: &StructureRecord<'_>) -> Self {
        Self {
            header: record.header,
            formatted: record.formatted().to_vec(),
            strings: record
                .strings()
                .iter()
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .collect(),
        }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// A decoded structure layout
pub trait Structure: Sized {
    /// Type code this layout decodes
    const TYPE: u8;

    /// Borrow the layout out of a decoded value of the matching variant
    fn from_decoded(decoded: &DecodedStructure) -> Option<&Self>;
}

macro_rules! decoded_structures {
    ( $( $code:literal => $variant:ident($ty:ident), )* ) => {
        /// A decoded structure, tagged by layout
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum DecodedStructure {
            $(
                #[doc = concat!("Type ", stringify!($code))]
                $variant($ty),
            )*
            /// Inactive structure (type 126)
            Inactive,
            /// End-of-table marker (type 127)
            EndOfTable,
            /// Any type without a known layout
            Unknown(RawStructure),
        }

        impl DecodedStructure {
            /// Type code of the record this was decoded from
            pub fn type_code(&self) -> u8 {
                match self {
                    $( Self::$variant(_) => $code, )*
                    Self::Inactive => StructureHeader::INACTIVE,
                    Self::EndOfTable => StructureHeader::END_OF_TABLE,
                    Self::Unknown(raw) => raw.header.structure_type,
                }
            }
        }

        $(
            impl Structure for $ty {
                const TYPE: u8 = $code;

                fn from_decoded(decoded: &DecodedStructure) -> Option<&Self> {
                    match decoded {
                        DecodedStructure::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*

        /// Decode one record according to its type code
        pub fn decode_structure(record: &StructureRecord<'_>, version: SmbiosVersion) -> Result<DecodedStructure> {
            let reader = FieldReader::new(record, version);
            match record.header.structure_type {
                $( $code => $ty::parse(&reader).map(DecodedStructure::$variant), )*
                StructureHeader::INACTIVE => Ok(DecodedStructure::Inactive),
                StructureHeader::END_OF_TABLE => Ok(DecodedStructure::EndOfTable),
                other => {
                    log::trace!("no layout for structure type {}, keeping raw bytes", other);
                    Ok(DecodedStructure::Unknown(RawStructure::from_record(record)))
                }
            }
        }
    };
}

decoded_structures! {
    0 => Bios(BiosInformation),
    1 => System(SystemInformation),
    2 => Baseboard(BaseboardInformation),
    3 => Chassis(ChassisInformation),
    4 => Processor(ProcessorInformation),
    7 => Cache(CacheInformation),
    8 => PortConnector(PortConnector),
    9 => SystemSlot(SystemSlot),
    10 => OnboardDevices(OnboardDevices),
    11 => OemStrings(OemStrings),
    12 => SystemConfigurationOptions(SystemConfigurationOptions),
    13 => BiosLanguage(BiosLanguage),
    14 => GroupAssociations(GroupAssociations),
    15 => SystemEventLog(SystemEventLog),
    16 => PhysicalMemoryArray(PhysicalMemoryArray),
    17 => MemoryDevice(MemoryDevice),
    18 => MemoryError32(MemoryError32),
    19 => MemoryArrayMappedAddress(MemoryArrayMappedAddress),
    20 => MemoryDeviceMappedAddress(MemoryDeviceMappedAddress),
    21 => BuiltInPointingDevice(BuiltInPointingDevice),
    22 => PortableBattery(PortableBattery),
    23 => SystemReset(SystemReset),
    24 => HardwareSecurity(HardwareSecurity),
    25 => SystemPowerControls(SystemPowerControls),
    26 => VoltageProbe(VoltageProbe),
    27 => CoolingDevice(CoolingDevice),
    28 => TemperatureProbe(TemperatureProbe),
    29 => CurrentProbe(CurrentProbe),
    30 => OutOfBandRemoteAccess(OutOfBandRemoteAccess),
    32 => SystemBoot(SystemBootInformation),
    33 => MemoryError64(MemoryError64),
    34 => ManagementDevice(ManagementDevice),
    35 => ManagementDeviceComponent(ManagementDeviceComponent),
    36 => ManagementDeviceThreshold(ManagementDeviceThreshold),
    37 => MemoryChannel(MemoryChannel),
    38 => IpmiDevice(IpmiDeviceInformation),
    39 => SystemPowerSupply(SystemPowerSupply),
    40 => AdditionalInformation(AdditionalInformation),
    41 => OnboardDeviceExtended(OnboardDeviceExtended),
    42 => ManagementControllerHostInterface(ManagementControllerHostInterface),
    43 => TpmDevice(TpmDevice),
}

impl DecodedStructure {
    /// Display name of the structure type
    pub fn name(&self) -> &'static str {
        let code = self.type_code();
        if code >= 128 {
            return "OEM-specific";
        }
        StructureType::from(code).name()
    }

    /// Borrow the layout `T` if this value holds one
    pub fn as_structure<T: Structure>(&self) -> Option<&T> {
        T::from_decoded(self)
    }
}
