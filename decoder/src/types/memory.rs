//! Memory topology: arrays, devices, mapped ranges, channels and error records
//! (Types 16, 17, 18, 19, 20, 33, 37)

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Deref;

use bitflags::bitflags;

use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};

// =============================================================================
// PHYSICAL MEMORY ARRAY (TYPE 16)
// =============================================================================

dmi_enum! {
    /// Physical location of a memory array
    pub enum MemoryArrayLocation: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        SystemBoard = 0x03 => "System Board Or Motherboard",
        IsaAddOn = 0x04 => "ISA Add-on Card",
        EisaAddOn = 0x05 => "EISA Add-on Card",
        PciAddOn = 0x06 => "PCI Add-on Card",
        McaAddOn = 0x07 => "MCA Add-on Card",
        PcmciaAddOn = 0x08 => "PCMCIA Add-on Card",
        ProprietaryAddOn = 0x09 => "Proprietary Add-on Card",
        NuBus = 0x0A => "NuBus",
        Pc98C20 = 0xA0 => "PC-98/C20 Add-on Card",
        Pc98C24 = 0xA1 => "PC-98/C24 Add-on Card",
        Pc98E = 0xA2 => "PC-98/E Add-on Card",
        Pc98LocalBus = 0xA3 => "PC-98/Local bus Add-on Card",
        CxlAddOn = 0xA4 => "CXL Add-on Card",
    }
}

dmi_enum! {
    /// What a memory array is used for
    pub enum MemoryArrayUse: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        SystemMemory = 0x03 => "System Memory",
        VideoMemory = 0x04 => "Video Memory",
        FlashMemory = 0x05 => "Flash Memory",
        NonVolatileRam = 0x06 => "Non-volatile RAM",
        CacheMemory = 0x07 => "Cache Memory",
    }
}

dmi_enum! {
    /// Memory array error correction
    pub enum MemoryErrorCorrection: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        None = 0x03 => "None",
        Parity = 0x04 => "Parity",
        SingleBitEcc = 0x05 => "Single-bit ECC",
        MultiBitEcc = 0x06 => "Multi-bit ECC",
        Crc = 0x07 => "CRC",
    }
}

/// Physical Memory Array (Type 16)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalMemoryArray {
    /// Location
    pub location: MemoryArrayLocation,
    /// Use
    pub array_use: MemoryArrayUse,
    /// Error correction
    pub error_correction: MemoryErrorCorrection,
    /// Maximum capacity in bytes, `None` if unknown
    pub maximum_capacity: Option<u64>,
    /// Handle of an associated memory error record
    pub error_information_handle: Option<u16>,
    /// Number of memory device slots
    pub number_of_devices: u16,
}

impl PhysicalMemoryArray {
    /// Parse from a type 16 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let capacity_kib = r.dword(0x07, "maximum_capacity")?;
        let maximum_capacity = match (capacity_kib, r.opt_qword(0x0F)) {
            (0x8000_0000, Some(bytes)) => Some(bytes),
            (0x8000_0000, None) => None,
            (kib, _) => Some(u64::from(kib) * 1024),
        };

        Ok(Self {
            location: MemoryArrayLocation::from(r.byte(0x04, "location")?),
            array_use: MemoryArrayUse::from(r.byte(0x05, "use")?),
            error_correction: MemoryErrorCorrection::from(r.byte(0x06, "memory_error_correction")?),
            maximum_capacity,
            error_information_handle: error_handle(r.word(0x0B, "memory_error_information_handle")?),
            number_of_devices: r.word(0x0D, "number_of_memory_devices")?,
        })
    }
}

/// Memory error handles use 0xFFFE for "not provided" and 0xFFFF for "no error"
fn error_handle(raw: u16) -> Option<u16> {
    (raw < 0xFFFE).then_some(raw)
}

// =============================================================================
// MEMORY DEVICE (TYPE 17)
// =============================================================================

dmi_enum! {
    /// Memory device form factor
    pub enum FormFactor: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Simm = 0x03 => "SIMM",
        Sip = 0x04 => "SIP",
        Chip = 0x05 => "Chip",
        Dip = 0x06 => "DIP",
        Zip = 0x07 => "ZIP",
        ProprietaryCard = 0x08 => "Proprietary Card",
        Dimm = 0x09 => "DIMM",
        Tsop = 0x0A => "TSOP",
        RowOfChips = 0x0B => "Row Of Chips",
        Rimm = 0x0C => "RIMM",
        SoDimm = 0x0D => "SODIMM",
        Srimm = 0x0E => "SRIMM",
        FbDimm = 0x0F => "FB-DIMM",
        Die = 0x10 => "Die",
        Camm = 0x11 => "CAMM",
    }
}

dmi_enum! {
    /// Memory device type
    pub enum MemoryDeviceType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Dram = 0x03 => "DRAM",
        Edram = 0x04 => "EDRAM",
        Vram = 0x05 => "VRAM",
        Sram = 0x06 => "SRAM",
        Ram = 0x07 => "RAM",
        Rom = 0x08 => "ROM",
        Flash = 0x09 => "Flash",
        Eeprom = 0x0A => "EEPROM",
        Feprom = 0x0B => "FEPROM",
        Eprom = 0x0C => "EPROM",
        Cdram = 0x0D => "CDRAM",
        ThreeDram = 0x0E => "3DRAM",
        Sdram = 0x0F => "SDRAM",
        Sgram = 0x10 => "SGRAM",
        Rdram = 0x11 => "RDRAM",
        Ddr = 0x12 => "DDR",
        Ddr2 = 0x13 => "DDR2",
        Ddr2FbDimm = 0x14 => "DDR2 FB-DIMM",
        Ddr3 = 0x18 => "DDR3",
        Fbd2 = 0x19 => "FBD2",
        Ddr4 = 0x1A => "DDR4",
        Lpddr = 0x1B => "LPDDR",
        Lpddr2 = 0x1C => "LPDDR2",
        Lpddr3 = 0x1D => "LPDDR3",
        Lpddr4 = 0x1E => "LPDDR4",
        LogicalNonVolatile = 0x1F => "Logical non-volatile device",
        Hbm = 0x20 => "HBM",
        Hbm2 = 0x21 => "HBM2",
        Ddr5 = 0x22 => "DDR5",
        Lpddr5 = 0x23 => "LPDDR5",
        Hbm3 = 0x24 => "HBM3",
    }
}

bitflags! {
    /// Memory type detail (offset 0x13)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemoryTypeDetail: u16 {
        /// Other
        const OTHER = 1 << 1;
        /// Unknown
        const UNKNOWN = 1 << 2;
        /// Fast-paged
        const FAST_PAGED = 1 << 3;
        /// Static column
        const STATIC_COLUMN = 1 << 4;
        /// Pseudo-static
        const PSEUDO_STATIC = 1 << 5;
        /// RAMBUS
        const RAMBUS = 1 << 6;
        /// Synchronous
        const SYNCHRONOUS = 1 << 7;
        /// CMOS
        const CMOS = 1 << 8;
        /// EDO
        const EDO = 1 << 9;
        /// Window DRAM
        const WINDOW_DRAM = 1 << 10;
        /// Cache DRAM
        const CACHE_DRAM = 1 << 11;
        /// Non-volatile
        const NON_VOLATILE = 1 << 12;
        /// Registered (buffered)
        const REGISTERED = 1 << 13;
        /// Unbuffered (unregistered)
        const UNBUFFERED = 1 << 14;
        /// LRDIMM
        const LRDIMM = 1 << 15;
    }
}

dmi_enum! {
    /// Memory technology (3.2+)
    pub enum MemoryTechnology: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Dram = 0x03 => "DRAM",
        NvdimmN = 0x04 => "NVDIMM-N",
        NvdimmF = 0x05 => "NVDIMM-F",
        NvdimmP = 0x06 => "NVDIMM-P",
        IntelOptane = 0x07 => "Intel Optane persistent memory",
        MrDimm = 0x08 => "MRDIMM",
    }
}

bitflags! {
    /// Memory operating mode capability (3.2+)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OperatingModeCapability: u16 {
        /// Other
        const OTHER = 1 << 1;
        /// Unknown
        const UNKNOWN = 1 << 2;
        /// Volatile memory
        const VOLATILE = 1 << 3;
        /// Byte-accessible persistent memory
        const BYTE_ACCESSIBLE_PERSISTENT = 1 << 4;
        /// Block-accessible persistent memory
        const BLOCK_ACCESSIBLE_PERSISTENT = 1 << 5;
    }
}

/// Installed size of a memory device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryDeviceSize {
    /// No module installed in the socket
    NotInstalled,
    /// Size not known
    Unknown,
    /// Size in bytes
    Bytes(u64),
}

impl MemoryDeviceSize {
    /// Decode the 16-bit size with its 32-bit extension
    pub fn from_raw(size: u16, extended: Option<u32>) -> Self {
        match (size, extended) {
            (0, _) => Self::NotInstalled,
            (0xFFFF, _) => Self::Unknown,
            (0x7FFF, Some(mib)) => Self::Bytes(u64::from(mib & 0x7FFF_FFFF) << 20),
            (size, _) if size & 0x8000 != 0 => Self::Bytes(u64::from(size & 0x7FFF) << 10),
            (size, _) => Self::Bytes(u64::from(size) << 20),
        }
    }

    /// Size in bytes, if known and installed
    pub fn bytes(&self) -> Option<u64> {
        match self {
            Self::Bytes(bytes) => Some(*bytes),
            _ => None,
        }
    }
}

/// Module and memory subsystem controller identification (3.2+)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryModuleIds {
    /// Module manufacturer JEDEC ID
    pub module_manufacturer: u16,
    /// Module product ID
    pub module_product: u16,
    /// Memory subsystem controller manufacturer JEDEC ID
    pub controller_manufacturer: u16,
    /// Memory subsystem controller product ID
    pub controller_product: u16,
}

/// Sizes of the memory regions in a persistent memory module (3.2+)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegionSizes {
    /// Non-volatile size in bytes
    pub non_volatile: u64,
    /// Volatile size in bytes
    pub volatile: u64,
    /// Cache size in bytes
    pub cache: u64,
    /// Logical size in bytes
    pub logical: u64,
}

/// Speeds use 0xFFFF to defer to the 32-bit extended field
fn speed_mts(speed: Option<u16>, extended: Option<u32>) -> Option<u32> {
    match (speed?, extended) {
        (0, _) => None,
        (0xFFFF, Some(wide)) => Some(wide & 0x7FFF_FFFF),
        (narrow, _) => Some(u32::from(narrow)),
    }
}

/// Memory Device (Type 17)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDevice {
    /// Handle of the owning physical memory array
    pub array_handle: u16,
    /// Handle of an associated memory error record
    pub error_information_handle: Option<u16>,
    /// Total width in bits, `None` if unknown
    pub total_width: Option<u16>,
    /// Data width in bits, `None` if unknown
    pub data_width: Option<u16>,
    /// Installed size
    pub size: MemoryDeviceSize,
    /// Form factor
    pub form_factor: FormFactor,
    /// Device set, `None` when not part of a set
    pub device_set: Option<u8>,
    /// Device locator
    pub device_locator: String,
    /// Bank locator
    pub bank_locator: String,
    /// Memory type
    pub memory_type: MemoryDeviceType,
    /// Type detail
    pub type_detail: MemoryTypeDetail,
    /// Maximum speed in MT/s (2.3+)
    pub speed: Option<u32>,
    /// Manufacturer (2.3+)
    pub manufacturer: Option<String>,
    /// Serial number (2.3+)
    pub serial_number: Option<String>,
    /// Asset tag (2.3+)
    pub asset_tag: Option<String>,
    /// Part number (2.3+)
    pub part_number: Option<String>,
    /// Rank (2.6+)
    pub rank: Option<u8>,
    /// Configured speed in MT/s (2.7+)
    pub configured_speed: Option<u32>,
    /// Minimum voltage in millivolts (2.8+)
    pub minimum_voltage: Option<u16>,
    /// Maximum voltage in millivolts (2.8+)
    pub maximum_voltage: Option<u16>,
    /// Configured voltage in millivolts (2.8+)
    pub configured_voltage: Option<u16>,
    /// Memory technology (3.2+)
    pub technology: Option<MemoryTechnology>,
    /// Operating mode capability (3.2+)
    pub operating_mode: Option<OperatingModeCapability>,
    /// Firmware version (3.2+)
    pub firmware_version: Option<String>,
    /// Module and controller IDs (3.2+)
    pub module_ids: Option<MemoryModuleIds>,
    /// Region sizes (3.2+)
    pub region_sizes: Option<MemoryRegionSizes>,
}

impl MemoryDevice {
    /// Parse from a type 17 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let width = |v: u16| (v != 0xFFFF && v != 0).then_some(v);
        let voltage = |v: Option<u16>| v.filter(|&mv| mv != 0);

        let module_ids = match (r.opt_word(0x2C), r.opt_word(0x2E), r.opt_word(0x30), r.opt_word(0x32)) {
            (Some(module_manufacturer), Some(module_product), Some(controller_manufacturer), Some(controller_product)) => {
                Some(MemoryModuleIds {
                    module_manufacturer,
                    module_product,
                    controller_manufacturer,
                    controller_product,
                })
            }
            _ => None,
        };
        let region_sizes = match (r.opt_qword(0x34), r.opt_qword(0x3C), r.opt_qword(0x44), r.opt_qword(0x4C)) {
            (Some(non_volatile), Some(volatile), Some(cache), Some(logical)) => Some(MemoryRegionSizes {
                non_volatile,
                volatile,
                cache,
                logical,
            }),
            _ => None,
        };

        let device_set = match r.byte(0x0F, "device_set")? {
            0 | 0xFF => None,
            set => Some(set),
        };

        Ok(Self {
            array_handle: r.word(0x04, "physical_memory_array_handle")?,
            error_information_handle: error_handle(r.word(0x06, "memory_error_information_handle")?),
            total_width: width(r.word(0x08, "total_width")?),
            data_width: width(r.word(0x0A, "data_width")?),
            size: MemoryDeviceSize::from_raw(r.word(0x0C, "size")?, r.opt_dword(0x1C)),
            form_factor: FormFactor::from(r.byte(0x0E, "form_factor")?),
            device_set,
            device_locator: r.string(0x10, "device_locator")?,
            bank_locator: r.string(0x11, "bank_locator")?,
            memory_type: MemoryDeviceType::from(r.byte(0x12, "memory_type")?),
            type_detail: MemoryTypeDetail::from_bits_retain(r.word(0x13, "type_detail")?),
            speed: speed_mts(r.opt_word(0x15), r.opt_dword(0x54)),
            manufacturer: r.opt_string(0x17, "manufacturer")?,
            serial_number: r.opt_string(0x18, "serial_number")?,
            asset_tag: r.opt_string(0x19, "asset_tag")?,
            part_number: r.opt_string(0x1A, "part_number")?,
            rank: r.opt_byte(0x1B).map(|attributes| attributes & 0x0F).filter(|&rank| rank != 0),
            configured_speed: speed_mts(r.opt_word(0x20), r.opt_dword(0x58)),
            minimum_voltage: voltage(r.opt_word(0x22)),
            maximum_voltage: voltage(r.opt_word(0x24)),
            configured_voltage: voltage(r.opt_word(0x26)),
            technology: r.opt_byte(0x28).map(MemoryTechnology::from),
            operating_mode: r.opt_word(0x29).map(OperatingModeCapability::from_bits_retain),
            firmware_version: r.opt_string(0x2B, "firmware_version")?,
            module_ids,
            region_sizes,
        })
    }

    /// Whether a module is installed in this socket
    pub fn is_installed(&self) -> bool {
        self.size != MemoryDeviceSize::NotInstalled
    }
}

// =============================================================================
// MEMORY ERROR INFORMATION (TYPES 18, 33)
// =============================================================================

dmi_enum! {
    /// Memory error type
    pub enum MemoryErrorType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Ok = 0x03 => "OK",
        BadRead = 0x04 => "Bad Read",
        Parity = 0x05 => "Parity Error",
        SingleBit = 0x06 => "Single-bit Error",
        DoubleBit = 0x07 => "Double-bit Error",
        MultiBit = 0x08 => "Multi-bit Error",
        Nibble = 0x09 => "Nibble Error",
        Checksum = 0x0A => "Checksum Error",
        Crc = 0x0B => "CRC Error",
        CorrectedSingleBit = 0x0C => "Corrected Single-bit Error",
        Corrected = 0x0D => "Corrected Error",
        Uncorrectable = 0x0E => "Uncorrectable Error",
    }
}

dmi_enum! {
    /// Memory error granularity
    pub enum MemoryErrorGranularity: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        DeviceLevel = 0x03 => "Device Level",
        PartitionLevel = 0x04 => "Memory Partition Level",
    }
}

dmi_enum! {
    /// Memory error operation
    pub enum MemoryErrorOperation: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Read = 0x03 => "Read",
        Write = 0x04 => "Write",
        PartialWrite = 0x05 => "Partial Write",
    }
}

/// Fields shared by the 32-bit and 64-bit memory error records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryErrorInformation {
    /// Error type
    pub error_type: MemoryErrorType,
    /// Error granularity
    pub granularity: MemoryErrorGranularity,
    /// Operation that failed
    pub operation: MemoryErrorOperation,
    /// Vendor syndrome, `None` if unknown
    pub vendor_syndrome: Option<u32>,
    /// Memory array error address, `None` if unknown
    pub array_error_address: Option<u64>,
    /// Device error address, `None` if unknown
    pub device_error_address: Option<u64>,
    /// Error resolution, `None` if unknown
    pub error_resolution: Option<u32>,
}

impl MemoryErrorInformation {
    fn parse_common(
        r: &FieldReader<'_>,
        array_error_address: Option<u64>,
        device_error_address: Option<u64>,
        error_resolution: u32,
    ) -> Result<Self> {
        let syndrome = r.dword(0x07, "vendor_syndrome")?;
        Ok(Self {
            error_type: MemoryErrorType::from(r.byte(0x04, "error_type")?),
            granularity: MemoryErrorGranularity::from(r.byte(0x05, "error_granularity")?),
            operation: MemoryErrorOperation::from(r.byte(0x06, "error_operation")?),
            vendor_syndrome: (syndrome != 0).then_some(syndrome),
            array_error_address,
            device_error_address,
            error_resolution: (error_resolution != 0x8000_0000).then_some(error_resolution),
        })
    }
}

/// 32-bit Memory Error Information (Type 18)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryError32(pub MemoryErrorInformation);

impl MemoryError32 {
    /// Parse from a type 18 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let unknown = |v: u32| (v != 0x8000_0000).then_some(u64::from(v));
        MemoryErrorInformation::parse_common(
            r,
            unknown(r.dword(0x0B, "memory_array_error_address")?),
            unknown(r.dword(0x0F, "device_error_address")?),
            r.dword(0x13, "error_resolution")?,
        )
        .map(Self)
    }
}

impl Deref for MemoryError32 {
    type Target = MemoryErrorInformation;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// 64-bit Memory Error Information (Type 33)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryError64(pub MemoryErrorInformation);

impl MemoryError64 {
    /// Parse from a type 33 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let unknown = |v: u64| (v != 0x8000_0000_0000_0000).then_some(v);
        MemoryErrorInformation::parse_common(
            r,
            unknown(r.qword(0x0B, "memory_array_error_address")?),
            unknown(r.qword(0x13, "device_error_address")?),
            r.dword(0x1B, "error_resolution")?,
        )
        .map(Self)
    }
}

impl Deref for MemoryError64 {
    type Target = MemoryErrorInformation;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// =============================================================================
// MAPPED ADDRESSES (TYPES 19, 20)
// =============================================================================

/// Resolve a KiB range with its 64-bit byte-addressed extension
fn address_range(r: &FieldReader<'_>, start_kib: u32, end_kib: u32, extended_at: usize) -> (u64, u64) {
    if start_kib == 0xFFFF_FFFF {
        if let (Some(start), Some(end)) = (r.opt_qword(extended_at), r.opt_qword(extended_at + 8)) {
            return (start, end);
        }
    }
    (u64::from(start_kib) << 10, (u64::from(end_kib) << 10) | 0x3FF)
}

/// Memory Array Mapped Address (Type 19)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryArrayMappedAddress {
    /// First byte address of the range
    pub starting_address: u64,
    /// Last byte address of the range
    pub ending_address: u64,
    /// Handle of the physical memory array
    pub array_handle: u16,
    /// Number of memory devices forming a row
    pub partition_width: u8,
}

impl MemoryArrayMappedAddress {
    /// Parse from a type 19 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let (starting_address, ending_address) = address_range(
            r,
            r.dword(0x04, "starting_address")?,
            r.dword(0x08, "ending_address")?,
            0x0F,
        );
        Ok(Self {
            starting_address,
            ending_address,
            array_handle: r.word(0x0C, "memory_array_handle")?,
            partition_width: r.byte(0x0E, "partition_width")?,
        })
    }

    /// Size of the mapped range in bytes
    pub fn range_size(&self) -> u64 {
        self.ending_address.saturating_sub(self.starting_address).saturating_add(1)
    }
}

/// Memory Device Mapped Address (Type 20)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryDeviceMappedAddress {
    /// First byte address of the range
    pub starting_address: u64,
    /// Last byte address of the range
    pub ending_address: u64,
    /// Handle of the memory device
    pub device_handle: u16,
    /// Handle of the array mapped address record
    pub array_mapped_address_handle: u16,
    /// Partition row position, `None` if unknown
    pub partition_row_position: Option<u8>,
    /// Interleave position, `None` if unknown
    pub interleave_position: Option<u8>,
    /// Interleaved data depth, `None` if unknown
    pub interleaved_data_depth: Option<u8>,
}

impl MemoryDeviceMappedAddress {
    /// Parse from a type 20 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let known = |v: u8| (v != 0xFF).then_some(v);
        let (starting_address, ending_address) = address_range(
            r,
            r.dword(0x04, "starting_address")?,
            r.dword(0x08, "ending_address")?,
            0x13,
        );
        Ok(Self {
            starting_address,
            ending_address,
            device_handle: r.word(0x0C, "memory_device_handle")?,
            array_mapped_address_handle: r.word(0x0E, "memory_array_mapped_address_handle")?,
            partition_row_position: known(r.byte(0x10, "partition_row_position")?),
            interleave_position: known(r.byte(0x11, "interleave_position")?),
            interleaved_data_depth: known(r.byte(0x12, "interleaved_data_depth")?),
        })
    }
}

// =============================================================================
// MEMORY CHANNEL (TYPE 37)
// =============================================================================

dmi_enum! {
    /// Memory channel type
    pub enum MemoryChannelType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Rambus = 0x03 => "RamBus",
        SyncLink = 0x04 => "SyncLink",
    }
}

/// One device on a memory channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDevice {
    /// Load this device places on the channel
    pub load: u8,
    /// Handle of the memory device
    pub handle: u16,
}

/// Memory Channel (Type 37)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryChannel {
    /// Channel type
    pub channel_type: MemoryChannelType,
    /// Maximum load supported
    pub maximum_load: u8,
    /// Devices on the channel
    pub devices: Vec<ChannelDevice>,
}

impl MemoryChannel {
    /// Parse from a type 37 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let count = r.byte(0x06, "memory_device_count")? as usize;
        let devices = (0..count)
            .map(|i| {
                let offset = 0x07 + i * 3;
                Ok(ChannelDevice {
                    load: r.byte(offset, "memory_device_load")?,
                    handle: r.word(offset + 1, "memory_device_handle")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            channel_type: MemoryChannelType::from(r.byte(0x04, "channel_type")?),
            maximum_load: r.byte(0x05, "maximum_channel_load")?,
            devices,
        })
    }
}
