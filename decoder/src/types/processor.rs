//! Processor Information (Type 4) and Cache Information (Type 7)

use alloc::string::String;

use bitflags::bitflags;

use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};
use crate::types::handle_ref;

// =============================================================================
// PROCESSOR ENUMERATIONS
// =============================================================================

dmi_enum! {
    /// Processor type
    pub enum ProcessorType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        CentralProcessor = 0x03 => "Central Processor",
        MathProcessor = 0x04 => "Math Processor",
        DspProcessor = 0x05 => "DSP Processor",
        VideoProcessor = 0x06 => "Video Processor",
    }
}

dmi_enum! {
    /// Processor family (byte at 0x06, or word at 0x28 when the byte is 0xFE)
    pub enum ProcessorFamily: u16 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        I8086 = 0x03 => "8086",
        I80286 = 0x04 => "80286",
        I80386 = 0x05 => "80386",
        I80486 = 0x06 => "80486",
        I8087 = 0x07 => "8087",
        I80287 = 0x08 => "80287",
        I80387 = 0x09 => "80387",
        I80487 = 0x0A => "80487",
        Pentium = 0x0B => "Pentium",
        PentiumPro = 0x0C => "Pentium Pro",
        PentiumII = 0x0D => "Pentium II",
        PentiumMmx = 0x0E => "Pentium MMX",
        Celeron = 0x0F => "Celeron",
        PentiumIIXeon = 0x10 => "Pentium II Xeon",
        PentiumIII = 0x11 => "Pentium III",
        M1 = 0x12 => "M1",
        M2 = 0x13 => "M2",
        CeleronM = 0x14 => "Celeron M",
        Pentium4Ht = 0x15 => "Pentium 4 HT",
        AmdDuron = 0x18 => "Duron",
        K5 = 0x19 => "K5",
        K6 = 0x1A => "K6",
        K6_2 = 0x1B => "K6-2",
        K6_3 = 0x1C => "K6-3",
        Athlon = 0x1D => "Athlon",
        Amd29000 = 0x1E => "AMD29000",
        K6_2Plus = 0x1F => "K6-2+",
        PowerPc = 0x20 => "Power PC",
        Alpha = 0x30 => "Alpha",
        Mips = 0x40 => "MIPS",
        Sparc = 0x50 => "SPARC",
        M68040 = 0x60 => "68040",
        Hobbit = 0x70 => "Hobbit",
        Crusoe = 0x78 => "Crusoe TM5000",
        Weitek = 0x80 => "Weitek",
        ItaniumProcessor = 0x82 => "Itanium",
        Athlon64 = 0x83 => "Athlon 64",
        Opteron = 0x84 => "Opteron",
        Sempron = 0x85 => "Sempron",
        TurionMobile = 0x86 => "Turion 64",
        DualCoreOpteron = 0x87 => "Dual-Core Opteron",
        Athlon64X2 = 0x88 => "Athlon 64 X2",
        PaRisc = 0x90 => "PA-RISC",
        V30 = 0xA0 => "V30",
        QuadCoreXeon3200 = 0xA1 => "Quad-Core Xeon 3200",
        DualCoreXeon3000 = 0xA2 => "Dual-Core Xeon 3000",
        QuadCoreXeon5300 = 0xA3 => "Quad-Core Xeon 5300",
        DualCoreXeon5100 = 0xA4 => "Dual-Core Xeon 5100",
        DualCoreXeon5000 = 0xA5 => "Dual-Core Xeon 5000",
        Xeon = 0xB3 => "Xeon",
        Pentium4 = 0xB5 => "Pentium 4",
        PentiumM = 0xB9 => "Pentium M",
        Core2 = 0xBF => "Core 2 Duo",
        CoreSolo = 0xC0 => "Core Solo",
        Core2Extreme = 0xC1 => "Core 2 Extreme",
        Core2Quad = 0xC2 => "Core 2 Quad",
        CoreI7 = 0xC6 => "Core i7",
        DualCoreCeleron = 0xC7 => "Dual-Core Celeron",
        Ibm390 = 0xC8 => "IBM390",
        CoreI5 = 0xCD => "Core i5",
        CoreI3 = 0xCE => "Core i3",
        CoreI9 = 0xCF => "Core i9",
        ViaC7 = 0xD2 => "C7-M",
        MultiCoreXeon = 0xD6 => "Multi-Core Xeon",
        QuadCoreOpteron = 0xE6 => "Quad-Core Opteron",
        Phenom = 0xEC => "Phenom",
        Indicator = 0xFE => "Indicator (see Processor Family 2)",
        ArmV7 = 0x100 => "ARMv7",
        ArmV8 = 0x101 => "ARMv8",
        ArmV9 = 0x102 => "ARMv9",
        Sh3 = 0x104 => "SH-3",
        Sh4 = 0x105 => "SH-4",
        Arm = 0x118 => "ARM",
        StrongArm = 0x119 => "StrongARM",
        Cyrix6x86 = 0x12C => "6x86",
        MediaGx = 0x12D => "MediaGX",
        Mii = 0x12E => "MII",
        WinChip = 0x140 => "WinChip",
        Dsp = 0x15E => "DSP",
        VideoProcessor = 0x1F4 => "Video Processor",
        RiscVRv32 = 0x200 => "RISC-V RV32",
        RiscVRv64 = 0x201 => "RISC-V RV64",
        RiscVRv128 = 0x202 => "RISC-V RV128",
        LoongArch = 0x258 => "LoongArch",
    }
}

dmi_enum! {
    /// CPU status (bits 2:0 of the status byte)
    pub enum CpuStatus: u8 {
        Unknown = 0 => "Unknown",
        Enabled = 1 => "Enabled",
        DisabledByUser = 2 => "Disabled By User",
        DisabledByBios = 3 => "Disabled By BIOS",
        Idle = 4 => "Idle",
        Other = 7 => "Other",
    }
}

dmi_enum! {
    /// Processor upgrade (socket)
    pub enum ProcessorUpgrade: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        DaughterBoard = 0x03 => "Daughter Board",
        ZifSocket = 0x04 => "ZIF Socket",
        PiggyBack = 0x05 => "Replaceable Piggy Back",
        None = 0x06 => "None",
        LifSocket = 0x07 => "LIF Socket",
        Slot1 = 0x08 => "Slot 1",
        Slot2 = 0x09 => "Slot 2",
        Socket370 = 0x0A => "370-pin Socket",
        SlotA = 0x0B => "Slot A",
        SlotM = 0x0C => "Slot M",
        Socket423 = 0x0D => "Socket 423",
        SocketA = 0x0E => "Socket A (Socket 462)",
        Socket478 = 0x0F => "Socket 478",
        Socket754 = 0x10 => "Socket 754",
        Socket940 = 0x11 => "Socket 940",
        Socket939 = 0x12 => "Socket 939",
        SocketMpga604 = 0x13 => "Socket mPGA604",
        SocketLga771 = 0x14 => "Socket LGA771",
        SocketLga775 = 0x15 => "Socket LGA775",
        SocketS1 = 0x16 => "Socket S1",
        SocketAm2 = 0x17 => "Socket AM2",
        SocketF = 0x18 => "Socket F (1207)",
        SocketLga1366 = 0x19 => "Socket LGA1366",
        SocketG34 = 0x1A => "Socket G34",
        SocketAm3 = 0x1B => "Socket AM3",
        SocketC32 = 0x1C => "Socket C32",
        SocketLga1156 = 0x1D => "Socket LGA1156",
        SocketLga1567 = 0x1E => "Socket LGA1567",
        SocketPga988a = 0x1F => "Socket PGA988A",
        SocketBga1288 = 0x20 => "Socket BGA1288",
        SocketRpga988b = 0x21 => "Socket rPGA988B",
        SocketBga1023 = 0x22 => "Socket BGA1023",
        SocketBga1224 = 0x23 => "Socket BGA1224",
        SocketLga1155 = 0x24 => "Socket LGA1155",
        SocketLga1356 = 0x25 => "Socket LGA1356",
        SocketLga2011 = 0x26 => "Socket LGA2011",
        SocketFs1 = 0x27 => "Socket FS1",
        SocketFs2 = 0x28 => "Socket FS2",
        SocketFm1 = 0x29 => "Socket FM1",
        SocketFm2 = 0x2A => "Socket FM2",
        SocketLga2011_3 = 0x2B => "Socket LGA2011-3",
        SocketLga1356_3 = 0x2C => "Socket LGA1356-3",
        SocketLga1150 = 0x2D => "Socket LGA1150",
        SocketBga1168 = 0x2E => "Socket BGA1168",
        SocketBga1234 = 0x2F => "Socket BGA1234",
        SocketBga1364 = 0x30 => "Socket BGA1364",
        SocketAm4 = 0x31 => "Socket AM4",
        SocketLga1151 = 0x32 => "Socket LGA1151",
        SocketBga1356 = 0x33 => "Socket BGA1356",
        SocketBga1440 = 0x34 => "Socket BGA1440",
        SocketBga1515 = 0x35 => "Socket BGA1515",
        SocketLga3647_1 = 0x36 => "Socket LGA3647-1",
        SocketSp3 = 0x37 => "Socket SP3",
        SocketSp3r2 = 0x38 => "Socket SP3r2",
        SocketLga2066 = 0x39 => "Socket LGA2066",
        SocketBga1392 = 0x3A => "Socket BGA1392",
        SocketBga1510 = 0x3B => "Socket BGA1510",
        SocketBga1528 = 0x3C => "Socket BGA1528",
        SocketLga4189 = 0x3D => "Socket LGA4189",
        SocketLga1200 = 0x3E => "Socket LGA1200",
        SocketLga4677 = 0x3F => "Socket LGA4677",
        SocketLga1700 = 0x40 => "Socket LGA1700",
        SocketBga1744 = 0x41 => "Socket BGA1744",
        SocketBga1781 = 0x42 => "Socket BGA1781",
        SocketBga1211 = 0x43 => "Socket BGA1211",
        SocketBga2422 = 0x44 => "Socket BGA2422",
        SocketLga1211 = 0x45 => "Socket LGA1211",
        SocketLga2422 = 0x46 => "Socket LGA2422",
        SocketLga5773 = 0x47 => "Socket LGA5773",
        SocketBga5773 = 0x48 => "Socket BGA5773",
    }
}

bitflags! {
    /// Processor characteristics (offset 0x26)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ProcessorCharacteristics: u16 {
        /// Unknown
        const UNKNOWN = 1 << 1;
        /// 64-bit capable
        const CAPABLE_64BIT = 1 << 2;
        /// Multi-core
        const MULTI_CORE = 1 << 3;
        /// Hardware thread
        const HARDWARE_THREAD = 1 << 4;
        /// Execute protection
        const EXECUTE_PROTECTION = 1 << 5;
        /// Enhanced virtualization
        const ENHANCED_VIRTUALIZATION = 1 << 6;
        /// Power/performance control
        const POWER_PERFORMANCE_CONTROL = 1 << 7;
        /// 128-bit capable
        const CAPABLE_128BIT = 1 << 8;
        /// Arm64 SoC ID
        const ARM64_SOC_ID = 1 << 9;
    }
}

/// Processor voltage (offset 0x11)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorVoltage {
    /// Current voltage, in tenths of a volt (bit 7 set)
    Current(u8),
    /// Legacy mode: supported voltages (bit 7 clear)
    Legacy {
        /// 5V
        five_volt: bool,
        /// 3.3V
        three_point_three: bool,
        /// 2.9V
        two_point_nine: bool,
    },
}

impl ProcessorVoltage {
    /// Decode the voltage byte
    pub fn from_raw(raw: u8) -> Self {
        if raw & 0x80 != 0 {
            Self::Current(raw & 0x7F)
        } else {
            Self::Legacy {
                five_volt: raw & 0x01 != 0,
                three_point_three: raw & 0x02 != 0,
                two_point_nine: raw & 0x04 != 0,
            }
        }
    }

    /// Current voltage in millivolts, if reported in current mode
    pub fn millivolts(&self) -> Option<u32> {
        match self {
            Self::Current(tenths) => Some(u32::from(*tenths) * 100),
            Self::Legacy { .. } => None,
        }
    }
}

// =============================================================================
// PROCESSOR INFORMATION (TYPE 4)
// =============================================================================

/// Processor Information (Type 4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorInformation {
    /// Socket designation
    pub socket_designation: String,
    /// Processor type
    pub processor_type: ProcessorType,
    /// Family, resolved through Processor Family 2 when needed
    pub family: ProcessorFamily,
    /// Manufacturer
    pub manufacturer: String,
    /// Processor ID (CPUID signature and feature flags on x86)
    pub processor_id: u64,
    /// Version
    pub version: String,
    /// Voltage
    pub voltage: ProcessorVoltage,
    /// External clock in MHz, `None` if unknown
    pub external_clock: Option<u16>,
    /// Maximum speed in MHz, `None` if unknown
    pub max_speed: Option<u16>,
    /// Current speed in MHz, `None` if unknown
    pub current_speed: Option<u16>,
    /// Socket populated (bit 6 of status)
    pub socket_populated: bool,
    /// CPU status
    pub cpu_status: CpuStatus,
    /// Processor upgrade
    pub upgrade: ProcessorUpgrade,
    /// L1 cache handle (2.1+), `None` when absent or 0xFFFF
    pub l1_cache_handle: Option<u16>,
    /// L2 cache handle (2.1+), `None` when absent or 0xFFFF
    pub l2_cache_handle: Option<u16>,
    /// L3 cache handle (2.1+), `None` when absent or 0xFFFF
    pub l3_cache_handle: Option<u16>,
    /// Serial number (2.3+)
    pub serial_number: Option<String>,
    /// Asset tag (2.3+)
    pub asset_tag: Option<String>,
    /// Part number (2.3+)
    pub part_number: Option<String>,
    /// Core count (2.5+)
    pub core_count: Option<u16>,
    /// Enabled cores (2.5+)
    pub core_enabled: Option<u16>,
    /// Thread count (2.5+)
    pub thread_count: Option<u16>,
    /// Characteristics (2.5+)
    pub characteristics: Option<ProcessorCharacteristics>,
    /// Enabled threads (3.6+)
    pub thread_enabled: Option<u16>,
}

/// Resolve a count byte that defers to its word form at 0xFF
fn count_field(r: &FieldReader<'_>, byte_offset: usize, word_offset: usize) -> Option<u16> {
    match (r.opt_byte(byte_offset)?, r.opt_word(word_offset)) {
        (0xFF, Some(wide)) => Some(wide),
        (0, _) => None,
        (narrow, _) => Some(u16::from(narrow)),
    }
}

impl ProcessorInformation {
    /// Parse from a type 4 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let family = match (r.byte(0x06, "processor_family")?, r.opt_word(0x28)) {
            (0xFE, Some(family2)) => ProcessorFamily::from(family2),
            (family, _) => ProcessorFamily::from(u16::from(family)),
        };
        let status = r.byte(0x18, "status")?;
        let speed = |v: u16| (v != 0).then_some(v);

        Ok(Self {
            socket_designation: r.string(0x04, "socket_designation")?,
            processor_type: ProcessorType::from(r.byte(0x05, "processor_type")?),
            family,
            manufacturer: r.string(0x07, "manufacturer")?,
            processor_id: r.qword(0x08, "processor_id")?,
            version: r.string(0x10, "version")?,
            voltage: ProcessorVoltage::from_raw(r.byte(0x11, "voltage")?),
            external_clock: speed(r.word(0x12, "external_clock")?),
            max_speed: speed(r.word(0x14, "max_speed")?),
            current_speed: speed(r.word(0x16, "current_speed")?),
            socket_populated: status & 0x40 != 0,
            cpu_status: CpuStatus::from(status & 0x07),
            upgrade: ProcessorUpgrade::from(r.byte(0x19, "upgrade")?),
            l1_cache_handle: r.opt_word(0x1A).and_then(handle_ref),
            l2_cache_handle: r.opt_word(0x1C).and_then(handle_ref),
            l3_cache_handle: r.opt_word(0x1E).and_then(handle_ref),
            serial_number: r.opt_string(0x20, "serial_number")?,
            asset_tag: r.opt_string(0x21, "asset_tag")?,
            part_number: r.opt_string(0x22, "part_number")?,
            core_count: count_field(r, 0x23, 0x2A),
            core_enabled: count_field(r, 0x24, 0x2C),
            thread_count: count_field(r, 0x25, 0x2E),
            characteristics: r.opt_word(0x26).map(ProcessorCharacteristics::from_bits_retain),
            thread_enabled: r.opt_word(0x30),
        })
    }
}

// =============================================================================
// CACHE INFORMATION (TYPE 7)
// =============================================================================

dmi_enum! {
    /// Cache location (bits 6:5 of the configuration word)
    pub enum CacheLocation: u8 {
        Internal = 0 => "Internal",
        External = 1 => "External",
        Reserved = 2 => "Reserved",
        Unknown = 3 => "Unknown",
    }
}

dmi_enum! {
    /// Cache operational mode (bits 9:8 of the configuration word)
    pub enum CacheMode: u8 {
        WriteThrough = 0 => "Write Through",
        WriteBack = 1 => "Write Back",
        VariesWithAddress = 2 => "Varies With Memory Address",
        Unknown = 3 => "Unknown",
    }
}

dmi_enum! {
    /// Cache error correction type
    pub enum CacheErrorCorrection: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        None = 0x03 => "None",
        Parity = 0x04 => "Parity",
        SingleBitEcc = 0x05 => "Single-bit ECC",
        MultiBitEcc = 0x06 => "Multi-bit ECC",
    }
}

dmi_enum! {
    /// System cache type
    pub enum SystemCacheType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Instruction = 0x03 => "Instruction",
        Data = 0x04 => "Data",
        Unified = 0x05 => "Unified",
    }
}

dmi_enum! {
    /// Cache associativity
    pub enum CacheAssociativity: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        DirectMapped = 0x03 => "Direct Mapped",
        TwoWay = 0x04 => "2-way Set-associative",
        FourWay = 0x05 => "4-way Set-associative",
        FullyAssociative = 0x06 => "Fully Associative",
        EightWay = 0x07 => "8-way Set-associative",
        SixteenWay = 0x08 => "16-way Set-associative",
        TwelveWay = 0x09 => "12-way Set-associative",
        TwentyFourWay = 0x0A => "24-way Set-associative",
        ThirtyTwoWay = 0x0B => "32-way Set-associative",
        FortyEightWay = 0x0C => "48-way Set-associative",
        SixtyFourWay = 0x0D => "64-way Set-associative",
        TwentyWay = 0x0E => "20-way Set-associative",
    }
}

bitflags! {
    /// SRAM types
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SramType: u16 {
        /// Other
        const OTHER = 1 << 0;
        /// Unknown
        const UNKNOWN = 1 << 1;
        /// Non-burst
        const NON_BURST = 1 << 2;
        /// Burst
        const BURST = 1 << 3;
        /// Pipeline burst
        const PIPELINE_BURST = 1 << 4;
        /// Synchronous
        const SYNCHRONOUS = 1 << 5;
        /// Asynchronous
        const ASYNCHRONOUS = 1 << 6;
    }
}

/// Unpacked cache configuration word (offset 0x05)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfiguration {
    /// Cache level, 1-8
    pub level: u8,
    /// Socketed
    pub socketed: bool,
    /// Location relative to the CPU
    pub location: CacheLocation,
    /// Enabled at boot
    pub enabled: bool,
    /// Operational mode
    pub mode: CacheMode,
}

impl CacheConfiguration {
    /// Unpack the configuration word
    pub fn from_raw(raw: u16) -> Self {
        Self {
            level: (raw & 0x07) as u8 + 1,
            socketed: raw & 0x08 != 0,
            location: CacheLocation::from(((raw >> 5) & 0x03) as u8),
            enabled: raw & 0x80 != 0,
            mode: CacheMode::from(((raw >> 8) & 0x03) as u8),
        }
    }

    /// Pack back into the configuration word
    pub fn to_raw(&self) -> u16 {
        let level = u16::from(self.level.saturating_sub(1) & 0x07);
        let location = u16::from(self.location.raw() & 0x03);
        let mode = u16::from(self.mode.raw() & 0x03);
        level
            | (u16::from(self.socketed) << 3)
            | (location << 5)
            | (u16::from(self.enabled) << 7)
            | (mode << 8)
    }
}

/// Cache size in KiB from the 16-bit form (bit 15: 64 KiB granularity)
fn cache_size_kib(raw: u16) -> u64 {
    let value = u64::from(raw & 0x7FFF);
    if raw & 0x8000 != 0 {
        value * 64
    } else {
        value
    }
}

/// Cache size in KiB from the 32-bit form (bit 31: 64 KiB granularity)
fn cache_size2_kib(raw: u32) -> u64 {
    let value = u64::from(raw & 0x7FFF_FFFF);
    if raw & 0x8000_0000 != 0 {
        value * 64
    } else {
        value
    }
}

/// Cache Information (Type 7)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInformation {
    /// Socket designation
    pub socket_designation: String,
    /// Configuration
    pub configuration: CacheConfiguration,
    /// Maximum installable size in KiB
    pub maximum_size_kib: u64,
    /// Installed size in KiB
    pub installed_size_kib: u64,
    /// Supported SRAM types
    pub supported_sram_type: SramType,
    /// Current SRAM type
    pub current_sram_type: SramType,
    /// Speed in nanoseconds (2.1+)
    pub speed_ns: Option<u8>,
    /// Error correction type (2.1+)
    pub error_correction: Option<CacheErrorCorrection>,
    /// System cache type (2.1+)
    pub system_cache_type: Option<SystemCacheType>,
    /// Associativity (2.1+)
    pub associativity: Option<CacheAssociativity>,
}

impl CacheInformation {
    /// Parse from a type 7 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let max_size = r.word(0x07, "maximum_cache_size")?;
        let installed_size = r.word(0x09, "installed_size")?;

        // 3.1 sizes take over when the 16-bit field saturates
        let maximum_size_kib = match (max_size, r.opt_dword(0x13)) {
            (0xFFFF, Some(size2)) => cache_size2_kib(size2),
            (size, _) => cache_size_kib(size),
        };
        let installed_size_kib = match (installed_size, r.opt_dword(0x17)) {
            (0xFFFF, Some(size2)) => cache_size2_kib(size2),
            (size, _) => cache_size_kib(size),
        };

        Ok(Self {
            socket_designation: r.string(0x04, "socket_designation")?,
            configuration: CacheConfiguration::from_raw(r.word(0x05, "cache_configuration")?),
            maximum_size_kib,
            installed_size_kib,
            supported_sram_type: SramType::from_bits_retain(r.word(0x0B, "supported_sram_type")?),
            current_sram_type: SramType::from_bits_retain(r.word(0x0D, "current_sram_type")?),
            speed_ns: r.opt_byte(0x0F).filter(|&ns| ns != 0),
            error_correction: r.opt_byte(0x10).map(CacheErrorCorrection::from),
            system_cache_type: r.opt_byte(0x11).map(SystemCacheType::from),
            associativity: r.opt_byte(0x12).map(CacheAssociativity::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SmbiosVersion;
    use crate::types::tests::decode_one;
    use alloc::vec;
    use alloc::vec::Vec;

    fn processor_body() -> Vec<u8> {
        let mut body = vec![1, 0x03, 0xFE, 2];
        body.extend_from_slice(&0x178B_FBFF_0080_0F82u64.to_le_bytes());
        body.push(3);
        body.push(0x8B);
        body.extend_from_slice(&100u16.to_le_bytes());
        body.extend_from_slice(&4_700u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.push(0x41);
        body.push(0x31);
        body.extend_from_slice(&[0x07, 0x00, 0x08, 0x00, 0xFF, 0xFF]);
        body.extend_from_slice(&[0, 0, 4]);
        body.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        body.extend_from_slice(&0x00FCu16.to_le_bytes());
        body.extend_from_slice(&0x006Bu16.to_le_bytes());
        body.extend_from_slice(&96u16.to_le_bytes());
        body.extend_from_slice(&96u16.to_le_bytes());
        body.extend_from_slice(&192u16.to_le_bytes());
        body
    }

    #[test]
    fn test_processor_v30() {
        let strings = ["CPU0", "AuthenticAMD", "EPYC", "PN-1"];
        let decoded = decode_one(&processor_body(), 4, &strings, SmbiosVersion::new(3, 0)).unwrap();
        let cpu = decoded.as_structure::<ProcessorInformation>().unwrap();

        assert_eq!(cpu.socket_designation, "CPU0");
        assert_eq!(cpu.processor_type, ProcessorType::CentralProcessor);
        assert_eq!(cpu.family, ProcessorFamily::from(0x6Bu16));
        assert_eq!(cpu.voltage, ProcessorVoltage::Current(11));
        assert_eq!(cpu.voltage.millivolts(), Some(1_100));
        assert_eq!(cpu.external_clock, Some(100));
        assert_eq!(cpu.current_speed, None);
        assert!(cpu.socket_populated);
        assert_eq!(cpu.cpu_status, CpuStatus::Enabled);
        assert_eq!(cpu.upgrade, ProcessorUpgrade::SocketAm4);
        assert_eq!(cpu.l1_cache_handle, Some(0x0007));
        assert_eq!(cpu.l2_cache_handle, Some(0x0008));
        // 0xFFFF: no cache at this level
        assert_eq!(cpu.l3_cache_handle, None);
        assert_eq!(cpu.part_number.as_deref(), Some("PN-1"));
        assert_eq!(cpu.core_count, Some(96));
        assert_eq!(cpu.thread_count, Some(192));
        let chars = cpu.characteristics.unwrap();
        assert!(chars.contains(ProcessorCharacteristics::CAPABLE_64BIT | ProcessorCharacteristics::MULTI_CORE));
        assert_eq!(cpu.thread_enabled, None);
    }

    #[test]
    fn test_processor_v20() {
        let mut body = processor_body();
        body.truncate(0x1A - 4);
        body[2] = 0xB3;
        let decoded = decode_one(&body, 4, &["CPU0", "Intel", "Xeon"], SmbiosVersion::new(2, 0)).unwrap();
        let cpu = decoded.as_structure::<ProcessorInformation>().unwrap();
        assert_eq!(cpu.family, ProcessorFamily::Xeon);
        assert_eq!(cpu.l1_cache_handle, None);
        assert_eq!(cpu.serial_number, None);
        assert_eq!(cpu.core_count, None);
    }

    #[test]
    fn test_legacy_voltage() {
        assert_eq!(
            ProcessorVoltage::from_raw(0x03),
            ProcessorVoltage::Legacy { five_volt: true, three_point_three: true, two_point_nine: false }
        );
        assert_eq!(ProcessorVoltage::from_raw(0x02).millivolts(), None);
    }

    #[test]
    fn test_cache_configuration_packing() {
        let config = CacheConfiguration {
            level: 3,
            socketed: true,
            location: CacheLocation::External,
            enabled: true,
            mode: CacheMode::VariesWithAddress,
        };
        let raw = config.to_raw();
        assert_eq!(raw, 0x0002 | 0x0008 | (1 << 5) | 0x0080 | (2 << 8));
        assert_eq!(CacheConfiguration::from_raw(raw), config);

        for raw in [0x0180u16, 0x0001, 0x0281, 0x036F] {
            assert_eq!(CacheConfiguration::from_raw(raw).to_raw(), raw);
        }
    }

    #[test]
    fn test_cache_information() {
        let mut body = vec![1];
        body.extend_from_slice(&0x0181u16.to_le_bytes());
        body.extend_from_slice(&0x8010u16.to_le_bytes());
        body.extend_from_slice(&0xFFFFu16.to_le_bytes());
        body.extend_from_slice(&0x0020u16.to_le_bytes());
        body.extend_from_slice(&0x0020u16.to_le_bytes());
        body.extend_from_slice(&[0, 0x05, 0x05, 0x08]);
        body.extend_from_slice(&0x8000_0010u32.to_le_bytes());
        body.extend_from_slice(&0x8000_0200u32.to_le_bytes());
        let decoded = decode_one(&body, 7, &["L2 Cache"], SmbiosVersion::new(3, 1)).unwrap();
        let cache = decoded.as_structure::<CacheInformation>().unwrap();

        assert_eq!(cache.configuration.level, 2);
        assert!(cache.configuration.enabled);
        assert_eq!(cache.configuration.mode, CacheMode::WriteBack);
        assert_eq!(cache.maximum_size_kib, 1024);
        assert_eq!(cache.installed_size_kib, 0x200 * 64);
        assert!(cache.current_sram_type.contains(SramType::SYNCHRONOUS));
        assert_eq!(cache.speed_ns, None);
        assert_eq!(cache.error_correction, Some(CacheErrorCorrection::SingleBitEcc));
        assert_eq!(cache.system_cache_type, Some(SystemCacheType::Unified));
        assert_eq!(cache.associativity, Some(CacheAssociativity::SixteenWay));
    }
}
