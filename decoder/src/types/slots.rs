//! Port Connector (Type 8) and System Slots (Type 9)

use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};
use crate::types::PciAddress;

// =============================================================================
// PORT CONNECTOR INFORMATION (TYPE 8)
// =============================================================================

dmi_enum! {
    /// Connector type
    pub enum ConnectorType: u8 {
        None = 0x00 => "None",
        Centronics = 0x01 => "Centronics",
        MiniCentronics = 0x02 => "Mini Centronics",
        Proprietary = 0x03 => "Proprietary",
        Db25Male = 0x04 => "DB-25 male",
        Db25Female = 0x05 => "DB-25 female",
        Db15Male = 0x06 => "DB-15 male",
        Db15Female = 0x07 => "DB-15 female",
        Db9Male = 0x08 => "DB-9 male",
        Db9Female = 0x09 => "DB-9 female",
        Rj11 = 0x0A => "RJ-11",
        Rj45 = 0x0B => "RJ-45",
        MiniScsi50 = 0x0C => "50 Pin MiniSCSI",
        MiniDin = 0x0D => "Mini DIN",
        MicroDin = 0x0E => "Micro DIN",
        Ps2 = 0x0F => "PS/2",
        Infrared = 0x10 => "Infrared",
        HpHil = 0x11 => "HP-HIL",
        AccessBus = 0x12 => "Access Bus (USB)",
        SsaScsi = 0x13 => "SSA SCSI",
        CircularDin8Male = 0x14 => "Circular DIN-8 male",
        CircularDin8Female = 0x15 => "Circular DIN-8 female",
        OnBoardIde = 0x16 => "On Board IDE",
        OnBoardFloppy = 0x17 => "On Board Floppy",
        DualInline9 = 0x18 => "9 Pin Dual Inline (pin 10 cut)",
        DualInline25 = 0x19 => "25 Pin Dual Inline (pin 26 cut)",
        DualInline50 = 0x1A => "50 Pin Dual Inline",
        DualInline68 = 0x1B => "68 Pin Dual Inline",
        OnBoardSoundInput = 0x1C => "On Board Sound Input From CD-ROM",
        MiniCentronicsType14 = 0x1D => "Mini Centronics Type-14",
        MiniCentronicsType26 = 0x1E => "Mini Centronics Type-26",
        MiniJack = 0x1F => "Mini Jack (headphones)",
        Bnc = 0x20 => "BNC",
        Ieee1394 = 0x21 => "IEEE 1394",
        SasSataPlug = 0x22 => "SAS/SATA Plug Receptacle",
        UsbTypeC = 0x23 => "USB Type-C Receptacle",
        Pc98 = 0xA0 => "PC-98",
        Pc98Hireso = 0xA1 => "PC-98Hireso",
        PcH98 = 0xA2 => "PC-H98",
        Pc98Note = 0xA3 => "PC-98Note",
        Pc98Full = 0xA4 => "PC-98Full",
        Other = 0xFF => "Other",
    }
}

dmi_enum! {
    /// Port type
    pub enum PortType: u8 {
        None = 0x00 => "None",
        ParallelXtAt = 0x01 => "Parallel Port XT/AT Compatible",
        ParallelPs2 = 0x02 => "Parallel Port PS/2",
        ParallelEcp = 0x03 => "Parallel Port ECP",
        ParallelEpp = 0x04 => "Parallel Port EPP",
        ParallelEcpEpp = 0x05 => "Parallel Port ECP/EPP",
        SerialXtAt = 0x06 => "Serial Port XT/AT Compatible",
        Serial16450 = 0x07 => "Serial Port 16450 Compatible",
        Serial16550 = 0x08 => "Serial Port 16550 Compatible",
        Serial16550A = 0x09 => "Serial Port 16550A Compatible",
        Scsi = 0x0A => "SCSI Port",
        Midi = 0x0B => "MIDI Port",
        Joystick = 0x0C => "Joystick Port",
        Keyboard = 0x0D => "Keyboard Port",
        Mouse = 0x0E => "Mouse Port",
        SsaScsi = 0x0F => "SSA SCSI",
        Usb = 0x10 => "USB",
        FireWire = 0x11 => "Firewire (IEEE P1394)",
        PcmciaTypeI = 0x12 => "PCMCIA Type I",
        PcmciaTypeII = 0x13 => "PCMCIA Type II",
        PcmciaTypeIII = 0x14 => "PCMCIA Type III",
        CardBus = 0x15 => "Cardbus",
        AccessBus = 0x16 => "Access Bus Port",
        ScsiII = 0x17 => "SCSI II",
        ScsiWide = 0x18 => "SCSI Wide",
        Pc98 = 0x19 => "PC-98",
        Pc98Hireso = 0x1A => "PC-98-Hireso",
        PcH98 = 0x1B => "PC-H98",
        Video = 0x1C => "Video Port",
        Audio = 0x1D => "Audio Port",
        Modem = 0x1E => "Modem Port",
        Network = 0x1F => "Network Port",
        Sata = 0x20 => "SATA",
        Sas = 0x21 => "SAS",
        Mfdp = 0x22 => "MFDP (Multi-Function Display Port)",
        Thunderbolt = 0x23 => "Thunderbolt",
        I8251 = 0xA0 => "8251 Compatible",
        I8251Fifo = 0xA1 => "8251 FIFO Compatible",
        Other = 0xFF => "Other",
    }
}

/// Port Connector Information (Type 8)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConnector {
    /// Internal reference designator
    pub internal_reference: String,
    /// Internal connector type
    pub internal_connector: ConnectorType,
    /// External reference designator
    pub external_reference: String,
    /// External connector type
    pub external_connector: ConnectorType,
    /// Port type
    pub port_type: PortType,
}

impl PortConnector {
    /// Parse from a type 8 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            internal_reference: r.string(0x04, "internal_reference_designator")?,
            internal_connector: ConnectorType::from(r.byte(0x05, "internal_connector_type")?),
            external_reference: r.string(0x06, "external_reference_designator")?,
            external_connector: ConnectorType::from(r.byte(0x07, "external_connector_type")?),
            port_type: PortType::from(r.byte(0x08, "port_type")?),
        })
    }
}

// =============================================================================
// SYSTEM SLOTS (TYPE 9)
// =============================================================================

dmi_enum! {
    /// Slot type
    pub enum SlotType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Isa = 0x03 => "ISA",
        Mca = 0x04 => "MCA",
        Eisa = 0x05 => "EISA",
        Pci = 0x06 => "PCI",
        PcCard = 0x07 => "PC Card (PCMCIA)",
        VlVesa = 0x08 => "VL-VESA",
        Proprietary = 0x09 => "Proprietary",
        ProcessorCard = 0x0A => "Processor Card Slot",
        ProprietaryMemoryCard = 0x0B => "Proprietary Memory Card Slot",
        IoRiserCard = 0x0C => "I/O Riser Card Slot",
        NuBus = 0x0D => "NuBus",
        Pci66 = 0x0E => "PCI-66MHz Capable",
        Agp = 0x0F => "AGP",
        Agp2x = 0x10 => "AGP 2X",
        Agp4x = 0x11 => "AGP 4X",
        PciX = 0x12 => "PCI-X",
        Agp8x = 0x13 => "AGP 8X",
        M2Socket1Dp = 0x14 => "M.2 Socket 1-DP (Mechanical Key A)",
        M2Socket1Sd = 0x15 => "M.2 Socket 1-SD (Mechanical Key E)",
        M2Socket2 = 0x16 => "M.2 Socket 2 (Mechanical Key B)",
        M2Socket3 = 0x17 => "M.2 Socket 3 (Mechanical Key M)",
        MxmTypeI = 0x18 => "MXM Type I",
        MxmTypeII = 0x19 => "MXM Type II",
        MxmTypeIIIStandard = 0x1A => "MXM Type III (standard connector)",
        MxmTypeIIIHe = 0x1B => "MXM Type III (HE connector)",
        MxmTypeIV = 0x1C => "MXM Type IV",
        Mxm30TypeA = 0x1D => "MXM 3.0 Type A",
        Mxm30TypeB = 0x1E => "MXM 3.0 Type B",
        PciExpressGen2Sff8639 = 0x1F => "PCI Express Gen 2 SFF-8639 (U.2)",
        PciExpressGen3Sff8639 = 0x20 => "PCI Express Gen 3 SFF-8639 (U.2)",
        PciExpressMini52Bottom = 0x21 => "PCI Express Mini 52-pin with bottom-side keep-outs",
        PciExpressMini52 = 0x22 => "PCI Express Mini 52-pin without bottom-side keep-outs",
        PciExpressMini76 = 0x23 => "PCI Express Mini 76-pin",
        PciExpressGen4Sff8639 = 0x24 => "PCI Express Gen 4 SFF-8639 (U.2)",
        PciExpressGen5Sff8639 = 0x25 => "PCI Express Gen 5 SFF-8639 (U.2)",
        OcpNic30Small = 0x26 => "OCP NIC 3.0 Small Form Factor (SFF)",
        OcpNic30Large = 0x27 => "OCP NIC 3.0 Large Form Factor (LFF)",
        OcpNicPrior = 0x28 => "OCP NIC Prior to 3.0",
        CxlFlexbus10 = 0x30 => "CXL Flexbus 1.0",
        Pc98C20 = 0xA0 => "PC-98/C20",
        Pc98C24 = 0xA1 => "PC-98/C24",
        Pc98E = 0xA2 => "PC-98/E",
        Pc98LocalBus = 0xA3 => "PC-98/Local Bus",
        Pc98Card = 0xA4 => "PC-98/Card",
        PciExpress = 0xA5 => "PCI Express",
        PciExpressX1 = 0xA6 => "PCI Express x1",
        PciExpressX2 = 0xA7 => "PCI Express x2",
        PciExpressX4 = 0xA8 => "PCI Express x4",
        PciExpressX8 = 0xA9 => "PCI Express x8",
        PciExpressX16 = 0xAA => "PCI Express x16",
        PciExpressGen2 = 0xAB => "PCI Express 2",
        PciExpressGen2X1 = 0xAC => "PCI Express 2 x1",
        PciExpressGen2X2 = 0xAD => "PCI Express 2 x2",
        PciExpressGen2X4 = 0xAE => "PCI Express 2 x4",
        PciExpressGen2X8 = 0xAF => "PCI Express 2 x8",
        PciExpressGen2X16 = 0xB0 => "PCI Express 2 x16",
        PciExpressGen3 = 0xB1 => "PCI Express 3",
        PciExpressGen3X1 = 0xB2 => "PCI Express 3 x1",
        PciExpressGen3X2 = 0xB3 => "PCI Express 3 x2",
        PciExpressGen3X4 = 0xB4 => "PCI Express 3 x4",
        PciExpressGen3X8 = 0xB5 => "PCI Express 3 x8",
        PciExpressGen3X16 = 0xB6 => "PCI Express 3 x16",
        PciExpressGen4 = 0xB8 => "PCI Express 4",
        PciExpressGen4X1 = 0xB9 => "PCI Express 4 x1",
        PciExpressGen4X2 = 0xBA => "PCI Express 4 x2",
        PciExpressGen4X4 = 0xBB => "PCI Express 4 x4",
        PciExpressGen4X8 = 0xBC => "PCI Express 4 x8",
        PciExpressGen4X16 = 0xBD => "PCI Express 4 x16",
        PciExpressGen5 = 0xBE => "PCI Express 5",
        PciExpressGen5X1 = 0xBF => "PCI Express 5 x1",
        PciExpressGen5X2 = 0xC0 => "PCI Express 5 x2",
        PciExpressGen5X4 = 0xC1 => "PCI Express 5 x4",
        PciExpressGen5X8 = 0xC2 => "PCI Express 5 x8",
        PciExpressGen5X16 = 0xC3 => "PCI Express 5 x16",
        PciExpressGen6 = 0xC4 => "PCI Express 6 and Beyond",
        EnterpriseFormFactor = 0xC5 => "Enterprise and Datacenter 1U E1 Form Factor Slot",
        EnterpriseFormFactor3 = 0xC6 => "Enterprise and Datacenter 3\" E3 Form Factor Slot",
    }
}

dmi_enum! {
    /// Slot data bus width
    pub enum SlotWidth: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Bit8 = 0x03 => "8-bit",
        Bit16 = 0x04 => "16-bit",
        Bit32 = 0x05 => "32-bit",
        Bit64 = 0x06 => "64-bit",
        Bit128 = 0x07 => "128-bit",
        X1 = 0x08 => "x1",
        X2 = 0x09 => "x2",
        X4 = 0x0A => "x4",
        X8 = 0x0B => "x8",
        X12 = 0x0C => "x12",
        X16 = 0x0D => "x16",
        X32 = 0x0E => "x32",
    }
}

dmi_enum! {
    /// Current slot usage
    pub enum SlotUsage: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Available = 0x03 => "Available",
        InUse = 0x04 => "In Use",
        Unavailable = 0x05 => "Unavailable",
    }
}

dmi_enum! {
    /// Slot length
    pub enum SlotLength: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Short = 0x03 => "Short Length",
        Long = 0x04 => "Long Length",
        DriveFormFactor25 = 0x05 => "2.5\" drive form factor",
        DriveFormFactor35 = 0x06 => "3.5\" drive form factor",
    }
}

bitflags! {
    /// Slot characteristics 1 (offset 0x0B)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SlotCharacteristics1: u8 {
        /// Characteristics unknown
        const UNKNOWN = 1 << 0;
        /// Provides 5.0 volts
        const PROVIDES_5V = 1 << 1;
        /// Provides 3.3 volts
        const PROVIDES_3_3V = 1 << 2;
        /// Opening is shared with another slot
        const SHARED = 1 << 3;
        /// PC Card slot supports PC Card-16
        const PC_CARD_16 = 1 << 4;
        /// PC Card slot supports CardBus
        const CARDBUS = 1 << 5;
        /// PC Card slot supports Zoom Video
        const ZOOM_VIDEO = 1 << 6;
        /// PC Card slot supports Modem Ring Resume
        const MODEM_RING_RESUME = 1 << 7;
    }
}

bitflags! {
    /// Slot characteristics 2 (offset 0x0C)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SlotCharacteristics2: u8 {
        /// Supports PME#
        const PME = 1 << 0;
        /// Supports hot-plug
        const HOT_PLUG = 1 << 1;
        /// Supports SMBus
        const SMBUS = 1 << 2;
        /// Supports PCIe bifurcation
        const BIFURCATION = 1 << 3;
        /// Supports async/surprise removal
        const SURPRISE_REMOVAL = 1 << 4;
        /// Flexbus slot, CXL 1.0 capable
        const CXL_1_0 = 1 << 5;
        /// Flexbus slot, CXL 2.0 capable
        const CXL_2_0 = 1 << 6;
        /// Flexbus slot, CXL 3.0 capable
        const CXL_3_0 = 1 << 7;
    }
}

/// A peer device sharing a slot (3.2+)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPeer {
    /// PCI location
    pub address: PciAddress,
    /// Electrical data bus width
    pub data_bus_width: u8,
}

/// System Slots (Type 9)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSlot {
    /// Slot designation
    pub designation: String,
    /// Slot type
    pub slot_type: SlotType,
    /// Data bus width
    pub data_bus_width: SlotWidth,
    /// Current usage
    pub current_usage: SlotUsage,
    /// Slot length
    pub slot_length: SlotLength,
    /// Slot ID
    pub slot_id: u16,
    /// Characteristics 1
    pub characteristics1: SlotCharacteristics1,
    /// Characteristics 2 (2.1+)
    pub characteristics2: Option<SlotCharacteristics2>,
    /// PCI location (2.6+), `None` when the segment group is 0xFFFF
    pub address: Option<PciAddress>,
    /// Peer devices (3.2+)
    pub peers: Vec<SlotPeer>,
}

impl SystemSlot {
    /// Parse from a type 9 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let address = match (r.opt_word(0x0D), r.opt_byte(0x0F), r.opt_byte(0x10)) {
            (Some(segment), Some(bus), Some(devfn)) if segment != 0xFFFF => {
                Some(PciAddress::from_raw(segment, bus, devfn))
            }
            _ => None,
        };

        let peer_count = r.opt_byte(0x12).unwrap_or(0) as usize;
        let mut peers = Vec::with_capacity(peer_count);
        for i in 0..peer_count {
            let entry = r.bytes(0x13 + i * 5, 5, "peer_groups")?;
            peers.push(SlotPeer {
                address: PciAddress::from_raw(u16::from_le_bytes([entry[0], entry[1]]), entry[2], entry[3]),
                data_bus_width: entry[4],
            });
        }

        Ok(Self {
            designation: r.string(0x04, "slot_designation")?,
            slot_type: SlotType::from(r.byte(0x05, "slot_type")?),
            data_bus_width: SlotWidth::from(r.byte(0x06, "slot_data_bus_width")?),
            current_usage: SlotUsage::from(r.byte(0x07, "current_usage")?),
            slot_length: SlotLength::from(r.byte(0x08, "slot_length")?),
            slot_id: r.word(0x09, "slot_id")?,
            characteristics1: SlotCharacteristics1::from_bits_retain(r.byte(0x0B, "slot_characteristics_1")?),
            characteristics2: r.opt_byte(0x0C).map(SlotCharacteristics2::from_bits_retain),
            address,
            peers,
        })
    }
}
