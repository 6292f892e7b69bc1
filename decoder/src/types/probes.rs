//! Voltage, temperature and current probes (Types 26, 28, 29) and cooling
//! devices (Type 27)
//!
//! The three probe types share one layout; only the unit differs.

use alloc::string::String;
use core::ops::Deref;

use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};

dmi_enum! {
    /// Probe location (bits 4:0 of offset 0x05)
    pub enum ProbeLocation: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Processor = 0x03 => "Processor",
        Disk = 0x04 => "Disk",
        PeripheralBay = 0x05 => "Peripheral Bay",
        SystemManagementModule = 0x06 => "System Management Module",
        Motherboard = 0x07 => "Motherboard",
        MemoryModule = 0x08 => "Memory Module",
        ProcessorModule = 0x09 => "Processor Module",
        PowerUnit = 0x0A => "Power Unit",
        AddInCard = 0x0B => "Add-in Card",
        FrontPanelBoard = 0x0C => "Front Panel Board",
        BackPanelBoard = 0x0D => "Back Panel Board",
        PowerSystemBoard = 0x0E => "Power System Board",
        DriveBackPlane = 0x0F => "Drive Back Plane",
    }
}

dmi_enum! {
    /// Probe or cooling device status (bits 7:5)
    pub enum ProbeStatus: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Ok = 0x03 => "OK",
        NonCritical = 0x04 => "Non-critical",
        Critical = 0x05 => "Critical",
        NonRecoverable = 0x06 => "Non-recoverable",
    }
}

const UNKNOWN_READING: u16 = 0x8000;

fn reading(raw: u16) -> Option<i16> {
    (raw != UNKNOWN_READING).then_some(raw as i16)
}

fn unsigned_reading(raw: u16) -> Option<u16> {
    (raw != UNKNOWN_READING).then_some(raw)
}

/// Layout shared by voltage, temperature and current probes
///
/// Units: millivolts, 1/10 degree C or milliamps for values, 1/10 mV,
/// 1/1000 degree C or 1/10 mA for resolution, 1/100 percent for accuracy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeData {
    /// Description
    pub description: String,
    /// Location
    pub location: ProbeLocation,
    /// Status
    pub status: ProbeStatus,
    /// Maximum readable value
    pub maximum_value: Option<i16>,
    /// Minimum readable value
    pub minimum_value: Option<i16>,
    /// Resolution
    pub resolution: Option<u16>,
    /// Tolerance (plus/minus)
    pub tolerance: Option<i16>,
    /// Accuracy (plus/minus)
    pub accuracy: Option<u16>,
    /// OEM-defined
    pub oem_defined: u32,
    /// Nominal value, present only on longer records
    pub nominal_value: Option<i16>,
}

impl ProbeData {
    fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let location_status = r.byte(0x05, "location_and_status")?;
        Ok(Self {
            description: r.string(0x04, "description")?,
            location: ProbeLocation::from(location_status & 0x1F),
            status: ProbeStatus::from(location_status >> 5),
            maximum_value: reading(r.word(0x06, "maximum_value")?),
            minimum_value: reading(r.word(0x08, "minimum_value")?),
            resolution: unsigned_reading(r.word(0x0A, "resolution")?),
            tolerance: reading(r.word(0x0C, "tolerance")?),
            accuracy: unsigned_reading(r.word(0x0E, "accuracy")?),
            oem_defined: r.dword(0x10, "oem_defined")?,
            nominal_value: r.opt_word(0x14).and_then(reading),
        })
    }
}

macro_rules! probe_type {
    ($(#[$meta:meta])* $name:ident, $code:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(pub ProbeData);

        impl $name {
            #[doc = concat!("Parse from a type ", stringify!($code), " record")]
            pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
                ProbeData::parse(r).map(Self)
            }
        }

        impl Deref for $name {
            type Target = ProbeData;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

probe_type!(
    /// Voltage Probe (Type 26), values in millivolts
    VoltageProbe, 26
);
probe_type!(
    /// Temperature Probe (Type 28), values in 1/10 degree C
    TemperatureProbe, 28
);
probe_type!(
    /// Electrical Current Probe (Type 29), values in milliamps
    CurrentProbe, 29
);

// =============================================================================
// COOLING DEVICE (TYPE 27)
// =============================================================================

dmi_enum! {
    /// Cooling device type (bits 4:0)
    pub enum CoolingDeviceType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Fan = 0x03 => "Fan",
        CentrifugalBlower = 0x04 => "Centrifugal Blower",
        ChipFan = 0x05 => "Chip Fan",
        CabinetFan = 0x06 => "Cabinet Fan",
        PowerSupplyFan = 0x07 => "Power Supply Fan",
        HeatPipe = 0x08 => "Heat Pipe",
        IntegratedRefrigeration = 0x09 => "Integrated Refrigeration",
        ActiveCooling = 0x10 => "Active Cooling",
        PassiveCooling = 0x11 => "Passive Cooling",
    }
}

/// Cooling Device (Type 27)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoolingDevice {
    /// Handle of the associated temperature probe
    pub temperature_probe_handle: Option<u16>,
    /// Device type
    pub device_type: CoolingDeviceType,
    /// Status
    pub status: ProbeStatus,
    /// Cooling unit group, `None` when not part of a redundant group
    pub cooling_unit_group: Option<u8>,
    /// OEM-defined
    pub oem_defined: u32,
    /// Nominal speed in RPM
    pub nominal_speed: Option<u16>,
    /// Description (2.7+)
    pub description: Option<String>,
}

impl CoolingDevice {
    /// Parse from a type 27 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let type_status = r.byte(0x06, "device_type_and_status")?;
        let group = r.byte(0x07, "cooling_unit_group")?;
        Ok(Self {
            temperature_probe_handle: crate::types::handle_ref(r.word(0x04, "temperature_probe_handle")?),
            device_type: CoolingDeviceType::from(type_status & 0x1F),
            status: ProbeStatus::from(type_status >> 5),
            cooling_unit_group: (group != 0).then_some(group),
            oem_defined: r.dword(0x08, "oem_defined")?,
            nominal_speed: r.opt_word(0x0C).and_then(unsigned_reading),
            description: r.opt_string(0x0E, "description")?,
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

    fn probe_body(location_status: u8, nominal: Option<u16>) -> Vec<u8> {
        let mut body = vec![1, location_status];
        for word in [1_000u16, (-400i16) as u16, 5, 0x8000, 150] {
            body.extend_from_slice(&word.to_le_bytes());
        }
        body.extend_from_slice(&0xDEADu32.to_le_bytes());
        if let Some(nominal) = nominal {
            body.extend_from_slice(&nominal.to_le_bytes());
        }
        body
    }

    #[test]
    fn test_temperature_probe() {
        let body = probe_body((0x03 << 5) | 0x03, Some(450));
        let decoded = decode_one(&body, 28, &["CPU Temp"], SmbiosVersion::new(2, 8)).unwrap();
        let probe = decoded.as_structure::<TemperatureProbe>().unwrap();
        assert_eq!(probe.description, "CPU Temp");
        assert_eq!(probe.location, ProbeLocation::Processor);
        assert_eq!(probe.status, ProbeStatus::Ok);
        assert_eq!(probe.maximum_value, Some(1_000));
        assert_eq!(probe.minimum_value, Some(-400));
        assert_eq!(probe.tolerance, None);
        assert_eq!(probe.accuracy, Some(150));
        assert_eq!(probe.oem_defined, 0xDEAD);
        assert_eq!(probe.nominal_value, Some(450));
    }

    #[test]
    fn test_voltage_and_current_share_layout() {
        let body = probe_body((0x05 << 5) | 0x07, None);
        let voltage = decode_one(&body, 26, &["VCORE"], SmbiosVersion::new(2, 3)).unwrap();
        let current = decode_one(&body, 29, &["ABC"], SmbiosVersion::new(2, 3)).unwrap();
        let voltage = voltage.as_structure::<VoltageProbe>().unwrap();
        let current = current.as_structure::<CurrentProbe>().unwrap();
        assert_eq!(voltage.status, ProbeStatus::Critical);
        assert_eq!(voltage.location, ProbeLocation::Motherboard);
        assert_eq!(voltage.nominal_value, None);
        assert_eq!(current.maximum_value, voltage.maximum_value);
    }

    #[test]
    fn test_cooling_device() {
        let mut body = Vec::new();
        body.extend_from_slice(&0x0030u16.to_le_bytes());
        body.extend_from_slice(&[(0x03 << 5) | 0x06, 1]);
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&2_400u16.to_le_bytes());
        body.push(1);
        let decoded = decode_one(&body, 27, &["Rear Fan"], SmbiosVersion::new(2, 7)).unwrap();
        let fan = decoded.as_structure::<CoolingDevice>().unwrap();
        assert_eq!(fan.temperature_probe_handle, Some(0x30));
        assert_eq!(fan.device_type, CoolingDeviceType::CabinetFan);
        assert_eq!(fan.status, ProbeStatus::Ok);
        assert_eq!(fan.cooling_unit_group, Some(1));
        assert_eq!(fan.nominal_speed, Some(2_400));
        assert_eq!(fan.description.as_deref(), Some("Rear Fan"));

        body[0] = 0xFF;
        body[1] = 0xFF;
        body.truncate(0x0C - 4);
        let decoded = decode_one(&body, 27, &[], SmbiosVersion::new(2, 2)).unwrap();
        let fan = decoded.as_structure::<CoolingDevice>().unwrap();
        assert_eq!(fan.temperature_probe_handle, None);
        assert_eq!(fan.nominal_speed, None);
        assert_eq!(fan.description, None);
    }
}
