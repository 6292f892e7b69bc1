//! Portable Battery (Type 22) and System Power Supply (Type 39)

use alloc::string::String;

use crate::error::Result;
use crate::fields::{dmi_enum, FieldReader};
use crate::types::handle_ref;

// =============================================================================
// PORTABLE BATTERY (TYPE 22)
// =============================================================================

dmi_enum! {
    /// Battery device chemistry
    pub enum BatteryChemistry: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        LeadAcid = 0x03 => "Lead Acid",
        NickelCadmium = 0x04 => "Nickel Cadmium",
        NickelMetalHydride = 0x05 => "Nickel metal hydride",
        LithiumIon = 0x06 => "Lithium-ion",
        ZincAir = 0x07 => "Zinc air",
        LithiumPolymer = 0x08 => "Lithium Polymer",
    }
}

/// Smart Battery Data Specification manufacture date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbdsDate {
    /// Year
    pub year: u16,
    /// Month, 1-12
    pub month: u8,
    /// Day, 1-31
    pub day: u8,
}

impl SbdsDate {
    /// Unpack `(year - 1980) << 9 | month << 5 | day`
    pub fn from_raw(raw: u16) -> Self {
        Self {
            year: 1980 + (raw >> 9),
            month: ((raw >> 5) & 0x0F) as u8,
            day: (raw & 0x1F) as u8,
        }
    }
}

/// Portable Battery (Type 22)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortableBattery {
    /// Location
    pub location: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Manufacture date string, "Not Specified" when the SBDS date applies
    pub manufacture_date: String,
    /// Serial number string, "Not Specified" when the SBDS serial applies
    pub serial_number: String,
    /// Device name
    pub device_name: String,
    /// Device chemistry, `Unknown` when the SBDS chemistry applies
    pub chemistry: BatteryChemistry,
    /// Design capacity before the multiplier, in mWh
    pub design_capacity: u16,
    /// Design voltage in mV, `None` if unknown
    pub design_voltage: Option<u16>,
    /// SBDS version number
    pub sbds_version: String,
    /// Maximum error in battery data, in percent
    pub maximum_error: Option<u8>,
    /// SBDS serial number (2.2+)
    pub sbds_serial_number: Option<u16>,
    /// SBDS manufacture date (2.2+)
    pub sbds_manufacture_date: Option<SbdsDate>,
    /// SBDS device chemistry (2.2+)
    pub sbds_chemistry: Option<String>,
    /// Design capacity multiplier (2.2+)
    pub design_capacity_multiplier: Option<u8>,
    /// OEM-specific (2.2+)
    pub oem_specific: Option<u32>,
}

impl PortableBattery {
    /// Parse from a type 22 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let voltage = r.word(0x0C, "design_voltage")?;
        let max_error = r.byte(0x0F, "maximum_error_in_battery_data")?;

        Ok(Self {
            location: r.string(0x04, "location")?,
            manufacturer: r.string(0x05, "manufacturer")?,
            manufacture_date: r.string(0x06, "manufacture_date")?,
            serial_number: r.string(0x07, "serial_number")?,
            device_name: r.string(0x08, "device_name")?,
            chemistry: BatteryChemistry::from(r.byte(0x09, "device_chemistry")?),
            design_capacity: r.word(0x0A, "design_capacity")?,
            design_voltage: (voltage != 0).then_some(voltage),
            sbds_version: r.string(0x0E, "sbds_version_number")?,
            maximum_error: (max_error != 0xFF).then_some(max_error),
            sbds_serial_number: r.opt_word(0x10),
            sbds_manufacture_date: r.opt_word(0x12).map(SbdsDate::from_raw),
            sbds_chemistry: r.opt_string(0x14, "sbds_device_chemistry")?,
            design_capacity_multiplier: r.opt_byte(0x15),
            oem_specific: r.opt_dword(0x16),
        })
    }

    /// Design capacity in mWh with the multiplier applied, `None` if unknown
    pub fn capacity_mwh(&self) -> Option<u32> {
        if self.design_capacity == 0 {
            return None;
        }
        let multiplier = self.design_capacity_multiplier.filter(|&m| m != 0).unwrap_or(1);
        Some(u32::from(self.design_capacity) * u32::from(multiplier))
    }
}

// =============================================================================
// SYSTEM POWER SUPPLY (TYPE 39)
// =============================================================================

dmi_enum! {
    /// Power supply type (bits 13:10)
    pub enum PowerSupplyType: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Linear = 0x03 => "Linear",
        Switching = 0x04 => "Switching",
        Battery = 0x05 => "Battery",
        Ups = 0x06 => "UPS",
        Converter = 0x07 => "Converter",
        Regulator = 0x08 => "Regulator",
    }
}

dmi_enum! {
    /// Power supply status (bits 9:7)
    pub enum PowerSupplyStatus: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Ok = 0x03 => "OK",
        NonCritical = 0x04 => "Non-critical",
        Critical = 0x05 => "Critical",
    }
}

dmi_enum! {
    /// Input voltage range switching (bits 6:3)
    pub enum InputVoltageSwitching: u8 {
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        Manual = 0x03 => "Manual",
        AutoSwitch = 0x04 => "Auto-switch",
        WideRange = 0x05 => "Wide Range",
        NotApplicable = 0x06 => "N/A",
    }
}

/// Unpacked power supply characteristics word (offset 0x0E)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerSupplyCharacteristics {
    /// Supply type
    pub supply_type: PowerSupplyType,
    /// Status
    pub status: PowerSupplyStatus,
    /// Input voltage range switching
    pub input_switching: InputVoltageSwitching,
    /// Unplugged from the wall
    pub unplugged: bool,
    /// Present
    pub present: bool,
    /// Hot replaceable
    pub hot_replaceable: bool,
}

impl PowerSupplyCharacteristics {
    /// Unpack the characteristics word
    pub fn from_raw(raw: u16) -> Self {
        Self {
            supply_type: PowerSupplyType::from(((raw >> 10) & 0x0F) as u8),
            status: PowerSupplyStatus::from(((raw >> 7) & 0x07) as u8),
            input_switching: InputVoltageSwitching::from(((raw >> 3) & 0x0F) as u8),
            unplugged: raw & 0x04 != 0,
            present: raw & 0x02 != 0,
            hot_replaceable: raw & 0x01 != 0,
        }
    }

    /// Pack back into the characteristics word
    pub fn to_raw(&self) -> u16 {
        (u16::from(self.supply_type.raw() & 0x0F) << 10)
            | (u16::from(self.status.raw() & 0x07) << 7)
            | (u16::from(self.input_switching.raw() & 0x0F) << 3)
            | (u16::from(self.unplugged) << 2)
            | (u16::from(self.present) << 1)
            | u16::from(self.hot_replaceable)
    }
}

/// System Power Supply (Type 39)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPowerSupply {
    /// Redundant power unit group, `None` when not redundant
    pub power_unit_group: Option<u8>,
    /// Location
    pub location: String,
    /// Device name
    pub device_name: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Serial number
    pub serial_number: String,
    /// Asset tag
    pub asset_tag: String,
    /// Model part number
    pub model_part_number: String,
    /// Revision level
    pub revision_level: String,
    /// Maximum power capacity in milliwatts, `None` if unknown
    pub max_power_capacity: Option<u16>,
    /// Characteristics
    pub characteristics: PowerSupplyCharacteristics,
    /// Handle of the input voltage probe
    pub input_voltage_probe_handle: Option<u16>,
    /// Handle of the cooling device
    pub cooling_device_handle: Option<u16>,
    /// Handle of the input current probe
    pub input_current_probe_handle: Option<u16>,
}

impl SystemPowerSupply {
    /// Parse from a type 39 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let group = r.byte(0x04, "power_unit_group")?;
        let max_power = r.word(0x0C, "max_power_capacity")?;

        Ok(Self {
            power_unit_group: (group != 0).then_some(group),
            location: r.string(0x05, "location")?,
            device_name: r.string(0x06, "device_name")?,
            manufacturer: r.string(0x07, "manufacturer")?,
            serial_number: r.string(0x08, "serial_number")?,
            asset_tag: r.string(0x09, "asset_tag_number")?,
            model_part_number: r.string(0x0A, "model_part_number")?,
            revision_level: r.string(0x0B, "revision_level")?,
            max_power_capacity: (max_power != 0x8000).then_some(max_power),
            characteristics: PowerSupplyCharacteristics::from_raw(r.word(0x0E, "power_supply_characteristics")?),
            input_voltage_probe_handle: r.opt_word(0x10).and_then(handle_ref),
            cooling_device_handle: r.opt_word(0x12).and_then(handle_ref),
            input_current_probe_handle: r.opt_word(0x14).and_then(handle_ref),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SmbiosVersion;
    use crate::types::tests::decode_one;
    use alloc::vec;

    #[test]
    fn test_portable_battery_sbds() {
        let mut body = vec![1, 2, 0, 0, 3, 0x02];
        body.extend_from_slice(&4_800u16.to_le_bytes());
        body.extend_from_slice(&11_100u16.to_le_bytes());
        body.extend_from_slice(&[4, 0xFF]);
        body.extend_from_slice(&0x1234u16.to_le_bytes());
        let date = ((2021u16 - 1980) << 9) | (6 << 5) | 15;
        body.extend_from_slice(&date.to_le_bytes());
        body.extend_from_slice(&[5, 10]);
        body.extend_from_slice(&0u32.to_le_bytes());
        let strings = ["Front", "Acme Power", "DELL 7FJ", "3.1", "LION"];
        let decoded = decode_one(&body, 22, &strings, SmbiosVersion::new(2, 7)).unwrap();
        let battery = decoded.as_structure::<PortableBattery>().unwrap();

        assert_eq!(battery.location, "Front");
        assert_eq!(battery.manufacture_date, "Not Specified");
        assert_eq!(battery.chemistry, BatteryChemistry::Unknown);
        assert_eq!(battery.design_voltage, Some(11_100));
        assert_eq!(battery.maximum_error, None);
        assert_eq!(battery.sbds_serial_number, Some(0x1234));
        assert_eq!(
            battery.sbds_manufacture_date,
            Some(SbdsDate { year: 2021, month: 6, day: 15 })
        );
        assert_eq!(battery.sbds_chemistry.as_deref(), Some("LION"));
        assert_eq!(battery.capacity_mwh(), Some(48_000));
    }

    #[test]
    fn test_portable_battery_v21() {
        let mut body = vec![1, 2, 3, 4, 5, 0x06];
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&[0, 2]);
        let strings = ["Rear", "Acme", "2019-01-01", "SN9", "BAT0"];
        let decoded = decode_one(&body, 22, &strings, SmbiosVersion::new(2, 1)).unwrap();
        let battery = decoded.as_structure::<PortableBattery>().unwrap();
        assert_eq!(battery.chemistry, BatteryChemistry::LithiumIon);
        assert_eq!(battery.design_voltage, None);
        assert_eq!(battery.maximum_error, Some(2));
        assert_eq!(battery.capacity_mwh(), None);
        assert_eq!(battery.design_capacity_multiplier, None);
    }

    #[test]
    fn test_power_supply_characteristics_packing() {
        let characteristics = PowerSupplyCharacteristics {
            supply_type: PowerSupplyType::Switching,
            status: PowerSupplyStatus::Ok,
            input_switching: InputVoltageSwitching::AutoSwitch,
            unplugged: false,
            present: true,
            hot_replaceable: true,
        };
        let raw = characteristics.to_raw();
        assert_eq!(raw, (4 << 10) | (3 << 7) | (4 << 3) | 0b011);
        assert_eq!(PowerSupplyCharacteristics::from_raw(raw), characteristics);
        assert_eq!(PowerSupplyCharacteristics::from_raw(0x11A2).to_raw(), 0x11A2);
    }

    #[test]
    fn test_system_power_supply() {
        let mut body = vec![1, 1, 2, 3, 4, 0, 5, 6];
        body.extend_from_slice(&750u16.to_le_bytes());
        body.extend_from_slice(&0x11A3u16.to_le_bytes());
        body.extend_from_slice(&0x0050u16.to_le_bytes());
        body.extend_from_slice(&0xFFFFu16.to_le_bytes());
        body.extend_from_slice(&0x0052u16.to_le_bytes());
        let strings = ["PSU1", "PWS-751", "Acme", "P1234", "PN-750", "A01"];
        let decoded = decode_one(&body, 39, &strings, SmbiosVersion::new(2, 8)).unwrap();
        let psu = decoded.as_structure::<SystemPowerSupply>().unwrap();
        assert_eq!(psu.power_unit_group, Some(1));
        assert_eq!(psu.asset_tag, "Not Specified");
        assert_eq!(psu.revision_level, "A01");
        assert_eq!(psu.max_power_capacity, Some(750));
        assert_eq!(psu.characteristics.supply_type, PowerSupplyType::Switching);
        assert_eq!(psu.characteristics.status, PowerSupplyStatus::Ok);
        assert!(psu.characteristics.present && psu.characteristics.hot_replaceable);
        assert_eq!(psu.input_voltage_probe_handle, Some(0x50));
        assert_eq!(psu.cooling_device_handle, None);
        assert_eq!(psu.input_current_probe_handle, Some(0x52));
    }
}
