//! System-level structures
//!
//! System Information (1), OEM Strings (11), System Configuration Options
//! (12), System Reset (23), Hardware Security (24), System Power Controls
//! (25) and System Boot Information (32).

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Result;
use crate::fields::{bcd_u8, dmi_enum, FieldReader, SystemUuid};

// =============================================================================
// SYSTEM INFORMATION (TYPE 1)
// =============================================================================

dmi_enum! {
    /// Event that caused the system to power up
    pub enum WakeUpType: u8 {
        Reserved = 0x00 => "Reserved",
        Other = 0x01 => "Other",
        Unknown = 0x02 => "Unknown",
        ApmTimer = 0x03 => "APM Timer",
        ModemRing = 0x04 => "Modem Ring",
        LanRemote = 0x05 => "LAN Remote",
        PowerSwitch = 0x06 => "Power Switch",
        PciPme = 0x07 => "PCI PME#",
        AcPowerRestored = 0x08 => "AC Power Restored",
    }
}

/// System Information (Type 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInformation {
    /// Manufacturer
    pub manufacturer: String,
    /// Product name
    pub product_name: String,
    /// Version
    pub version: String,
    /// Serial number
    pub serial_number: String,
    /// UUID (2.1+)
    pub uuid: Option<SystemUuid>,
    /// Wake-up type (2.1+)
    pub wake_up_type: Option<WakeUpType>,
    /// SKU number (2.4+)
    pub sku_number: Option<String>,
    /// Family (2.4+)
    pub family: Option<String>,
}

impl SystemInformation {
    /// Parse from a type 1 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let uuid = if r.has(0x08, 16) {
            Some(SystemUuid::from_bytes(r.array(0x08, "uuid")?, r.version()))
        } else {
            None
        };

        Ok(Self {
            manufacturer: r.string(0x04, "manufacturer")?,
            product_name: r.string(0x05, "product_name")?,
            version: r.string(0x06, "version")?,
            serial_number: r.string(0x07, "serial_number")?,
            uuid,
            wake_up_type: r.opt_byte(0x18).map(WakeUpType::from),
            sku_number: r.opt_string(0x19, "sku_number")?,
            family: r.opt_string(0x1A, "family")?,
        })
    }
}

// =============================================================================
// OEM STRINGS (TYPE 11) / CONFIGURATION OPTIONS (TYPE 12)
// =============================================================================

/// OEM Strings (Type 11)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OemStrings {
    /// Free-form strings
    pub strings: Vec<String>,
}

impl OemStrings {
    /// Parse from a type 11 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let count = r.byte(0x04, "count")?;
        Ok(Self { strings: r.string_list(count)? })
    }
}

/// System Configuration Options (Type 12)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfigurationOptions {
    /// Jumper and switch descriptions
    pub options: Vec<String>,
}

impl SystemConfigurationOptions {
    /// Parse from a type 12 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let count = r.byte(0x04, "count")?;
        Ok(Self { options: r.string_list(count)? })
    }
}

// =============================================================================
// SYSTEM RESET (TYPE 23)
// =============================================================================

dmi_enum! {
    /// Action taken on a watchdog reset
    pub enum BootOption: u8 {
        Reserved = 0 => "Reserved",
        OperatingSystem = 1 => "Operating System",
        SystemUtilities = 2 => "System Utilities",
        DoNotReboot = 3 => "Do Not Reboot",
    }
}

/// System Reset (Type 23)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemReset {
    /// Automatic reset enabled
    pub enabled: bool,
    /// Action after a watchdog reset
    pub boot_option: BootOption,
    /// Action once the reset limit is reached
    pub boot_option_on_limit: BootOption,
    /// Watchdog timer present
    pub watchdog_timer: bool,
    /// Resets since last intentional reset
    pub reset_count: Option<u16>,
    /// Resets before the limit action applies
    pub reset_limit: Option<u16>,
    /// Watchdog timer interval in minutes
    pub timer_interval: Option<u16>,
    /// Timeout in minutes
    pub timeout: Option<u16>,
}

impl SystemReset {
    /// Parse from a type 23 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let caps = r.byte(0x04, "capabilities")?;
        let known = |v: u16| (v != 0xFFFF).then_some(v);

        Ok(Self {
            enabled: caps & 0x01 != 0,
            boot_option: BootOption::from((caps >> 1) & 0x03),
            boot_option_on_limit: BootOption::from((caps >> 3) & 0x03),
            watchdog_timer: caps & 0x20 != 0,
            reset_count: known(r.word(0x05, "reset_count")?),
            reset_limit: known(r.word(0x07, "reset_limit")?),
            timer_interval: known(r.word(0x09, "timer_interval")?),
            timeout: known(r.word(0x0B, "timeout")?),
        })
    }
}

// =============================================================================
// HARDWARE SECURITY (TYPE 24)
// =============================================================================

dmi_enum! {
    /// Status of one hardware security setting
    pub enum SecurityStatus: u8 {
        Disabled = 0 => "Disabled",
        Enabled = 1 => "Enabled",
        NotImplemented = 2 => "Not Implemented",
        Unknown = 3 => "Unknown",
    }
}

/// Hardware Security (Type 24)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareSecurity {
    /// Power-on password status (bits 7:6)
    pub power_on_password: SecurityStatus,
    /// Keyboard password status (bits 5:4)
    pub keyboard_password: SecurityStatus,
    /// Administrator password status (bits 3:2)
    pub administrator_password: SecurityStatus,
    /// Front panel reset status (bits 1:0)
    pub front_panel_reset: SecurityStatus,
}

impl HardwareSecurity {
    /// Parse from a type 24 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let settings = r.byte(0x04, "settings")?;
        Ok(Self {
            power_on_password: SecurityStatus::from(settings >> 6),
            keyboard_password: SecurityStatus::from((settings >> 4) & 0x03),
            administrator_password: SecurityStatus::from((settings >> 2) & 0x03),
            front_panel_reset: SecurityStatus::from(settings & 0x03),
        })
    }
}

// =============================================================================
// SYSTEM POWER CONTROLS (TYPE 25)
// =============================================================================

/// System Power Controls (Type 25)
///
/// The next scheduled power-on, BCD encoded. A field that is not valid BCD
/// (firmware uses 0xFF for "any") decodes to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPowerControls {
    /// Month, 1-12
    pub month: Option<u8>,
    /// Day of month, 1-31
    pub day: Option<u8>,
    /// Hour, 0-23
    pub hour: Option<u8>,
    /// Minute, 0-59
    pub minute: Option<u8>,
    /// Second, 0-59
    pub second: Option<u8>,
}

impl SystemPowerControls {
    /// Parse from a type 25 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let field = |offset: usize, name: &'static str, max: u8| -> Result<Option<u8>> {
            Ok(bcd_u8(r.byte(offset, name)?).filter(|&v| v <= max))
        };

        Ok(Self {
            month: field(0x04, "month", 12)?.filter(|&m| m >= 1),
            day: field(0x05, "day", 31)?.filter(|&d| d >= 1),
            hour: field(0x06, "hour", 23)?,
            minute: field(0x07, "minute", 59)?,
            second: field(0x08, "second", 59)?,
        })
    }
}

// =============================================================================
// SYSTEM BOOT INFORMATION (TYPE 32)
// =============================================================================

dmi_enum! {
    /// Boot status code
    pub enum BootStatus: u8 {
        NoErrors = 0 => "No errors detected",
        NoBootableMedia = 1 => "No bootable media",
        OsFailedToLoad = 2 => "Operating system failed to load",
        FirmwareHardwareFailure = 3 => "Firmware-detected hardware failure",
        OsHardwareFailure = 4 => "Operating system-detected hardware failure",
        UserRequestedBoot = 5 => "User-requested boot",
        SecurityViolation = 6 => "System security violation",
        PreviouslyRequestedImage = 7 => "Previously-requested image",
        WatchdogExpired = 8 => "System watchdog timer expired",
    }
}

impl BootStatus {
    /// Codes 128-191 are OEM-specific, 192-255 product-specific
    pub fn is_vendor_specific(self) -> bool {
        self.raw() >= 128
    }
}

/// System Boot Information (Type 32)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemBootInformation {
    /// Status of the most recent boot
    pub status: BootStatus,
    /// Additional status bytes following the status code
    pub status_data: Vec<u8>,
}

impl SystemBootInformation {
    /// Parse from a type 32 record
    pub fn parse(r: &FieldReader<'_>) -> Result<Self> {
        let status = BootStatus::from(r.byte(0x0A, "boot_status")?);
        let extra = r.len().saturating_sub(0x0B);
        Ok(Self {
            status,
            status_data: r.bytes(0x0B, extra, "boot_status_data")?.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SmbiosVersion;
    use crate::error::DmiError;
    use crate::types::tests::decode_one;
    use alloc::string::ToString;
    use alloc::vec;

    const UUID: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
    ];

    fn system_body(len: usize) -> Vec<u8> {
        let mut body = vec![1, 2, 3, 0];
        body.extend_from_slice(&UUID);
        body.extend_from_slice(&[0x06, 4, 5]);
        body.truncate(len - 4);
        body
    }

    #[test]
    fn test_system_information_full() {
        let strings = ["Acme", "Widget", "1.0", "SKU-9", "Gadgets"];
        let decoded = decode_one(&system_body(0x1B), 1, &strings, SmbiosVersion::new(2, 8)).unwrap();
        let sys = decoded.as_structure::<SystemInformation>().unwrap();
        assert_eq!(sys.manufacturer, "Acme");
        assert_eq!(sys.product_name, "Widget");
        assert_eq!(sys.version, "1.0");
        assert_eq!(sys.serial_number, "Not Specified");
        assert_eq!(sys.uuid.unwrap().to_string(), "33221100-5544-7766-8899-AABBCCDDEEFF");
        assert_eq!(sys.wake_up_type, Some(WakeUpType::PowerSwitch));
        assert_eq!(sys.sku_number.as_deref(), Some("SKU-9"));
        assert_eq!(sys.family.as_deref(), Some("Gadgets"));
    }

    #[test]
    fn test_system_information_v20() {
        let decoded = decode_one(&system_body(0x08), 1, &["Acme", "Widget", "1.0"], SmbiosVersion::new(2, 0)).unwrap();
        let sys = decoded.as_structure::<SystemInformation>().unwrap();
        assert_eq!(sys.uuid, None);
        assert_eq!(sys.wake_up_type, None);
        assert_eq!(sys.sku_number, None);
    }

    #[test]
    fn test_system_information_bad_string() {
        let err = decode_one(&system_body(0x08), 1, &["Acme"], SmbiosVersion::new(2, 8)).unwrap_err();
        assert_eq!(err, DmiError::StringIndexOutOfRange { index: 2, available: 1 });
    }

    #[test]
    fn test_oem_strings() {
        let decoded = decode_one(&[2], 11, &["Board rev A", "Build 42"], SmbiosVersion::new(2, 8)).unwrap();
        let oem = decoded.as_structure::<OemStrings>().unwrap();
        assert_eq!(oem.strings, ["Board rev A", "Build 42"]);

        // Count claims more strings than the pool holds
        assert!(decode_one(&[3], 11, &["only one"], SmbiosVersion::new(2, 8)).is_err());
    }

    #[test]
    fn test_system_reset() {
        // enabled, boot option OS, on limit do-not-reboot, watchdog present
        let caps = 0x01 | (1 << 1) | (3 << 3) | 0x20;
        let body = [caps, 0x02, 0x00, 0xFF, 0xFF, 0x05, 0x00, 0x0A, 0x00];
        let decoded = decode_one(&body, 23, &[], SmbiosVersion::new(2, 8)).unwrap();
        let reset = decoded.as_structure::<SystemReset>().unwrap();
        assert!(reset.enabled);
        assert!(reset.watchdog_timer);
        assert_eq!(reset.boot_option, BootOption::OperatingSystem);
        assert_eq!(reset.boot_option_on_limit, BootOption::DoNotReboot);
        assert_eq!(reset.reset_count, Some(2));
        assert_eq!(reset.reset_limit, None);
        assert_eq!(reset.timer_interval, Some(5));
        assert_eq!(reset.timeout, Some(10));
    }

    #[test]
    fn test_hardware_security() {
        let decoded = decode_one(&[0b01_00_10_11], 24, &[], SmbiosVersion::new(2, 8)).unwrap();
        let sec = decoded.as_structure::<HardwareSecurity>().unwrap();
        assert_eq!(sec.power_on_password, SecurityStatus::Enabled);
        assert_eq!(sec.keyboard_password, SecurityStatus::Disabled);
        assert_eq!(sec.administrator_password, SecurityStatus::NotImplemented);
        assert_eq!(sec.front_panel_reset, SecurityStatus::Unknown);
    }

    #[test]
    fn test_power_controls_bcd() {
        let decoded = decode_one(&[0x12, 0x31, 0x23, 0x59, 0xFF], 25, &[], SmbiosVersion::new(2, 8)).unwrap();
        let ctl = decoded.as_structure::<SystemPowerControls>().unwrap();
        assert_eq!(ctl.month, Some(12));
        assert_eq!(ctl.day, Some(31));
        assert_eq!(ctl.hour, Some(23));
        assert_eq!(ctl.minute, Some(59));
        assert_eq!(ctl.second, None);

        let zero_month = decode_one(&[0x00, 0x01, 0x00, 0x00, 0x00], 25, &[], SmbiosVersion::new(2, 8)).unwrap();
        assert_eq!(zero_month.as_structure::<SystemPowerControls>().unwrap().month, None);
    }

    #[test]
    fn test_boot_information() {
        let mut body = vec![0; 6];
        body.extend_from_slice(&[0x81, 0xDE, 0xAD]);
        let decoded = decode_one(&body, 32, &[], SmbiosVersion::new(2, 8)).unwrap();
        let boot = decoded.as_structure::<SystemBootInformation>().unwrap();
        assert_eq!(boot.status, BootStatus::OutOfSpec(0x81));
        assert!(boot.status.is_vendor_specific());
        assert_eq!(boot.status_data, [0xDE, 0xAD]);
    }
}
