//! Decoded Table Store and the decode pipeline
//!
//! [`Decoder::decode`] runs the whole pipeline: read the scan window from the
//! byte source, locate the entry point, read the structure table, walk it and
//! decode every record. The result is an immutable [`DecodedTable`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use hashbrown::HashMap;
use spin::Once;

use crate::config::{ChecksumPolicy, DecoderConfig, Retention};
use crate::entry::{EntryPoint, SmbiosVersion};
use crate::error::{DmiError, RecordError, Result};
use crate::source::RawSource;
use crate::structure::StructureHeader;
use crate::types::*;
use crate::walker::{TableWalker, WalkEnd};

// =============================================================================
// DECODED RECORDS
// =============================================================================

/// One decoded record with the header it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    /// Record header
    pub header: StructureHeader,
    /// Offset of the record within the structure table
    pub offset: usize,
    /// Decoded contents
    pub structure: DecodedStructure,
}

// =============================================================================
// DECODED TABLE
// =============================================================================

/// The result of one walk over the structure table
///
/// Records are grouped by type code in table order. How many records per
/// type are kept depends on the [`Retention`] the table was decoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTable {
    entry_point: EntryPoint,
    retention: Retention,
    records: BTreeMap<u8, Vec<DecodedRecord>>,
    handles: HashMap<u16, (u8, usize)>,
    errors: Vec<RecordError>,
    walk_end: WalkEnd,
    visited: usize,
}

macro_rules! typed_accessors {
    ( $( $(#[$meta:meta])* $name:ident => $ty:ty, )* ) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Option<&$ty> {
                self.find::<$ty>()
            }
        )*
    };
}

impl DecodedTable {
    fn new(entry_point: EntryPoint, retention: Retention) -> Self {
        Self {
            entry_point,
            retention,
            records: BTreeMap::new(),
            handles: HashMap::new(),
            errors: Vec::new(),
            walk_end: WalkEnd::EndedEarly { offset: 0 },
            visited: 0,
        }
    }

    fn insert(&mut self, record: DecodedRecord) {
        let code = record.header.structure_type;
        let handle = record.header.handle;
        let list = self.records.entry(code).or_default();

        let index = match self.retention {
            Retention::All => {
                list.push(record);
                list.len() - 1
            }
            Retention::First if !list.is_empty() => {
                log::trace!("keeping first type {} record, dropping handle {:#06x}", code, handle);
                return;
            }
            Retention::First => {
                list.push(record);
                0
            }
            Retention::Last => {
                if let Some(previous) = list.pop() {
                    self.handles.remove(&previous.header.handle);
                }
                list.push(record);
                0
            }
        };
        self.handles.insert(handle, (code, index));
    }

    // =========================================================================
    // By type code
    // =========================================================================

    /// Most recently retained record of a type
    pub fn get(&self, structure_type: u8) -> Option<&DecodedStructure> {
        self.all(structure_type).last().map(|r| &r.structure)
    }

    /// First retained record of a type
    pub fn first(&self, structure_type: u8) -> Option<&DecodedStructure> {
        self.all(structure_type).first().map(|r| &r.structure)
    }

    /// All retained records of a type, in table order
    pub fn all(&self, structure_type: u8) -> &[DecodedRecord] {
        self.records.get(&structure_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any record of a type was decoded
    pub fn contains(&self, structure_type: u8) -> bool {
        !self.all(structure_type).is_empty()
    }

    /// Type codes present, ascending
    pub fn type_codes(&self) -> impl Iterator<Item = u8> + '_ {
        self.records.keys().copied()
    }

    /// The full type code to records mapping
    pub fn records(&self) -> &BTreeMap<u8, Vec<DecodedRecord>> {
        &self.records
    }

    /// Every retained record, ordered by type code then table order
    pub fn iter(&self) -> impl Iterator<Item = &DecodedRecord> + '_ {
        self.records.values().flatten()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Whether no record was retained
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // =========================================================================
    // By layout
    // =========================================================================

    /// Most recently retained record of layout `T`
    pub fn find<T: Structure>(&self) -> Option<&T> {
        self.get(T::TYPE).and_then(T::from_decoded)
    }

    /// First retained record of layout `T`
    pub fn find_first<T: Structure>(&self) -> Option<&T> {
        self.first(T::TYPE).and_then(T::from_decoded)
    }

    /// All retained records of layout `T`
    pub fn find_all<'a, T: Structure + 'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
        self.all(T::TYPE).iter().filter_map(|r| T::from_decoded(&r.structure))
    }

    typed_accessors! {
        /// BIOS Information (type 0)
        bios => BiosInformation,
        /// System Information (type 1)
        system => SystemInformation,
        /// Baseboard Information (type 2)
        baseboard => BaseboardInformation,
        /// Chassis Information (type 3)
        chassis => ChassisInformation,
        /// Processor Information (type 4)
        processor => ProcessorInformation,
        /// Cache Information (type 7)
        cache => CacheInformation,
        /// Port Connector (type 8)
        port_connector => PortConnector,
        /// System Slot (type 9)
        system_slot => SystemSlot,
        /// On Board Devices (type 10)
        onboard_devices => OnboardDevices,
        /// OEM Strings (type 11)
        oem_strings => OemStrings,
        /// System Configuration Options (type 12)
        system_configuration_options => SystemConfigurationOptions,
        /// BIOS Language (type 13)
        bios_language => BiosLanguage,
        /// Group Associations (type 14)
        group_associations => GroupAssociations,
        /// System Event Log (type 15)
        system_event_log => SystemEventLog,
        /// Physical Memory Array (type 16)
        physical_memory_array => PhysicalMemoryArray,
        /// Memory Device (type 17)
        memory_device => MemoryDevice,
        /// 32-bit Memory Error Information (type 18)
        memory_error_32 => MemoryError32,
        /// Memory Array Mapped Address (type 19)
        memory_array_mapped_address => MemoryArrayMappedAddress,
        /// Memory Device Mapped Address (type 20)
        memory_device_mapped_address => MemoryDeviceMappedAddress,
        /// Built-in Pointing Device (type 21)
        built_in_pointing_device => BuiltInPointingDevice,
        /// Portable Battery (type 22)
        portable_battery => PortableBattery,
        /// System Reset (type 23)
        system_reset => SystemReset,
        /// Hardware Security (type 24)
        hardware_security => HardwareSecurity,
        /// System Power Controls (type 25)
        system_power_controls => SystemPowerControls,
        /// Voltage Probe (type 26)
        voltage_probe => VoltageProbe,
        /// Cooling Device (type 27)
        cooling_device => CoolingDevice,
        /// Temperature Probe (type 28)
        temperature_probe => TemperatureProbe,
        /// Electrical Current Probe (type 29)
        current_probe => CurrentProbe,
        /// Out-of-band Remote Access (type 30)
        out_of_band_remote_access => OutOfBandRemoteAccess,
        /// System Boot Information (type 32)
        system_boot => SystemBootInformation,
        /// 64-bit Memory Error Information (type 33)
        memory_error_64 => MemoryError64,
        /// Management Device (type 34)
        management_device => ManagementDevice,
        /// Management Device Component (type 35)
        management_device_component => ManagementDeviceComponent,
        /// Management Device Threshold Data (type 36)
        management_device_threshold => ManagementDeviceThreshold,
        /// Memory Channel (type 37)
        memory_channel => MemoryChannel,
        /// IPMI Device Information (type 38)
        ipmi_device => IpmiDeviceInformation,
        /// System Power Supply (type 39)
        system_power_supply => SystemPowerSupply,
        /// Additional Information (type 40)
        additional_information => AdditionalInformation,
        /// Onboard Devices Extended Information (type 41)
        onboard_device_extended => OnboardDeviceExtended,
        /// Management Controller Host Interface (type 42)
        management_controller_host_interface => ManagementControllerHostInterface,
        /// TPM Device (type 43)
        tpm_device => TpmDevice,
    }

    // =========================================================================
    // Cross-references and walk results
    // =========================================================================

    /// Resolve a handle reference to the record carrying it
    pub fn by_handle(&self, handle: u16) -> Option<&DecodedRecord> {
        let &(code, index) = self.handles.get(&handle)?;
        self.records.get(&code)?.get(index)
    }

    /// Records that failed to decode
    pub fn errors(&self) -> &[RecordError] {
        &self.errors
    }

    /// Why the walk stopped
    pub fn walk_end(&self) -> WalkEnd {
        self.walk_end
    }

    /// Records visited by the walk, including malformed and end-of-table ones
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Entry point the table was located through
    pub fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    /// SMBIOS version the records were decoded against
    pub fn version(&self) -> SmbiosVersion {
        self.entry_point.version()
    }
}

// =============================================================================
// DECODER
// =============================================================================

/// Decode pipeline from a byte source to a [`DecodedTable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder
    pub const fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Locate the entry point through `source` and decode the table it points at
    pub fn decode<S: RawSource + ?Sized>(&self, source: &S) -> Result<DecodedTable> {
        let window = source.read(self.config.scan_base, self.config.scan_length)?;
        let (offset, entry) = EntryPoint::locate(&window, self.config.anchor_alignment)?;

        log::info!(
            "SMBIOS {} entry point at {:#010x}, table {:#x} bytes at {:#010x}, {} structures",
            entry.version(),
            u64::from(self.config.scan_base) + offset as u64,
            entry.table_length,
            entry.table_address,
            entry.structure_count
        );

        self.check_entry_point(&entry)?;

        let table = source.read(entry.table_address, u32::from(entry.table_length))?;
        Ok(self.decode_table(entry, &table))
    }

    fn check_entry_point(&self, entry: &EntryPoint) -> Result<()> {
        if !entry.has_dmi_anchor() {
            log::warn!("intermediate anchor is not _DMI_");
        }

        let checks = [
            (entry.checksum_valid, "entry point"),
            (entry.intermediate_checksum_valid, "intermediate"),
        ];
        for (valid, field) in checks {
            if valid {
                continue;
            }
            match self.config.checksum_policy {
                ChecksumPolicy::Ignore => {}
                ChecksumPolicy::Warn => log::warn!("{} checksum mismatch, continuing", field),
                ChecksumPolicy::Reject => return Err(DmiError::ChecksumMismatch { field }),
            }
        }
        Ok(())
    }

    /// Walk and decode structure table bytes already read from the source
    ///
    /// Bytes past the table length declared by `entry` are ignored.
    /// Record-level failures are collected on the table, never returned.
    pub fn decode_table(&self, entry: EntryPoint, table: &[u8]) -> DecodedTable {
        let declared = (entry.table_length as usize).min(table.len());
        let version = entry.version();
        let mut decoded = DecodedTable::new(entry, self.config.retention);
        let mut walker = TableWalker::new(&table[..declared]);

        for item in walker.by_ref() {
            let record = match item {
                Ok(record) => record,
                Err(error) => {
                    log::warn!("skipping record: {}", error);
                    decoded.errors.push(error);
                    continue;
                }
            };
            if record.header.is_end_of_table() {
                continue;
            }

            match decode_structure(&record, version) {
                Ok(structure) => {
                    log::debug!(
                        "decoded type {} handle {:#06x} ({} bytes)",
                        record.header.structure_type,
                        record.header.handle,
                        record.header.length
                    );
                    decoded.insert(DecodedRecord {
                        header: record.header,
                        offset: record.offset,
                        structure,
                    });
                }
                Err(error) => {
                    let error = RecordError {
                        offset: record.offset,
                        structure_type: record.header.structure_type,
                        handle: record.header.handle,
                        error,
                    };
                    log::warn!("skipping record: {}", error);
                    decoded.errors.push(error);
                }
            }
        }

        decoded.walk_end = walker.end().unwrap_or(WalkEnd::EndedEarly { offset: walker.position() });
        decoded.visited = walker.visited();

        let declared_count = usize::from(decoded.entry_point.structure_count);
        if declared_count != 0 && declared_count != decoded.visited {
            log::warn!(
                "entry point declares {} structures, walked {}",
                declared_count,
                decoded.visited
            );
        }
        log::info!(
            "decoded {} records of {} types, {} errors",
            decoded.len(),
            decoded.records.len(),
            decoded.errors.len()
        );

        decoded
    }
}

/// Decode with the default configuration
pub fn decode<S: RawSource + ?Sized>(source: &S) -> Result<DecodedTable> {
    Decoder::default().decode(source)
}

// =============================================================================
// GLOBAL TABLE
// =============================================================================

static GLOBAL_TABLE: Once<DecodedTable> = Once::new();

/// Decode once into the process-wide table
///
/// The first successful call decodes through `source`; later calls return
/// the table already stored and ignore their arguments. A failed decode
/// leaves the handle uninitialised so it can be retried.
pub fn init_global<S: RawSource + ?Sized>(source: &S, config: DecoderConfig) -> Result<&'static DecodedTable> {
    GLOBAL_TABLE.try_call_once(|| Decoder::new(config).decode(source))
}

/// The process-wide table, if [`init_global`] has succeeded
pub fn global() -> Option<&'static DecodedTable> {
    GLOBAL_TABLE.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::tests::build_entry_point;
    use crate::source::MemoryImage;
    use crate::walker::tests::push_record;
    use alloc::vec;

    const TABLE_BASE: u32 = 0x000E_0000;

    fn memory_device_body(locator: u8) -> Vec<u8> {
        vec![0x00, 0x10, 0xFE, 0xFF, 64, 0, 64, 0, 0x00, 0x20, 0x09, 0, locator, 0, 0x1A, 0x80, 0x00]
    }

    fn sample_table() -> Vec<u8> {
        let mut table = Vec::new();
        let bios = [1, 2, 0x00, 0xF0, 3, 0x7F, 0x80, 0x98, 0, 0, 0, 0, 0, 0];
        push_record(&mut table, 0, 0x0000, &bios, &["Acme", "1.2.3", "01/01/2024"]);
        push_record(&mut table, 16, 0x1000, &[0x03, 0x03, 0x03, 0, 0, 0, 0x01, 0xFE, 0xFF, 2, 0], &[]);
        push_record(&mut table, 17, 0x1100, &memory_device_body(1), &["DIMM_A1"]);
        push_record(&mut table, 17, 0x1101, &memory_device_body(1), &["DIMM_A2"]);
        push_record(&mut table, 127, 0xFFFF, &[], &[]);
        table
    }

    fn decode_with(retention: Retention) -> DecodedTable {
        let table = sample_table();
        let entry = EntryPoint::parse(&build_entry_point(2, 8, table.len() as u16, TABLE_BASE, 5)).unwrap();
        Decoder::new(DecoderConfig::new().with_retention(retention)).decode_table(entry, &table)
    }

    #[test]
    fn test_retain_all() {
        let table = decode_with(Retention::All);
        assert_eq!(table.len(), 4);
        assert_eq!(table.type_codes().collect::<Vec<_>>(), [0, 16, 17]);
        assert!(!table.contains(127));
        assert_eq!(table.walk_end(), WalkEnd::EndOfTable);
        assert_eq!(table.visited(), 5);
        assert!(table.errors().is_empty());

        let locators: Vec<_> = table.find_all::<MemoryDevice>().map(|d| d.device_locator.as_str()).collect();
        assert_eq!(locators, ["DIMM_A1", "DIMM_A2"]);
        assert_eq!(table.memory_device().unwrap().device_locator, "DIMM_A2");
        assert_eq!(table.find_first::<MemoryDevice>().unwrap().device_locator, "DIMM_A1");
        assert_eq!(table.bios().unwrap().vendor, "Acme");
    }

    #[test]
    fn test_retain_first_and_last() {
        let first = decode_with(Retention::First);
        assert_eq!(first.all(17).len(), 1);
        assert_eq!(first.memory_device().unwrap().device_locator, "DIMM_A1");
        assert!(first.by_handle(0x1101).is_none());

        let last = decode_with(Retention::Last);
        assert_eq!(last.all(17).len(), 1);
        assert_eq!(last.memory_device().unwrap().device_locator, "DIMM_A2");
        assert!(last.by_handle(0x1100).is_none());
        assert_eq!(last.by_handle(0x1101).unwrap().header.structure_type, 17);
    }

    #[test]
    fn test_by_handle_follows_references() {
        let table = decode_with(Retention::All);
        let dimm = table.memory_device().unwrap();
        let array = table.by_handle(dimm.array_handle).unwrap();
        assert!(matches!(array.structure, DecodedStructure::PhysicalMemoryArray(_)));
        assert!(table.by_handle(0xBEEF).is_none());
    }

    #[test]
    fn test_record_failure_is_local() {
        let mut table = Vec::new();
        push_record(&mut table, 17, 0x1100, &memory_device_body(3), &["DIMM_A1"]);
        push_record(&mut table, 1, 0x0100, &[1, 2, 0, 0], &["Acme", "Widget"]);
        push_record(&mut table, 127, 0xFFFF, &[], &[]);
        let entry = EntryPoint::parse(&build_entry_point(2, 8, table.len() as u16, TABLE_BASE, 3)).unwrap();
        let decoded = Decoder::default().decode_table(entry, &table);

        assert_eq!(decoded.errors().len(), 1);
        let error = &decoded.errors()[0];
        assert_eq!(error.structure_type, 17);
        assert_eq!(error.handle, 0x1100);
        assert_eq!(error.error, DmiError::StringIndexOutOfRange { index: 3, available: 1 });
        assert!(!decoded.contains(17));
        assert_eq!(decoded.system().unwrap().product_name, "Widget");
    }

    #[test]
    fn test_table_length_bounds_walk() {
        // BIOS record is 41 bytes, the memory array record 17
        let table = sample_table();
        let entry = EntryPoint::parse(&build_entry_point(2, 8, 58, TABLE_BASE, 0)).unwrap();
        let decoded = Decoder::default().decode_table(entry, &table);
        assert_eq!(decoded.walk_end(), WalkEnd::EndedEarly { offset: 58 });
        assert_eq!(decoded.visited(), 2);
        assert!(decoded.contains(16));
        assert!(decoded.contains(0));
        assert!(!decoded.contains(17));
    }

    #[test]
    fn test_decode_through_source() {
        let table = sample_table();
        let mut window = vec![0u8; 0x100];
        let entry = build_entry_point(2, 8, table.len() as u16, TABLE_BASE, 5);
        window[0x40..0x40 + entry.len()].copy_from_slice(&entry);
        let image = MemoryImage::new().with_region(0xF0000, window).with_region(TABLE_BASE, table);

        let config = DecoderConfig::new().with_scan_window(0xF0000, 0x100);
        let decoded = Decoder::new(config).decode(&image).unwrap();
        assert_eq!(decoded.version(), SmbiosVersion::new(2, 8));
        assert_eq!(decoded.entry_point().table_address, TABLE_BASE);
        assert_eq!(decoded.len(), 4);
    }

    #[test]
    fn test_checksum_policies() {
        let table = sample_table();
        let mut entry = build_entry_point(2, 8, table.len() as u16, TABLE_BASE, 5);
        entry[0x04] = entry[0x04].wrapping_add(1);
        let image = MemoryImage::new().with_region(0xF0000, entry).with_region(TABLE_BASE, table);
        let config = DecoderConfig::new().with_scan_window(0xF0000, 0x1F);

        assert!(Decoder::new(config).decode(&image).is_ok());
        assert!(Decoder::new(config.with_checksum_policy(ChecksumPolicy::Ignore)).decode(&image).is_ok());
        assert_eq!(
            Decoder::new(config.with_checksum_policy(ChecksumPolicy::Reject)).decode(&image),
            Err(DmiError::ChecksumMismatch { field: "entry point" })
        );
    }

    #[test]
    fn test_missing_table_region() {
        let entry = build_entry_point(2, 8, 0x40, TABLE_BASE, 1);
        let image = MemoryImage::new().with_region(0xF0000, entry);
        let config = DecoderConfig::new().with_scan_window(0xF0000, 0x1F);
        assert_eq!(
            Decoder::new(config).decode(&image),
            Err(DmiError::SourceUnavailable { base: TABLE_BASE, length: 0x40 })
        );
    }
}
