//! End-to-end decoding over captured memory images

use dmi_decoder::config::PARAGRAPH_ALIGNMENT;
use dmi_decoder::{
    decode, ChecksumPolicy, DecodedStructure, Decoder, DecoderConfig, DmiError, MemoryImage, Retention,
    SmbiosVersion, SystemInformation, SystemUuid, WalkEnd,
};

const SCAN_BASE: u32 = 0x000F_0000;
const TABLE_BASE: u32 = 0x000E_8000;

fn record(table: &mut Vec<u8>, structure_type: u8, handle: u16, body: &[u8], strings: &[&str]) {
    table.push(structure_type);
    table.push((4 + body.len()) as u8);
    table.extend_from_slice(&handle.to_le_bytes());
    table.extend_from_slice(body);
    for s in strings {
        table.extend_from_slice(s.as_bytes());
        table.push(0);
    }
    if strings.is_empty() {
        table.push(0);
    }
    table.push(0);
}

fn entry_point(major: u8, minor: u8, table: &[u8], count: u16) -> Vec<u8> {
    let mut ep = vec![0u8; 0x1F];
    ep[..4].copy_from_slice(b"_SM_");
    ep[0x05] = 0x1F;
    ep[0x06] = major;
    ep[0x07] = minor;
    ep[0x10..0x15].copy_from_slice(b"_DMI_");
    ep[0x16..0x18].copy_from_slice(&(table.len() as u16).to_le_bytes());
    ep[0x18..0x1C].copy_from_slice(&TABLE_BASE.to_le_bytes());
    ep[0x1C..0x1E].copy_from_slice(&count.to_le_bytes());
    ep[0x1E] = (major << 4) | minor;

    let sum = |bytes: &[u8]| bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    ep[0x15] = 0u8.wrapping_sub(sum(&ep[0x10..]));
    ep[0x04] = 0u8.wrapping_sub(sum(&ep));
    ep
}

/// Legacy window with the entry point at `offset`, plus the table region
fn image(entry: &[u8], offset: usize, table: Vec<u8>) -> MemoryImage {
    let mut window = vec![0u8; 0x1_0000];
    window[offset..offset + entry.len()].copy_from_slice(entry);
    MemoryImage::new()
        .with_region(SCAN_BASE, window)
        .with_region(TABLE_BASE, table)
}

fn system_body() -> Vec<u8> {
    let mut body = vec![1, 2, 3, 0];
    body.extend((0u8..16).map(|i| i * 0x11));
    body.extend_from_slice(&[0x06, 0, 0]);
    body
}

fn system_table() -> Vec<u8> {
    let mut table = Vec::new();
    record(&mut table, 1, 0x0001, &system_body(), &["Acme", "Widget", "1.0"]);
    record(&mut table, 127, 0xFEFF, &[], &[]);
    table
}

#[test]
fn test_system_information_end_to_end() {
    let table = system_table();
    let entry = entry_point(2, 8, &table, 2);
    let decoded = decode(&image(&entry, 0x5A30, table)).unwrap();

    assert_eq!(decoded.version(), SmbiosVersion::new(2, 8));
    assert_eq!(decoded.walk_end(), WalkEnd::EndOfTable);
    assert!(decoded.errors().is_empty());
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.type_codes().collect::<Vec<_>>(), [1]);
    assert_eq!(decoded.all(1).len(), 1);

    let system = decoded.system().unwrap();
    assert_eq!(system.manufacturer, "Acme");
    assert_eq!(system.product_name, "Widget");
    assert_eq!(system.version, "1.0");
    assert_eq!(system.serial_number, "Not Specified");
    let uuid = system.uuid.unwrap();
    assert!(matches!(uuid, SystemUuid::Id(_)));
    assert_eq!(uuid.to_string(), "33221100-5544-7766-8899-AABBCCDDEEFF");

    let by_handle = decoded.by_handle(0x0001).unwrap();
    assert_eq!(by_handle.header.structure_type, 1);
    assert_eq!(by_handle.structure.name(), "System Information");
}

#[test]
fn test_uuid_stored_as_shown_before_2_6() {
    let table = system_table();
    let entry = entry_point(2, 4, &table, 2);
    let decoded = decode(&image(&entry, 0x100, table)).unwrap();
    let uuid = decoded.find::<SystemInformation>().and_then(|s| s.uuid).unwrap();
    assert_eq!(uuid.to_string(), "00112233-4455-6677-8899-AABBCCDDEEFF");
}

#[test]
fn test_decode_is_deterministic() {
    let table = system_table();
    let entry = entry_point(2, 8, &table, 2);
    let source = image(&entry, 0x2000, table);
    assert_eq!(decode(&source).unwrap(), decode(&source).unwrap());
}

#[test]
fn test_bad_record_does_not_abort_walk() {
    let mut table = Vec::new();
    record(&mut table, 1, 0x0001, &system_body(), &["Acme", "Widget", "1.0"]);
    // Header claims a length shorter than the header itself
    table.extend_from_slice(&[0x02, 0x02, 0x02, 0x00, b'x', 0, 0]);
    record(&mut table, 11, 0x000B, &[2], &["oem one", "oem two"]);
    record(&mut table, 127, 0xFEFF, &[], &[]);

    let entry = entry_point(2, 8, &table, 4);
    let decoded = decode(&image(&entry, 0x40, table)).unwrap();

    assert_eq!(decoded.walk_end(), WalkEnd::EndOfTable);
    assert_eq!(decoded.visited(), 4);
    assert_eq!(decoded.errors().len(), 1);
    let error = &decoded.errors()[0];
    assert_eq!(error.structure_type, 2);
    assert_eq!(error.handle, 0x0002);
    assert!(matches!(error.error, DmiError::MalformedRecord { field: "length", .. }));

    assert!(decoded.system().is_some());
    assert_eq!(decoded.oem_strings().unwrap().strings, ["oem one", "oem two"]);
    assert!(!decoded.contains(2));
}

#[test]
fn test_truncated_table_ends_early() {
    let mut table = system_table();
    table.truncate(table.len() - 6);
    let entry = entry_point(2, 8, &table, 2);
    let decoded = decode(&image(&entry, 0x40, table)).unwrap();
    assert!(!decoded.walk_end().is_complete());
    assert!(decoded.system().is_some());
}

#[test]
fn test_unknown_types_are_kept_raw() {
    let mut table = Vec::new();
    record(&mut table, 0xDD, 0x00DD, &[0x01, 0x02, 0x03], &["vendor"]);
    record(&mut table, 127, 0xFEFF, &[], &[]);
    let entry = entry_point(3, 0, &table, 2);
    let decoded = decode(&image(&entry, 0x40, table)).unwrap();

    match decoded.get(0xDD).unwrap() {
        DecodedStructure::Unknown(raw) => {
            assert_eq!(raw.formatted[4..], [0x01, 0x02, 0x03]);
            assert_eq!(raw.strings, ["vendor"]);
        }
        other => panic!("expected raw structure, got {:?}", other),
    }
}

#[test]
fn test_anchor_not_found() {
    let source = MemoryImage::new().with_region(SCAN_BASE, vec![0u8; 0x1_0000]);
    assert_eq!(decode(&source), Err(DmiError::AnchorNotFound));
}

#[test]
fn test_unaligned_anchor_found_by_default() {
    let table = system_table();
    let entry = entry_point(2, 8, &table, 2);
    let source = image(&entry, 0x1003, table);

    let decoded = decode(&source).unwrap();
    assert_eq!(decoded.system().unwrap().manufacturer, "Acme");

    // Restricting the scan to paragraph boundaries skips it
    let paragraph = DecoderConfig::new().with_anchor_alignment(PARAGRAPH_ALIGNMENT);
    assert_eq!(Decoder::new(paragraph).decode(&source), Err(DmiError::AnchorNotFound));
}

#[test]
fn test_scan_window_unavailable() {
    let err = decode(&MemoryImage::new()).unwrap_err();
    assert_eq!(err, DmiError::SourceUnavailable { base: SCAN_BASE, length: 0x1_0000 });
    assert!(err.is_fatal());
}

#[test]
fn test_intermediate_checksum_rejected() {
    let table = system_table();
    let mut entry = entry_point(2, 8, &table, 2);
    entry[0x15] = entry[0x15].wrapping_add(1);
    entry[0x04] = entry[0x04].wrapping_sub(1);
    let source = image(&entry, 0x40, table);

    assert!(decode(&source).is_ok());
    let strict = DecoderConfig::new().with_checksum_policy(ChecksumPolicy::Reject);
    assert_eq!(
        Decoder::new(strict).decode(&source),
        Err(DmiError::ChecksumMismatch { field: "intermediate" })
    );
}

#[test]
fn test_retention_modes() {
    let mut table = Vec::new();
    record(&mut table, 11, 0x0B00, &[1], &["first"]);
    record(&mut table, 11, 0x0B01, &[1], &["second"]);
    record(&mut table, 127, 0xFEFF, &[], &[]);
    let entry = entry_point(2, 8, &table, 3);
    let source = image(&entry, 0x40, table);

    let oem = |retention: Retention| {
        let decoded = Decoder::new(DecoderConfig::new().with_retention(retention))
            .decode(&source)
            .unwrap();
        decoded
            .all(11)
            .iter()
            .filter_map(|r| match &r.structure {
                DecodedStructure::OemStrings(oem) => Some(oem.strings[0].clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(oem(Retention::All), ["first", "second"]);
    assert_eq!(oem(Retention::First), ["first"]);
    assert_eq!(oem(Retention::Last), ["second"]);
    assert_eq!(DecoderConfig::legacy().retention, Retention::Last);
}
