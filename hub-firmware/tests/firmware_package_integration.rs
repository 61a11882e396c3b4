//! Integration tests for firmware package reading.
//!
//! These tests build real zip archives in memory and verify:
//! - Structural validation and the order missing entries are reported in
//! - Typed access to every required entry
//! - Hub name encoding against metadata read from a package
//!
//! Run with: `cargo test --test firmware_package_integration`

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use hub_firmware::package::{FIRMWARE_IMAGE_ENTRY, LICENSE_ENTRY, METADATA_ENTRY, SCRIPT_ENTRY};
use hub_firmware::{
    encode_hub_name, splice_hub_name, ChecksumType, FirmwareError, FirmwareErrorKind,
    FirmwarePackage, HubType,
};

// ============================================================================
// Helper Functions
// ============================================================================

const METADATA_V1_1: &str = r#"{
    "metadata-version": "1.1.0",
    "firmware-version": "v3.1.0",
    "device-id": 65,
    "checksum-type": "sum",
    "mpy-abi-version": 5,
    "mpy-cross-options": ["-mno-unicode"],
    "user-mpy-offset": 100432,
    "max-firmware-size": 106496,
    "hub-name-offset": 16,
    "max-hub-name-size": 16,
    "firmware-sha256": "0000000000000000000000000000000000000000000000000000000000000000"
}"#;

const METADATA_V1_0: &str = r#"{
    "metadata-version": "1.0.0",
    "firmware-version": "v3.0.0",
    "device-id": 64,
    "checksum-type": "crc32",
    "mpy-abi-version": 5,
    "mpy-cross-options": [],
    "user-mpy-offset": 100432,
    "max-firmware-size": 106496
}"#;

const MAIN_PY: &str = "from pybricks.hubs import ThisHub\n";
const README_OSS: &str = "Open source notices\n\nMIT License\n";

/// A firmware image with a recognizable byte pattern.
fn firmware_image() -> Vec<u8> {
    (0..4096u32).map(|i| (i * 7 % 251) as u8).collect()
}

/// Build a zip archive from `(name, contents)` pairs.
fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, contents) in entries {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Build a complete firmware package with the given metadata document.
fn build_package(metadata: &str, image: &[u8]) -> Vec<u8> {
    build_zip(&[
        (FIRMWARE_IMAGE_ENTRY, image),
        (METADATA_ENTRY, metadata.as_bytes()),
        (SCRIPT_ENTRY, MAIN_PY.as_bytes()),
        (LICENSE_ENTRY, README_OSS.as_bytes()),
    ])
}

fn open_error(data: &[u8]) -> FirmwareError {
    FirmwarePackage::open(data).unwrap_err()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_non_archive_bytes_are_malformed() {
    for data in [&b""[..], &b"PK"[..], &b"not a zip archive at all"[..], &[0u8; 512][..]] {
        assert_eq!(open_error(data).kind(), FirmwareErrorKind::MalformedArchive);
    }
}

#[test]
fn test_missing_script_and_license_reports_script() {
    let image = firmware_image();
    let data = build_zip(&[
        (FIRMWARE_IMAGE_ENTRY, &image[..]),
        (METADATA_ENTRY, METADATA_V1_1.as_bytes()),
    ]);

    let err = open_error(&data);
    assert_eq!(err.kind(), FirmwareErrorKind::MissingScript);
    assert_eq!(err.to_string(), "missing main.py");
}

#[test]
fn test_each_missing_entry_has_its_own_kind() {
    let image = firmware_image();
    let all: [(&str, &[u8]); 4] = [
        (FIRMWARE_IMAGE_ENTRY, &image[..]),
        (METADATA_ENTRY, METADATA_V1_1.as_bytes()),
        (SCRIPT_ENTRY, MAIN_PY.as_bytes()),
        (LICENSE_ENTRY, README_OSS.as_bytes()),
    ];
    let kinds = [
        FirmwareErrorKind::MissingFirmwareImage,
        FirmwareErrorKind::MissingMetadata,
        FirmwareErrorKind::MissingScript,
        FirmwareErrorKind::MissingLicense,
    ];

    for (skip, kind) in kinds.into_iter().enumerate() {
        let entries: Vec<(&str, &[u8])> = all
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, entry)| *entry)
            .collect();

        let data = build_zip(&entries);
        assert_eq!(open_error(&data).kind(), kind, "skipping entry {}", skip);
    }
}

#[test]
fn test_empty_archive_reports_firmware_image_first() {
    let data = build_zip(&[]);
    assert_eq!(
        open_error(&data).kind(),
        FirmwareErrorKind::MissingFirmwareImage
    );
}

#[test]
fn test_entries_in_subdirectory_do_not_count() {
    let image = firmware_image();
    let data = build_zip(&[
        ("firmware/firmware-base.bin", &image[..]),
        (METADATA_ENTRY, METADATA_V1_1.as_bytes()),
        (SCRIPT_ENTRY, MAIN_PY.as_bytes()),
        (LICENSE_ENTRY, README_OSS.as_bytes()),
    ]);

    assert_eq!(
        open_error(&data).kind(),
        FirmwareErrorKind::MissingFirmwareImage
    );
}

#[tokio::test]
async fn test_complete_package_reads_all_entries() {
    let image = firmware_image();
    let data = build_package(METADATA_V1_1, &image);

    let package = FirmwarePackage::open(&data).unwrap();

    assert_eq!(package.read_firmware_image().await.unwrap(), image);
    assert_eq!(package.read_script().await.unwrap(), MAIN_PY);
    assert_eq!(package.read_license().await.unwrap(), README_OSS);

    let metadata = package.read_metadata().await.unwrap();
    assert_eq!(metadata.device_id, HubType::CityHub);
    assert_eq!(metadata.checksum_type, ChecksumType::Sum);
    assert_eq!(metadata.mpy_cross_options, vec!["-mno-unicode".to_string()]);
    assert_eq!(metadata.hub_name_offset, Some(16));
    assert_eq!(metadata.max_hub_name_size, Some(16));
}

#[tokio::test]
async fn test_accessors_can_be_called_in_any_order_and_repeatedly() {
    let image = firmware_image();
    let data = build_package(METADATA_V1_0, &image);
    let package = FirmwarePackage::open(&data).unwrap();

    let license = package.read_license().await.unwrap();
    let metadata = package.read_metadata().await.unwrap();
    let first = package.read_firmware_image().await.unwrap();
    let second = package.read_firmware_image().await.unwrap();

    assert_eq!(license, README_OSS);
    assert_eq!(metadata.device_id, HubType::MoveHub);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_malformed_metadata_fails_lazily() {
    let image = firmware_image();
    let data = build_package("{ this is not json", &image);

    // Opening succeeds; only the metadata accessor fails.
    let package = FirmwarePackage::open(&data).unwrap();
    assert!(package.read_firmware_image().await.is_ok());

    let err = package.read_metadata().await.unwrap_err();
    assert_eq!(err.kind(), FirmwareErrorKind::InvalidMetadata);
}

#[tokio::test]
async fn test_metadata_with_wrong_shape_is_invalid() {
    let image = firmware_image();
    let data = build_package(r#"{"metadata-version": "1.0.0"}"#, &image);
    let package = FirmwarePackage::open(&data).unwrap();

    let err = package.read_metadata().await.unwrap_err();
    assert_eq!(err.kind(), FirmwareErrorKind::InvalidMetadata);
}

#[tokio::test]
async fn test_hub_name_round_trip_through_package() {
    let image = firmware_image();
    let data = build_package(METADATA_V1_1, &image);
    let package = FirmwarePackage::open(&data).unwrap();

    let metadata = package.read_metadata().await.unwrap();
    let mut firmware = package.read_firmware_image().await.unwrap();

    let encoded = encode_hub_name("Pybricks City Hub", &metadata).unwrap();
    assert_eq!(encoded.len(), 16);
    assert_eq!(&encoded, b"Pybricks City H\0");

    splice_hub_name(&mut firmware, "Pybricks City Hub", &metadata).unwrap();
    assert_eq!(&firmware[16..32], &encoded[..]);
    assert_eq!(&firmware[..16], &image[..16]);
    assert_eq!(&firmware[32..], &image[32..]);
}

#[tokio::test]
async fn test_hub_name_unsupported_on_old_metadata() {
    let image = firmware_image();
    let data = build_package(METADATA_V1_0, &image);
    let package = FirmwarePackage::open(&data).unwrap();
    let metadata = package.read_metadata().await.unwrap();

    let err = encode_hub_name("", &metadata).unwrap_err();
    assert_eq!(err.kind(), FirmwareErrorKind::NameEncodingUnsupported);
}
