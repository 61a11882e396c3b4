//! Firmware package validation and typed entry access.
//!
//! A [`FirmwarePackage`] is only ever produced by [`FirmwarePackage::open`] or
//! [`FirmwarePackage::open_with`], which either locate all four required
//! entries or fail. Callers never see a partially validated package.
//!
//! # Validation Order
//!
//! Entries are checked in a fixed order and the first missing one is
//! reported, so a broken package always yields the same error:
//!
//! 1. `firmware-base.bin`
//! 2. `firmware.metadata.json`
//! 3. `main.py`
//! 4. `ReadMe_OSS.txt`
//!
//! Entry contents are not inspected at open time. Metadata JSON is only
//! parsed when [`FirmwarePackage::read_metadata`] is called.

use std::fmt;

use tracing::debug;

use crate::archive::{Archive, ArchiveReader, EntryLocator, ZipReader};
use crate::error::{FirmwareError, MetadataError, Result};
use crate::metadata::FirmwareMetadata;

/// Name of the firmware image entry.
pub const FIRMWARE_IMAGE_ENTRY: &str = "firmware-base.bin";

/// Name of the metadata entry.
pub const METADATA_ENTRY: &str = "firmware.metadata.json";

/// Name of the bootstrap script entry.
pub const SCRIPT_ENTRY: &str = "main.py";

/// Name of the license notices entry.
pub const LICENSE_ENTRY: &str = "ReadMe_OSS.txt";

/// A validated firmware package.
///
/// Borrows the archive bytes it was opened from; they must outlive the
/// package. Every accessor re-reads its entry, so accessors can be called in
/// any order, repeatedly, and retried after a failure.
pub struct FirmwarePackage<'a> {
    archive: Box<dyn Archive + 'a>,
    firmware: EntryLocator,
    metadata: EntryLocator,
    script: EntryLocator,
    license: EntryLocator,
}

impl<'a> FirmwarePackage<'a> {
    /// Open and validate a firmware zip file.
    ///
    /// # Errors
    ///
    /// - [`FirmwareError::MalformedArchive`] if `data` is not a zip file
    /// - `Missing*` for the first required entry that is absent
    pub fn open(data: &'a [u8]) -> Result<Self> {
        Self::open_with(&ZipReader::new(), data)
    }

    /// Open and validate a firmware package using a custom archive reader.
    pub fn open_with<R>(reader: &R, data: &'a [u8]) -> Result<Self>
    where
        R: ArchiveReader + ?Sized,
    {
        let archive = reader
            .open(data)
            .map_err(FirmwareError::MalformedArchive)?;

        debug!(
            bytes = data.len(),
            entries = archive.len(),
            "opened firmware archive"
        );

        let firmware = require(&*archive, FIRMWARE_IMAGE_ENTRY, || {
            FirmwareError::MissingFirmwareImage
        })?;
        let metadata = require(&*archive, METADATA_ENTRY, || {
            FirmwareError::MissingMetadata
        })?;
        let script = require(&*archive, SCRIPT_ENTRY, || FirmwareError::MissingScript)?;
        let license = require(&*archive, LICENSE_ENTRY, || {
            FirmwareError::MissingLicense
        })?;

        Ok(Self {
            archive,
            firmware,
            metadata,
            script,
            license,
        })
    }

    /// Read `firmware-base.bin` as raw bytes.
    pub async fn read_firmware_image(&self) -> Result<Vec<u8>> {
        self.archive
            .read_bytes(&self.firmware)
            .await
            .map_err(|source| FirmwareError::EntryRead {
                entry: FIRMWARE_IMAGE_ENTRY,
                source,
            })
    }

    /// Read and parse `firmware.metadata.json`.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidMetadata`] if the entry cannot be
    /// decoded as UTF-8 or does not match the metadata schema.
    pub async fn read_metadata(&self) -> Result<FirmwareMetadata> {
        let json = self
            .archive
            .read_text(&self.metadata)
            .await
            .map_err(|e| FirmwareError::InvalidMetadata(MetadataError::Read(e)))?;

        FirmwareMetadata::from_json(&json)
            .map_err(|e| FirmwareError::InvalidMetadata(MetadataError::Parse(e)))
    }

    /// Read `main.py` as text.
    pub async fn read_script(&self) -> Result<String> {
        self.read_text_entry(&self.script, SCRIPT_ENTRY).await
    }

    /// Read `ReadMe_OSS.txt` as text.
    pub async fn read_license(&self) -> Result<String> {
        self.read_text_entry(&self.license, LICENSE_ENTRY).await
    }

    async fn read_text_entry(
        &self,
        locator: &EntryLocator,
        entry: &'static str,
    ) -> Result<String> {
        self.archive
            .read_text(locator)
            .await
            .map_err(|source| FirmwareError::EntryRead { entry, source })
    }
}

impl fmt::Debug for FirmwarePackage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirmwarePackage")
            .field("firmware", &self.firmware)
            .field("metadata", &self.metadata)
            .field("script", &self.script)
            .field("license", &self.license)
            .finish_non_exhaustive()
    }
}

fn require(
    archive: &dyn Archive,
    name: &str,
    missing: impl FnOnce() -> FirmwareError,
) -> Result<EntryLocator> {
    match archive.locate(name) {
        Some(locator) => {
            debug!(entry = name, index = locator.index(), "located entry");
            Ok(locator)
        }
        None => Err(missing()),
    }
}
