//! Hub Firmware - firmware package reader for programmable hubs
//!
//! This library validates and unpacks the zip packages that firmware for the
//! LEGO Powered Up family of hubs is distributed in, and encodes custom hub
//! names for embedding into the firmware image.
//!
//! # Overview
//!
//! A firmware package is a zip archive holding exactly four required entries:
//!
//! - `firmware-base.bin` - the raw firmware image
//! - `firmware.metadata.json` - build and runtime parameters ([`FirmwareMetadata`])
//! - `main.py` - the bootstrap script
//! - `ReadMe_OSS.txt` - open source license notices
//!
//! # Example
//!
//! ```ignore
//! use hub_firmware::{encode_hub_name, FirmwarePackage};
//!
//! let package = FirmwarePackage::open(&zip_bytes)?;
//! let metadata = package.read_metadata().await?;
//! let mut image = package.read_firmware_image().await?;
//!
//! hub_firmware::splice_hub_name(&mut image, "My Hub", &metadata)?;
//! ```

pub mod archive;
pub mod error;
pub mod hub_name;
pub mod metadata;
pub mod package;

pub use archive::{Archive, ArchiveError, ArchiveReader, EntryLocator, ZipReader};
pub use error::{FirmwareError, FirmwareErrorKind, MetadataError, Result};
pub use hub_name::{encode_hub_name, splice_hub_name};
pub use metadata::{ChecksumType, FirmwareMetadata, HubType};
pub use package::FirmwarePackage;
