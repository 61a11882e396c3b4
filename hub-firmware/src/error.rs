//! Error types for firmware package operations.

use thiserror::Error;

use crate::archive::ArchiveError;

/// Result type for firmware package operations.
pub type Result<T> = std::result::Result<T, FirmwareError>;

/// Kinds of [`FirmwareError`], without their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirmwareErrorKind {
    /// The bytes could not be read as a zip archive.
    MalformedArchive,
    /// The archive has no `firmware-base.bin` entry.
    MissingFirmwareImage,
    /// The archive has no `firmware.metadata.json` entry.
    MissingMetadata,
    /// The archive has no `main.py` entry.
    MissingScript,
    /// The archive has no `ReadMe_OSS.txt` entry.
    MissingLicense,
    /// The metadata entry could not be read or parsed.
    InvalidMetadata,
    /// An entry could not be decompressed or decoded.
    EntryRead,
    /// The firmware image has no hub name storage.
    NameEncodingUnsupported,
    /// The hub name storage lies outside the firmware image.
    HubNameOutOfBounds,
}

impl FirmwareErrorKind {
    /// Human-readable message for this kind of error.
    pub const fn message(self) -> &'static str {
        match self {
            Self::MalformedArchive => "bad zip data",
            Self::MissingFirmwareImage => "missing firmware-base.bin",
            Self::MissingMetadata => "missing firmware.metadata.json",
            Self::MissingScript => "missing main.py",
            Self::MissingLicense => "missing ReadMe_OSS.txt",
            Self::InvalidMetadata => "invalid firmware.metadata.json",
            Self::EntryRead => "failed to read archive entry",
            Self::NameEncodingUnsupported => "firmware image does not support hub name",
            Self::HubNameOutOfBounds => "hub name storage is outside the firmware image",
        }
    }
}

/// Errors that can occur while reading a firmware package.
#[derive(Debug, Error)]
pub enum FirmwareError {
    /// The bytes could not be read as a zip archive.
    #[error("{}: {0}", FirmwareErrorKind::MalformedArchive.message())]
    MalformedArchive(#[source] ArchiveError),

    /// The archive has no `firmware-base.bin` entry.
    #[error("{}", FirmwareErrorKind::MissingFirmwareImage.message())]
    MissingFirmwareImage,

    /// The archive has no `firmware.metadata.json` entry.
    #[error("{}", FirmwareErrorKind::MissingMetadata.message())]
    MissingMetadata,

    /// The archive has no `main.py` entry.
    #[error("{}", FirmwareErrorKind::MissingScript.message())]
    MissingScript,

    /// The archive has no `ReadMe_OSS.txt` entry.
    #[error("{}", FirmwareErrorKind::MissingLicense.message())]
    MissingLicense,

    /// The metadata entry exists but could not be read or parsed.
    #[error("{}: {0}", FirmwareErrorKind::InvalidMetadata.message())]
    InvalidMetadata(#[source] MetadataError),

    /// An entry exists but could not be decompressed or decoded.
    #[error("{} {entry}: {source}", FirmwareErrorKind::EntryRead.message())]
    EntryRead {
        entry: &'static str,
        #[source]
        source: ArchiveError,
    },

    /// The metadata does not declare hub name storage.
    #[error("{}", FirmwareErrorKind::NameEncodingUnsupported.message())]
    NameEncodingUnsupported,

    /// The declared hub name storage does not fit in the firmware image.
    #[error(
        "{}: {size} bytes at offset {offset}, image is {image_len} bytes",
        FirmwareErrorKind::HubNameOutOfBounds.message()
    )]
    HubNameOutOfBounds {
        offset: usize,
        size: usize,
        image_len: usize,
    },
}

impl FirmwareError {
    /// The kind of this error.
    pub fn kind(&self) -> FirmwareErrorKind {
        match self {
            Self::MalformedArchive(_) => FirmwareErrorKind::MalformedArchive,
            Self::MissingFirmwareImage => FirmwareErrorKind::MissingFirmwareImage,
            Self::MissingMetadata => FirmwareErrorKind::MissingMetadata,
            Self::MissingScript => FirmwareErrorKind::MissingScript,
            Self::MissingLicense => FirmwareErrorKind::MissingLicense,
            Self::InvalidMetadata(_) => FirmwareErrorKind::InvalidMetadata,
            Self::EntryRead { .. } => FirmwareErrorKind::EntryRead,
            Self::NameEncodingUnsupported => FirmwareErrorKind::NameEncodingUnsupported,
            Self::HubNameOutOfBounds { .. } => FirmwareErrorKind::HubNameOutOfBounds,
        }
    }
}

/// Why `firmware.metadata.json` could not be turned into metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The entry could not be decompressed or is not UTF-8.
    #[error("read failed: {0}")]
    Read(#[source] ArchiveError),

    /// The JSON is malformed or does not match the schema.
    #[error("parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
