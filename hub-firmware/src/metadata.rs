//! Firmware metadata schema.
//!
//! Every firmware package carries a `firmware.metadata.json` document that
//! describes how the firmware image was built and how it expects to be used.
//!
//! # Schema Versions
//!
//! - **1.0.0**: required core fields only
//! - **1.1.0**: adds `hub-name-offset`, `max-hub-name-size` and `firmware-sha256`
//!
//! Fields added after 1.0.0 are `Option`s, so code reading an older package
//! has to handle their absence explicitly.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

/// First metadata version that carries the hub name and SHA-256 fields.
pub const HUB_NAME_METADATA_VERSION: Version = Version::new(1, 1, 0);

/// LEGO Powered Up hub IDs.
///
/// Serialized as the integer `device-id` reported by the hub bootloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum HubType {
    /// LEGO BOOST Move hub.
    MoveHub = 0x40,
    /// LEGO Powered Up 2-port hub.
    CityHub = 0x41,
    /// LEGO Technic 4-port hub.
    TechnicHub = 0x80,
}

impl HubType {
    /// All supported hub types, in device ID order.
    pub const ALL: [HubType; 3] = [HubType::MoveHub, HubType::CityHub, HubType::TechnicHub];

    /// Device ID as reported by the hub.
    pub const fn device_id(self) -> u8 {
        self as u8
    }

    /// Canonical file name of the firmware package for this hub.
    ///
    /// # Example
    ///
    /// ```
    /// use hub_firmware::HubType;
    ///
    /// assert_eq!(HubType::CityHub.zip_file_name(), "cityhub.zip");
    /// ```
    pub const fn zip_file_name(self) -> &'static str {
        match self {
            HubType::MoveHub => "movehub.zip",
            HubType::CityHub => "cityhub.zip",
            HubType::TechnicHub => "technichub.zip",
        }
    }

    /// Human-readable product name.
    pub const fn display_name(self) -> &'static str {
        match self {
            HubType::MoveHub => "BOOST Move Hub",
            HubType::CityHub => "City Hub",
            HubType::TechnicHub => "Technic Hub",
        }
    }
}

impl fmt::Display for HubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl From<HubType> for u8 {
    fn from(hub: HubType) -> Self {
        hub.device_id()
    }
}

impl TryFrom<u8> for HubType {
    type Error = UnknownHubType;

    fn try_from(device_id: u8) -> Result<Self, Self::Error> {
        HubType::ALL
            .into_iter()
            .find(|hub| hub.device_id() == device_id)
            .ok_or(UnknownHubType(device_id))
    }
}

/// A `device-id` that does not match any supported hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownHubType(pub u8);

impl fmt::Display for UnknownHubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hub device ID {:#04x}", self.0)
    }
}

impl std::error::Error for UnknownHubType {}

/// Checksum algorithm the hub bootloader uses to verify the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumType {
    /// 32-bit sum of the image words.
    Sum,
    /// CRC-32 of the image.
    Crc32,
}

impl fmt::Display for ChecksumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumType::Sum => write!(f, "sum"),
            ChecksumType::Crc32 => write!(f, "crc32"),
        }
    }
}

/// Contents of `firmware.metadata.json`.
///
/// Field names match the kebab-case JSON keys. Unknown keys are ignored so
/// packages with a newer metadata version still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FirmwareMetadata {
    /// Version of the metadata format itself, as written in the document.
    ///
    /// Kept verbatim; see [`FirmwareMetadata::parsed_metadata_version`].
    pub metadata_version: String,

    /// Version of the firmware binary.
    pub firmware_version: String,

    /// Hub the firmware runs on.
    pub device_id: HubType,

    /// Checksum used by the bootloader to verify the firmware.
    pub checksum_type: ChecksumType,

    /// `.mpy` ABI version the firmware can execute.
    pub mpy_abi_version: u32,

    /// Options to pass to `mpy-cross` to produce a compatible `.mpy` file.
    pub mpy_cross_options: Vec<String>,

    /// Offset from the start of the firmware where a `.mpy` file is expected.
    pub user_mpy_offset: u32,

    /// Maximum firmware size allowed on the hub.
    pub max_firmware_size: u32,

    /// Offset of the hub name storage in the firmware (since 1.1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_name_offset: Option<u32>,

    /// Size of the hub name storage in bytes, including the terminator (since 1.1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hub_name_size: Option<u32>,

    /// SHA-256 hash of the firmware, lowercase hex (since 1.1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_sha256: Option<String>,
}

impl FirmwareMetadata {
    /// Parse a metadata document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Whether the firmware image has room for a custom hub name.
    pub fn supports_hub_name(&self) -> bool {
        self.max_hub_name_size.is_some()
    }

    /// The metadata version as a semantic version.
    ///
    /// Accepts strict semver as well as shortened forms such as `1.1`, where
    /// missing components count as zero. Returns `None` if the string is not
    /// a version at all.
    pub fn parsed_metadata_version(&self) -> Option<Version> {
        parse_lenient_version(&self.metadata_version)
    }

    /// Whether the metadata version is new enough to carry the 1.1.0 fields.
    ///
    /// The optional fields themselves are still checked individually; this
    /// only reports what the document claims. An unparseable version counts
    /// as old.
    pub fn has_extended_fields(&self) -> bool {
        self.parsed_metadata_version()
            .is_some_and(|version| version >= HUB_NAME_METADATA_VERSION)
    }
}

fn parse_lenient_version(text: &str) -> Option<Version> {
    let text = text.trim();
    if let Ok(version) = Version::parse(text) {
        return Some(version);
    }

    let mut parts = [0u64; 3];
    let mut count = 0;
    for component in text.split('.') {
        if count == parts.len() {
            return None;
        }
        parts[count] = component.parse().ok()?;
        count += 1;
    }

    Some(Version::new(parts[0], parts[1], parts[2]))
}
