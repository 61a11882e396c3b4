//! Hub name encoding.
//!
//! Firmware images built with metadata 1.1.0 or later reserve a fixed-size
//! buffer at `hub-name-offset` holding the Bluetooth name the hub advertises.
//! The name is stored as UTF-8 and always zero-terminated.

use tracing::debug;

use crate::error::{FirmwareError, Result};
use crate::metadata::FirmwareMetadata;

/// Encode a hub name as zero-terminated UTF-8.
///
/// The result is exactly `max-hub-name-size` bytes long and can be written to
/// the firmware image at `hub-name-offset`. Names that do not fit are
/// truncated at the last whole character that leaves room for the
/// terminator.
///
/// # Errors
///
/// Returns [`FirmwareError::NameEncodingUnsupported`] if the metadata has no
/// `max-hub-name-size`.
///
/// # Example
///
/// ```
/// # use hub_firmware::{encode_hub_name, FirmwareMetadata};
/// # let mut metadata: FirmwareMetadata = serde_json::from_str(r#"{
/// #     "metadata-version": "1.1.0", "firmware-version": "v3.1.0",
/// #     "device-id": 65, "checksum-type": "sum", "mpy-abi-version": 5,
/// #     "mpy-cross-options": [], "user-mpy-offset": 0, "max-firmware-size": 0
/// # }"#).unwrap();
/// metadata.max_hub_name_size = Some(5);
///
/// assert_eq!(encode_hub_name("ABCDE", &metadata).unwrap(), b"ABCD\0");
/// assert_eq!(encode_hub_name("AB", &metadata).unwrap(), b"AB\0\0\0");
/// ```
pub fn encode_hub_name(name: &str, metadata: &FirmwareMetadata) -> Result<Vec<u8>> {
    let size = metadata
        .max_hub_name_size
        .ok_or(FirmwareError::NameEncodingUnsupported)? as usize;

    let mut bytes = vec![0u8; size];
    let len = truncated_len(name, size.saturating_sub(1));
    bytes[..len].copy_from_slice(&name.as_bytes()[..len]);

    Ok(bytes)
}

/// Write an encoded hub name into a firmware image.
///
/// # Errors
///
/// - [`FirmwareError::NameEncodingUnsupported`] if the metadata lacks
///   `hub-name-offset` or `max-hub-name-size`
/// - [`FirmwareError::HubNameOutOfBounds`] if the name storage does not fit
///   inside `image`; the image is left unchanged
pub fn splice_hub_name(image: &mut [u8], name: &str, metadata: &FirmwareMetadata) -> Result<()> {
    let offset = metadata
        .hub_name_offset
        .ok_or(FirmwareError::NameEncodingUnsupported)? as usize;
    let encoded = encode_hub_name(name, metadata)?;

    let end = offset
        .checked_add(encoded.len())
        .filter(|end| *end <= image.len())
        .ok_or(FirmwareError::HubNameOutOfBounds {
            offset,
            size: encoded.len(),
            image_len: image.len(),
        })?;

    image[offset..end].copy_from_slice(&encoded);
    debug!(offset, size = encoded.len(), "wrote hub name into firmware image");

    Ok(())
}

/// Longest prefix of `name` that fits in `capacity` bytes without splitting
/// a character.
fn truncated_len(name: &str, capacity: usize) -> usize {
    if name.len() <= capacity {
        return name.len();
    }

    let mut len = capacity;
    while !name.is_char_boundary(len) {
        len -= 1;
    }
    len
}
