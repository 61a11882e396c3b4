//! Archive access abstraction.
//!
//! Firmware packages are zip files, but the package reader never parses zip
//! structures itself. It talks to an [`ArchiveReader`], which opens raw bytes
//! into an [`Archive`] of named entries.
//!
//! # Design Principles
//!
//! - **Borrowed data**: An opened archive borrows the caller's bytes for its
//!   lifetime and never copies them wholesale
//! - **Opaque errors**: Every adapter failure is a single [`ArchiveError`] class
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support
//!
//! # Example
//!
//! ```ignore
//! use hub_firmware::archive::{Archive, ArchiveReader, ZipReader};
//!
//! let archive = ZipReader::new().open(&zip_bytes)?;
//! if let Some(entry) = archive.locate("main.py") {
//!     let script = archive.read_text(&entry).await?;
//! }
//! ```

mod zip_reader;

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

pub use zip_reader::{ZipEntries, ZipReader};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Opaque error raised by an archive adapter.
///
/// Wraps whatever the underlying archive library reported. `Display` and
/// `source()` are forwarded to the wrapped error.
#[derive(Debug)]
pub struct ArchiveError {
    inner: Box<dyn StdError + Send + Sync + 'static>,
}

impl ArchiveError {
    /// Wrap an adapter error (or a plain message).
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self { inner: err.into() }
    }
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for ArchiveError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

/// Location of a named entry inside an opened archive.
///
/// Locators are handed out by [`Archive::locate`] and are only meaningful for
/// the archive that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLocator {
    name: String,
    index: usize,
}

impl EntryLocator {
    /// Create a locator for the entry at `index` named `name`.
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Entry name as stored in the archive.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adapter-specific position of the entry.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Opens raw bytes as an archive.
pub trait ArchiveReader: Send + Sync {
    /// Interpret `data` as an archive.
    ///
    /// # Errors
    ///
    /// Returns an [`ArchiveError`] if `data` is not a readable archive.
    fn open<'a>(&self, data: &'a [u8]) -> Result<Box<dyn Archive + 'a>, ArchiveError>;
}

/// An opened archive of named entries.
///
/// All implementations must be `Send + Sync` so entry reads can be awaited
/// from any task.
pub trait Archive: Send + Sync {
    /// Find the entry with exactly this name.
    fn locate(&self, name: &str) -> Option<EntryLocator>;

    /// Number of entries in the archive.
    fn len(&self) -> usize;

    /// Whether the archive has no entries at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read an entry as raw (decompressed) bytes.
    fn read_bytes<'s>(
        &'s self,
        entry: &'s EntryLocator,
    ) -> BoxFuture<'s, Result<Vec<u8>, ArchiveError>>;

    /// Read an entry as UTF-8 text.
    fn read_text<'s>(
        &'s self,
        entry: &'s EntryLocator,
    ) -> BoxFuture<'s, Result<String, ArchiveError>> {
        Box::pin(async move {
            let bytes = self.read_bytes(entry).await?;
            String::from_utf8(bytes).map_err(ArchiveError::new)
        })
    }
}
