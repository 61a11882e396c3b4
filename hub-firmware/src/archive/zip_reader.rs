//! Zip archive adapter backed by the `zip` crate.

use std::io::{Cursor, Read};

use tracing::trace;
use zip::ZipArchive;

use super::{Archive, ArchiveError, ArchiveReader, BoxFuture, EntryLocator};

/// Upper bound on the buffer reserved from an entry's declared size.
///
/// The declared size comes from the archive and is untrusted; reads beyond
/// this grow the buffer as bytes are actually decompressed.
const MAX_PREALLOCATION: u64 = 1024 * 1024;

/// Archive reader for in-memory zip files.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipReader;

impl ZipReader {
    /// Create a new zip reader.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveReader for ZipReader {
    fn open<'a>(&self, data: &'a [u8]) -> Result<Box<dyn Archive + 'a>, ArchiveError> {
        Ok(Box::new(ZipEntries::new(data)?))
    }
}

/// An opened zip archive borrowing its bytes.
///
/// Only the central directory is parsed up front. Entries are decompressed
/// on demand, each read working on its own clone of the archive handle so
/// reads never need exclusive access.
#[derive(Debug, Clone)]
pub struct ZipEntries<'a> {
    inner: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> ZipEntries<'a> {
    /// Parse the central directory of `data`.
    pub fn new(data: &'a [u8]) -> Result<Self, ArchiveError> {
        let inner = ZipArchive::new(Cursor::new(data)).map_err(ArchiveError::new)?;
        Ok(Self { inner })
    }
}

impl Archive for ZipEntries<'_> {
    fn locate(&self, name: &str) -> Option<EntryLocator> {
        self.inner
            .index_for_name(name)
            .map(|index| EntryLocator::new(name, index))
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn read_bytes<'s>(
        &'s self,
        entry: &'s EntryLocator,
    ) -> BoxFuture<'s, Result<Vec<u8>, ArchiveError>> {
        let mut archive = self.inner.clone();

        Box::pin(async move {
            let mut file = archive.by_index(entry.index()).map_err(ArchiveError::new)?;

            let mut bytes = Vec::with_capacity(file.size().min(MAX_PREALLOCATION) as usize);
            file.read_to_end(&mut bytes).map_err(ArchiveError::new)?;

            trace!(entry = entry.name(), bytes = bytes.len(), "read zip entry");
            Ok(bytes)
        })
    }
}
