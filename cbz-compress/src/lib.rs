#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::{
    fs::File,
    io::{Cursor, Read, Seek, Write},
    path::Path,
    result,
};

use bytes::Bytes;
use camino::Utf8Path;
use tracing::{debug, info};
use zip::{read::ZipFile, write::FileOptions, ZipArchive, ZipWriter};

pub use crate::errors::{Error, Result};
use crate::image::{Image, PageKind};

pub mod config;
pub mod errors;
pub mod image;

/// Read side of a cbz archive
#[derive(Debug)]
pub struct CbzReader<R> {
    archive: ZipArchive<R>,
}

impl<R> CbzReader<R>
where
    R: Read + Seek,
{
    /// Creates a `CbzReader` from a `Read`
    ///
    /// ## Errors
    ///
    /// Fails if the underlying `ZipArchive` can't be created
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;

        Ok(Self { archive })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the entry stored at `index` in the archive
    ///
    /// ## Errors
    ///
    /// Fails if the index is out of bounds or the entry can't be read
    pub fn entry_at(&mut self, index: usize) -> Result<CbzEntry<'_>> {
        let archive_file = self.archive.by_index(index)?;

        Ok(CbzEntry(archive_file))
    }

    /// Iterates over the entries in archive order, never sorted: the
    /// enumeration order of the input is part of the observable contract.
    /// If the closure returns an error, this error is returned immediately.
    ///
    /// ## Errors
    ///
    /// Returns an error immediately if the provided closure returns an error
    pub fn try_for_each<F, E>(&mut self, mut f: F) -> result::Result<(), E>
    where
        F: FnMut(Result<CbzEntry<'_>>) -> result::Result<(), E>,
    {
        for index in 0..self.archive.len() {
            f(self.entry_at(index))?;
        }

        Ok(())
    }
}

impl CbzReader<File> {
    /// Creates a `CbzReader` from a path
    ///
    /// ## Errors
    ///
    /// Fails if the file can't be open or the underlying `ZipArchive` can't
    /// be created
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;

        Self::from_reader(file)
    }
}

impl CbzReader<Cursor<Bytes>> {
    /// Creates a `CbzReader` from bytes
    ///
    /// ## Errors
    ///
    /// Fails if the underlying `ZipArchive` can't be created
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes.into()))
    }
}

/// A single entry borrowed from a `CbzReader`
pub struct CbzEntry<'a>(ZipFile<'a>);

impl<'a> CbzEntry<'a> {
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.0.size()
    }

    /// Reads the whole entry content into `Bytes`
    ///
    /// ## Errors
    ///
    /// Fails if the entry size is too large to fit a `usize` on the host
    /// machine or if the content can't be read
    pub fn to_bytes(&mut self) -> Result<Bytes> {
        let size = usize::try_from(self.size()).map_err(|_| Error::EntryTooLarge)?;
        let mut buf = Vec::with_capacity(size);

        self.0.read_to_end(&mut buf)?;

        Ok(buf.into())
    }
}

/// Write side of a cbz archive
pub struct CbzWriter<W: Write + Seek> {
    archive: ZipWriter<W>,
    size: usize,
}

impl<W> CbzWriter<W>
where
    W: Write + Seek,
{
    fn from_writer(writer: W) -> Self {
        Self {
            archive: ZipWriter::new(writer),
            size: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Writes `bytes` as a new entry named `name`, using the default archive
    /// file options.
    ///
    /// The name is written verbatim: entry names are opaque strings here,
    /// nothing is sanitized or checked for path traversal (trusted input).
    ///
    /// ## Errors
    ///
    /// Fails if the entry can't be created or written
    pub fn insert(&mut self, name: impl Into<String>, bytes: &[u8]) -> Result<()> {
        self.archive.start_file(name, FileOptions::default())?;

        self.archive.write_all(bytes)?;

        self.size += 1;

        Ok(())
    }

    /// Terminates the cbz archiving and hands back the underlying writer
    ///
    /// ## Errors
    ///
    /// Same errors as the underlying `ZipWriter::finish` method
    pub fn finish(mut self) -> Result<CbzWriterFinished<W>> {
        let writer = self.archive.finish()?;

        Ok(CbzWriterFinished { writer })
    }
}

impl Default for CbzWriter<Cursor<Vec<u8>>> {
    fn default() -> Self {
        Self::from_writer(Cursor::new(Vec::new()))
    }
}

/// A fully written archive, ready to be persisted
pub struct CbzWriterFinished<W> {
    writer: W,
}

impl CbzWriterFinished<Cursor<Vec<u8>>> {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.writer.get_ref()
    }

    /// Writes self into the provided writer
    ///
    /// ## Errors
    ///
    /// Fails on write error
    pub fn write_to(self, mut writer: impl Write) -> Result<()> {
        writer.write_all(&self.writer.into_inner())?;

        Ok(())
    }

    /// Writes self into a file created at the provided path, replacing any
    /// file already there
    ///
    /// ## Errors
    ///
    /// Can fail on file creation or when writing the file content
    pub fn write_to_path(self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let mut file = File::create(path.as_ref())?;

        self.write_to(&mut file)
    }
}

/// One re-encoded page: the input entry name paired with the bytes to write
/// back under that very name
#[derive(Debug)]
pub struct CompressedPage {
    name: String,
    bytes: Vec<u8>,
}

impl CompressedPage {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Walks `archive` in entry order and re-encodes every supported page.
///
/// Jpeg pages are re-encoded at `quality`, png pages losslessly. Entries whose
/// name matches neither kind are skipped with a notice and won't appear in the
/// output. All re-encoded pages are buffered in memory at once.
///
/// ## Errors
///
/// Fails on the first entry that can't be read, or the first supported page
/// that can't be decoded or re-encoded; nothing is recoverable per entry
pub fn recompress_pages<R>(archive: &mut CbzReader<R>, quality: u8) -> Result<Vec<CompressedPage>>
where
    R: Read + Seek,
{
    let mut pages = Vec::new();

    archive.try_for_each(|entry| {
        let mut entry = entry?;
        let name = entry.name().to_string();

        let Some(kind) = PageKind::from_entry_name(&name) else {
            info!("{name}: file extension unsupported, skipping");
            return Ok(());
        };

        let bytes = entry.to_bytes()?;
        let recompressed = Image::from_bytes(&bytes)?.recompress(kind, quality)?;
        debug!(
            "recompressed {name}: {} -> {} bytes",
            bytes.len(),
            recompressed.len()
        );

        pages.push(CompressedPage {
            name,
            bytes: recompressed,
        });

        Ok::<_, Error>(())
    })?;

    Ok(pages)
}

/// Packs the pages into an in-memory cbz archive, preserving their order and
/// names
///
/// ## Errors
///
/// Fails if a page can't be written into the archive
pub fn pack_pages(pages: &[CompressedPage]) -> Result<CbzWriterFinished<Cursor<Vec<u8>>>> {
    let mut cbz_writer = CbzWriter::default();

    for page in pages {
        cbz_writer.insert(&page.name, &page.bytes)?;
    }

    cbz_writer.finish()
}
