use std::io::{Cursor, Read as _, Write as _};

use anyhow::Context;

use crate::{BundleError, BundleResult};

/// Per-entry compression settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryOptions {
    /// `None` uses the codec default (deflate), `Some(0)` stores the entry uncompressed and
    /// `1..=9` selects a deflate level.
    pub level: Option<u8>,
}

impl EntryOptions {
    /// Uncompressed entry.
    pub const STORED: Self = Self { level: Some(0) };

    /// Reject levels outside `0..=9`.
    pub fn validate(&self) -> BundleResult<()> {
        if let Some(level) = self.level
            && level > 9
        {
            return Err(BundleError::validation(format!(
                "compression level must be in 0..=9, got {level}"
            )));
        }
        Ok(())
    }

    /// Whether the entry is written without compression.
    pub fn is_stored(&self) -> bool {
        self.level == Some(0)
    }
}

/// One file inside an archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Archive path, `/`-separated.
    pub path: String,
    /// Uncompressed contents.
    pub bytes: Vec<u8>,
    /// Compression settings used (pack) or observed (unpack).
    pub options: EntryOptions,
}

impl ArchiveEntry {
    /// Entry with default compression.
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
            options: EntryOptions::default(),
        }
    }

    /// Same entry with explicit compression settings.
    pub fn with_options(mut self, options: EntryOptions) -> Self {
        self.options = options;
        self
    }
}

/// Upper bound on the buffer reserved from an entry's declared size; larger entries grow as read.
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// Compression codec turning entry lists into archive bytes and back.
pub trait ArchiveCodec: Send + Sync {
    /// Pack entries in order.
    fn pack(&self, entries: &[ArchiveEntry]) -> BundleResult<Vec<u8>>;

    /// Unpack every file entry, in archive order. Directory entries are skipped.
    fn unpack(&self, bytes: &[u8]) -> BundleResult<Vec<ArchiveEntry>>;
}

/// ZIP codec (deflate), the container format of `.lottie` files.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZipCodec;

impl ArchiveCodec for ZipCodec {
    fn pack(&self, entries: &[ArchiveEntry]) -> BundleResult<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for entry in entries {
            entry.options.validate()?;
            let opts = zip::write::SimpleFileOptions::default();
            let opts = match entry.options.level {
                Some(0) => opts.compression_method(zip::CompressionMethod::Stored),
                level => opts
                    .compression_method(zip::CompressionMethod::Deflated)
                    .compression_level(level.map(i64::from)),
            };
            zip.start_file(entry.path.as_str(), opts)
                .with_context(|| format!("start archive entry '{}'", entry.path))?;
            zip.write_all(&entry.bytes)
                .with_context(|| format!("write archive entry '{}'", entry.path))?;
        }
        let cursor = zip.finish().context("finish archive")?;
        Ok(cursor.into_inner())
    }

    fn unpack(&self, bytes: &[u8]) -> BundleResult<Vec<ArchiveEntry>> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| BundleError::malformed(format!("not a zip archive: {e}")))?;
        let mut out = Vec::with_capacity(zip.len());
        for idx in 0..zip.len() {
            let mut file = zip
                .by_index(idx)
                .map_err(|e| BundleError::malformed(format!("unreadable entry #{idx}: {e}")))?;
            if file.is_dir() {
                continue;
            }
            let path = file.name().to_owned();
            let options = match file.compression() {
                zip::CompressionMethod::Stored => EntryOptions::STORED,
                _ => EntryOptions::default(),
            };
            let declared = usize::try_from(file.size()).unwrap_or(0);
            let mut buf = Vec::with_capacity(declared.min(MAX_PREALLOCATION));
            file.read_to_end(&mut buf)
                .map_err(|e| BundleError::malformed(format!("corrupt entry '{path}': {e}")))?;
            out.push(ArchiveEntry {
                path,
                bytes: buf,
                options,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/codec.rs"]
mod tests;
