use crate::{
    BundleError, BundleResult, EntryOptions,
    assets::media,
    foundation::{
        error::EntityKind,
        ids::{file_extension, file_stem, validate_id},
    },
};

/// Opaque registry address of an asset.
///
/// Asset ids are only unique per owning animation until the renaming pass runs, so the registry
/// keys assets by handle instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(pub(crate) u64);

impl AssetHandle {
    /// Raw handle value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Binary asset category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Raster (or vector) image.
    Image,
    /// Audio clip.
    Audio,
}

impl AssetKind {
    /// Prefix of generated asset ids (`image_0`, `audio_0`).
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }

    pub(crate) fn entity(self) -> EntityKind {
        match self {
            Self::Image => EntityKind::Image,
            Self::Audio => EntityKind::Audio,
        }
    }
}

/// Where the asset bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// Bytes held in memory.
    Bytes(Vec<u8>),
    /// Remote location, fetched during build.
    Url(String),
}

/// Image or audio payload owned by one or more animations.
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    kind: AssetKind,
    id: String,
    file_name: String,
    source: AssetSource,
    lottie_asset_id: Option<String>,
    excluded: bool,
    options: EntryOptions,
    pub(crate) owners: Vec<String>,
}

impl Asset {
    /// Asset from in-memory bytes. The id is the file stem of `file_name`.
    pub fn new(kind: AssetKind, file_name: impl Into<String>, bytes: Vec<u8>) -> BundleResult<Self> {
        Self::with_source(kind, file_name.into(), AssetSource::Bytes(bytes))
    }

    /// Asset resolved from `url` during build.
    pub fn from_url(
        kind: AssetKind,
        file_name: impl Into<String>,
        url: impl Into<String>,
    ) -> BundleResult<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(BundleError::validation(format!(
                "{} asset url must be non-empty",
                kind.prefix()
            )));
        }
        Self::with_source(kind, file_name.into(), AssetSource::Url(url))
    }

    fn with_source(kind: AssetKind, file_name: String, source: AssetSource) -> BundleResult<Self> {
        let id = file_stem(&file_name).to_owned();
        validate_id(kind.entity(), &id)?;
        validate_id(kind.entity(), &file_name)?;
        Ok(Self {
            kind,
            id,
            file_name,
            source,
            lottie_asset_id: None,
            excluded: false,
            options: EntryOptions::default(),
            owners: Vec::new(),
        })
    }

    /// Record the id of the Lottie `assets[]` entry that references this payload.
    pub fn with_lottie_asset_id(mut self, id: impl Into<String>) -> Self {
        self.lottie_asset_id = Some(id.into());
        self
    }

    /// Keep the asset out of exported archives and out of duplicate detection.
    pub fn with_excluded(mut self, excluded: bool) -> Self {
        self.excluded = excluded;
        self
    }

    /// Per-entry compression for this asset.
    pub fn with_options(mut self, options: EntryOptions) -> BundleResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Asset category.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Id referenced by animation JSON (file stem).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Archive file name (id plus extension).
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Byte source.
    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    /// In-memory bytes, `None` while the asset is still URL-sourced.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.source {
            AssetSource::Bytes(b) => Some(b),
            AssetSource::Url(_) => None,
        }
    }

    /// Lottie asset record id, when known.
    pub fn lottie_asset_id(&self) -> Option<&str> {
        self.lottie_asset_id.as_deref()
    }

    /// Whether the asset is left out of exports.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Compression settings.
    pub fn options(&self) -> EntryOptions {
        self.options
    }

    /// Ids of owning animations, in link order.
    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    /// MIME type derived from the file extension.
    pub fn mime(&self) -> &'static str {
        media::mime_for_file(&self.file_name)
    }

    /// Change the id, keeping the extension.
    pub(crate) fn set_id(&mut self, id: &str) {
        self.file_name = match file_extension(&self.file_name) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_owned(),
        };
        self.id = id.to_owned();
    }

    pub(crate) fn set_bytes(&mut self, bytes: Vec<u8>) {
        self.source = AssetSource::Bytes(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/asset.rs"]
mod tests;
