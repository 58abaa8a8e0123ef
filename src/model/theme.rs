use indexmap::IndexSet;
use serde_json::Value;

use crate::{
    BundleError, BundleResult, EntryOptions,
    foundation::{error::EntityKind, ids::validate_id},
};

/// Where the theme document comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum ThemeSource {
    /// Inline rules document.
    Data(Value),
    /// Remote rules document, fetched and validated during build.
    Url(String),
}

/// Style overlay scoped to zero or more animations.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    id: String,
    source: ThemeSource,
    options: EntryOptions,
    pub(crate) animations: IndexSet<String>,
}

impl Theme {
    /// Theme from an inline document. Schema validation happens when it is added to a bundle.
    pub fn new(id: impl Into<String>, data: Value) -> BundleResult<Self> {
        let id = id.into();
        validate_id(EntityKind::Theme, &id)?;
        Ok(Self::with_source(id, ThemeSource::Data(data)))
    }

    /// Theme fetched from `url` during build.
    pub fn from_url(id: impl Into<String>, url: impl Into<String>) -> BundleResult<Self> {
        let id = id.into();
        validate_id(EntityKind::Theme, &id)?;
        let url = url.into();
        if url.trim().is_empty() {
            return Err(BundleError::validation(format!(
                "theme '{id}' url must be non-empty"
            )));
        }
        Ok(Self::with_source(id, ThemeSource::Url(url)))
    }

    fn with_source(id: String, source: ThemeSource) -> Self {
        Self {
            id,
            source,
            options: EntryOptions::default(),
            animations: IndexSet::new(),
        }
    }

    /// Per-entry compression for the theme JSON.
    pub fn with_options(mut self, options: EntryOptions) -> BundleResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Theme id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Document source.
    pub fn source(&self) -> &ThemeSource {
        &self.source
    }

    /// Inline document, `None` while URL-sourced.
    pub fn data(&self) -> Option<&Value> {
        match &self.source {
            ThemeSource::Data(v) => Some(v),
            ThemeSource::Url(_) => None,
        }
    }

    /// Compression settings.
    pub fn options(&self) -> EntryOptions {
        self.options
    }

    /// Ids of the animations this theme is scoped to.
    pub fn animations(&self) -> impl Iterator<Item = &str> {
        self.animations.iter().map(String::as_str)
    }

    pub(crate) fn resolve(&mut self, data: Value) {
        self.source = ThemeSource::Data(data);
    }
}
