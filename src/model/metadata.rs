use serde_json::{Map, Value};

/// Default `generator` string written into manifests.
pub const GENERATOR: &str = concat!("dotlottie-bundle@", env!("CARGO_PKG_VERSION"));

/// Descriptive bundle metadata.
///
/// The current manifest only carries `generator`; the legacy manifest carries every field.
#[derive(Clone, Debug, PartialEq)]
pub struct BundleMetadata {
    /// Tool that produced the archive.
    pub generator: String,
    /// Author.
    pub author: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Keywords, comma separated.
    pub keywords: Option<String>,
    /// Revision counter.
    pub revision: Option<u32>,
    /// Free-form extra fields.
    pub custom: Map<String, Value>,
}

impl Default for BundleMetadata {
    fn default() -> Self {
        Self {
            generator: GENERATOR.to_owned(),
            author: None,
            description: None,
            keywords: None,
            revision: None,
            custom: Map::new(),
        }
    }
}
