//! Versioned manifest (`manifest.json`), a pure projection of the registry.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    Bundle, BundleError, BundleResult, FormatVersion,
    model::{BundleMetadata, PlaybackSettings},
    registry::AssetRegistry,
};

/// Table of contents of an archive, one shape per format version.
#[derive(Clone, Debug, PartialEq)]
pub enum Manifest {
    /// Legacy manifest.
    V1(ManifestV1),
    /// Current manifest.
    V2(ManifestV2),
}

/// Legacy (`version "1"`) manifest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestV1 {
    /// Always `"1"` when written.
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    /// Producing tool.
    #[serde(default, deserialize_with = "lenient_string")]
    pub generator: String,
    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    /// Free-form fields.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom: Map<String, Value>,
    /// Animation records with playback settings.
    #[serde(default)]
    pub animations: Vec<AnimationRecordV1>,
    /// Animation a player opens first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_animation_id: Option<String>,
}

/// Legacy animation record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationRecordV1 {
    /// Animation id.
    pub id: String,
    /// Playback settings, flattened into the record.
    #[serde(flatten)]
    pub playback: PlaybackSettings,
}

/// Current (`version "2"`) manifest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestV2 {
    /// Always `"2"` when written.
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    /// Producing tool.
    #[serde(default, deserialize_with = "lenient_string")]
    pub generator: String,
    /// Animation records.
    #[serde(default)]
    pub animations: Vec<AnimationRecordV2>,
    /// Theme ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<IdRecord>,
    /// State-machine ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state_machines: Vec<IdRecord>,
    /// Initial pointers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<InitialRecord>,
}

/// Current animation record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationRecordV2 {
    /// Animation id.
    pub id: String,
    /// Theme applied on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_theme: Option<String>,
    /// Background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Scoped theme ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
}

/// `{ "id": ... }` record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRecord {
    /// Entity id.
    pub id: String,
}

/// `initial` block of the current manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialRecord {
    /// Animation a player opens first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    /// State machine a player starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_machine: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl Manifest {
    /// Project the manifest of `bundle` for its format version.
    pub fn project(bundle: &Bundle) -> Self {
        Self::project_parts(bundle.version(), bundle.metadata(), bundle.registry())
    }

    pub(crate) fn project_parts(
        version: FormatVersion,
        metadata: &BundleMetadata,
        registry: &AssetRegistry,
    ) -> Self {
        let mut active = registry.animations().filter(|a| a.is_default_active());
        let active_id = match (active.next(), active.next()) {
            (Some(only), None) => Some(only.id().to_owned()),
            _ => None,
        };

        match version {
            FormatVersion::V1 => Self::V1(ManifestV1 {
                version: version.as_str().to_owned(),
                generator: metadata.generator.clone(),
                author: metadata.author.clone(),
                description: metadata.description.clone(),
                keywords: metadata.keywords.clone(),
                revision: metadata.revision,
                custom: metadata.custom.clone(),
                animations: registry
                    .animations()
                    .map(|a| AnimationRecordV1 {
                        id: a.id().to_owned(),
                        playback: a.playback().clone(),
                    })
                    .collect(),
                active_animation_id: active_id,
            }),
            FormatVersion::V2 => Self::V2(ManifestV2 {
                version: version.as_str().to_owned(),
                generator: metadata.generator.clone(),
                animations: registry
                    .animations()
                    .map(|a| AnimationRecordV2 {
                        id: a.id().to_owned(),
                        initial_theme: a.initial_theme().map(str::to_owned),
                        background: a.background().map(str::to_owned),
                        themes: a.themes().map(str::to_owned).collect(),
                    })
                    .collect(),
                themes: registry
                    .themes()
                    .map(|t| IdRecord {
                        id: t.id().to_owned(),
                    })
                    .collect(),
                state_machines: registry
                    .state_machines()
                    .map(|s| IdRecord {
                        id: s.id().to_owned(),
                    })
                    .collect(),
                initial: active_id.map(|animation| InitialRecord {
                    animation: Some(animation),
                    state_machine: None,
                }),
            }),
        }
    }

    /// Parse `manifest.json` bytes, sniffing the version from the `version` field.
    pub fn parse(bytes: &[u8]) -> BundleResult<Self> {
        let raw: Value = serde_json::from_slice(bytes)
            .map_err(|e| BundleError::malformed(format!("manifest.json is not valid JSON: {e}")))?;
        if !raw.is_object() {
            return Err(BundleError::malformed("manifest.json must be a JSON object"));
        }
        let version = match raw.get("version") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let parsed = match FormatVersion::from_manifest_field(version.as_deref()) {
            FormatVersion::V1 => serde_json::from_value(raw).map(Self::V1),
            FormatVersion::V2 => serde_json::from_value(raw).map(Self::V2),
        };
        parsed.map_err(|e| BundleError::malformed(format!("manifest.json has an invalid shape: {e}")))
    }

    /// Serialized bytes.
    pub fn to_json_bytes(&self) -> BundleResult<Vec<u8>> {
        let bytes = match self {
            Self::V1(m) => serde_json::to_vec(m),
            Self::V2(m) => serde_json::to_vec(m),
        };
        bytes.map_err(|e| BundleError::serde(format!("serialize manifest: {e}")))
    }

    /// Format version of this manifest.
    pub fn version(&self) -> FormatVersion {
        match self {
            Self::V1(_) => FormatVersion::V1,
            Self::V2(_) => FormatVersion::V2,
        }
    }

    /// Animation ids, in manifest order.
    pub fn animation_ids(&self) -> Vec<&str> {
        match self {
            Self::V1(m) => m.animations.iter().map(|a| a.id.as_str()).collect(),
            Self::V2(m) => m.animations.iter().map(|a| a.id.as_str()).collect(),
        }
    }

    /// Generator string.
    pub fn generator(&self) -> &str {
        match self {
            Self::V1(m) => &m.generator,
            Self::V2(m) => &m.generator,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/manifest.rs"]
mod tests;
