use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    BundleError, BundleResult, EntryOptions,
    foundation::{error::EntityKind, ids::validate_id},
    model::AssetHandle,
};

/// Where the animation document comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum AnimationSource {
    /// Inline Lottie JSON.
    Data(Value),
    /// Remote Lottie JSON, fetched during build.
    Url(String),
}

/// Legacy `playMode` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Play start to end.
    Normal,
    /// Alternate direction each loop.
    Bounce,
}

/// Legacy `loop` value: a flag or a loop count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoopSetting {
    /// Loop forever or play once.
    Enabled(bool),
    /// Number of loops.
    Count(u32),
}

/// Playback fields carried by legacy (`version "1"`) manifests.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettings {
    /// `1` forward, `-1` reverse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<i8>,
    /// Playback speed multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Play mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_mode: Option<PlayMode>,
    /// Loop behavior.
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_setting: Option<LoopSetting>,
    /// Start playing when loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    /// Play on hover only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<bool>,
    /// Pause between loops, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermission: Option<u64>,
    /// Player background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
}

impl PlaybackSettings {
    /// Reject values players cannot honor.
    pub fn validate(&self) -> BundleResult<()> {
        if let Some(d) = self.direction
            && d != 1
            && d != -1
        {
            return Err(BundleError::validation(format!(
                "direction must be 1 or -1, got {d}"
            )));
        }
        if let Some(speed) = self.speed
            && !(speed.is_finite() && speed > 0.0)
        {
            return Err(BundleError::validation(format!(
                "speed must be finite and > 0, got {speed}"
            )));
        }
        Ok(())
    }

    /// Whether every field is unset.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Lottie animation entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    id: String,
    source: AnimationSource,
    initial_theme: Option<String>,
    background: Option<String>,
    default_active: bool,
    playback: PlaybackSettings,
    options: EntryOptions,
    pub(crate) assets: Vec<AssetHandle>,
    pub(crate) themes: IndexSet<String>,
}

impl Animation {
    /// Animation from inline Lottie JSON.
    pub fn new(id: impl Into<String>, data: Value) -> BundleResult<Self> {
        let id = id.into();
        validate_id(EntityKind::Animation, &id)?;
        validate_lottie(&id, &data)?;
        Ok(Self::with_source(id, AnimationSource::Data(data)))
    }

    /// Animation fetched from `url` during build.
    pub fn from_url(id: impl Into<String>, url: impl Into<String>) -> BundleResult<Self> {
        let id = id.into();
        validate_id(EntityKind::Animation, &id)?;
        let url = url.into();
        if url.trim().is_empty() {
            return Err(BundleError::validation(format!(
                "animation '{id}' url must be non-empty"
            )));
        }
        Ok(Self::with_source(id, AnimationSource::Url(url)))
    }

    fn with_source(id: String, source: AnimationSource) -> Self {
        Self {
            id,
            source,
            initial_theme: None,
            background: None,
            default_active: false,
            playback: PlaybackSettings::default(),
            options: EntryOptions::default(),
            assets: Vec::new(),
            themes: IndexSet::new(),
        }
    }

    /// Replace the document.
    pub fn with_data(mut self, data: Value) -> BundleResult<Self> {
        validate_lottie(&self.id, &data)?;
        self.source = AnimationSource::Data(data);
        Ok(self)
    }

    /// Theme applied when the animation loads (current format).
    pub fn with_initial_theme(mut self, theme_id: Option<String>) -> Self {
        self.initial_theme = theme_id;
        self
    }

    /// Player background color (current format).
    pub fn with_background(mut self, background: Option<String>) -> Self {
        self.background = background;
        self
    }

    /// Mark as the animation a player opens first.
    pub fn with_default_active(mut self, active: bool) -> Self {
        self.default_active = active;
        self
    }

    /// Legacy playback settings.
    pub fn with_playback(mut self, playback: PlaybackSettings) -> BundleResult<Self> {
        playback.validate()?;
        self.playback = playback;
        Ok(self)
    }

    /// Per-entry compression for the animation JSON.
    pub fn with_options(mut self, options: EntryOptions) -> BundleResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Caller-supplied id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Document source.
    pub fn source(&self) -> &AnimationSource {
        &self.source
    }

    /// Inline document, `None` while URL-sourced.
    pub fn data(&self) -> Option<&Value> {
        match &self.source {
            AnimationSource::Data(v) => Some(v),
            AnimationSource::Url(_) => None,
        }
    }

    /// Initial theme id.
    pub fn initial_theme(&self) -> Option<&str> {
        self.initial_theme.as_deref()
    }

    /// Background color.
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Whether the animation is flagged default-active.
    pub fn is_default_active(&self) -> bool {
        self.default_active
    }

    /// Legacy playback settings.
    pub fn playback(&self) -> &PlaybackSettings {
        &self.playback
    }

    /// Compression settings.
    pub fn options(&self) -> EntryOptions {
        self.options
    }

    /// Handles of owned assets, in link order.
    pub fn asset_handles(&self) -> &[AssetHandle] {
        &self.assets
    }

    /// Ids of the themes scoped to this animation.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(String::as_str)
    }

    pub(crate) fn data_mut(&mut self) -> Option<&mut Value> {
        match &mut self.source {
            AnimationSource::Data(v) => Some(v),
            AnimationSource::Url(_) => None,
        }
    }

    pub(crate) fn resolve(&mut self, data: Value) -> BundleResult<()> {
        validate_lottie(&self.id, &data)?;
        self.source = AnimationSource::Data(data);
        Ok(())
    }

    pub(crate) fn clear_initial_theme_if(&mut self, theme_id: &str) {
        if self.initial_theme.as_deref() == Some(theme_id) {
            self.initial_theme = None;
        }
    }
}

fn validate_lottie(id: &str, data: &Value) -> BundleResult<()> {
    let Some(obj) = data.as_object() else {
        return Err(BundleError::validation(format!(
            "animation '{id}' must be a JSON object"
        )));
    };
    for key in ["assets", "layers"] {
        if let Some(v) = obj.get(key)
            && !v.is_array()
        {
            return Err(BundleError::validation(format!(
                "animation '{id}': '{key}' must be an array"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/animation.rs"]
mod tests;
