//! Legacy ⇄ current conversion.
//!
//! Conversion never rewrites paths in place. The source is materialized, every animation gets
//! its assets inlined back as data URLs, and the self-contained documents are re-added to a
//! fresh bundle of the target version. The next build of that bundle extracts them again under
//! the target layout.

use crate::{
    Bundle, BundleError, BundleResult, FormatVersion,
    assets::lottie,
    build::{extract, resolve},
    model::{Animation, StateMachine, Theme},
    registry::AssetRegistry,
};

impl Bundle {
    /// Convert into a new bundle of `target` version.
    ///
    /// `self` is materialized in the process (remote sources fetched, embedded assets
    /// extracted). Legacy playback settings do not survive conversion to the current layout;
    /// themes and state machines do not survive conversion to the legacy layout.
    #[tracing::instrument(skip(self), fields(from = %self.version, to = %target))]
    pub fn convert_to(&mut self, target: FormatVersion) -> BundleResult<Bundle> {
        resolve::resolve_documents(self)?;
        extract::extract_embedded_assets(self)?;
        resolve::resolve_assets(self)?;

        let mut out = Bundle {
            version: target,
            metadata: self.metadata.clone(),
            registry: AssetRegistry::new(),
            options: self.options,
            plugins: self.plugins.clone(),
            asset_codec: self.asset_codec.clone(),
            archive_codec: self.archive_codec.clone(),
            validator: self.validator.clone(),
            hasher: self.hasher.clone(),
        };

        for animation in self.registry.animations() {
            let mut data = animation.data().cloned().ok_or_else(|| {
                BundleError::validation(format!("animation '{}' is not resolved", animation.id()))
            })?;
            for (_, asset) in self.registry.assets_of(animation.id()) {
                let Some(bytes) = asset.bytes() else { continue };
                let url = self.asset_codec.encode_data_url(asset.mime(), bytes);
                lottie::inline_references(&mut data, asset.kind(), asset.file_name(), &url);
            }

            let mut next = Animation::new(animation.id(), data)?
                .with_options(animation.options())?
                .with_default_active(animation.is_default_active());
            next = match target {
                FormatVersion::V1 => next.with_playback(animation.playback().clone())?,
                FormatVersion::V2 => {
                    if !animation.playback().is_empty() {
                        tracing::debug!(animation = animation.id(), "dropping legacy playback settings");
                    }
                    next.with_background(animation.background().map(str::to_owned))
                        .with_initial_theme(animation.initial_theme().map(str::to_owned))
                }
            };
            out.registry.add_animation(next)?;
        }

        if target.supports_themes() {
            for theme in self.registry.themes() {
                let data = theme.data().cloned().ok_or_else(|| {
                    BundleError::validation(format!("theme '{}' is not resolved", theme.id()))
                })?;
                out.registry
                    .add_theme(Theme::new(theme.id(), data)?.with_options(theme.options())?)?;
                for animation_id in theme.animations() {
                    out.registry.assign_theme(theme.id(), animation_id)?;
                }
            }
            for sm in self.registry.state_machines() {
                out.registry.add_state_machine(
                    StateMachine::new(sm.id(), sm.data().clone())?.with_options(sm.options())?,
                )?;
            }
        } else {
            let themes = self.registry.themes().count();
            let state_machines = self.registry.state_machines().count();
            if themes + state_machines > 0 {
                tracing::warn!(
                    themes,
                    state_machines,
                    "legacy layout cannot package themes or state machines; dropping them"
                );
            }
        }

        tracing::debug!(animations = out.registry.animation_count(), "converted bundle");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../tests/unit/bridge.rs"]
mod tests;
