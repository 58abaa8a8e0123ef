use std::collections::HashSet;

use serde_json::Value;

use crate::{
    Bundle, BundleError, BundleResult, FormatVersion,
    container::{
        codec::{ArchiveEntry, EntryOptions},
        layout,
    },
    manifest::Manifest,
    model::AssetKind,
};

fn json_bytes(what: &str, value: &Value) -> BundleResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| BundleError::serde(format!("serialize {what}: {e}")))
}

/// Entries of `bundle` in archive order: manifest, animations, themes, state machines, assets.
pub(crate) fn archive_entries(bundle: &Bundle) -> BundleResult<Vec<ArchiveEntry>> {
    let version = bundle.version;
    let registry = &bundle.registry;
    let manifest = Manifest::project(bundle);
    let manifest_options = match version {
        FormatVersion::V1 => EntryOptions::default(),
        FormatVersion::V2 => EntryOptions::STORED,
    };
    let mut entries = vec![
        ArchiveEntry::new(layout::MANIFEST_PATH, manifest.to_json_bytes()?)
            .with_options(manifest_options),
    ];

    for animation in registry.animations() {
        let data = animation.data().ok_or_else(|| {
            BundleError::validation(format!(
                "animation '{}' is still URL-sourced; build the bundle first",
                animation.id()
            ))
        })?;
        let what = format!("animation '{}'", animation.id());
        entries.push(
            ArchiveEntry::new(
                layout::animation_path(version, animation.id()),
                json_bytes(&what, data)?,
            )
            .with_options(animation.options()),
        );
    }

    for theme in registry.themes() {
        let Some(path) = layout::theme_path(version, theme.id()) else {
            tracing::warn!(theme = theme.id(), %version, "layout has no theme entries, skipping");
            continue;
        };
        let data = theme.data().ok_or_else(|| {
            BundleError::validation(format!(
                "theme '{}' is still URL-sourced; build the bundle first",
                theme.id()
            ))
        })?;
        let what = format!("theme '{}'", theme.id());
        entries.push(ArchiveEntry::new(path, json_bytes(&what, data)?).with_options(theme.options()));
    }

    for sm in registry.state_machines() {
        let Some(path) = layout::state_machine_path(version, sm.id()) else {
            tracing::warn!(state_machine = sm.id(), %version, "layout has no state-machine entries, skipping");
            continue;
        };
        let what = format!("state machine '{}'", sm.id());
        entries.push(ArchiveEntry::new(path, json_bytes(&what, sm.data())?).with_options(sm.options()));
    }

    let mut asset_paths = HashSet::new();
    for (_, asset) in registry.assets() {
        if asset.is_excluded() {
            tracing::trace!(asset = asset.file_name(), "excluded from export");
            continue;
        }
        let bytes = asset.bytes().ok_or_else(|| {
            BundleError::validation(format!(
                "asset '{}' is still URL-sourced; build the bundle first",
                asset.file_name()
            ))
        })?;
        let path = match asset.kind() {
            AssetKind::Image => layout::image_path(version, asset.file_name()),
            AssetKind::Audio => layout::audio_path(version, asset.file_name()),
        };
        if !asset_paths.insert(path.clone()) {
            return Err(BundleError::validation(format!(
                "two assets map to archive path '{path}'"
            )));
        }
        entries.push(ArchiveEntry::new(path, bytes.to_vec()).with_options(asset.options()));
    }
    Ok(entries)
}

/// Serialize an already-built bundle.
pub(crate) fn write_archive(bundle: &Bundle) -> BundleResult<Vec<u8>> {
    let entries = archive_entries(bundle)?;
    let bytes = bundle.archive_codec.pack(&entries)?;
    tracing::debug!(entries = entries.len(), bytes = bytes.len(), "packed archive");
    Ok(bytes)
}
