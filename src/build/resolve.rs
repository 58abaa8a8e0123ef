use std::sync::Arc;

use serde_json::Value;

use crate::{
    Bundle, BundleError, BundleResult,
    foundation::error::EntityKind,
    model::{AnimationSource, AssetSource, ThemeSource},
};

fn parse_json(kind: EntityKind, id: &str, url: &str, bytes: &[u8]) -> BundleResult<Value> {
    serde_json::from_slice(bytes).map_err(|e| {
        BundleError::serde(format!("{kind} '{id}' fetched from '{url}' is not JSON: {e}"))
    })
}

/// Fetch URL-sourced animations and themes. Fetched themes are schema-validated.
pub(crate) fn resolve_documents(bundle: &mut Bundle) -> BundleResult<()> {
    let codec = Arc::clone(&bundle.asset_codec);
    let validator = Arc::clone(&bundle.validator);

    for animation in bundle.registry.animations_mut() {
        let AnimationSource::Url(url) = animation.source() else {
            continue;
        };
        let url = url.clone();
        let bytes = codec.fetch(&url)?;
        let data = parse_json(EntityKind::Animation, animation.id(), &url, &bytes)?;
        animation.resolve(data)?;
        tracing::debug!(animation = animation.id(), %url, "resolved remote animation");
    }

    for theme in bundle.registry.themes_mut() {
        let ThemeSource::Url(url) = theme.source() else {
            continue;
        };
        let url = url.clone();
        let bytes = codec.fetch(&url)?;
        let data = parse_json(EntityKind::Theme, theme.id(), &url, &bytes)?;
        validator
            .validate_theme(&data)
            .map_err(|issues| BundleError::schema(EntityKind::Theme, theme.id(), issues))?;
        theme.resolve(data);
        tracing::debug!(theme = theme.id(), %url, "resolved remote theme");
    }
    Ok(())
}

/// Fetch URL-sourced image and audio assets.
pub(crate) fn resolve_assets(bundle: &mut Bundle) -> BundleResult<()> {
    let pending: Vec<_> = bundle
        .registry
        .assets()
        .filter_map(|(handle, asset)| match asset.source() {
            AssetSource::Url(url) => Some((handle, url.clone())),
            AssetSource::Bytes(_) => None,
        })
        .collect();

    for (handle, url) in pending {
        let bytes = bundle.asset_codec.fetch(&url)?;
        if let Some(asset) = bundle.registry.asset_mut(handle) {
            tracing::debug!(asset = asset.file_name(), %url, bytes = bytes.len(), "resolved remote asset");
            asset.set_bytes(bytes);
        }
    }
    Ok(())
}
