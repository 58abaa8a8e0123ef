use std::sync::Arc;

use crate::{
    Bundle, BundleResult,
    assets::{lottie, media},
    container::layout,
    model::{Animation, Asset, AssetKind},
    registry::AssetRegistry,
};

/// Lowest `N` such that `<prefix>_N` is not yet used by `animation_id` for `kind`.
fn next_free_index(registry: &AssetRegistry, animation_id: &str, kind: AssetKind) -> usize {
    let mut n = 0;
    while registry
        .find_asset(animation_id, kind, &format!("{}_{n}", kind.prefix()))
        .is_some()
    {
        n += 1;
    }
    n
}

/// Move every data-URL payload embedded in animation JSON into a registry asset and point the
/// JSON record at the external file. Records already pointing at files are left alone, so a
/// second run finds nothing to do.
pub(crate) fn extract_embedded_assets(bundle: &mut Bundle) -> BundleResult<usize> {
    let version = bundle.version;
    let codec = Arc::clone(&bundle.asset_codec);
    let ids: Vec<String> = bundle
        .registry
        .animations()
        .map(|a| a.id().to_owned())
        .collect();

    let mut total = 0;
    for id in ids {
        let embedded = match bundle.registry.animation(&id).and_then(Animation::data) {
            Some(data) => lottie::embedded_records(data),
            None => continue,
        };
        if embedded.is_empty() {
            continue;
        }

        for record in &embedded {
            let decoded = codec.decode_data_url(&record.data_url)?;
            let ext = media::detect_extension(record.kind, Some(decoded.mime.as_str()), &decoded.bytes);
            let n = next_free_index(&bundle.registry, &id, record.kind);
            let file_name = format!("{}_{n}.{ext}", record.kind.prefix());

            let mut asset = Asset::new(record.kind, file_name.clone(), decoded.bytes)?;
            if let Some(lottie_id) = &record.lottie_id {
                asset = asset.with_lottie_asset_id(lottie_id.clone());
            }
            bundle.registry.add_asset(&id, asset)?;

            let dir = match record.kind {
                AssetKind::Image => layout::image_reference_dir(version),
                AssetKind::Audio => layout::audio_reference_dir(version),
            };
            if let Some(data) = bundle
                .registry
                .animation_mut(&id)
                .and_then(Animation::data_mut)
            {
                lottie::externalize(data, record.index, &file_name, dir);
            }
        }
        tracing::debug!(animation = %id, extracted = embedded.len(), "extracted embedded assets");
        total += embedded.len();
    }
    Ok(total)
}

#[cfg(test)]
#[path = "../../tests/unit/build/extract.rs"]
mod tests;
