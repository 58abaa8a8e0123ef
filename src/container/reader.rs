use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    Bundle, BundleError, BundleResult,
    assets::lottie,
    container::{
        codec::{ArchiveEntry, EntryOptions},
        layout::{self, EntryClass},
    },
    foundation::error::EntityKind,
    manifest::Manifest,
    model::{Animation, Asset, AssetHandle, AssetKind, StateMachine, Theme},
};

/// Image or audio entry waiting to be linked to the animations that reference it.
struct Pooled<'a> {
    bytes: &'a [u8],
    options: EntryOptions,
    handle: Option<AssetHandle>,
}

fn parse_json(kind: EntityKind, id: &str, entry: &ArchiveEntry) -> BundleResult<Value> {
    serde_json::from_slice(&entry.bytes).map_err(|e| {
        BundleError::malformed(format!("{kind} '{id}' ({}) is not valid JSON: {e}", entry.path))
    })
}

/// Populate `bundle` from archive bytes.
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub(crate) fn read_archive(mut bundle: Bundle, bytes: &[u8]) -> BundleResult<Bundle> {
    let entries = bundle.archive_codec.unpack(bytes)?;
    let manifest_entry = entries
        .iter()
        .find(|e| layout::classify(bundle.version, &e.path) == Some(EntryClass::Manifest))
        .ok_or_else(|| BundleError::malformed("manifest.json is missing"))?;
    let manifest = Manifest::parse(&manifest_entry.bytes)?;
    bundle.version = manifest.version();
    apply_metadata(&mut bundle, &manifest);

    let mut pool: IndexMap<(AssetKind, &str), Pooled<'_>> = IndexMap::new();
    for entry in &entries {
        let Some(class) = layout::classify(bundle.version, &entry.path) else {
            tracing::trace!(path = %entry.path, "ignoring unknown archive entry");
            continue;
        };
        match class {
            EntryClass::Manifest => {}
            EntryClass::Animation { id } => {
                let data = parse_json(EntityKind::Animation, &id, entry)?;
                let animation = Animation::new(id.as_str(), data)?.with_options(entry.options)?;
                let animation = apply_animation_record(&manifest, animation)?;
                bundle.registry.add_animation(animation)?;
            }
            EntryClass::Image { .. } | EntryClass::Audio { .. } => {
                let kind = if matches!(class, EntryClass::Image { .. }) {
                    AssetKind::Image
                } else {
                    AssetKind::Audio
                };
                let file_name = layout_file_name(&entry.path);
                pool.insert(
                    (kind, file_name),
                    Pooled {
                        bytes: &entry.bytes,
                        options: entry.options,
                        handle: None,
                    },
                );
            }
            EntryClass::Theme { id } => {
                let data = parse_json(EntityKind::Theme, &id, entry)?;
                bundle.add_theme(Theme::new(id.as_str(), data)?.with_options(entry.options)?)?;
            }
            EntryClass::StateMachine { id } => {
                let data = parse_json(EntityKind::StateMachine, &id, entry)?;
                bundle.add_state_machine(
                    StateMachine::new(id.as_str(), data)?.with_options(entry.options)?,
                )?;
            }
        }
    }

    for id in manifest.animation_ids() {
        if bundle.registry.animation(id).is_none() {
            return Err(BundleError::dangling(format!(
                "manifest lists animation '{id}' but the archive has no entry for it"
            )));
        }
    }
    apply_theme_scoping(&mut bundle, &manifest)?;
    link_assets(&mut bundle, &mut pool)?;

    for ((kind, file_name), pooled) in &pool {
        if pooled.handle.is_none() {
            tracing::debug!(kind = kind.prefix(), file = file_name, "dropping asset referenced by no animation");
        }
    }
    tracing::debug!(
        version = %bundle.version,
        animations = bundle.registry.animation_count(),
        assets = bundle.registry.asset_count(),
        "parsed archive"
    );
    Ok(bundle)
}

fn layout_file_name(path: &str) -> &str {
    crate::foundation::ids::last_segment(path)
}

fn apply_metadata(bundle: &mut Bundle, manifest: &Manifest) {
    if !manifest.generator().is_empty() {
        bundle.metadata.generator = manifest.generator().to_owned();
    }
    if let Manifest::V1(m) = manifest {
        bundle.metadata.author = m.author.clone();
        bundle.metadata.description = m.description.clone();
        bundle.metadata.keywords = m.keywords.clone();
        bundle.metadata.revision = m.revision;
        bundle.metadata.custom = m.custom.clone();
    }
}

fn apply_animation_record(manifest: &Manifest, animation: Animation) -> BundleResult<Animation> {
    let id = animation.id().to_owned();
    match manifest {
        Manifest::V1(m) => {
            let record = m.animations.iter().find(|r| r.id == id).ok_or_else(|| {
                BundleError::dangling(format!("animation '{id}' has no manifest record"))
            })?;
            let active = m.active_animation_id.as_deref() == Some(id.as_str());
            Ok(animation
                .with_playback(record.playback.clone())?
                .with_default_active(active))
        }
        Manifest::V2(m) => {
            let record = m.animations.iter().find(|r| r.id == id).ok_or_else(|| {
                BundleError::dangling(format!("animation '{id}' has no manifest record"))
            })?;
            let active = m
                .initial
                .as_ref()
                .and_then(|i| i.animation.as_deref())
                == Some(id.as_str());
            Ok(animation
                .with_background(record.background.clone())
                .with_default_active(active))
        }
    }
}

fn apply_theme_scoping(bundle: &mut Bundle, manifest: &Manifest) -> BundleResult<()> {
    let Manifest::V2(m) = manifest else {
        return Ok(());
    };
    if let Some(initial) = m.initial.as_ref().and_then(|i| i.animation.as_deref())
        && bundle.registry.animation(initial).is_none()
    {
        return Err(BundleError::dangling(format!(
            "manifest initial animation '{initial}' is not in the archive"
        )));
    }
    for record in &m.animations {
        for theme_id in &record.themes {
            bundle.registry.assign_theme(theme_id, &record.id)?;
        }
        if let Some(theme_id) = &record.initial_theme {
            if bundle.registry.theme(theme_id).is_none() {
                return Err(BundleError::dangling(format!(
                    "animation '{}' has unknown initial theme '{theme_id}'",
                    record.id
                )));
            }
            let theme_id = theme_id.clone();
            bundle
                .registry
                .update_animation(&record.id, |a| Ok(a.with_initial_theme(Some(theme_id))))?;
        }
    }
    Ok(())
}

/// Second pass: link pooled files to every animation whose JSON references them by exact file
/// name (or bare id when the reference has no extension).
fn link_assets(
    bundle: &mut Bundle,
    pool: &mut IndexMap<(AssetKind, &str), Pooled<'_>>,
) -> BundleResult<()> {
    let ids: Vec<String> = bundle
        .registry
        .animations()
        .map(|a| a.id().to_owned())
        .collect();

    for id in ids {
        let refs = match bundle.registry.animation(&id).and_then(Animation::data) {
            Some(data) => lottie::external_records(data),
            None => continue,
        };
        for reference in refs {
            let same_kind = |kind: &AssetKind| *kind == reference.kind;
            let key = pool
                .keys()
                .position(|(kind, name)| same_kind(kind) && *name == reference.file_name)
                .or_else(|| {
                    pool.keys().position(|(kind, name)| {
                        same_kind(kind) && layout::asset_id(name) == reference.file_name
                    })
                });
            let Some(idx) = key else {
                tracing::trace!(animation = %id, file = %reference.file_name, "reference not in archive");
                continue;
            };
            let Some((&(kind, file_name), pooled)) = pool.get_index_mut(idx) else {
                continue;
            };
            match pooled.handle {
                Some(handle) => bundle.registry.link_asset(handle, &id)?,
                None => {
                    let mut asset = Asset::new(kind, file_name, pooled.bytes.to_vec())?
                        .with_options(pooled.options)?;
                    if let Some(lottie_id) = &reference.lottie_id {
                        asset = asset.with_lottie_asset_id(lottie_id.clone());
                    }
                    pooled.handle = Some(bundle.registry.add_asset(&id, asset)?);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/container/reader.rs"]
mod tests;
