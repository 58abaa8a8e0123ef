use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    Bundle, BundleResult,
    assets::phash::{DUPLICATE_DISTANCE_THRESHOLD, ImageHash},
    build::{options::build_thread_pool, pipeline::BundlePlugin},
    model::{AssetHandle, AssetKind},
};

/// One canonical image and the file names folded into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DedupCluster {
    /// Surviving file name.
    pub canonical: String,
    /// Removed file names, in iteration order.
    pub duplicates: Vec<String>,
}

/// Outcome of a duplicate reduction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DedupReport {
    /// Clusters with at least one duplicate.
    pub clusters: Vec<DedupCluster>,
}

impl DedupReport {
    /// Number of assets removed.
    pub fn removed(&self) -> usize {
        self.clusters.iter().map(|c| c.duplicates.len()).sum()
    }
}

/// Folds perceptually identical images into one canonical copy.
///
/// Images are visited in registry order (animation order, then each animation's asset order,
/// shared assets once). The first unclustered image becomes canonical for every later image
/// within [`DUPLICATE_DISTANCE_THRESHOLD`]; those are removed and their owners re-pointed at the
/// canonical. Excluded images and images the hasher cannot decode are never compared.
#[derive(Clone, Copy, Debug, Default)]
pub struct DuplicateImageReducer;

impl DuplicateImageReducer {
    /// Run the reduction on `bundle`.
    #[tracing::instrument(skip_all)]
    pub fn reduce(&self, bundle: &mut Bundle) -> BundleResult<DedupReport> {
        let hasher = Arc::clone(&bundle.hasher);
        let candidates: Vec<AssetHandle> = bundle
            .registry
            .flattened_assets(AssetKind::Image)
            .into_iter()
            .filter(|h| {
                bundle
                    .registry
                    .asset(*h)
                    .is_some_and(|a| !a.is_excluded() && a.bytes().is_some())
            })
            .collect();
        if candidates.len() < 2 {
            return Ok(DedupReport::default());
        }

        let hashes: Vec<Option<ImageHash>> = {
            let registry = &bundle.registry;
            let pool = build_thread_pool(bundle.options.plugin_threads)?;
            pool.install(|| {
                candidates
                    .par_iter()
                    .map(|h| {
                        let asset = registry.asset(*h)?;
                        match hasher.hash(asset.bytes()?) {
                            Ok(hash) => Some(hash),
                            Err(e) => {
                                tracing::debug!(asset = asset.file_name(), error = %e, "image not hashable, skipping");
                                None
                            }
                        }
                    })
                    .collect()
            })
        };

        let mut flagged = vec![false; candidates.len()];
        let mut clusters: Vec<(usize, Vec<usize>)> = Vec::new();
        for i in 0..candidates.len() {
            if flagged[i] {
                continue;
            }
            let Some(subject) = hashes[i] else { continue };
            let mut matches = Vec::new();
            for j in i + 1..candidates.len() {
                if flagged[j] {
                    continue;
                }
                let Some(other) = hashes[j] else { continue };
                if hasher.distance(subject, other) < DUPLICATE_DISTANCE_THRESHOLD {
                    flagged[j] = true;
                    matches.push(j);
                }
            }
            if !matches.is_empty() {
                clusters.push((i, matches));
            }
        }

        let mut report = DedupReport::default();
        for (canonical_idx, duplicate_idxs) in clusters {
            let canonical = candidates[canonical_idx];
            let canonical_name = file_name(bundle, canonical);
            let mut duplicates = Vec::with_capacity(duplicate_idxs.len());
            for idx in duplicate_idxs {
                let duplicate = candidates[idx];
                duplicates.push(file_name(bundle, duplicate));
                bundle.registry.merge_asset(duplicate, canonical)?;
            }
            tracing::debug!(canonical = %canonical_name, ?duplicates, "merged duplicate images");
            report.clusters.push(DedupCluster {
                canonical: canonical_name,
                duplicates,
            });
        }
        tracing::debug!(clusters = report.clusters.len(), removed = report.removed(), "duplicate reduction done");
        Ok(report)
    }
}

fn file_name(bundle: &Bundle, handle: AssetHandle) -> String {
    bundle
        .registry
        .asset(handle)
        .map(|a| a.file_name().to_owned())
        .unwrap_or_default()
}

impl BundlePlugin for DuplicateImageReducer {
    fn name(&self) -> &str {
        "duplicate-image-reducer"
    }

    fn on_build(&self, bundle: &mut Bundle) -> BundleResult<()> {
        self.reduce(bundle).map(|_| ())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/dedup.rs"]
mod tests;
