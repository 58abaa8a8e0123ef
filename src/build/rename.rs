use std::collections::HashMap;

use crate::{
    model::{AssetHandle, AssetKind},
    registry::AssetRegistry,
};

/// Plan `<prefix>_N` names for every asset of `kind`.
///
/// Animations are walked back to front and each animation's assets back to front, with a
/// counter that starts at the number of distinct assets and is decremented before each
/// assignment. A shared asset takes its name at its first owner in registry order, so the
/// walk visits the first-owner ordering in reverse.
pub(crate) fn plan_names(registry: &AssetRegistry, kind: AssetKind) -> HashMap<AssetHandle, String> {
    let first_owner_order = registry.flattened_assets(kind);
    let mut counter = first_owner_order.len();
    let mut plan = HashMap::with_capacity(counter);
    for handle in first_owner_order.iter().rev() {
        counter -= 1;
        plan.insert(*handle, format!("{}_{counter}", kind.prefix()));
    }
    plan
}

/// Renumber images and audio across a multi-animation bundle so archive file names are unique.
/// Single-animation bundles keep their extraction names.
pub(crate) fn rename_assets(registry: &mut AssetRegistry) -> usize {
    if registry.animation_count() <= 1 {
        return 0;
    }
    let mut rewritten = 0;
    for kind in [AssetKind::Image, AssetKind::Audio] {
        let plan = plan_names(registry, kind);
        rewritten += registry.rename_assets(kind, &plan);
    }
    if rewritten > 0 {
        tracing::debug!(rewritten, "renamed asset references");
    }
    rewritten
}

#[cfg(test)]
#[path = "../../tests/unit/build/rename.rs"]
mod tests;
