//! Owned entity collections with bidirectional ownership links.
//!
//! Every link is stored on both ends: an animation lists its asset handles and theme ids, an
//! asset lists its owning animation ids, a theme lists the animations it is scoped to. All
//! mutations go through this type so the two ends never disagree.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::{
    BundleError, BundleResult,
    assets::lottie,
    foundation::error::EntityKind,
    model::{Animation, Asset, AssetHandle, AssetKind, StateMachine, Theme},
};

/// Insertion-ordered store of animations, assets, themes and state machines.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    animations: IndexMap<String, Animation>,
    assets: IndexMap<AssetHandle, Asset>,
    themes: IndexMap<String, Theme>,
    state_machines: IndexMap<String, StateMachine>,
    next_handle: u64,
}

impl AssetRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ---- animations ----

    /// Register an animation. Links carried over from another registry are dropped.
    pub fn add_animation(&mut self, mut animation: Animation) -> BundleResult<()> {
        if self.animations.contains_key(animation.id()) {
            return Err(BundleError::duplicate(EntityKind::Animation, animation.id()));
        }
        animation.assets.clear();
        animation.themes.clear();
        self.animations
            .insert(animation.id().to_owned(), animation);
        Ok(())
    }

    /// Remove an animation, unscoping its themes and dropping assets it owned alone.
    pub fn remove_animation(&mut self, id: &str) -> Option<Animation> {
        let mut animation = self.animations.shift_remove(id)?;
        for theme_id in &animation.themes {
            if let Some(theme) = self.themes.get_mut(theme_id) {
                theme.animations.shift_remove(id);
            }
        }
        for handle in &animation.assets {
            let orphaned = match self.assets.get_mut(handle) {
                Some(asset) => {
                    asset.owners.retain(|owner| owner != id);
                    asset.owners.is_empty()
                }
                None => false,
            };
            if orphaned {
                self.assets.shift_remove(handle);
            }
        }
        animation.assets.clear();
        animation.themes.clear();
        Some(animation)
    }

    /// Replace an animation's settings through a pure update function.
    ///
    /// The id is fixed and ownership links are preserved.
    pub fn update_animation(
        &mut self,
        id: &str,
        update: impl FnOnce(Animation) -> BundleResult<Animation>,
    ) -> BundleResult<()> {
        let current = self
            .animations
            .get(id)
            .ok_or_else(|| BundleError::validation(format!("unknown animation '{id}'")))?;
        let mut next = update(current.clone())?;
        if next.id() != id {
            return Err(BundleError::validation(format!(
                "update of animation '{id}' must not change its id"
            )));
        }
        next.assets = current.assets.clone();
        next.themes = current.themes.clone();
        self.animations.insert(id.to_owned(), next);
        Ok(())
    }

    /// Animation by id.
    pub fn animation(&self, id: &str) -> Option<&Animation> {
        self.animations.get(id)
    }

    /// Animations in insertion order.
    pub fn animations(&self) -> impl Iterator<Item = &Animation> {
        self.animations.values()
    }

    /// Number of animations.
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub(crate) fn animation_mut(&mut self, id: &str) -> Option<&mut Animation> {
        self.animations.get_mut(id)
    }

    pub(crate) fn animations_mut(&mut self) -> impl Iterator<Item = &mut Animation> {
        self.animations.values_mut()
    }

    // ---- assets ----

    /// Register an asset owned by `owner`.
    ///
    /// The id must be unique among the owner's assets of the same kind.
    pub fn add_asset(&mut self, owner: &str, mut asset: Asset) -> BundleResult<AssetHandle> {
        let Some(animation) = self.animations.get(owner) else {
            return Err(BundleError::validation(format!(
                "cannot add {} '{}': unknown owner animation '{owner}'",
                asset.kind().prefix(),
                asset.id()
            )));
        };
        if self
            .find_asset(animation.id(), asset.kind(), asset.id())
            .is_some()
        {
            return Err(BundleError::duplicate(asset.kind().entity(), asset.id()));
        }
        let handle = AssetHandle(self.next_handle);
        self.next_handle += 1;
        asset.owners = vec![owner.to_owned()];
        self.assets.insert(handle, asset);
        if let Some(animation) = self.animations.get_mut(owner) {
            animation.assets.push(handle);
        }
        Ok(handle)
    }

    /// Share an existing asset with another animation. Linking twice is a no-op.
    pub fn link_asset(&mut self, handle: AssetHandle, owner: &str) -> BundleResult<()> {
        let Some(animation) = self.animations.get_mut(owner) else {
            return Err(BundleError::validation(format!(
                "cannot link asset: unknown owner animation '{owner}'"
            )));
        };
        let Some(asset) = self.assets.get_mut(&handle) else {
            return Err(BundleError::validation(format!(
                "cannot link asset #{}: not registered",
                handle.as_u64()
            )));
        };
        if !animation.assets.contains(&handle) {
            animation.assets.push(handle);
        }
        if !asset.owners.iter().any(|o| o == owner) {
            asset.owners.push(owner.to_owned());
        }
        Ok(())
    }

    /// Remove an asset and unlink it from every owner.
    pub fn remove_asset(&mut self, handle: AssetHandle) -> Option<Asset> {
        let mut asset = self.assets.shift_remove(&handle)?;
        for owner in &asset.owners {
            if let Some(animation) = self.animations.get_mut(owner) {
                animation.assets.retain(|h| *h != handle);
            }
        }
        asset.owners.clear();
        Some(asset)
    }

    /// Asset by handle.
    pub fn asset(&self, handle: AssetHandle) -> Option<&Asset> {
        self.assets.get(&handle)
    }

    /// Assets in insertion order.
    pub fn assets(&self) -> impl Iterator<Item = (AssetHandle, &Asset)> {
        self.assets.iter().map(|(h, a)| (*h, a))
    }

    /// Number of assets.
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Assets owned by an animation, in link order.
    pub fn assets_of(&self, animation_id: &str) -> Vec<(AssetHandle, &Asset)> {
        self.animations
            .get(animation_id)
            .into_iter()
            .flat_map(|a| a.assets.iter())
            .filter_map(|h| self.assets.get(h).map(|asset| (*h, asset)))
            .collect()
    }

    /// Handle of the asset `id` of `kind` owned by `animation_id`.
    pub fn find_asset(&self, animation_id: &str, kind: AssetKind, id: &str) -> Option<AssetHandle> {
        self.assets_of(animation_id)
            .into_iter()
            .find(|(_, a)| a.kind() == kind && a.id() == id)
            .map(|(h, _)| h)
    }

    /// Every asset of `kind` reached by walking animations in order, each shared asset once.
    pub(crate) fn flattened_assets(&self, kind: AssetKind) -> Vec<AssetHandle> {
        let mut seen = HashSet::new();
        self.animations
            .values()
            .flat_map(|a| a.assets.iter().copied())
            .filter(|h| self.assets.get(h).is_some_and(|a| a.kind() == kind))
            .filter(|h| seen.insert(*h))
            .collect()
    }

    pub(crate) fn asset_mut(&mut self, handle: AssetHandle) -> Option<&mut Asset> {
        self.assets.get_mut(&handle)
    }

    /// Rename assets of one kind and rewrite every owner's references in one pass per owner.
    pub(crate) fn rename_assets(
        &mut self,
        kind: AssetKind,
        new_ids: &HashMap<AssetHandle, String>,
    ) -> usize {
        let mut per_owner: IndexMap<String, HashMap<String, String>> = IndexMap::new();
        for (handle, new_id) in new_ids {
            let Some(asset) = self.assets.get_mut(handle) else {
                continue;
            };
            if asset.kind() != kind || asset.id() == new_id {
                continue;
            }
            let old_file = asset.file_name().to_owned();
            asset.set_id(new_id);
            for owner in &asset.owners {
                per_owner
                    .entry(owner.clone())
                    .or_default()
                    .insert(old_file.clone(), asset.file_name().to_owned());
            }
        }
        let mut rewritten = 0;
        for (owner, mapping) in per_owner {
            if let Some(data) = self.animations.get_mut(&owner).and_then(Animation::data_mut) {
                rewritten += lottie::rename_references(data, kind, &mapping);
            }
        }
        rewritten
    }

    /// Fold `duplicate` into `canonical`: owners of the duplicate now reference the canonical,
    /// keeping their list position, and the duplicate leaves the registry.
    pub(crate) fn merge_asset(
        &mut self,
        duplicate: AssetHandle,
        canonical: AssetHandle,
    ) -> BundleResult<()> {
        if duplicate == canonical {
            return Ok(());
        }
        let (Some(dup), Some(canon)) = (self.assets.get(&duplicate), self.assets.get(&canonical))
        else {
            return Err(BundleError::validation("merge of unregistered asset"));
        };
        let kind = dup.kind();
        let mapping = HashMap::from([(dup.file_name().to_owned(), canon.file_name().to_owned())]);
        let owners = dup.owners.clone();

        for owner in &owners {
            let Some(animation) = self.animations.get_mut(owner) else {
                continue;
            };
            if let Some(data) = animation.data_mut() {
                lottie::rename_references(data, kind, &mapping);
            }
            if animation.assets.contains(&canonical) {
                animation.assets.retain(|h| *h != duplicate);
            } else if let Some(slot) = animation.assets.iter_mut().find(|h| **h == duplicate) {
                *slot = canonical;
            }
            if let Some(canon) = self.assets.get_mut(&canonical)
                && !canon.owners.contains(owner)
            {
                canon.owners.push(owner.clone());
            }
        }
        self.assets.shift_remove(&duplicate);
        Ok(())
    }

    // ---- themes ----

    /// Register a theme.
    pub fn add_theme(&mut self, mut theme: Theme) -> BundleResult<()> {
        if self.themes.contains_key(theme.id()) {
            return Err(BundleError::duplicate(EntityKind::Theme, theme.id()));
        }
        theme.animations.clear();
        self.themes.insert(theme.id().to_owned(), theme);
        Ok(())
    }

    /// Remove a theme, unscoping it everywhere and clearing initial-theme pointers to it.
    pub fn remove_theme(&mut self, id: &str) -> Option<Theme> {
        let mut theme = self.themes.shift_remove(id)?;
        for animation in self.animations.values_mut() {
            animation.themes.shift_remove(id);
            animation.clear_initial_theme_if(id);
        }
        theme.animations.clear();
        Some(theme)
    }

    /// Scope a theme to an animation. Both must exist.
    pub fn assign_theme(&mut self, theme_id: &str, animation_id: &str) -> BundleResult<()> {
        let Some(theme) = self.themes.get_mut(theme_id) else {
            return Err(BundleError::dangling(format!(
                "theme '{theme_id}' is not registered"
            )));
        };
        let Some(animation) = self.animations.get_mut(animation_id) else {
            return Err(BundleError::dangling(format!(
                "animation '{animation_id}' is not registered"
            )));
        };
        theme.animations.insert(animation_id.to_owned());
        animation.themes.insert(theme_id.to_owned());
        Ok(())
    }

    /// Remove a theme scoping. Returns whether it existed.
    pub fn unassign_theme(&mut self, theme_id: &str, animation_id: &str) -> bool {
        let from_theme = self
            .themes
            .get_mut(theme_id)
            .is_some_and(|t| t.animations.shift_remove(animation_id));
        let from_animation = self
            .animations
            .get_mut(animation_id)
            .is_some_and(|a| a.themes.shift_remove(theme_id));
        from_theme || from_animation
    }

    /// Theme by id.
    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.themes.get(id)
    }

    /// Themes in insertion order.
    pub fn themes(&self) -> impl Iterator<Item = &Theme> {
        self.themes.values()
    }

    pub(crate) fn themes_mut(&mut self) -> impl Iterator<Item = &mut Theme> {
        self.themes.values_mut()
    }

    // ---- state machines ----

    /// Register a state machine.
    pub fn add_state_machine(&mut self, state_machine: StateMachine) -> BundleResult<()> {
        if self.state_machines.contains_key(state_machine.id()) {
            return Err(BundleError::duplicate(
                EntityKind::StateMachine,
                state_machine.id(),
            ));
        }
        self.state_machines
            .insert(state_machine.id().to_owned(), state_machine);
        Ok(())
    }

    /// Remove a state machine.
    pub fn remove_state_machine(&mut self, id: &str) -> Option<StateMachine> {
        self.state_machines.shift_remove(id)
    }

    /// State machine by id.
    pub fn state_machine(&self, id: &str) -> Option<&StateMachine> {
        self.state_machines.get(id)
    }

    /// State machines in insertion order.
    pub fn state_machines(&self) -> impl Iterator<Item = &StateMachine> {
        self.state_machines.values()
    }
}

#[cfg(test)]
#[path = "../tests/unit/registry.rs"]
mod tests;
