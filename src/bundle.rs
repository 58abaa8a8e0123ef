//! The in-memory bundle and its builder.

use std::{fmt, sync::Arc};

use crate::{
    BundleError, BundleResult, FormatVersion,
    assets::{
        codec::{AssetCodec, default_asset_codec},
        phash::{DifferenceHasher, PerceptualHasher},
    },
    build::{
        dedup::DuplicateImageReducer, extract, options::BuildOptions, pipeline, pipeline::BundlePlugin,
        rename, resolve,
    },
    container::{
        codec::{ArchiveCodec, ZipCodec},
        reader, writer,
    },
    foundation::error::EntityKind,
    model::{Animation, Asset, AssetHandle, BundleMetadata, StateMachine, Theme, ThemeSource},
    registry::AssetRegistry,
    schema::{BuiltinValidator, DocumentValidator},
};

/// One `.lottie` document in memory: entities, metadata, plugins and injected capabilities.
///
/// A bundle has a single logical writer; it does no internal locking.
pub struct Bundle {
    pub(crate) version: FormatVersion,
    pub(crate) metadata: BundleMetadata,
    pub(crate) registry: AssetRegistry,
    pub(crate) options: BuildOptions,
    pub(crate) plugins: Vec<Arc<dyn BundlePlugin>>,
    pub(crate) asset_codec: Arc<dyn AssetCodec>,
    pub(crate) archive_codec: Arc<dyn ArchiveCodec>,
    pub(crate) validator: Arc<dyn DocumentValidator>,
    pub(crate) hasher: Arc<dyn PerceptualHasher>,
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("version", &self.version)
            .field("metadata", &self.metadata)
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("plugins", &self.plugins.len())
            .finish_non_exhaustive()
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new(FormatVersion::default())
    }
}

impl Bundle {
    /// Empty bundle with default capabilities.
    pub fn new(version: FormatVersion) -> Self {
        Self {
            version,
            metadata: BundleMetadata::default(),
            registry: AssetRegistry::new(),
            options: BuildOptions::default(),
            plugins: Vec::new(),
            asset_codec: default_asset_codec(),
            archive_codec: Arc::new(ZipCodec),
            validator: Arc::new(BuiltinValidator),
            hasher: Arc::new(DifferenceHasher),
        }
    }

    /// Fluent construction with injected capabilities.
    pub fn builder() -> BundleBuilder {
        BundleBuilder::default()
    }

    /// Parse an archive with default capabilities.
    pub fn from_archive(bytes: &[u8]) -> BundleResult<Self> {
        Self::builder().from_archive(bytes)
    }

    /// Format version.
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// Metadata.
    pub fn metadata(&self) -> &BundleMetadata {
        &self.metadata
    }

    /// Replace metadata.
    pub fn set_metadata(&mut self, metadata: BundleMetadata) {
        self.metadata = metadata;
    }

    /// Build options.
    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Replace build options.
    pub fn set_options(&mut self, options: BuildOptions) -> BundleResult<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Read-only view of the entities.
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Register a build plugin. Plugins run in registration order within their phase.
    pub fn add_plugin(&mut self, plugin: impl BundlePlugin + 'static) {
        self.plugins.push(Arc::new(plugin));
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Add an animation.
    pub fn add_animation(&mut self, animation: Animation) -> BundleResult<()> {
        self.registry.add_animation(animation)
    }

    /// Remove an animation. See [`AssetRegistry::remove_animation`].
    pub fn remove_animation(&mut self, id: &str) -> Option<Animation> {
        self.registry.remove_animation(id)
    }

    /// Update an animation's settings. See [`AssetRegistry::update_animation`].
    pub fn update_animation(
        &mut self,
        id: &str,
        update: impl FnOnce(Animation) -> BundleResult<Animation>,
    ) -> BundleResult<()> {
        self.registry.update_animation(id, update)
    }

    /// Animation by id.
    pub fn animation(&self, id: &str) -> Option<&Animation> {
        self.registry.animation(id)
    }

    /// Add an image or audio asset owned by `owner`.
    pub fn add_asset(&mut self, owner: &str, asset: Asset) -> BundleResult<AssetHandle> {
        self.registry.add_asset(owner, asset)
    }

    /// Remove an asset from the bundle and from every owner.
    pub fn remove_asset(&mut self, handle: AssetHandle) -> Option<Asset> {
        self.registry.remove_asset(handle)
    }

    /// Add a theme. Inline documents are schema-validated now, URL-sourced ones during build.
    pub fn add_theme(&mut self, theme: Theme) -> BundleResult<()> {
        self.require_themes(EntityKind::Theme)?;
        if let ThemeSource::Data(data) = theme.source() {
            self.validator
                .validate_theme(data)
                .map_err(|issues| BundleError::schema(EntityKind::Theme, theme.id(), issues))?;
        }
        self.registry.add_theme(theme)
    }

    /// Remove a theme, unscoping it from every animation.
    pub fn remove_theme(&mut self, id: &str) -> Option<Theme> {
        self.registry.remove_theme(id)
    }

    /// Scope a theme to an animation.
    pub fn assign_theme(&mut self, theme_id: &str, animation_id: &str) -> BundleResult<()> {
        self.registry.assign_theme(theme_id, animation_id)
    }

    /// Remove a theme scoping.
    pub fn unassign_theme(&mut self, theme_id: &str, animation_id: &str) -> bool {
        self.registry.unassign_theme(theme_id, animation_id)
    }

    /// Add a schema-validated state machine.
    pub fn add_state_machine(&mut self, state_machine: StateMachine) -> BundleResult<()> {
        self.require_themes(EntityKind::StateMachine)?;
        self.validator
            .validate_state_machine(state_machine.data())
            .map_err(|issues| {
                BundleError::schema(EntityKind::StateMachine, state_machine.id(), issues)
            })?;
        self.registry.add_state_machine(state_machine)
    }

    /// Remove a state machine.
    pub fn remove_state_machine(&mut self, id: &str) -> Option<StateMachine> {
        self.registry.remove_state_machine(id)
    }

    fn require_themes(&self, kind: EntityKind) -> BundleResult<()> {
        if self.version.supports_themes() {
            return Ok(());
        }
        Err(BundleError::validation(format!(
            "format {} bundles cannot hold a {kind}",
            self.version
        )))
    }

    /// Run every build pass: resolve remote sources, extract embedded assets, resolve remote
    /// assets, rename, reduce duplicates (when enabled), run plugins, rename the survivors,
    /// check references.
    ///
    /// Final asset names depend only on the surviving assets, so building again is a no-op.
    #[tracing::instrument(skip(self), fields(version = %self.version))]
    pub fn build(&mut self) -> BundleResult<()> {
        self.options.validate()?;
        resolve::resolve_documents(self)?;
        let extracted = extract::extract_embedded_assets(self)?;
        resolve::resolve_assets(self)?;
        let renamed = rename::rename_assets(&mut self.registry);
        tracing::debug!(extracted, renamed, "asset passes complete");

        if self.options.deduplicate_images {
            DuplicateImageReducer.reduce(self)?;
        }
        pipeline::run_plugins(self)?;
        // Merges and plugins can leave gaps in the numbering.
        let renumbered = rename::rename_assets(&mut self.registry);
        if renumbered > 0 {
            tracing::debug!(renumbered, "renumbered surviving assets");
        }
        self.check_references()
    }

    /// Build, then serialize into archive bytes.
    #[tracing::instrument(skip(self), fields(version = %self.version))]
    pub fn to_archive(&mut self) -> BundleResult<Vec<u8>> {
        self.build()?;
        writer::write_archive(self)
    }

    fn check_references(&self) -> BundleResult<()> {
        for sm in self.registry.state_machines() {
            for anim_id in sm.animation_refs() {
                if self.registry.animation(anim_id).is_none() {
                    return Err(BundleError::dangling(format!(
                        "state machine '{}' references unknown animation '{anim_id}'",
                        sm.id()
                    )));
                }
            }
        }
        for animation in self.registry.animations() {
            if let Some(theme_id) = animation.initial_theme()
                && self.registry.theme(theme_id).is_none()
            {
                return Err(BundleError::dangling(format!(
                    "animation '{}' has unknown initial theme '{theme_id}'",
                    animation.id()
                )));
            }
        }
        Ok(())
    }
}

/// Fluent [`Bundle`] construction.
pub struct BundleBuilder {
    version: FormatVersion,
    metadata: BundleMetadata,
    options: BuildOptions,
    plugins: Vec<Arc<dyn BundlePlugin>>,
    asset_codec: Option<Arc<dyn AssetCodec>>,
    archive_codec: Option<Arc<dyn ArchiveCodec>>,
    validator: Option<Arc<dyn DocumentValidator>>,
    hasher: Option<Arc<dyn PerceptualHasher>>,
}

impl Default for BundleBuilder {
    fn default() -> Self {
        Self {
            version: FormatVersion::default(),
            metadata: BundleMetadata::default(),
            options: BuildOptions::default(),
            plugins: Vec::new(),
            asset_codec: None,
            archive_codec: None,
            validator: None,
            hasher: None,
        }
    }
}

impl BundleBuilder {
    /// Target format version.
    pub fn version(mut self, version: FormatVersion) -> Self {
        self.version = version;
        self
    }

    /// Metadata.
    pub fn metadata(mut self, metadata: BundleMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Build options.
    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a plugin.
    pub fn plugin(mut self, plugin: impl BundlePlugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Network and data-URL codec.
    pub fn asset_codec(mut self, codec: Arc<dyn AssetCodec>) -> Self {
        self.asset_codec = Some(codec);
        self
    }

    /// Archive compression codec.
    pub fn archive_codec(mut self, codec: Arc<dyn ArchiveCodec>) -> Self {
        self.archive_codec = Some(codec);
        self
    }

    /// Theme and state-machine validator.
    pub fn validator(mut self, validator: Arc<dyn DocumentValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Perceptual hasher used by the duplicate image reducer.
    pub fn hasher(mut self, hasher: Arc<dyn PerceptualHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Validate options and produce an empty bundle.
    pub fn build(self) -> BundleResult<Bundle> {
        self.options.validate()?;
        let mut bundle = Bundle::new(self.version);
        bundle.metadata = self.metadata;
        bundle.options = self.options;
        bundle.plugins = self.plugins;
        if let Some(codec) = self.asset_codec {
            bundle.asset_codec = codec;
        }
        if let Some(codec) = self.archive_codec {
            bundle.archive_codec = codec;
        }
        if let Some(validator) = self.validator {
            bundle.validator = validator;
        }
        if let Some(hasher) = self.hasher {
            bundle.hasher = hasher;
        }
        Ok(bundle)
    }

    /// Parse archive bytes into a bundle carrying this builder's capabilities. The format
    /// version is taken from the archive manifest.
    pub fn from_archive(self, bytes: &[u8]) -> BundleResult<Bundle> {
        reader::read_archive(self.build()?, bytes)
    }
}

#[cfg(test)]
#[path = "../tests/unit/bundle.rs"]
mod tests;
