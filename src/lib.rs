//! dotlottie-bundle builds, parses and converts `.lottie` archives.
//!
//! A `.lottie` file is a ZIP container holding Lottie animation JSON, the images and audio
//! those animations reference, optional themes and state machines, and a `manifest.json`
//! table of contents. Two layouts exist: legacy (`version "1"`) and current (`version "2"`).
//!
//! - Assemble a [`Bundle`] from [`Animation`]s, [`Asset`]s, [`Theme`]s and [`StateMachine`]s
//! - [`Bundle::build`] resolves remote sources, extracts embedded assets and runs plugins
//! - [`Bundle::to_archive`] / [`Bundle::from_archive`] serialize and parse
//! - [`Bundle::convert_to`] moves a bundle between layouts
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod bridge;
mod build;
mod bundle;
mod container;
mod foundation;
mod manifest;
mod model;
mod registry;
mod schema;
mod version;

pub use crate::assets::codec::{AssetCodec, OfflineAssetCodec};
#[cfg(feature = "http")]
pub use crate::assets::codec::HttpAssetCodec;
pub use crate::assets::media::{DataUrl, decode_data_url, encode_data_url, mime_for_file};
pub use crate::assets::phash::{
    DUPLICATE_DISTANCE_THRESHOLD, DifferenceHasher, ImageHash, PerceptualHasher,
};
pub use crate::build::dedup::{DedupCluster, DedupReport, DuplicateImageReducer};
pub use crate::build::options::BuildOptions;
pub use crate::build::pipeline::BundlePlugin;
pub use crate::bundle::{Bundle, BundleBuilder};
pub use crate::container::codec::{ArchiveCodec, ArchiveEntry, EntryOptions, ZipCodec};
pub use crate::foundation::error::{BundleError, BundleResult, EntityKind};
pub use crate::foundation::ids::validate_id;
pub use crate::manifest::{
    AnimationRecordV1, AnimationRecordV2, IdRecord, InitialRecord, Manifest, ManifestV1,
    ManifestV2,
};
pub use crate::model::{
    Animation, AnimationSource, Asset, AssetHandle, AssetKind, AssetSource, BundleMetadata,
    GENERATOR, LoopSetting, PlayMode, PlaybackSettings, StateMachine, Theme, ThemeSource,
};
pub use crate::registry::AssetRegistry;
pub use crate::schema::{
    BuiltinValidator, DocumentValidator, PathElem, ValidationIssue, ValidationIssues,
};
pub use crate::version::FormatVersion;
