//! Bundle entities: animations, image/audio assets, themes, state machines and metadata.
//!
//! Entities are built through validated constructors and adjusted through consuming `with_*`
//! functions. Ownership links between them are maintained by the registry, never by the
//! entities themselves.

pub(crate) mod animation;
pub(crate) mod asset;
pub(crate) mod metadata;
pub(crate) mod state_machine;
pub(crate) mod theme;

pub use animation::{Animation, AnimationSource, LoopSetting, PlayMode, PlaybackSettings};
pub use asset::{Asset, AssetHandle, AssetKind, AssetSource};
pub use metadata::{BundleMetadata, GENERATOR};
pub use state_machine::StateMachine;
pub use theme::{Theme, ThemeSource};
