use std::fmt;

use crate::schema::ValidationIssues;

/// Convenience result type used across the crate.
pub type BundleResult<T> = Result<T, BundleError>;

/// Entity kinds held by a bundle, used to qualify identity and schema errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Lottie animation document.
    Animation,
    /// Raster image asset.
    Image,
    /// Audio clip asset.
    Audio,
    /// Theme (style overlay) document.
    Theme,
    /// State-machine document.
    StateMachine,
}

impl EntityKind {
    /// Stable lowercase name used in error messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Animation => "animation",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Theme => "theme",
            Self::StateMachine => "state machine",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error taxonomy used by bundle APIs.
#[derive(thiserror::Error, Debug)]
pub enum BundleError {
    /// The archive is unreadable, or its manifest is missing or malformed.
    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    /// An entry or document references an id that has no counterpart.
    #[error("dangling reference: {0}")]
    DanglingReference(String),

    /// A theme or state-machine document failed schema validation.
    #[error("schema validation failed for {kind} '{id}':\n{issues}")]
    SchemaValidation {
        /// Kind of the rejected document.
        kind: EntityKind,
        /// Id of the rejected document.
        id: String,
        /// Structured issues reported by the validator.
        issues: ValidationIssues,
    },

    /// An add call reused an id that is already registered.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId {
        /// Kind of the rejected entity.
        kind: EntityKind,
        /// The id that is already present.
        id: String,
    },

    /// Fetching a remote animation, theme or asset failed.
    #[error("network error fetching '{url}': {cause:#}")]
    Network {
        /// URL that could not be fetched.
        url: String,
        /// Underlying transport or decoding failure.
        cause: anyhow::Error,
    },

    /// Invalid caller-provided data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing JSON documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A build plugin failed.
    #[error("plugin '{name}' failed: {message}")]
    Plugin {
        /// Plugin name as reported by [`crate::BundlePlugin::name`].
        name: String,
        /// Failure description.
        message: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BundleError {
    /// Build a [`BundleError::MalformedArchive`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedArchive(msg.into())
    }

    /// Build a [`BundleError::DanglingReference`] value.
    pub fn dangling(msg: impl Into<String>) -> Self {
        Self::DanglingReference(msg.into())
    }

    /// Build a [`BundleError::DuplicateId`] value.
    pub fn duplicate(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    /// Build a [`BundleError::SchemaValidation`] value.
    pub fn schema(kind: EntityKind, id: impl Into<String>, issues: ValidationIssues) -> Self {
        Self::SchemaValidation {
            kind,
            id: id.into(),
            issues,
        }
    }

    /// Build a [`BundleError::Network`] value.
    pub fn network(url: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self::Network {
            url: url.into(),
            cause: cause.into(),
        }
    }

    /// Build a [`BundleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BundleError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`BundleError::Plugin`] value.
    pub fn plugin(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
