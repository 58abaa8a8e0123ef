//! Archive format versions.

use std::{fmt, str::FromStr};

use crate::{BundleError, BundleResult};

/// Bundle archive layout generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    /// Legacy layout: manifest `version "1"`, `animations/`, `images/`, `audio/`, playback
    /// settings in the manifest, no themes or state machines.
    V1,
    /// Current layout: manifest `version "2"`, `a/`, `i/`, `u/`, `t/`, `s/`.
    #[default]
    V2,
}

impl FormatVersion {
    /// Value written to the manifest `version` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }

    /// Sniff the version from a manifest `version` field. Anything but `"2"` reads as legacy.
    pub fn from_manifest_field(version: Option<&str>) -> Self {
        match version.map(str::trim) {
            Some("2") => Self::V2,
            _ => Self::V1,
        }
    }

    /// Whether this layout packages themes and state machines.
    pub fn supports_themes(self) -> bool {
        matches!(self, Self::V2)
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        })
    }
}

impl FromStr for FormatVersion {
    type Err = BundleError;

    fn from_str(s: &str) -> BundleResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "v1" => Ok(Self::V1),
            "2" | "v2" => Ok(Self::V2),
            other => Err(BundleError::validation(format!(
                "unsupported format version '{other}' (expected v1 or v2)"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/version.rs"]
mod tests;
