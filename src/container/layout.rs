use crate::{FormatVersion, foundation::ids::file_stem};

pub(crate) const MANIFEST_PATH: &str = "manifest.json";

/// Where an archive entry belongs once classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EntryClass {
    Manifest,
    Animation { id: String },
    Image { file_name: String },
    Audio { file_name: String },
    Theme { id: String },
    StateMachine { id: String },
}

struct Dirs {
    animations: &'static str,
    images: &'static str,
    audio: &'static str,
    themes: Option<&'static str>,
    state_machines: Option<&'static str>,
}

fn dirs(version: FormatVersion) -> Dirs {
    match version {
        FormatVersion::V1 => Dirs {
            animations: "animations",
            images: "images",
            audio: "audio",
            themes: None,
            state_machines: None,
        },
        FormatVersion::V2 => Dirs {
            animations: "a",
            images: "i",
            audio: "u",
            themes: Some("t"),
            state_machines: Some("s"),
        },
    }
}

pub(crate) fn animation_path(version: FormatVersion, id: &str) -> String {
    format!("{}/{id}.json", dirs(version).animations)
}

pub(crate) fn image_path(version: FormatVersion, file_name: &str) -> String {
    format!("{}/{file_name}", dirs(version).images)
}

pub(crate) fn audio_path(version: FormatVersion, file_name: &str) -> String {
    format!("{}/{file_name}", dirs(version).audio)
}

pub(crate) fn theme_path(version: FormatVersion, id: &str) -> Option<String> {
    dirs(version).themes.map(|dir| format!("{dir}/{id}.json"))
}

pub(crate) fn state_machine_path(version: FormatVersion, id: &str) -> Option<String> {
    dirs(version)
        .state_machines
        .map(|dir| format!("{dir}/{id}.json"))
}

/// Directory written into the `u` field of externalized image records.
pub(crate) fn image_reference_dir(version: FormatVersion) -> &'static str {
    match version {
        FormatVersion::V1 => "/images/",
        FormatVersion::V2 => "/i/",
    }
}

/// Directory written into the `u` field of externalized audio records.
pub(crate) fn audio_reference_dir(version: FormatVersion) -> &'static str {
    match version {
        FormatVersion::V1 => "/audio/",
        FormatVersion::V2 => "/u/",
    }
}

/// Classify an archive path for `version`. Unknown paths yield `None`.
pub(crate) fn classify(version: FormatVersion, path: &str) -> Option<EntryClass> {
    let path = path.trim_start_matches("./").trim_start_matches('/');
    if path == MANIFEST_PATH {
        return Some(EntryClass::Manifest);
    }
    let (dir, name) = path.split_once('/')?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    let d = dirs(version);
    let json_id = || name.strip_suffix(".json").map(str::to_owned);

    if dir == d.animations {
        return json_id().map(|id| EntryClass::Animation { id });
    }
    if dir == d.images {
        return Some(EntryClass::Image {
            file_name: name.to_owned(),
        });
    }
    if dir == d.audio {
        return Some(EntryClass::Audio {
            file_name: name.to_owned(),
        });
    }
    if Some(dir) == d.themes {
        return json_id().map(|id| EntryClass::Theme { id });
    }
    if Some(dir) == d.state_machines {
        return json_id().map(|id| EntryClass::StateMachine { id });
    }
    None
}

/// Asset id for an archive file name (the file stem).
pub(crate) fn asset_id(file_name: &str) -> &str {
    file_stem(file_name)
}

#[cfg(test)]
#[path = "../../tests/unit/container/layout.rs"]
mod tests;
