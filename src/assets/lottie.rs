//! Reads and rewrites the `assets` records of Lottie animation JSON.
//!
//! A record's kind comes from its data URL MIME type or its file extension. Failing both,
//! image records carry `w`/`h`, audio records carry neither. Precomposition records carry
//! `layers`. `p` is either a base64 data URL (`e == 1`) or a file name resolved against `u`.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::{assets::media, foundation::ids::last_segment, model::AssetKind};

/// Asset record whose payload is still embedded as a data URL.
#[derive(Clone, Debug)]
pub(crate) struct EmbeddedRecord {
    pub(crate) index: usize,
    pub(crate) kind: AssetKind,
    pub(crate) lottie_id: Option<String>,
    pub(crate) data_url: String,
}

/// Asset record pointing at an external file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ExternalRecord {
    pub(crate) kind: AssetKind,
    pub(crate) lottie_id: Option<String>,
    pub(crate) file_name: String,
}

fn records(data: &Value) -> impl Iterator<Item = (usize, &Map<String, Value>)> {
    data.get("assets")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .enumerate()
        .filter_map(|(idx, v)| v.as_object().map(|m| (idx, m)))
}

fn records_mut(data: &mut Value) -> impl Iterator<Item = &mut Map<String, Value>> {
    data.get_mut("assets")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn path_of(record: &Map<String, Value>) -> Option<&str> {
    record.get("p").and_then(Value::as_str)
}

/// Classify an asset record, `None` for precompositions and records without a path.
pub(crate) fn classify(record: &Map<String, Value>) -> Option<AssetKind> {
    let p = path_of(record)?;
    if record.contains_key("layers") {
        return None;
    }
    let mime = match p.strip_prefix("data:") {
        Some(rest) => rest.split([';', ',']).next().unwrap_or_default(),
        None => media::mime_for_file(last_segment(p)),
    };
    if mime.starts_with("audio/") {
        return Some(AssetKind::Audio);
    }
    if mime.starts_with("image/") {
        return Some(AssetKind::Image);
    }
    if record.contains_key("w") && record.contains_key("h") {
        Some(AssetKind::Image)
    } else {
        Some(AssetKind::Audio)
    }
}

fn lottie_id(record: &Map<String, Value>) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn embedded_records(data: &Value) -> Vec<EmbeddedRecord> {
    records(data)
        .filter_map(|(index, record)| {
            let p = path_of(record)?;
            if !media::is_data_url(p) {
                return None;
            }
            Some(EmbeddedRecord {
                index,
                kind: classify(record)?,
                lottie_id: lottie_id(record),
                data_url: p.to_owned(),
            })
        })
        .collect()
}

pub(crate) fn external_records(data: &Value) -> Vec<ExternalRecord> {
    records(data)
        .filter_map(|(_, record)| {
            let p = path_of(record)?;
            if p.is_empty() || media::is_data_url(p) {
                return None;
            }
            Some(ExternalRecord {
                kind: classify(record)?,
                lottie_id: lottie_id(record),
                file_name: last_segment(p).to_owned(),
            })
        })
        .collect()
}

/// Point record `index` at an external file inside `dir`.
pub(crate) fn externalize(data: &mut Value, index: usize, file_name: &str, dir: &str) {
    let Some(record) = data
        .get_mut("assets")
        .and_then(Value::as_array_mut)
        .and_then(|assets| assets.get_mut(index))
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    record.insert("p".to_owned(), Value::String(file_name.to_owned()));
    record.insert("u".to_owned(), Value::String(dir.to_owned()));
    record.insert("e".to_owned(), Value::from(0));
}

/// Apply an old→new file-name mapping to every external record of `kind` at once.
///
/// Each record is looked up against the original names only, so chained mappings such as
/// `a -> b, b -> a` swap instead of collapsing.
pub(crate) fn rename_references(
    data: &mut Value,
    kind: AssetKind,
    mapping: &HashMap<String, String>,
) -> usize {
    let mut rewritten = 0;
    for record in records_mut(data) {
        if classify(record) != Some(kind) {
            continue;
        }
        let Some(p) = path_of(record) else { continue };
        if media::is_data_url(p) {
            continue;
        }
        let segment = last_segment(p);
        let Some(new_name) = mapping.get(segment) else {
            continue;
        };
        let prefix = &p[..p.len() - segment.len()];
        let new_path = format!("{prefix}{new_name}");
        record.insert("p".to_owned(), Value::String(new_path));
        rewritten += 1;
    }
    rewritten
}

/// Replace every external reference to `file_name` with an embedded data URL.
pub(crate) fn inline_references(
    data: &mut Value,
    kind: AssetKind,
    file_name: &str,
    data_url: &str,
) -> usize {
    let mut rewritten = 0;
    for record in records_mut(data) {
        if classify(record) != Some(kind) {
            continue;
        }
        let matches = path_of(record)
            .is_some_and(|p| !media::is_data_url(p) && last_segment(p) == file_name);
        if !matches {
            continue;
        }
        record.insert("p".to_owned(), Value::String(data_url.to_owned()));
        record.insert("u".to_owned(), Value::String(String::new()));
        record.insert("e".to_owned(), Value::from(1));
        rewritten += 1;
    }
    rewritten
}

#[cfg(test)]
#[path = "../../tests/unit/assets/lottie.rs"]
mod tests;
