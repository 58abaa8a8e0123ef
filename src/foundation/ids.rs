use crate::foundation::error::{BundleError, BundleResult, EntityKind};

/// Validate a caller-supplied entity id.
///
/// Ids become archive path segments (`a/<id>.json`), so besides being non-empty they must not
/// contain path separators.
pub fn validate_id(kind: EntityKind, id: &str) -> BundleResult<()> {
    if id.trim().is_empty() {
        return Err(BundleError::validation(format!("{kind} id must be non-empty")));
    }
    if id.contains('/') || id.contains('\\') {
        return Err(BundleError::validation(format!(
            "{kind} id '{id}' must not contain path separators"
        )));
    }
    if id == "." || id == ".." {
        return Err(BundleError::validation(format!(
            "{kind} id '{id}' is not a valid file name"
        )));
    }
    Ok(())
}

/// Final `/`-separated segment of an archive path or a Lottie `p` reference.
pub(crate) fn last_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// File name without its final extension.
pub(crate) fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}

/// Final extension of a file name, without the dot.
pub(crate) fn file_extension(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&file_name[idx + 1..]).filter(|ext| !ext.is_empty()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
