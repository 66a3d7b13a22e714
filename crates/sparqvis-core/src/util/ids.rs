//! Stable node ids from bound values.
//!
//! Literals are used verbatim. IRIs are shortened to their last fragment or
//! path segment with any query string removed, so `http://x/ns#Cat?v=2` and
//! `http://x/ns/Cat` both become `Cat`.
//!
//! Older catalogue services publish entities as script resources such as
//! `http://host/lookup.php?id=42`; for those the `id` query parameter is the
//! only stable part and is used instead of the trailing segment.

use crate::model::{TermKind, TypedValue};

/// File extensions of script resources whose `id` parameter names the entity.
const SCRIPT_EXTENSIONS: &[&str] = &[".php", ".jsp", ".asp", ".aspx", ".cgi"];

/// Extract the node id for a bound value.
pub fn extract_id(value: &TypedValue) -> String {
    match value.kind {
        TermKind::Literal | TermKind::Bnode => value.value.clone(),
        TermKind::Uri => id_from_uri(&value.value),
    }
}

/// Shorten an IRI to its identifying segment.
pub fn id_from_uri(uri: &str) -> String {
    if let Some(id) = legacy_query_id(uri) {
        return id;
    }

    let without_query = uri.split('?').next().unwrap_or(uri);

    if let Some((_, fragment)) = without_query.rsplit_once('#') {
        if !fragment.is_empty() {
            return fragment.to_string();
        }
    }

    let trimmed = without_query.trim_end_matches(['/', '#']);
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if segment.is_empty() || segment.ends_with(':') {
        uri.to_string()
    } else {
        segment.to_string()
    }
}

/// `…/lookup.php?id=42` → `42`.
fn legacy_query_id(uri: &str) -> Option<String> {
    let (path, query) = uri.split_once('?')?;
    let path = path.split('#').next().unwrap_or(path).to_ascii_lowercase();
    if !SCRIPT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return None;
    }

    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, value)| *key == "id" && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
