//! Resolved-scale cache.
//!
//! Channel resolutions are keyed by a Blake3 hash of `(field, channel, encoding
//! signature, data signature)`. The cache remembers the signatures it was
//! last synced to and drops every entry when either changes.

use crate::scale::ChannelResolution;
use serde::Serialize;
use sparqvis_core::{Error, ResultSet, Result};
use std::collections::HashMap;

/// Blake3 signature of any serializable value.
pub fn signature_of<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| Error::serialization(format!("failed to hash value: {e}")))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Blake3 signature of a result set.
///
/// Row entries are hashed in field-name order so the signature does not
/// depend on map iteration order.
pub fn data_signature(result_set: &ResultSet) -> String {
    let mut hasher = blake3::Hasher::new();

    for field in result_set.fields() {
        hasher.update(field.as_bytes());
        hasher.update(&[0x1f]);
    }
    for row in result_set.rows() {
        hasher.update(&[0x1e]);
        let mut entries: Vec<_> = row.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (field, value) in entries {
            for part in [
                field.as_str(),
                value.kind.as_str(),
                value.value.as_str(),
                value.lang.as_deref().unwrap_or_default(),
                value.datatype.as_deref().unwrap_or_default(),
            ] {
                hasher.update(part.as_bytes());
                hasher.update(&[0x1f]);
            }
        }
    }

    hasher.finalize().to_hex().to_string()
}

/// Cached resolved scales for the current encoding and data.
#[derive(Debug, Default)]
pub struct ScaleCache {
    entries: HashMap<String, ChannelResolution>,
    encoding_signature: Option<String>,
    data_signature: Option<String>,
}

impl ScaleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the cache at new signatures.
    ///
    /// Returns `true` when either signature changed and entries were dropped.
    pub fn sync(&mut self, encoding_signature: &str, data_signature: &str) -> bool {
        let unchanged = self.encoding_signature.as_deref() == Some(encoding_signature)
            && self.data_signature.as_deref() == Some(data_signature);
        if unchanged {
            return false;
        }

        if !self.entries.is_empty() {
            log::debug!("dropping {} cached scale(s)", self.entries.len());
        }
        self.entries.clear();
        self.encoding_signature = Some(encoding_signature.to_string());
        self.data_signature = Some(data_signature.to_string());
        true
    }

    /// Cache key of `field` on `channel` under the current signatures.
    pub fn key(&self, field: &str, channel: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in [
            field,
            channel,
            self.encoding_signature.as_deref().unwrap_or_default(),
            self.data_signature.as_deref().unwrap_or_default(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(&[0x1f]);
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Cached resolution of `field` on `channel`.
    pub fn get(&self, field: &str, channel: &str) -> Option<&ChannelResolution> {
        self.entries.get(&self.key(field, channel))
    }

    /// Store the resolution of `field` on `channel`.
    pub fn insert(&mut self, field: &str, channel: &str, resolution: ChannelResolution) {
        let key = self.key(field, channel);
        self.entries.insert(key, resolution);
    }

    /// Drop every entry and forget the signatures.
    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.encoding_signature = None;
        self.data_signature = None;
    }

    /// Number of cached scales.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainCase;
    use crate::scale::ResolvedScale;
    use sparqvis_core::{ScaleType, ScaleValue, TypedValue};
    use sparqvis_graph::fixtures::{result_set, triples};

    fn scale() -> ChannelResolution {
        ChannelResolution {
            field: "f".to_string(),
            scale: ResolvedScale::new(
                ScaleType::Ordinal,
                vec![ScaleValue::text("a")],
                vec![ScaleValue::text("#fff")],
            ),
            case: DomainCase::Extracted,
            palette: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_data_signature_stable_and_sensitive() {
        let a = triples(&[("http://x/A", "http://x/p", "1")]);
        let b = triples(&[("http://x/A", "http://x/p", "1")]);
        let c = triples(&[("http://x/A", "http://x/p", "2")]);
        assert_eq!(data_signature(&a), data_signature(&b));
        assert_ne!(data_signature(&a), data_signature(&c));
    }

    #[test]
    fn test_data_signature_sees_lang() {
        let plain = result_set(&["s"], vec![vec![("s", TypedValue::literal("x"))]]);
        let tagged = result_set(&["s"], vec![vec![("s", TypedValue::literal("x").with_lang("en"))]]);
        assert_ne!(data_signature(&plain), data_signature(&tagged));
    }

    #[test]
    fn test_signature_of() {
        assert_eq!(signature_of(&"x").unwrap(), signature_of(&"x").unwrap());
        assert_ne!(signature_of(&"x").unwrap(), signature_of(&"y").unwrap());
    }

    #[test]
    fn test_cache_hit_under_same_signatures() {
        let mut cache = ScaleCache::new();
        assert!(cache.sync("enc", "data"));
        cache.insert("f", "color", scale());
        assert!(!cache.sync("enc", "data"));
        assert_eq!(cache.get("f", "color"), Some(&scale()));
        assert!(cache.get("f", "size").is_none());
    }

    #[test]
    fn test_signature_change_clears() {
        let mut cache = ScaleCache::new();
        cache.sync("enc", "data");
        cache.insert("f", "color", scale());

        assert!(cache.sync("enc", "other-data"));
        assert!(cache.is_empty());

        cache.insert("f", "color", scale());
        assert!(cache.sync("other-enc", "other-data"));
        assert!(cache.get("f", "color").is_none());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = ScaleCache::new();
        cache.sync("enc", "data");
        cache.insert("f", "color", scale());
        cache.invalidate();
        assert_eq!(cache.len(), 0);
        assert!(cache.sync("enc", "data"));
    }
}
