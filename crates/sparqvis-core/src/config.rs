//! Configuration for the Sparqvis engine.
//!
//! Provides the [`EngineConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit config path
//! 2. `SPARQVIS_CONFIG` environment variable
//! 3. XDG default: `~/.config/sparqvis/config.toml`
//! 4. Built-in defaults

use crate::{Error, Result};
use confyg::{Confygery, env};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the encoding engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Node styling defaults.
    pub nodes: NodeDefaults,

    /// Link styling defaults.
    pub links: LinkDefaults,

    /// Classification-field detection thresholds.
    pub classification: ClassificationConfig,
}

/// Node styling defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    /// Smallest size produced by a size scale.
    pub min_size: f64,

    /// Largest size produced by a size scale.
    pub max_size: f64,

    /// Size used when the size channel is unencoded.
    pub default_size: f64,

    /// Color used when the color channel is unencoded.
    pub default_color: String,
}

/// Link styling defaults, written into completed encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDefaults {
    /// Preferred link distance.
    pub distance: f64,

    /// Stroke width.
    pub width: f64,

    /// Stroke color.
    pub color: String,
}

/// Thresholds for picking a field to color nodes by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Preferred number of distinct categories.
    pub ideal_unique_count: usize,

    /// Fields with more distinct values are not considered categories.
    pub max_categories: usize,

    /// Values longer than this on average are not readable as labels.
    pub max_average_length: f64,

    /// Largest tolerated share of long URI values.
    pub max_uri_ratio: f64,

    /// A URI value at least this long counts as "long".
    pub long_uri_length: usize,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            min_size: 4.0,
            max_size: 20.0,
            default_size: 8.0,
            default_color: "#69b3a2".to_string(),
        }
    }
}

impl Default for LinkDefaults {
    fn default() -> Self {
        Self {
            distance: 100.0,
            width: 1.5,
            color: "#999".to_string(),
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            ideal_unique_count: 6,
            max_categories: 24,
            max_average_length: 30.0,
            max_uri_ratio: 0.5,
            long_uri_length: 30,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl EngineConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// Loading priority:
    /// 1. Explicit `config_path`
    /// 2. `SPARQVIS_CONFIG` env var
    /// 3. XDG default: `~/.config/sparqvis/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                log::debug!("loading engine config from {}", path.display());
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("SPARQVIS");
        env_opts.add_section("nodes");
        env_opts.add_section("links");
        env_opts.add_section("classification");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Resolve the config file path from explicit path, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("SPARQVIS_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sparqvis").join("config.toml"))
    }

    /// Reject settings that cannot produce a usable scale.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.min_size < 0.0 || self.nodes.max_size < self.nodes.min_size {
            return Err(Error::config(format!(
                "node size range [{}, {}] is empty or negative",
                self.nodes.min_size, self.nodes.max_size
            )));
        }
        if self.classification.ideal_unique_count == 0 {
            return Err(Error::config("classification.ideal_unique_count must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.classification.max_uri_ratio) {
            return Err(Error::config("classification.max_uri_ratio must be within [0, 1]"));
        }
        Ok(())
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `SPARQVIS_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "SPARQVIS", &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// RAII guard for env var manipulation in tests.
    struct EnvGuard {
        key: String,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn new(key: &str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: tests touching a given variable never run concurrently with
            // another test reading it.
            unsafe { std::env::set_var(key, value) };
            Self {
                key: key.to_string(),
                prev,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: see `EnvGuard::new`.
            unsafe {
                match self.prev {
                    Some(ref val) => std::env::set_var(&self.key, val),
                    None => std::env::remove_var(&self.key),
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Default tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.nodes.min_size, 4.0);
        assert_eq!(config.nodes.max_size, 20.0);
        assert_eq!(config.links.distance, 100.0);
        assert_eq!(config.links.color, "#999");
        assert_eq!(config.classification.ideal_unique_count, 6);
        assert!(config.validate().is_ok());
    }

    // ------------------------------------------------------------------------
    // Serialization tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_engine_config_from_toml() {
        let toml_str = r##"
            [nodes]
            min_size = 2.0
            max_size = 30.0
            default_color = "#123456"

            [classification]
            ideal_unique_count = 8
        "##;

        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.nodes.min_size, 2.0);
        assert_eq!(config.nodes.max_size, 30.0);
        assert_eq!(config.nodes.default_color, "#123456");
        // Unspecified fields keep their defaults
        assert_eq!(config.nodes.default_size, 8.0);
        assert_eq!(config.classification.ideal_unique_count, 8);
        assert_eq!(config.links.width, 1.5);
    }

    #[test]
    fn test_engine_config_to_toml() {
        let config = EngineConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[nodes]"));
        assert!(toml_str.contains("[classification]"));

        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    // ------------------------------------------------------------------------
    // Loading tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_engine_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [links]
                distance = 250.0
            "#,
        )
        .unwrap();

        let config = EngineConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.links.distance, 250.0);
        assert_eq!(config.nodes.max_size, 20.0);
    }

    #[test]
    fn test_engine_config_load_defaults() {
        let config = EngineConfig::load(Some("/nonexistent/sparqvis.toml")).unwrap();
        assert_eq!(config.nodes, NodeDefaults::default());
        assert_eq!(config.classification, ClassificationConfig::default());
    }

    #[test]
    fn test_engine_config_load_rejects_inverted_sizes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [nodes]
                min_size = 10.0
                max_size = 1.0
            "#,
        )
        .unwrap();

        let err = EngineConfig::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_engine_config_load_env_overlay() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r##"
                [links]
                color = "#000"
            "##,
        )
        .unwrap();

        // confyg passes env values as strings, so overlay a string field.
        let _guard = EnvGuard::new("SPARQVIS_LINKS_COLOR", "#abcdef");
        let config = EngineConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.links.color, "#abcdef");
    }

    // ------------------------------------------------------------------------
    // resolve_config_path tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = EngineConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = EngineConfig::default_config_path() {
            assert!(p.to_str().unwrap().contains("sparqvis"));
            assert!(p.to_str().unwrap().ends_with("config.toml"));
        }
    }

    // ------------------------------------------------------------------------
    // to_env_vars tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_engine_config_to_env_vars() {
        let config = EngineConfig::default();
        let vars = config.to_env_vars().unwrap();
        let map: HashMap<_, _> = vars.into_iter().collect();
        assert_eq!(map.get("SPARQVIS_LINKS_COLOR").unwrap(), "#999");
        assert_eq!(map.get("SPARQVIS_NODES_MIN_SIZE").unwrap(), "4");
        assert_eq!(
            map.get("SPARQVIS_CLASSIFICATION_IDEAL_UNIQUE_COUNT").unwrap(),
            "6"
        );
    }

    #[test]
    fn test_engine_config_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineConfig>();
    }
}
