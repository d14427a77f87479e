//! `rustic.toml` configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "rustic.toml";

/// Represents a parsed `rustic.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RusticConfig {
    #[serde(default)]
    pub convert_to_tuple: ConvertConfig,
}

/// Options of the convert-to-tuple refactoring, the `[convert-to-tuple]`
/// table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConvertConfig {
    /// Minimum number of trailing unbound fields that a `..` in a record
    /// pattern keeps standing for; shorter suffixes are spelled out as `_`.
    #[serde(default = "default_collapse_rest_min")]
    pub collapse_rest_min: usize,
}

fn default_collapse_rest_min() -> usize {
    2
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            collapse_rest_min: default_collapse_rest_min(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl RusticConfig {
    /// Parse a `rustic.toml` document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// `rustic.toml` under `root`, or the defaults when there is none.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// The same structure sent as JSON, e.g. LSP `initializationOptions`.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
[convert-to-tuple]
collapse-rest-min = 3
"#;
        let config = RusticConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.convert_to_tuple.collapse_rest_min, 3);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = RusticConfig::from_toml_str("").unwrap();
        assert_eq!(config, RusticConfig::default());
        let config = RusticConfig::from_toml_str("[convert-to-tuple]\n").unwrap();
        assert_eq!(config.convert_to_tuple.collapse_rest_min, 2);
    }

    #[test]
    fn rejects_wrong_types() {
        let err = RusticConfig::from_toml_str("[convert-to-tuple]\ncollapse-rest-min = \"x\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(RusticConfig::discover(dir.path()).unwrap(), RusticConfig::default());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[convert-to-tuple]\ncollapse-rest-min = 1\n",
        )
        .unwrap();
        let config = RusticConfig::discover(dir.path()).unwrap();
        assert_eq!(config.convert_to_tuple.collapse_rest_min, 1);
    }

    #[test]
    fn json_options() {
        let value = serde_json::json!({ "convert-to-tuple": { "collapse-rest-min": 4 } });
        let config = RusticConfig::from_json(value).unwrap();
        assert_eq!(config.convert_to_tuple.collapse_rest_min, 4);
        assert_eq!(
            RusticConfig::from_json(serde_json::json!({})).unwrap(),
            RusticConfig::default()
        );
    }
}
