use std::path::Path;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::condition::filter::FailurePolicies;
use crate::kernel::constants::DEFAULT_LANGUAGE;
use crate::kernel::error::{Error, Result};
use crate::sorting::comparator::Strictness;
use crate::storage::error::StorageSystemError;

/// Supported file formats for configuration, metadata lists and scan lists
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Like [`from_path`](Self::from_path), failing for unknown extensions
    pub fn require_from_path(path: &Path) -> Result<Self> {
        Self::from_path(path)
            .ok_or_else(|| Error::StorageSystem(StorageSystemError::UnsupportedFormat(path.to_path_buf())))
    }

    /// Deserialize a value from a string in this format
    pub fn parse<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        let result = match self {
            ConfigFormat::Json => serde_json::from_str(data)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        };
        result.map_err(|source| {
            Error::StorageSystem(StorageSystemError::DeserializationError {
                format: self.extension().to_string(),
                source,
            })
        })
    }

    /// Serialize a value to a string in this format
    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let result = match self {
            ConfigFormat::Json => serde_json::to_string_pretty(value)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(value)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(value)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        };
        result.map_err(|source| {
            Error::StorageSystem(StorageSystemError::SerializationError {
                format: self.extension().to_string(),
                source,
            })
        })
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_parallel() -> bool {
    true
}

/// Settings for a sort run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    /// How mutual load-after constraints are handled
    #[serde(default)]
    pub strictness: Strictness,

    /// Language used to select messages for display
    #[serde(default = "default_language")]
    pub language: String,

    /// What to do when a condition cannot be evaluated
    #[serde(default)]
    pub condition_failures: FailurePolicies,

    /// Filter plugins on the blocking thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            language: default_language(),
            condition_failures: FailurePolicies::default(),
            parallel: default_parallel(),
        }
    }
}

impl SortConfig {
    /// Load settings from a JSON, YAML or TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::require_from_path(path)?;
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, "read_config", path.to_path_buf()))?;
        format.parse(&data)
    }
}
