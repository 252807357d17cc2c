//! Configuration for schema discovery and record ingestion.

use serde::{Deserialize, Serialize};
use std::env;

/// Default name of the field the upstream API nests row columns under.
pub const DEFAULT_WRAPPER_FIELD: &str = "fields";

/// Default bound on wrapper nesting followed during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Reserved key whose mapping is flattened into columns
    pub wrapper_field: String,
    /// Maximum wrapper nesting depth followed by the discoverer
    pub max_depth: usize,
    /// Parse RFC 3339 and `YYYY-MM-DD` strings into temporal values
    pub detect_temporal: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrapper_field: DEFAULT_WRAPPER_FIELD.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            detect_temporal: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let wrapper_field = lookup("TABULA_WRAPPER_FIELD")
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.wrapper_field);

        let max_depth = match lookup("TABULA_MAX_DEPTH") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidMaxDepth(raw))?,
            None => defaults.max_depth,
        };

        let detect_temporal = match lookup("TABULA_DETECT_TEMPORAL") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                key: "TABULA_DETECT_TEMPORAL",
                value: raw,
            })?,
            None => defaults.detect_temporal,
        };

        Ok(Self {
            wrapper_field,
            max_depth,
            detect_temporal,
        })
    }

    /// Builder-style override of the wrapper field name.
    pub fn with_wrapper_field(mut self, name: impl Into<String>) -> Self {
        self.wrapper_field = name.into();
        self
    }

    /// Builder-style override of the maximum discovery depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder-style toggle for temporal string detection.
    pub fn with_detect_temporal(mut self, enabled: bool) -> Self {
        self.detect_temporal = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TABULA_MAX_DEPTH value: {0}")]
    InvalidMaxDepth(String),

    #[error("Invalid boolean for {key}: {value}")]
    InvalidFlag { key: &'static str, value: String },
}
