//! # Configuration
//!
//! Optional TOML settings for the CLI. Every key has a default, so an empty
//! or missing `ldforest.toml` is valid:
//!
//! ```toml
//! preferred_language = "nl"
//! target_class = "rdf:property"
//! activity_streams_prefix = "as:"
//! max_input_size = 104857600
//! max_depth = 256
//! max_nodes = 1000000
//! ```
//!
//! `LDFOREST_PREFERRED_LANGUAGE` overrides `preferred_language`.

use ldforest_core::primitives::{AS_PREFIX, DEFAULT_LANGUAGE, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};
use ldforest_core::{LdError, Limits};
use serde::Deserialize;
use std::path::Path;

/// Config file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "ldforest.toml";

/// Environment variable overriding the preferred label language.
pub const LANGUAGE_ENV: &str = "LDFOREST_PREFERRED_LANGUAGE";

/// Maximum input document size (100 MB).
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 100 * 1024 * 1024;

/// CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Language tag prefix preferred when reading labels.
    #[serde(default = "default_language")]
    pub preferred_language: String,
    /// Default class for `nested` when `--class` is not given.
    #[serde(default)]
    pub target_class: Option<String>,
    /// Compacted prefix of the ActivityStreams namespace.
    #[serde(default = "default_prefix")]
    pub activity_streams_prefix: String,
    /// Largest accepted input, in bytes.
    #[serde(default = "default_max_input_size")]
    pub max_input_size: u64,
    /// Most subjects on one path of a resolved tree.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Most subjects inlined while resolving one document.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_prefix() -> String {
    AS_PREFIX.to_string()
}
fn default_max_input_size() -> u64 {
    DEFAULT_MAX_INPUT_SIZE
}
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_max_nodes() -> usize {
    DEFAULT_MAX_NODES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferred_language: default_language(),
            target_class: None,
            activity_streams_prefix: default_prefix(),
            max_input_size: default_max_input_size(),
            max_depth: default_max_depth(),
            max_nodes: default_max_nodes(),
        }
    }
}

impl Config {
    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, LdError> {
        toml::from_str(content).map_err(|e| LdError::ConfigError(e.to_string()))
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, LdError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LdError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| LdError::ConfigError(format!("'{}': {}", path.display(), e)))
    }

    /// Resolve the effective settings.
    ///
    /// An explicit path must exist. Without one, `ldforest.toml` in the
    /// working directory is used if present, defaults otherwise. The
    /// environment override is applied last.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, LdError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Resolver limits for `resolve`.
    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }

    /// Apply environment overrides read through `var`.
    #[must_use]
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(language) = var(LANGUAGE_ENV).filter(|l| !l.is_empty()) {
            tracing::debug!(%language, "preferred language from environment");
            self.preferred_language = language;
        }
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
