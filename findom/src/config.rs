//! Normalizer configuration, loaded from `findom.toml`.
//!
//! ```toml
//! [normalizer]
//! max_depth = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::FindOptionsError;

/// Default nesting bound; matches serde_json's parser recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "findom.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Filter-tree levels walked before the remainder is passed through unchanged.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl NormalizerConfig {
    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Layout of `findom.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindomConfig {
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

impl FindomConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, FindOptionsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FindOptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
