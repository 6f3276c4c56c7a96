use anyhow::{Context, Result};
use findom::FindomConfig;
use findom::config::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};

/// Configuration context for a CLI invocation
pub struct CliContext {
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    /// Loaded configuration (defaults when no file was found)
    pub config: FindomConfig,
}

impl CliContext {
    /// Load an explicit config file, or `findom.toml` from the current directory
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let current_dir = std::env::current_dir().context("Failed to get current directory")?;
                Self::discover(&current_dir)
            }
        }
    }

    /// Use `findom.toml` in `dir` when present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            Self::from_file(&candidate)
        } else {
            Ok(Self {
                config_path: None,
                config: FindomConfig::default(),
            })
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let config = FindomConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            config,
        })
    }
}
