//! # Configuration
//!
//! Optional YAML file holding directory defaults and display limits.
//! Looked up from `--config <file>`, else `troika.yaml` in the working
//! directory, else built-in defaults. Relative directories in a file are
//! taken relative to that file's directory. Command-line flags override
//! whatever the file says.
//!
//! ```yaml
//! schema_dir: systems
//! objects_dir: objects
//! recursive: false
//! max_errors_shown: 3
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "troika.yaml";

/// Settings shared by all subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TroikaConfig {
    /// Directory scanned for `*.schema.json`.
    pub schema_dir: PathBuf,
    /// Default directory of target documents.
    pub objects_dir: PathBuf,
    /// Recurse into subdirectories when validating an explicit directory.
    pub recursive: bool,
    /// Errors listed per document before `... and N more`.
    pub max_errors_shown: usize,
}

impl Default for TroikaConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("systems"),
            objects_dir: PathBuf::from("objects"),
            recursive: false,
            max_errors_shown: 3,
        }
    }
}

impl TroikaConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.schema_dir = rebase(base, &config.schema_dir);
            config.objects_dir = rebase(base, &config.objects_dir);
        }
        Ok(config)
    }

    /// Load `explicit` if given, else `troika.yaml` under `cwd` if it
    /// exists, else defaults.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(config = %candidate.display(), "using config file");
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }
}

fn rebase(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
