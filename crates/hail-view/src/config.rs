//! Engine configuration, deserialized from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;

fn default_autoescape() -> bool {
    true
}

/// What to do when an extension with an already-attached name is registered again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateExtensions {
    /// Fail with [`EngineError::DuplicateExtension`](crate::EngineError::DuplicateExtension).
    #[default]
    Reject,
    /// Run the registration hook again; its capabilities overwrite the earlier ones.
    Allow,
}

/// Settings applied when an [`Engine`](crate::Engine) is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineConfig {
    /// Escape HTML in `.html`, `.htm` and `.xml` templates.
    pub autoescape: bool,

    pub duplicate_extensions: DuplicateExtensions,

    /// Catalog names of extensions to attach at startup (e.g. `["case", "date"]`).
    pub extensions: Vec<String>,

    /// Directories whose `*.tera` files are loaded at startup. `~/` is expanded.
    pub template_dirs: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            autoescape: default_autoescape(),
            duplicate_extensions: DuplicateExtensions::default(),
            extensions: Vec::new(),
            template_dirs: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents, path)
    }

    /// Template directories with `~/` resolved against `$HOME`.
    pub fn resolved_template_dirs(&self) -> Vec<PathBuf> {
        self.template_dirs.iter().map(|d| expand_path(d)).collect()
    }
}

/// Resolve a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// The user's home directory, from `HOME`.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
