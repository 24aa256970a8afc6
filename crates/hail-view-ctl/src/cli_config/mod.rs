//! CLI configuration for pack paths, output defaults and engine settings.
//!
//! The `[engine]` table is handed to the library unchanged; everything else
//! controls the CLI tool itself.

pub(crate) mod loader;

pub(crate) use loader::load_cli_config;

use std::path::PathBuf;

use hail_view::{expand_path, EngineConfig};
use serde::Deserialize;

/// CLI-specific configuration for pack discovery and template generation.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// Paths to scan for template packs.
    #[serde(default)]
    pub pack_paths: Vec<String>,

    /// Default output directory for generated files.
    pub default_output_dir: Option<String>,

    /// Engine settings used by `render` and `template generate`.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl CliConfig {
    /// `default-output-dir` with a leading `~/` expanded.
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.default_output_dir.as_deref().map(expand_path)
    }
}
