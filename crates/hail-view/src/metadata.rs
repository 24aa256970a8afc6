//! Template set metadata (`template.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub(crate) const METADATA_FILENAME: &str = "template.toml";

/// Metadata for a template set, parsed from `template.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateMetadata {
    /// Display name.
    pub name: String,

    /// What this template set generates.
    pub description: String,

    /// Catalog names of extensions the templates rely on.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Parameters the templates accept.
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,

    /// Files produced by a render.
    pub outputs: Vec<OutputFile>,
}

/// A parameter the template set accepts.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDef {
    /// Context key (passed as `--param name=value`).
    pub name: String,

    pub description: String,

    #[serde(default)]
    pub required: bool,

    /// Value used when the caller omits the parameter.
    pub default: Option<String>,
}

/// One output file of a template set.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputFile {
    /// Template file to render (e.g., `controller.php.tera`).
    pub template: String,

    /// Output filename pattern, rendered like a template (e.g., `{{ name | pascal_case }}.php`).
    pub filename: String,

    /// Optional subdirectory pattern, rendered like a template.
    pub subdir: Option<String>,
}

impl TemplateMetadata {
    /// Load metadata from a directory containing `template.toml`.
    pub fn load(template_dir: &Path) -> Result<Self, MetadataError> {
        let path = template_dir.join(METADATA_FILENAME);
        let contents = std::fs::read_to_string(&path).map_err(|e| MetadataError::Io {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| MetadataError::Parse { path, source: e })
    }

    /// List required parameters that have neither a value nor a default.
    pub fn validate_params(&self, params: &HashMap<String, String>) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.required && p.default.is_none() && !params.contains_key(&p.name))
            .map(|p| format!("missing required parameter: {}", p.name))
            .collect()
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDef> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
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
