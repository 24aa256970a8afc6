//! Pack manifest parsing (`hail-pack.toml`).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use hail_view::{ExtensionCatalog, TemplateMetadata};
use serde::Deserialize;

pub(crate) const MANIFEST_FILENAME: &str = "hail-pack.toml";

/// Top-level manifest parsed from `hail-pack.toml`.
#[derive(Debug, Deserialize)]
pub(crate) struct PackManifest {
    pub pack: PackMetadata,

    /// Template sets shipped by this pack.
    #[serde(default)]
    pub templates: Vec<TemplateReference>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PackMetadata {
    /// Unique pack name (e.g., "php", "laravel-views").
    pub name: String,

    pub description: String,

    pub version: String,
}

/// Reference to a template set directory within the pack.
#[derive(Debug, Deserialize)]
pub(crate) struct TemplateReference {
    pub name: String,

    /// Directory relative to the manifest.
    pub path: String,

    pub description: String,
}

impl PackManifest {
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let manifest_path = dir.join(MANIFEST_FILENAME);
        let contents = std::fs::read_to_string(&manifest_path).map_err(|e| ManifestError::Io {
            path: manifest_path.clone(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ManifestError::Parse {
            path: manifest_path,
            source: e,
        })
    }

    /// Check the manifest and every template set it references.
    ///
    /// Each referenced directory must exist, carry a readable `template.toml`,
    /// name only extensions known to `catalog`, and contain every output template.
    pub fn validate(&self, base_dir: &Path, catalog: &ExtensionCatalog) -> Vec<String> {
        let mut errors = Vec::new();

        if self.pack.name.trim().is_empty() {
            errors.push("pack.name is empty".to_string());
        }
        if self.pack.version.trim().is_empty() {
            errors.push("pack.version is empty".to_string());
        }

        let mut seen = BTreeSet::new();
        for tmpl in &self.templates {
            if !seen.insert(tmpl.name.to_ascii_lowercase()) {
                errors.push(format!("template '{}' is declared more than once", tmpl.name));
            }
            errors.extend(validate_template_dir(tmpl, &base_dir.join(&tmpl.path), catalog));
        }

        errors
    }
}

fn validate_template_dir(
    tmpl: &TemplateReference,
    dir: &Path,
    catalog: &ExtensionCatalog,
) -> Vec<String> {
    if !dir.is_dir() {
        return vec![format!(
            "template '{}' path '{}' does not exist",
            tmpl.name, tmpl.path
        )];
    }

    let metadata = match TemplateMetadata::load(dir) {
        Ok(metadata) => metadata,
        Err(e) => return vec![format!("template '{}': {e}", tmpl.name)],
    };

    let mut errors = Vec::new();
    for extension in &metadata.extensions {
        if !catalog.contains(extension) {
            errors.push(format!(
                "template '{}' uses unknown extension '{extension}'",
                tmpl.name
            ));
        }
    }
    for output in &metadata.outputs {
        if !dir.join(&output.template).is_file() {
            errors.push(format!(
                "template '{}' output '{}' is missing",
                tmpl.name, output.template
            ));
        }
    }
    errors
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ManifestError {
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
