//! Read `.tera` template files from a directory.

use std::path::Path;

use crate::error::EngineError;

const TEMPLATE_EXTENSION: &str = "tera";

/// Read every `*.tera` file directly inside `dir`.
///
/// Templates are named by their file name (e.g., `handler.rb.tera`) and
/// returned sorted by name. Subdirectories and other files are ignored.
pub(crate) fn read_template_dir(dir: &Path) -> Result<Vec<(String, String)>, EngineError> {
    let load_err = |source| EngineError::Load {
        dir: dir.to_path_buf(),
        source,
    };

    let mut templates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(load_err)? {
        let path = entry.map_err(load_err)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
        {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::debug!(?path, "Skipping template with non UTF-8 file name");
            continue;
        };
        let source = std::fs::read_to_string(&path).map_err(load_err)?;
        templates.push((name.to_string(), source));
    }

    templates.sort_by(|a, b| a.0.cmp(&b.0));
    tracing::debug!(?dir, count = templates.len(), "Read template directory");
    Ok(templates)
}
