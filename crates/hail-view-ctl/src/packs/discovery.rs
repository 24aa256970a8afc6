//! Locating template packs under the configured `pack-paths`.
//!
//! A search path is either a pack itself or a directory of packs. Each child
//! directory may hold `hail-pack.toml` directly (`packs/php/`) or inside a
//! `hail-view-pack/` folder, which lets a project ship its pack next to the
//! code it generates for (`vendor/acme/hail-view-pack/`). Hidden directories
//! are never scanned, and a pack reachable from two search paths is reported
//! once, at its first position.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::manifest::MANIFEST_FILENAME;

const PACK_SUBDIR: &str = "hail-view-pack";

/// Pack directories in search-path order, children of one path sorted by name.
pub(crate) fn discover_pack_dirs(search_paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for base in search_paths {
        for dir in candidates(base) {
            let key = dir.canonicalize().unwrap_or_else(|_| dir.clone());
            if seen.insert(key) {
                found.push(dir);
            } else {
                tracing::debug!(?dir, "Pack already discovered through another search path");
            }
        }
    }

    found
}

fn candidates(base: &Path) -> Vec<PathBuf> {
    if !base.is_dir() {
        tracing::debug!(?base, "Pack search path does not exist, skipping");
        return Vec::new();
    }
    if is_pack(base) {
        return vec![base.to_path_buf()];
    }

    let entries = match std::fs::read_dir(base) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(?base, error = %e, "Cannot read pack search path");
            return Vec::new();
        }
    };

    let mut children: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && !is_hidden(path))
        .collect();
    children.sort();

    children
        .into_iter()
        .filter_map(|child| {
            if is_pack(&child) {
                return Some(child);
            }
            let nested = child.join(PACK_SUBDIR);
            is_pack(&nested).then_some(nested)
        })
        .collect()
}

fn is_pack(dir: &Path) -> bool {
    dir.join(MANIFEST_FILENAME).is_file()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
