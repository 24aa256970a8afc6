//! Pack registry: discovers, loads and indexes template packs.

use std::path::PathBuf;

use hail_view::expand_path;

use super::discovery::discover_pack_dirs;
use super::manifest::{ManifestError, PackManifest, TemplateReference};

/// A loaded pack and the directory holding its manifest.
#[derive(Debug)]
pub(crate) struct LoadedPack {
    pub dir: PathBuf,
    pub manifest: PackManifest,
}

#[derive(Debug)]
pub(crate) struct PackRegistry {
    packs: Vec<LoadedPack>,
}

/// A template reference resolved to its directory on disk.
#[derive(Debug)]
pub(crate) struct ResolvedTemplate<'a> {
    pub pack: &'a LoadedPack,
    pub template: &'a TemplateReference,
    pub template_dir: PathBuf,
}

impl PackRegistry {
    /// Discover packs under `pack_paths` (`~/` expanded). Unreadable manifests are skipped.
    pub fn discover<S: AsRef<str>>(pack_paths: &[S]) -> Self {
        let search_paths: Vec<PathBuf> = pack_paths
            .iter()
            .map(|p| expand_path(p.as_ref()))
            .collect();

        let mut packs = Vec::new();
        for dir in discover_pack_dirs(&search_paths) {
            match PackManifest::load(&dir) {
                Ok(manifest) => {
                    tracing::debug!(name = %manifest.pack.name, ?dir, "Discovered pack");
                    packs.push(LoadedPack { dir, manifest });
                }
                Err(ManifestError::Io { path, source }) => {
                    tracing::warn!(?path, error = %source, "Skipping pack: cannot read manifest");
                }
                Err(ManifestError::Parse { path, source }) => {
                    tracing::warn!(?path, error = %source, "Skipping pack: invalid manifest");
                }
            }
        }

        Self { packs }
    }

    pub fn packs(&self) -> &[LoadedPack] {
        &self.packs
    }

    /// All templates, optionally restricted to one pack (case-insensitive).
    pub fn find_templates(&self, pack_name: Option<&str>) -> Vec<ResolvedTemplate<'_>> {
        self.packs
            .iter()
            .filter(|pack| matches_pack(pack, pack_name))
            .flat_map(|pack| {
                pack.manifest
                    .templates
                    .iter()
                    .map(move |template| resolve(pack, template))
            })
            .collect()
    }

    /// First template named `template_name`, in discovery order.
    pub fn find_template_by_name(
        &self,
        template_name: &str,
        pack_name: Option<&str>,
    ) -> Option<ResolvedTemplate<'_>> {
        self.find_templates(pack_name)
            .into_iter()
            .find(|r| r.template.name.eq_ignore_ascii_case(template_name))
    }
}

fn matches_pack(pack: &LoadedPack, pack_name: Option<&str>) -> bool {
    pack_name.map_or(true, |name| {
        pack.manifest.pack.name.eq_ignore_ascii_case(name)
    })
}

fn resolve<'a>(pack: &'a LoadedPack, template: &'a TemplateReference) -> ResolvedTemplate<'a> {
    ResolvedTemplate {
        pack,
        template,
        template_dir: pack.dir.join(&template.path),
    }
}
