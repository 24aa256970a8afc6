//! Pack listing and validation.

use std::path::Path;

use hail_view::ExtensionCatalog;

use crate::cli_config::CliConfig;
use crate::output;
use crate::packs::{PackManifest, PackRegistry};
use crate::PackCommands;

pub(crate) fn handle_pack_command(cmd: PackCommands, cli_config: &CliConfig) -> anyhow::Result<()> {
    match cmd {
        PackCommands::List => list_packs(cli_config),
        PackCommands::Validate { path } => validate_pack(&path),
    }
}

fn list_packs(cli_config: &CliConfig) -> anyhow::Result<()> {
    let registry = PackRegistry::discover(&cli_config.pack_paths);
    let packs = registry.packs();

    if packs.is_empty() {
        output::warning("No packs discovered.");
        output::blank();
        if cli_config.pack_paths.is_empty() {
            output::dim("Configure pack paths in .hail-view.toml:");
            output::plain("  pack-paths = [\"./packs\", \"~/projects/hail-packs\"]");
        } else {
            output::plain("Searched paths:");
            for path in &cli_config.pack_paths {
                output::plain(format!("  - {path}"));
            }
        }
        return Ok(());
    }

    output::header("Discovered packs:");
    output::blank();
    for pack in packs {
        let meta = &pack.manifest.pack;
        output::success(format!("{} (v{})", meta.name, meta.version));
        output::dim(format!("    {}", meta.description));
        output::label("  Path", pack.dir.display());

        if !pack.manifest.templates.is_empty() {
            output::plain("    Templates:");
            for tmpl in &pack.manifest.templates {
                output::plain(format!("      - {}: {}", tmpl.name, tmpl.description));
            }
        }
        output::blank();
    }

    Ok(())
}

fn validate_pack(dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("'{}' is not a directory", dir.display());
    }

    let manifest = PackManifest::load(dir)?;
    output::success(format!("Pack manifest loaded: {}", manifest.pack.name));
    output::label("Description", &manifest.pack.description);
    output::label("Version", &manifest.pack.version);
    output::label("Templates", manifest.templates.len());

    let errors = manifest.validate(dir, &ExtensionCatalog::builtin());
    output::blank();
    if errors.is_empty() {
        output::success("Validation passed.");
        return Ok(());
    }

    output::error("Validation errors:");
    for err in &errors {
        output::error(format!("  - {err}"));
    }
    anyhow::bail!(
        "pack '{}' has {} validation error(s)",
        manifest.pack.name,
        errors.len()
    )
}
