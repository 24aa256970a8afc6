//! Template listing, info and generation from discovered packs.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use hail_view::{ExtensionCatalog, TemplateMetadata, TemplateSet};

use super::parse_params;
use crate::cli_config::CliConfig;
use crate::output;
use crate::packs::PackRegistry;
use crate::TemplateCommands;

pub(crate) fn handle_template_command(
    cmd: TemplateCommands,
    cli_config: &CliConfig,
) -> anyhow::Result<()> {
    match cmd {
        TemplateCommands::List { pack } => list_templates(cli_config, pack.as_deref()),
        TemplateCommands::Info { name, pack } => {
            show_template_info(cli_config, &name, pack.as_deref())
        }
        TemplateCommands::Generate {
            name,
            param,
            pack,
            output,
        } => generate_template(cli_config, &name, &param, pack.as_deref(), output.as_deref()),
    }
}

fn list_templates(cli_config: &CliConfig, pack: Option<&str>) -> anyhow::Result<()> {
    let registry = PackRegistry::discover(&cli_config.pack_paths);
    let templates = registry.find_templates(pack);

    if templates.is_empty() {
        output::warning("No templates found.");
        if pack.is_some() {
            output::dim("Try without --pack to see all available templates.");
        }
        return Ok(());
    }

    output::header("Available templates:");
    output::blank();
    for resolved in &templates {
        output::item(format!(
            "{} (pack: {})",
            resolved.template.name, resolved.pack.manifest.pack.name
        ));
        output::dim(format!("    {}", resolved.template.description));
    }
    output::blank();

    Ok(())
}

fn show_template_info(
    cli_config: &CliConfig,
    name: &str,
    pack: Option<&str>,
) -> anyhow::Result<()> {
    let registry = PackRegistry::discover(&cli_config.pack_paths);
    let resolved = registry
        .find_template_by_name(name, pack)
        .ok_or_else(|| not_found(name, pack))?;

    let meta = &resolved.pack.manifest.pack;
    output::header(format!("Template: {}", resolved.template.name));
    output::label("Pack", format!("{} (v{})", meta.name, meta.version));
    output::label("Description", &resolved.template.description);

    match TemplateMetadata::load(&resolved.template_dir) {
        Ok(metadata) => print_metadata(&metadata),
        Err(e) => {
            tracing::debug!(error = %e, "Could not load template metadata");
            output::dim("  (No template.toml metadata available)");
        }
    }

    Ok(())
}

fn print_metadata(meta: &TemplateMetadata) {
    if !meta.extensions.is_empty() {
        output::label("Extensions", meta.extensions.join(", "));
    }

    if !meta.parameters.is_empty() {
        output::blank();
        output::header("Parameters:");
        for param in &meta.parameters {
            let required = if param.required { " (required)" } else { "" };
            let default = param
                .default
                .as_ref()
                .map(|d| format!(" [default: {d}]"))
                .unwrap_or_default();
            output::plain(format!("  --param {}=<{}>", param.name, param.description));
            output::dim(format!("     {required}{default}"));
        }
    }

    if !meta.outputs.is_empty() {
        output::blank();
        output::header("Outputs:");
        for out in &meta.outputs {
            let subdir = out
                .subdir
                .as_ref()
                .map(|s| format!("{s}/"))
                .unwrap_or_default();
            output::plain(format!("  {subdir}{}", out.filename));
        }
    }
}

fn generate_template(
    cli_config: &CliConfig,
    name: &str,
    params: &[String],
    pack: Option<&str>,
    output_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let registry = PackRegistry::discover(&cli_config.pack_paths);
    let resolved = registry
        .find_template_by_name(name, pack)
        .ok_or_else(|| not_found(name, pack))?;

    let param_map = parse_params(params)?;

    let set = TemplateSet::load(
        &resolved.template_dir,
        &ExtensionCatalog::builtin(),
        &cli_config.engine,
    )
    .with_context(|| format!("failed to load template '{name}'"))?;

    let errors = set.metadata().validate_params(&param_map);
    if !errors.is_empty() {
        output::error("Parameter validation failed:");
        for err in &errors {
            output::error(format!("  - {err}"));
        }
        output::dim(format!(
            "Use 'hail-view-ctl template info {name}' to see required parameters."
        ));
        anyhow::bail!("missing parameters for template '{name}'");
    }

    let rendered = set
        .render(&param_map)
        .with_context(|| format!("failed to render template '{name}'"))?;

    let out_dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| cli_config.output_dir())
        .unwrap_or_else(|| PathBuf::from("."));

    for file in &rendered {
        let full_path = out_dir.join(&file.path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&full_path, &file.content)
            .with_context(|| format!("failed to write {}", full_path.display()))?;
        output::success(format!("Created: {}", full_path.display()));
    }

    output::blank();
    output::success(format!(
        "Generated {} file(s) from template '{name}'.",
        rendered.len()
    ));
    Ok(())
}

fn not_found(name: &str, pack: Option<&str>) -> anyhow::Error {
    match pack {
        Some(pack) => anyhow::anyhow!("template '{name}' not found in pack '{pack}'"),
        None => anyhow::anyhow!("template '{name}' not found"),
    }
}
