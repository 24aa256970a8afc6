//! Ad-hoc rendering of a single template file.

use std::path::Path;

use anyhow::Context as _;
use hail_view::{Context, Engine, ExtensionCatalog};

use super::parse_params;
use crate::cli_config::CliConfig;
use crate::output;

pub(crate) fn handle_render_command(
    cli_config: &CliConfig,
    file: &Path,
    templates: Option<&Path>,
    extensions: &[String],
    params: &[String],
) -> anyhow::Result<()> {
    let catalog = ExtensionCatalog::builtin();
    let mut engine = Engine::from_config(cli_config.engine.clone(), &catalog)?;

    // Flags add to the configured extensions; repeats are ignored.
    let mut extra: Vec<&str> = Vec::new();
    for name in extensions {
        if !engine.has_extension(name) && !extra.contains(&name.as_str()) {
            extra.push(name);
        }
    }
    engine.attach_named(&catalog, &extra)?;

    if let Some(dir) = templates {
        let count = engine.add_templates_from_dir(dir)?;
        tracing::debug!(?dir, count, "Loaded template directory");
    }

    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    engine.add_template(name.clone(), source);

    let mut context = Context::new();
    for (key, value) in parse_params(params)? {
        context.insert(key, &value);
    }

    let rendered = engine.render(&name, &context)?;
    output::raw(&rendered)?;
    Ok(())
}
