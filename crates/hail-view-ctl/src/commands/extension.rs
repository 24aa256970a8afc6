//! Extension catalog inspection.

use hail_view::ExtensionCatalog;

use crate::output;
use crate::ExtensionCommands;

pub(crate) fn handle_extension_command(cmd: ExtensionCommands) -> anyhow::Result<()> {
    match cmd {
        ExtensionCommands::List => list_extensions(&ExtensionCatalog::builtin()),
    }
}

fn list_extensions(catalog: &ExtensionCatalog) -> anyhow::Result<()> {
    output::header("Extensions:");
    output::blank();

    for name in catalog.names() {
        output::success(name);
        match catalog.describe(name) {
            Ok(capabilities) => {
                for (capability, kind) in capabilities {
                    output::capability(kind.to_string(), capability);
                }
            }
            Err(e) => {
                tracing::debug!(extension = %name, error = %e, "Cannot describe extension");
                output::dim(format!("    (capabilities unavailable: {e})"));
            }
        }
        output::blank();
    }

    Ok(())
}
