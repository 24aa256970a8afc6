//! hail-view-ctl
//!
//! Command-line front end for the hail-view template engine: inspect the
//! built-in extensions, discover template packs, generate files from template
//! sets, and render single templates.

mod cli_config;
mod commands;
mod output;
mod packs;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hail-view-ctl", version, about, styles = output::clap_styles())]
struct Cli {
    /// Config file to use instead of `.hail-view.toml` discovery
    #[arg(long, global = true, env = "HAIL_VIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect template extensions
    #[command(subcommand)]
    Extension(ExtensionCommands),

    /// Discover and validate template packs
    #[command(subcommand)]
    Pack(PackCommands),

    /// List, inspect and generate from pack templates
    #[command(subcommand)]
    Template(TemplateCommands),

    /// Render a single template file to stdout
    Render {
        /// Template file to render
        file: PathBuf,

        /// Directory of `*.tera` files available to includes and inheritance
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Extension to attach, by catalog name (repeatable)
        #[arg(short, long = "extension")]
        extensions: Vec<String>,

        /// Context value as key=value (repeatable)
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum ExtensionCommands {
    /// List catalog extensions and the capabilities each registers
    List,
}

#[derive(Debug, Subcommand)]
pub(crate) enum PackCommands {
    /// List discovered packs
    List,

    /// Validate the pack at a path
    Validate {
        /// Directory containing `hail-pack.toml`
        path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum TemplateCommands {
    /// List templates from all discovered packs
    List {
        /// Only list templates from this pack
        #[arg(long)]
        pack: Option<String>,
    },

    /// Show parameters and outputs of a template
    Info {
        name: String,

        #[arg(long)]
        pack: Option<String>,
    },

    /// Render a template set into files
    Generate {
        name: String,

        /// Parameter as key=value (repeatable)
        #[arg(short, long)]
        param: Vec<String>,

        #[arg(long)]
        pack: Option<String>,

        /// Output directory (defaults to `default-output-dir`, then `.`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let directive = if verbose {
        "hail_view=debug"
    } else {
        "hail_view=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cli_config = cli_config::load_cli_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extension(cmd) => commands::handle_extension_command(cmd),
        Commands::Pack(cmd) => commands::handle_pack_command(cmd, &cli_config),
        Commands::Template(cmd) => commands::handle_template_command(cmd, &cli_config),
        Commands::Render {
            file,
            templates,
            extensions,
            params,
        } => commands::handle_render_command(
            &cli_config,
            &file,
            templates.as_deref(),
            &extensions,
            &params,
        ),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        output::error(format!("failed to initialize logging: {e}"));
        std::process::exit(2);
    }

    if let Err(e) = run(cli) {
        output::error(format!("{e:#}"));
        std::process::exit(1);
    }
}
