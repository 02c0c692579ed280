//! pressgen CLI
//!
//! Generates the static HTML pages of a JSON-backed news and shop site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for pressgen.
#[derive(Parser)]
#[command(
    name = "pressgen",
    version,
    about = "Static HTML page generator for news and shop sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "pressgen.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Command to run; builds the site when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate every page of the site
    Build {
        /// Site root holding the template and data files
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Output directory (defaults to build.output_dir under the root)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Validate configuration, template and data files
    Check {
        /// Site root holding the template and data files
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    pressgen::init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Build {
        root: PathBuf::from("."),
        output: None,
        base_url: None,
    });

    match command {
        Commands::Build {
            root,
            output,
            base_url,
        } => {
            pressgen::cmd::build::run(
                &cli.config,
                &root,
                output.as_deref(),
                base_url.as_deref(),
            )?;
        }
        Commands::Check { root, strict } => {
            pressgen::cmd::check::run(&cli.config, &root, strict)?;
        }
    }

    Ok(())
}
