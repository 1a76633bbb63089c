//! panjob CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "panjob")]
#[command(version = panjob_util::cli_version())]
#[command(about = "Run the pandoc conversions a document declares", long_about = None)]
struct Cli {
    /// Log progress (info level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log resolution details (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve, translate and run the jobs declared by documents
    Render {
        /// Documents whose front matter declares jobs
        #[arg(required = true, value_name = "DOCUMENT")]
        documents: Vec<PathBuf>,

        /// Configuration file (default: discover panjob.yaml)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Only process the job at this zero-based index
        #[arg(short, long, value_name = "INDEX")]
        job: Option<usize>,

        /// Print pandoc command lines instead of running them
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Print a commented panjob.yaml template
    Template,

    /// List the presets available from the configuration
    Presets {
        /// Configuration file (default: discover panjob.yaml)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

/// Default log filter for the given verbosity flags.
fn default_filter(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "panjob=debug,panjob_core=debug,panjob_config=debug"
    } else if verbose {
        "panjob=info,panjob_core=info,panjob_config=info"
    } else {
        "panjob=warn,panjob_core=warn,panjob_config=warn"
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over the flags
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose, cli.debug).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Render {
            documents,
            config,
            job,
            dry_run,
        } => commands::render::execute(commands::render::RenderArgs {
            documents,
            config,
            job,
            dry_run,
        }),
        Commands::Template => commands::template::execute(),
        Commands::Presets { config } => commands::presets::execute(config.as_deref()),
    }
}
