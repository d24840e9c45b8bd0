//! Podium CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "podium")]
#[command(version = podium_util::cli_version())]
#[command(about = "Podium renderer cache CLI", long_about = None)]
struct Cli {
    /// Directory holding the persistent renderer cache
    #[arg(long, global = true, default_value = ".podium-cache")]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Typeset a formula to a cropped PNG with baseline metrics
    Formula {
        /// The formula, without math delimiters
        formula: String,

        /// Typeset in inline ($...$) instead of display mode
        #[arg(long)]
        short: bool,

        /// Rendering resolution in dots per inch
        #[arg(long, default_value_t = 600)]
        dpi: u32,

        /// Write the PNG to FILE (defaults to <keyhash>.png)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Resize an image so its longer edge fits a bound
    Image {
        /// Source image file
        src: PathBuf,

        /// Maximum length of the longer edge, in pixels
        #[arg(long, default_value_t = 1920)]
        max_dimension: i64,

        /// Write the result to FILE (defaults to <keyhash>.<ext>)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Run a command and print its captured output
    Exec {
        /// The command line to run
        #[arg(required = true, trailing_var_arg = true)]
        cmd: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podium=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let cache_dir = cli.cache_dir;

    match cli.command {
        Commands::Formula {
            formula,
            short,
            dpi,
            output,
        } => commands::formula::execute(&cache_dir, &formula, short, dpi, output),
        Commands::Image {
            src,
            max_dimension,
            output,
        } => commands::image::execute(&cache_dir, &src, max_dimension, output),
        Commands::Exec { cmd } => commands::exec::execute(&cache_dir, cmd),
    }
}
