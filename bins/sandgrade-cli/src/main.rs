mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sandgrade-cli")]
#[command(about = "Sandgrade CLI - Grade Racket submissions locally and inspect the runtime", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission against a test suite
    Grade {
        /// Racket source file to grade
        #[arg(short, long)]
        source: PathBuf,

        /// Test suite JSON ({"public": [[input, expected]], "hidden": [...], "function_name": ...})
        #[arg(short, long)]
        tests: PathBuf,

        /// Root of the bundled Racket installation
        #[arg(short, long)]
        racket_root: Option<PathBuf>,

        /// Wall-clock timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print the harness that would be executed for a submission
    Harness {
        /// Racket source file
        #[arg(short, long)]
        source: PathBuf,

        /// Test suite JSON
        #[arg(short, long)]
        tests: PathBuf,
    },

    /// Check that the bundled Racket installation is usable
    Check {
        /// Root of the bundled Racket installation
        #[arg(short, long)]
        racket_root: Option<PathBuf>,
    },

    /// Write a default config/sandgrade.json
    Init {
        /// Project path
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Grade {
            source,
            tests,
            racket_root,
            timeout,
        } => {
            let passed = commands::grade(&source, &tests, racket_root, timeout).await?;
            if !passed {
                std::process::exit(1);
            }
        }
        Commands::Harness { source, tests } => {
            commands::print_harness(&source, &tests)?;
        }
        Commands::Check { racket_root } => {
            commands::check_installation(racket_root)?;
        }
        Commands::Init { path } => {
            commands::init_project(&path)?;
        }
    }

    Ok(())
}
