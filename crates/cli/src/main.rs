//! Nature Pharmacy CLI - migrations, zone files and offline quotes.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! npharm migrate
//!
//! # Validate a zone file
//! npharm zones validate zones.yaml
//!
//! # Import a zone file into the database
//! npharm zones import zones.yaml
//!
//! # Quote shipping against a zone file
//! npharm quote --zones zones.yaml --country SN --region Dakar --total 10000
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "npharm")]
#[command(author, version, about = "Nature Pharmacy CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Validate or import shipping zone files
    Zones {
        #[command(subcommand)]
        action: ZonesAction,
    },
    /// Quote shipping offline against a zone file
    Quote {
        /// Zone file (YAML or JSON)
        #[arg(short, long)]
        zones: PathBuf,

        /// Destination country (ISO 3166-1 alpha-2)
        #[arg(short, long)]
        country: String,

        /// Destination region
        #[arg(short, long)]
        region: Option<String>,

        /// Order subtotal in minor currency units
        #[arg(short, long, allow_negative_numbers = true)]
        total: i64,
    },
}

#[derive(Subcommand)]
enum ZonesAction {
    /// Check a zone file without touching the database
    Validate {
        /// Zone file (YAML or JSON)
        file: PathBuf,
    },
    /// Insert every zone of a file
    Import {
        /// Zone file (YAML or JSON)
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nature_pharmacy_cli=info,nature_pharmacy_admin=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Zones { action } => match action {
            ZonesAction::Validate { file } => commands::zones::validate(&file)?,
            ZonesAction::Import { file } => commands::zones::import(&file).await?,
        },
        Commands::Quote {
            zones,
            country,
            region,
            total,
        } => commands::quote::run(&zones, &country, region.as_deref(), total)?,
    }
    Ok(())
}
