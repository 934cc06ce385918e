//! Guildhall CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run shop database migrations
//! gh-cli migrate
//!
//! # Seed the shop database with demo data
//! gh-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed database with demo events and tickets

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gh-cli")]
#[command(author, version, about = "Guildhall CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run shop database migrations
    Migrate,
    /// Seed the shop database with demo events and tickets
    Seed,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::shop().await?,
        Commands::Seed => commands::seed::demo_data().await?,
    }
    Ok(())
}
