//! Pantry CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! pantry-cli migrate
//!
//! # Insert the demo catalog
//! pantry-cli seed products
//!
//! # Insert products from a JSON file
//! pantry-cli seed products --file products.json
//!
//! # Create a user (password from PANTRY_USER_PASSWORD)
//! PANTRY_USER_PASSWORD=... pantry-cli user create -u alice
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed products` - Seed the catalog
//! - `user create` - Create a login

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pantry-cli")]
#[command(author, version, about = "Pantry CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products into the catalog
    Products {
        /// JSON file with `[{"name": ..., "price": ...}]` (demo catalog if omitted)
        #[arg(short, long)]
        file: Option<String>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user (password read from `PANTRY_USER_PASSWORD`)
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                commands::seed::products(file.as_deref()).await?;
            }
        },
        Commands::User { action } => match action {
            UserAction::Create { username } => {
                let id = commands::user::create_user(&username).await?;
                tracing::info!("Created user {username} (id {id})");
            }
        },
    }
    Ok(())
}
