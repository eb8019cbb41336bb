//! CLI administration tool for shorty.
//!
//! Talks to the configured store directly, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check store connectivity
//! cargo run --bin shorty-admin -- db check
//!
//! # Show PostgreSQL version and mapping count
//! cargo run --bin shorty-admin -- db info
//!
//! # Allocate a code for a URL
//! cargo run --bin shorty-admin -- shorten https://example.com/page
//!
//! # Look up a code
//! cargo run --bin shorty-admin -- resolve aZ3k9Q
//! ```
//!
//! # Environment Variables
//!
//! Same as the server, see `shorty::config`. With `STORE_BACKEND=memory` every
//! invocation starts from an empty store.

use shorty::api::dto::shorten::ShortenRequest;
use shorty::application::services::Allocator;
use shorty::config::{self, Config, StoreBackend};
use shorty::domain::entities::ShortCode;
use shorty::server::connect_store;
use shorty::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use validator::Validate;

/// CLI tool for managing shorty.
#[derive(Parser)]
#[command(name = "shorty-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Allocate a short code for a URL
    Shorten {
        /// Absolute http(s) URL
        url: String,
    },

    /// Print the original URL behind a short code
    Resolve {
        /// Short code to look up
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check store connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Db { action } => handle_db_action(action, &config).await?,
        Commands::Shorten { url } => shorten(&config, url).await?,
        Commands::Resolve { code } => resolve(&config, &code).await?,
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking store connection...".bright_blue());

            let store = connect_store(config).await?;
            store.ping().await.context("Store ping failed")?;

            println!("{}", "✅ Store connection OK".green().bold());
        }
        DbAction::Info => {
            if config.store_backend != StoreBackend::Postgres {
                println!("{}", "⚠️  STORE_BACKEND is not postgres".yellow());
                return Ok(());
            }

            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let pool = PgPool::connect(&config.database_url)
                .await
                .context("Failed to connect to database")?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;

            let urls_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
                .fetch_one(&pool)
                .await
                .context("Failed to count mappings (are migrations applied?)")?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Mappings:   {}",
                urls_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}

/// Allocates a code through the same allocator the server uses.
async fn shorten(config: &Config, url: String) -> Result<()> {
    let url = target_url(url)?;

    let store = connect_store(config).await?;
    let generator = CodeGenerator::os(config.code_length)?;
    let allocator = Allocator::new(store, generator, config.allocator_config());

    let mapping = allocator
        .allocate(&url)
        .await
        .context("Failed to allocate short code")?;

    println!("{}", "✅ Short code created".green().bold());
    println!();
    println!("  Code:      {}", mapping.code.as_str().bright_yellow().bold());
    println!(
        "  Short URL: {}",
        mapping.code.to_url(&config.base_url).cyan()
    );
    println!("  Target:    {}", mapping.original_url);
    println!();

    Ok(())
}

/// Validates a URL the same way `POST /api/shorten` does and returns its
/// normalized form.
fn target_url(url: String) -> Result<String> {
    let request = ShortenRequest { url };
    if let Err(e) = request.validate() {
        anyhow::bail!("Invalid url '{}': {}", request.url, e);
    }

    request
        .normalized_url()
        .with_context(|| format!("Invalid url '{}'", request.url))
}

async fn resolve(config: &Config, raw_code: &str) -> Result<()> {
    let Some(code) = ShortCode::parse(raw_code) else {
        anyhow::bail!("'{}' is not a valid short code", raw_code);
    };

    let store = connect_store(config).await?;

    match store.resolve(&code).await {
        Ok(mapping) => {
            println!("  Code:    {}", mapping.code.as_str().bright_yellow());
            println!("  Target:  {}", mapping.original_url.bright_white());
            println!(
                "  Created: {}",
                mapping
                    .created_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .bright_black()
            );
        }
        Err(e) if e.is_not_found() => {
            anyhow::bail!("No mapping for {}", code);
        }
        Err(e) => return Err(e).context("Store lookup failed"),
    }

    Ok(())
}
