//! CLI administration tool for tinylink.
//!
//! Creates and looks up short links and performs database checks directly
//! against PostgreSQL, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (prompts when the URL is omitted)
//! cargo run --bin admin -- shorten https://example.com/some/long/path
//!
//! # Look up where a code points
//! cargo run --bin admin -- resolve aZ3kQ9xB
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `tinylink::config`), validated the same way:
//!
//! - `DATABASE_URL` (or `DB_*` parts): PostgreSQL connection string
//! - `BASE_URL`: prefix used when printing short links
//! - `CODE_LENGTH`, `CODE_ALPHABET`, `CODE_MAX_ATTEMPTS`: code settings

use tinylink::config::{self, Config};
use tinylink::infrastructure::persistence::PgUrlRepository;
use tinylink::server::build_shortener;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use sqlx::PgPool;
use std::sync::Arc;

/// Owner recorded for links created from the CLI.
const ADMIN_OWNER: &str = "admin";

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Shorten {
        /// URL to shorten (prompted when omitted)
        url: Option<String>,

        /// Owner recorded with the link
        #[arg(short, long, default_value = ADMIN_OWNER)]
        owner: String,
    },

    /// Show the original URL behind a short code
    Resolve {
        /// Short code to look up
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
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
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    let repo = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Shorten { url, owner } => shorten(repo, &config, url, owner).await?,
        Commands::Resolve { code } => resolve(repo, &config, code).await?,
        Commands::Db { action } => handle_db_action(action, &pool, repo).await?,
    }

    Ok(())
}

fn short_url(config: &Config, code: &str) -> String {
    format!("{}/r/{}", config.base_url.trim_end_matches('/'), code)
}

/// Creates a short link, prompting for the URL when it was not passed.
async fn shorten(
    repo: Arc<PgUrlRepository>,
    config: &Config,
    url: Option<String>,
    owner: String,
) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    let service = build_shortener(repo, config)?;
    let record = service
        .shorten(&url, &owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("{}", "✅ Short link created".green().bold());
    println!();
    println!("  Code:      {}", record.short_code.bright_yellow().bold());
    println!("  Short URL: {}", short_url(config, &record.short_code).cyan());
    println!("  Target:    {}", record.original_url.bright_white());
    println!("  Owner:     {}", record.owner_id.bright_black());
    println!();

    Ok(())
}

/// Prints the original URL for `code`.
async fn resolve(repo: Arc<PgUrlRepository>, config: &Config, code: String) -> Result<()> {
    let service = build_shortener(repo, config)?;

    let original = service
        .resolve(&code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match original {
        Some(url) => println!("  {} → {}", code.bright_yellow(), url.bright_white()),
        None => println!("{}", format!("⚠️  No link found for '{}'", code).yellow()),
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, repo: Arc<PgUrlRepository>) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let count = repo
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Links:      {}",
                count.to_string().bright_green().bold()
            );

            if let Some(latest) = repo
                .latest()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load latest link: {}", e))?
            {
                println!(
                    "  Latest:     {} → {} ({})",
                    latest.short_code.bright_yellow(),
                    latest.original_url,
                    latest
                        .created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
            }
            println!();
        }
    }

    Ok(())
}
