//! CLI administration tool for url-map.
//!
//! Computes short codes offline, inspects stored records and performs
//! database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Print the code for a URL (no database needed)
//! cargo run --bin admin -- generate https://example.com/a
//!
//! # Show the stored record for a code
//! cargo run --bin admin -- lookup hBreFgHC
//!
//! # Shorten a URL directly against the database
//! cargo run --bin admin -- shorten https://example.com/a
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server, validated the same way: `DATABASE_URL` (or the
//! `DB_*` components), `UPSERT_STRATEGY` and `BASE_URL`. Every command
//! except `generate` needs `STORE=postgres` (the default).

use url_map::application::services::UrlService;
use url_map::config::{self, Config, mask_connection_string};
use url_map::domain::clock::SystemClock;
use url_map::domain::entities::UrlRecord;
use url_map::domain::repositories::UrlRepository;
use url_map::infrastructure::persistence::PgUrlRepository;
use url_map::state::join_short_url;
use url_map::utils::code_generator::{generate_code, validate_code};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-map.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the short code for a URL
    Generate {
        /// URL to hash
        url: String,
    },

    /// Show the stored record for a short code
    Lookup {
        /// 8-character short code
        code: String,
    },

    /// Shorten a URL and store it
    Shorten {
        /// URL to shorten
        url: String,
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
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Generate { url } = &cli.command {
        print_code(url);
        return Ok(());
    }

    let config = config::load_from_env()?;
    config.require_postgres()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&config.database_url)
            )
        })?;

    match cli.command {
        Commands::Generate { .. } => {}
        Commands::Lookup { code } => lookup(&pool, &config, &code).await?,
        Commands::Shorten { url } => shorten(&pool, &config, &url).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn print_code(url: &str) {
    let code = generate_code(url);
    println!("  URL:  {}", url.cyan());
    println!("  Code: {}", code.bright_yellow().bold());
}

/// Prints the record stored under `code`.
///
/// # Output Format
///
/// ```text
/// 🔎 hBreFgHC
///
///   URL:     https://example.com/a
///   Created: 2024-01-15 10:30:00 UTC
///   Updated: 2024-01-16 08:12:45 UTC
/// ```
async fn lookup(pool: &PgPool, config: &Config, code: &str) -> Result<()> {
    if !validate_code(code) {
        anyhow::bail!("'{code}' is not a valid short code");
    }

    let record = url_service(pool, config)
        .find(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!("{}", format!("🔎 {code}").bright_blue().bold());
    println!();

    match record {
        Some(record) => print_record(&record),
        None => println!("{}", "  No record found".yellow()),
    }
    println!();

    Ok(())
}

fn print_record(record: &UrlRecord) {
    let format = "%Y-%m-%d %H:%M:%S UTC";
    println!("  URL:     {}", record.redirect_url.cyan());
    println!(
        "  Created: {}",
        record.created_at.format(format).to_string().bright_black()
    );
    println!(
        "  Updated: {}",
        record.updated_at.format(format).to_string().bright_black()
    );
    if !record.is_refreshed() {
        println!("  {}", "Never re-shortened since creation".bright_black());
    }
}

/// Builds the same service the HTTP server uses, over the Postgres store.
fn url_service(pool: &PgPool, config: &Config) -> UrlService<dyn UrlRepository> {
    let repo: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));
    UrlService::new(repo, Arc::new(SystemClock), config.upsert_strategy)
}

/// Shortens `url` through the same service the HTTP handler uses.
async fn shorten(pool: &PgPool, config: &Config, url: &str) -> Result<()> {
    let shortened = url_service(pool, config)
        .shorten(url)
        .await
        .map_err(|e| anyhow::anyhow!("Unable to shorten URL: {}", e))?;

    println!(
        "{} ({})",
        "✅ Shortened".green().bold(),
        shortened.outcome.as_str().bright_black()
    );
    println!(
        "  {}",
        join_short_url(&config.base_url, &shortened.code).bright_yellow()
    );

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
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
            let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_map")
                .fetch_one(pool)
                .await
                .context("Failed to count url_map rows (are migrations applied?)")?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Records:    {}",
                records.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
