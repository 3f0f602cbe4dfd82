//! Operator CLI for snaplink.
//!
//! Token issuance lives here rather than in the HTTP API, so minting a
//! credential always requires database access:
//!
//! ```bash
//! cargo run --bin admin -- token create --name "Production API"
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Production API"
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! Requires `DATABASE_URL`, plus `TOKEN_SIGNING_SECRET` for token commands.
//! The secret must match the server's or issued tokens will not verify.

use snaplink::application::services::auth_service::hash_token;
use snaplink::domain::repositories::TokenRepository;
use snaplink::infrastructure::persistence::PgTokenRepository;
use snaplink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

const TOKEN_LENGTH: usize = 48;

#[derive(Parser)]
#[command(name = "admin", author, version, about = "snaplink operator tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show link and click totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Mint a new API token
    Create {
        /// Token name, prompted for if omitted
        #[arg(short, long)]
        name: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token by name
    Revoke { name: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create { name, yes } => create_token(repo, name, yes).await?,
        TokenAction::List => list_tokens(repo).await?,
        TokenAction::Revoke { name } => revoke_token(repo, name).await?,
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC of the token is stored; the raw value is displayed once
/// and cannot be retrieved later.
async fn create_token(
    repo: Arc<PgTokenRepository>,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let signing_secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Token name").interact_text()?,
    };

    if !skip_confirm {
        let proceed = Confirm::new()
            .with_prompt(format!("Mint a token named \"{}\"?", token_name))
            .default(true)
            .interact()?;

        if !proceed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let token_value = RandomCodeGenerator.generate(TOKEN_LENGTH);
    let token_hash = hash_token(&signing_secret, &token_value);

    let created = repo
        .create_token(&token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{} (owner id {})", "Token created".green().bold(), created.id);
    println!();
    println!("  {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "Save it now; only its hash is stored and it cannot be shown again.".red()
    );
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );

    Ok(())
}

/// Lists all API tokens with status indicators.
async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!(
            "No tokens yet. Mint one with: {}",
            "admin token create".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "{:<4} {:<30} {:<18} {:<8}",
        "ID".bold(),
        "Name".bold(),
        "Created".bold(),
        "Status".bold()
    );

    for token in &tokens {
        let status = match token.revoked_at {
            Some(_) => "REVOKED".red(),
            None => "ACTIVE".green(),
        };
        let created = token.created_at.format("%Y-%m-%d %H:%M");

        println!(
            "{:<4} {:<30} {:<18} {}",
            token.id,
            token.name.cyan(),
            created.to_string().bright_black(),
            status
        );
    }

    Ok(())
}

/// Revokes a token by name after confirmation.
async fn revoke_token(repo: Arc<PgTokenRepository>, name: String) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt(format!("Revoke token \"{}\"?", name))
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    let revoked = repo
        .revoke_token(&name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    if revoked {
        println!("{}", "Token revoked".green().bold());
    } else {
        println!("{}", "No active token with that name".yellow());
    }

    Ok(())
}

/// Shows overall link and click totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    let (total_links, anonymous_links, total_clicks): (i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), \
                COUNT(*) FILTER (WHERE owner_id IS NULL), \
                COALESCE(SUM(click_count), 0)::bigint \
         FROM links",
    )
    .fetch_one(pool)
    .await?;

    println!("Total links:     {}", total_links.to_string().cyan());
    println!("Anonymous links: {}", anonymous_links.to_string().cyan());
    println!("Total clicks:    {}", total_clicks.to_string().cyan());

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database connection OK".green().bold());
            println!("{}", version.bright_black());
        }
    }

    Ok(())
}
