//! CLI administration tool for network-sites.
//!
//! Manages API tokens and networks, and prints site statistics without
//! going through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Register the network and its main site
//! cargo run --bin admin -- network create --domain example.com --mode subdomain
//!
//! # Create a token that may also delete sites
//! cargo run --bin admin -- token create --name "Ops" --capability manage_sites,delete_sites
//!
//! # List and revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Ops"
//!
//! # Site counts by status
//! cargo run --bin admin -- stats
//!
//! # Database diagnostics
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection
//! - `TOKEN_SIGNING_SECRET`: required by `token create`; must match the server
//! - `NETWORK_ID`: network used by `stats` (default: 1)

use network_sites::application::services::auth_service::hash_token;
use network_sites::config::Config;
use network_sites::domain::permissions::Capability;
use network_sites::domain::repositories::TokenRepository;
use network_sites::infrastructure::persistence::PgTokenRepository;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing network-sites.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage networks
    Network {
        #[command(subcommand)]
        action: NetworkAction,
    },

    /// Show site counts by status
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Ops", "Support desk")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Granted capabilities (default: manage_sites)
        #[arg(short, long, value_delimiter = ',')]
        capability: Vec<Capability>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Subdomain,
    Subdirectory,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Subdomain => "subdomain",
            Mode::Subdirectory => "subdirectory",
        }
    }
}

#[derive(Subcommand)]
enum NetworkAction {
    /// Create a network together with its main site
    Create {
        #[arg(short, long)]
        domain: String,

        #[arg(short, long, default_value = "/")]
        path: String,

        #[arg(short, long, value_enum, default_value = "subdomain")]
        mode: Mode,
    },

    /// List networks
    List,
}

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

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Network { action } => handle_network_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create {
            name,
            token,
            capability,
            yes,
        } => create_token(repo, name, token, capability, yes).await?,
        TokenAction::List => list_tokens(repo).await?,
        TokenAction::Revoke { name_or_id } => revoke_token(repo, name_or_id).await?,
    }

    Ok(())
}

/// Creates a token. Only its HMAC is stored; the raw value is shown once.
async fn create_token(
    repo: Arc<PgTokenRepository>,
    name: Option<String>,
    token: Option<String>,
    mut capabilities: Vec<Capability>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to create tokens")?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Network admin")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    if capabilities.is_empty() {
        capabilities.push(Capability::ManageSites);
    }
    capabilities.dedup();

    let granted = capabilities
        .iter()
        .map(Capability::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:         {}", token_name.cyan());
    println!("  Capabilities: {}", granted.cyan());
    println!("  Token:        {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  Save this token now, it cannot be shown again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&secret, &token_value);

    repo.create_token(&token_name, &token_hash, &capabilities)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "✅ Token created".green().bold());
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/sites",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<24} {:<28} {:<17} {:<17} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Capabilities".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(100).bright_black());

    for token in &tokens {
        let status = if token.is_revoked() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let capabilities = token
            .capabilities
            .iter()
            .map(Capability::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<4} {:<24} {:<28} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            capabilities,
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());

    Ok(())
}

/// Revokes a token by numeric ID or exact name.
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.is_revoked() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "✅ Token revoked".green().bold());

    Ok(())
}

async fn handle_network_action(action: NetworkAction, pool: &PgPool) -> Result<()> {
    match action {
        NetworkAction::Create { domain, path, mode } => {
            create_network(pool, &domain, &path, mode).await?
        }
        NetworkAction::List => {
            let rows: Vec<(i64, String, String, String, Option<i64>)> = sqlx::query_as(
                "SELECT id, domain, path, install_mode, main_site_id FROM networks ORDER BY id",
            )
            .fetch_all(pool)
            .await?;

            if rows.is_empty() {
                println!("{}", "  No networks found".yellow());
            }
            for (id, domain, path, mode, main_site_id) in rows {
                println!(
                    "  {:<4} {}{} ({}) main site: {}",
                    id.to_string().bright_black(),
                    domain.cyan(),
                    path,
                    mode,
                    main_site_id.map_or_else(|| "-".to_string(), |id| id.to_string())
                );
            }
        }
    }

    Ok(())
}

/// Inserts the network and its main site in one transaction.
async fn create_network(pool: &PgPool, domain: &str, path: &str, mode: Mode) -> Result<()> {
    if !path.starts_with('/') || !path.ends_with('/') {
        bail!("Path must start and end with '/'");
    }

    let mut tx = pool.begin().await?;

    let network_id: i64 = sqlx::query_scalar(
        "INSERT INTO networks (domain, path, install_mode) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(domain)
    .bind(path)
    .bind(mode.as_str())
    .fetch_one(&mut *tx)
    .await?;

    let site_id: i64 = sqlx::query_scalar(
        "INSERT INTO sites (network_id, domain, path, registered, last_updated) \
         VALUES ($1, $2, $3, NOW(), NOW()) RETURNING id",
    )
    .bind(network_id)
    .bind(domain)
    .bind(path)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE networks SET main_site_id = $1 WHERE id = $2")
        .bind(site_id)
        .bind(network_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    println!("{}", "✅ Network created".green().bold());
    println!("  Network ID:   {}", network_id.to_string().bright_white().bold());
    println!("  Main site ID: {}", site_id.to_string().bright_white().bold());
    println!();
    println!("  Set {}={} for the server.", "NETWORK_ID".bright_cyan(), network_id);

    Ok(())
}

/// Site counts of the configured network by status flag.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    let network_id = Config::load_network_id()?;

    println!(
        "{}",
        format!("📊 Network {network_id}").bright_blue().bold()
    );
    println!();

    let (total, archived, spam, deleted, mature): (i64, i64, i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), \
                COUNT(*) FILTER (WHERE archived), \
                COUNT(*) FILTER (WHERE spam), \
                COUNT(*) FILTER (WHERE deleted), \
                COUNT(*) FILTER (WHERE mature) \
         FROM sites WHERE network_id = $1",
    )
    .bind(network_id)
    .fetch_one(pool)
    .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("  Sites:         {}", total.to_string().bright_green().bold());
    println!("  Archived:      {}", archived.to_string().bright_white());
    println!("  Spam:          {}", spam.to_string().bright_white());
    println!("  Deactivated:   {}", deleted.to_string().bright_white());
    println!("  Mature:        {}", mature.to_string().bright_white());
    println!(
        "  Active tokens: {}",
        tokens_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}

/// 48 alphanumeric characters from a cryptographically secure RNG.
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
