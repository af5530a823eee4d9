//! Terminal front end for the storefront bot
//!
//! Reads chat input from stdin and prints every surface operation, so the
//! live-view engine can be exercised without a chat platform.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use storefront_bot::StorefrontBot;
use storefront_core::effects::UserProfile;
use storefront_core::{ChatId, StorefrontConfig, UserId};
use storefront_effects::{
    ConsoleSurfaceHandler, FilesystemMediaResolver, MemoryCacheHandler, MemoryCatalogHandler,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod effects;
mod input;

use effects::TerminalEffects;
use input::Session;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront bot on the terminal", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, default_value = "storefront.toml")]
    config: PathBuf,

    /// Product catalog seed
    #[arg(long, default_value = "catalog.toml")]
    catalog: PathBuf,

    /// Username to chat as
    #[arg(short, long, default_value = "guest")]
    user: String,

    /// First name shown in the greeting
    #[arg(long)]
    name: Option<String>,

    /// Chat identifier
    #[arg(long, default_value_t = 1)]
    chat: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = StorefrontConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let catalog = MemoryCatalogHandler::from_seed_file(&cli.catalog)
        .await
        .with_context(|| format!("seeding catalog from {}", cli.catalog.display()))?;

    let effects = TerminalEffects {
        cache: MemoryCacheHandler::from_config(&config),
        catalog,
        surface: ConsoleSurfaceHandler::new(),
    };
    let bot = StorefrontBot::new(config.clone(), FilesystemMediaResolver::from_config(&config));

    let profile = UserProfile {
        user: UserId::new(cli.user.as_str()),
        first_name: cli.name.clone(),
        last_name: None,
    };
    let mut session = Session::new(profile, ChatId(cli.chat));
    tracing::info!(user = %session.profile.user, chat = %session.chat, "storefront ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(update) = session.update_for(&line) else {
            continue;
        };
        match bot.handle(&effects, update).await {
            Ok(outcome) => tracing::debug!(?outcome, "handled"),
            Err(e) => tracing::error!(error = %e, "update failed"),
        }
    }

    Ok(())
}
