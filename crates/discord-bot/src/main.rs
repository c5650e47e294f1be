//! Prefix-command Discord bot
//!
//! Connects to the Discord gateway, routes `!command` messages through the
//! command dispatcher and serves a small health endpoint.

mod api;
mod config;
mod convert;
mod errors;
mod handlers;
mod health;
mod launch;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use discord_commands::{BotState, CommandRegistry, Dispatcher, WebApis};
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::handlers::{DispatcherKey, Handler};
use crate::health::AppState;

/// Discord bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/discord-bot.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Command prefix (overrides config file)
    #[arg(long, env = "COMMAND_PREFIX")]
    prefix: Option<String>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discord_bot=debug,discord_commands=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Discord bot");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env()?
    };
    if let Some(token) = args.token {
        config.discord.token = token;
    }
    if let Some(prefix) = args.prefix {
        config.discord.prefix = prefix;
    }

    if let Err(e) = config.validate() {
        error!("Cannot start: {}", e);
        return Err(e);
    }

    info!("Command prefix: {}", config.discord.prefix);

    let web = WebApis::new(config.apis.clone())
        .map_err(|e| anyhow::anyhow!("Failed to build web API client: {}", e))?;
    let state = Arc::new(BotState::new(config.discord.prefix.clone(), web));
    let registry = Arc::new(CommandRegistry::builtin());
    info!("Registered {} commands", registry.len());

    let deferred = state.deferred.clone();
    let dispatcher = Arc::new(Dispatcher::new(registry, state));

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS;

    let mut client = Client::builder(&config.discord.token, intents)
        .event_handler(Handler::new(config.discord.launch_step_ms))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    let health_state = AppState::new();

    {
        let mut data = client.data.write().await;
        data.insert::<DispatcherKey>(dispatcher);
        data.insert::<AppState>(health_state.clone());
    }

    // Start health check server
    let health_port = args.health_port;
    let health_state_clone = health_state.clone();
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state_clone, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    tokio::signal::ctrl_c().await.ok();
                }
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping Discord client...");
        let pending = deferred.pending();
        if pending > 0 {
            warn!("Dropping {} pending reminder(s) and cleanup task(s)", pending);
        }
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    // Blocks until all shards are stopped
    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("Discord bot stopped");
    Ok(())
}
