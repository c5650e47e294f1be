//! Configuration management for discord-bot

#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{bail, Context, Result};
use discord_commands::WebApiConfig;
use serde::{Deserialize, Serialize};
use std::fs;

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord: DiscordBotConfig,
    /// Endpoints for the joke, meme and animal commands
    #[serde(default)]
    pub apis: WebApiConfig,
}

/// Discord bot specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    #[serde(default)]
    pub token: String,
    /// Command prefix, e.g. `!` for `!ping`
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Pause between steps of the startup report, in milliseconds
    #[serde(default)]
    pub launch_step_ms: u64,
}

/// Source of environment variables.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_impl(&SystemEnv)
    }

    pub fn from_env_impl(env: &impl ReadEnv) -> Result<Self> {
        let token = env.var("DISCORD_TOKEN").unwrap_or_default();
        let prefix = env.var("COMMAND_PREFIX").unwrap_or_else(default_prefix);
        let launch_step_ms = parse_var(env, "LAUNCH_STEP_MS")?.unwrap_or(0);

        let mut apis = WebApiConfig::default();
        if let Some(url) = env.var("JOKE_API_URL") {
            apis.joke_url = url;
        }
        if let Some(url) = env.var("MEME_API_URL") {
            apis.meme_url = url;
        }
        if let Some(url) = env.var("CAT_API_URL") {
            apis.cat_url = url;
        }
        if let Some(url) = env.var("DOG_API_URL") {
            apis.dog_url = url;
        }
        if let Some(secs) = parse_var(env, "WEB_API_TIMEOUT_SECS")? {
            apis.timeout_secs = secs;
        }

        Ok(Config {
            discord: DiscordBotConfig {
                token,
                prefix,
                launch_step_ms,
            },
            apis,
        })
    }

    /// Check the settings the bot cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.discord.token.trim().is_empty() {
            bail!("DISCORD_TOKEN missing");
        }
        if self.discord.prefix.is_empty() {
            bail!("command prefix must not be empty");
        }
        Ok(())
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn parse_var(env: &impl ReadEnv, key: &str) -> Result<Option<u64>> {
    env.var(key)
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, v))
        })
        .transpose()
}
