//! Bot configuration

use serde::Deserialize;

use core_kernel::{ChannelId, UserId};

/// Bot configuration
///
/// Loaded from `BOT_`-prefixed environment variables, with a `.env` file
/// honored by the binary for local development.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Comma-separated moderator user ids (the decision allow-list)
    pub moderator_ids: String,
    /// Channel receiving admin notifications, audit records, and
    /// provisioning commands
    pub audit_channel_id: i64,
    /// Claim store backend: "memory" or "postgres"
    pub store_backend: String,
    /// PostgreSQL connection string (postgres backend only)
    pub database_url: String,
    /// Moderation session lifetime in seconds
    pub session_ttl_secs: i64,
    /// Log level
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            moderator_ids: String::new(),
            audit_channel_id: 0,
            store_backend: "memory".to_string(),
            database_url: "postgres://localhost/claims".to_string(),
            session_ttl_secs: 600,
            log_level: "info".to_string(),
        }
    }
}

impl BotConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("BOT"))
            .build()?
            .try_deserialize()
    }

    /// Loads from environment, falling back field by field to defaults
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self {
            moderator_ids: std::env::var("BOT_MODERATOR_IDS").unwrap_or_default(),
            audit_channel_id: std::env::var("BOT_AUDIT_CHANNEL_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            store_backend: std::env::var("BOT_STORE_BACKEND")
                .unwrap_or_else(|_| "memory".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("BOT_DATABASE_URL"))
                .unwrap_or_else(|_| "postgres://localhost/claims".to_string()),
            session_ttl_secs: std::env::var("BOT_SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            log_level: std::env::var("BOT_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The parsed moderator allow-list
    pub fn moderators(&self) -> Vec<UserId> {
        self.moderator_ids
            .split(',')
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .map(UserId::new)
            .collect()
    }

    pub fn audit_channel(&self) -> ChannelId {
        ChannelId::new(self.audit_channel_id)
    }
}
