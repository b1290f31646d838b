//! Payment Claims Bot - Console Binary
//!
//! Runs the claim moderation workflow against a console gateway: inbound
//! events are typed on stdin, outbound messages appear in the log. A real
//! deployment replaces the console adapter with a platform gateway and
//! feeds the same two hooks.
//!
//! # Usage
//!
//! ```bash
//! # In-memory store, two moderators
//! BOT_MODERATOR_IDS=9001,9002 BOT_AUDIT_CHANNEL_ID=-100 cargo run --bin claims-bot
//!
//! # PostgreSQL store
//! BOT_STORE_BACKEND=postgres DATABASE_URL=postgres://... cargo run --bin claims-bot
//! ```
//!
//! # Input lines
//!
//! * `text <user_id> <message...>` - a user or moderator sends text
//! * `press <user_id> <token>` - a moderator presses an inline button
//!
//! # Environment Variables
//!
//! * `BOT_MODERATOR_IDS` - comma-separated moderator user ids
//! * `BOT_AUDIT_CHANNEL_ID` - audit/moderation channel id
//! * `BOT_STORE_BACKEND` - "memory" (default) or "postgres"
//! * `BOT_DATABASE_URL` / `DATABASE_URL` - PostgreSQL connection string
//! * `BOT_SESSION_TTL_SECS` - moderation session lifetime (default: 600)
//! * `BOT_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::UserId;
use infra_store::{create_pool, ClaimStore, InMemoryClaimStore, PgClaimStore, StoreConfig};
use interface_bot::console::ConsoleGateway;
use interface_bot::{BotConfig, ClaimWorkflow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env_or_default();
    init_tracing(&config.log_level);

    tracing::info!(
        store = %config.store_backend,
        moderators = config.moderators().len(),
        audit_channel = %config.audit_channel(),
        "starting payment claims bot"
    );

    if config.moderators().is_empty() {
        tracing::warn!("no moderators configured; every decision will be denied");
    }

    match config.store_backend.as_str() {
        "postgres" => {
            let pool = create_pool(StoreConfig::new(&config.database_url)).await?;
            sqlx::migrate!("../infra_store/migrations").run(&pool).await?;
            run(PgClaimStore::new(pool), config).await
        }
        _ => run(InMemoryClaimStore::new(), config).await,
    }
}

async fn run<S>(store: S, config: BotConfig) -> anyhow::Result<()>
where
    S: ClaimStore + 'static,
{
    let workflow = ClaimWorkflow::new(
        Arc::new(store),
        Arc::new(ConsoleGateway::new()),
        config.moderators(),
        config.audit_channel(),
        chrono::Duration::seconds(config.session_ttl_secs),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tracing::info!("ready; type 'text <user_id> <message>' or 'press <user_id> <token>'");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => dispatch(&workflow, &line).await,
                    None => break,
                }
            }
            _ = shutdown_signal() => break,
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}

async fn dispatch<S, G>(workflow: &ClaimWorkflow<S, G>, line: &str)
where
    S: ClaimStore,
    G: interface_bot::MessagingGateway,
{
    let mut parts = line.trim().splitn(3, ' ');
    let event = match (parts.next(), parts.next(), parts.next()) {
        (Some(kind), Some(user), Some(payload)) => {
            user.parse::<i64>().ok().map(|id| (kind, UserId::new(id), payload))
        }
        _ => None,
    };

    match event {
        Some(("text", sender, message)) => workflow.handle_text(sender, message).await,
        Some(("press", actor, token)) => workflow.handle_callback(actor, token).await,
        _ => tracing::warn!("unrecognized input; use 'text <user_id> <message>' or 'press <user_id> <token>'"),
    }
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}
