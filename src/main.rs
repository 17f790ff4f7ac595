//! Credits Bot CLI
//!
//! Binary entry point for the group-chat credits bot.
//!
//! # Usage
//!
//! ```bash
//! credits-bot /etc/credits-bot/config.toml
//! credits-bot --database /tmp/credits.json config.toml
//! RUST_LOG=debug credits-bot config.toml
//! ```
//!
//! The program loads the TOML configuration, opens the credit store,
//! resolves the bot's own identity, then long-polls the chat transport and
//! handles each inbound message to completion before the next. Ctrl-C sends
//! a farewell to the configured group chat and exits.
//!
//! # Exit Codes
//!
//! - 0: Success (clean shutdown)
//! - 1: Fatal error (bad configuration, unreadable store, rejected token)

use credits_bot::cli;
use credits_bot::config::Config;
use credits_bot::core::{replies, Dispatcher, LedgerStore};
use credits_bot::store::JsonFileStore;
use credits_bot::transport::TelegramClient;
use credits_bot::types::BotError;
use std::process;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Server-side long-poll timeout; keeps the loop quiet while the chat is quiet
const POLL_TIMEOUT_SECS: u64 = 30;


/// Pause before resuming the poll loop after a transport error
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), BotError> {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let mut config = Config::load(&args.config_file)?;
    if let Some(path) = args.database {
        config.database.path = path;
    }

    let store = JsonFileStore::open(&config.database.path)?;
    let client = TelegramClient::new(&config.bot.token);

    // The bot's own identity backs the credit-the-bot guard
    let bot_user = client.get_me().await?;
    info!(bot = %bot_user.first_name, store = %config.database.path.display(), "starting up");

    let mut dispatcher = Dispatcher::new(LedgerStore::new(Box::new(store)), bot_user);

    info!("waiting for messages");
    let mut offset = 0i64;
    loop {
        let batch = tokio::select! {
            batch = client.get_updates(offset, POLL_TIMEOUT_SECS) => batch,
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                if let Err(err) = client
                    .send_message(config.chat.group_id, &replies::farewell())
                    .await
                {
                    warn!(%err, "failed to send farewell");
                }
                return Ok(());
            }
        };

        let updates = match batch {
            Ok(updates) => updates,
            Err(err) => {
                warn!(%err, "polling failed, retrying");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.id + 1);

            // Updates without a usable message still advance the offset
            let Some(msg) = update.message else { continue };

            if let Some(reply) = dispatcher.dispatch(&msg) {
                if let Err(err) = client.send_message(msg.chat_id, &reply).await {
                    warn!(%err, chat_id = msg.chat_id, "failed to send reply");
                }
            }
        }
    }
}
