pub mod bot_status;
pub mod config;
pub mod discord;
pub mod error;
pub mod logging;
pub mod selection;
pub mod storage;

use std::sync::Arc;
use log::{error, info};
use crate::config::Config;
use crate::discord::DiscordClient;
use crate::error::BotError;
use crate::storage::GuildConfigs;

/// Connects to Discord and serves interactions until the gateway closes or
/// Ctrl+C is pressed.
pub async fn run(config: Config) -> Result<(), BotError> {
    let config = Arc::new(config);
    if !config.is_token_configured() {
        error!("No bot token has been configured. Please set `token` in the config file and try again.");
        return Ok(());
    }

    let guilds = Arc::new(GuildConfigs::new(storage::open(&config).await?));

    let client = match DiscordClient::new(Arc::clone(&config), guilds).await {
        Ok(client) => client,
        Err(e) => {
            error!("Could not create the Discord client. Attempted token: {}", config.token_hint());
            return Err(e.into());
        }
    };

    let client = Arc::new(client);
    let shutdown_client = Arc::clone(&client);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down.");
            shutdown_client.shutdown().await;
        }
    });

    if let Err(e) = client.start().await {
        error!(
            "There was an issue when using the configured token to log in. Please ensure the bot is properly configured. Attempted token: {}",
            config.token_hint()
        );
        return Err(e.into());
    }

    info!("Bot has shut down.");
    Ok(())
}
