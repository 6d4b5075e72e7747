// src/discord/client.rs

use serenity::prelude::*;
use serenity::gateway::ShardManager;
use serenity::model::id::ApplicationId;
use crate::config::Config;
use crate::storage::GuildConfigs;
use std::sync::Arc;
use std::time::Duration;
use log::{info, warn};
use tokio::sync::Mutex;

use super::events::EventHandler;

/// Lets handlers reach the shard manager through `Context::data`.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

pub struct DiscordClient {
    client: Mutex<Option<Client>>,
    shard_manager: Arc<ShardManager>,
}

impl DiscordClient {
    pub async fn new(config: Arc<Config>, guilds: Arc<GuildConfigs>) -> Result<Self, serenity::Error> {
        // Guild roles and channels come from the cache, member roles arrive
        // with each interaction, so no privileged intents are needed.
        let intents = GatewayIntents::GUILDS;

        let mut builder = Client::builder(&config.token, intents)
            .event_handler(EventHandler::new(Arc::clone(&config), guilds));
        if config.user_id != 0 {
            builder = builder.application_id(ApplicationId::new(config.user_id));
        }
        let client = builder.await?;
        client
            .data
            .write()
            .await
            .insert::<ShardManagerContainer>(Arc::clone(&client.shard_manager));

        Ok(Self {
            shard_manager: Arc::clone(&client.shard_manager),
            client: Mutex::new(Some(client)),
        })
    }

    pub async fn shutdown(&self) {
        info!("Shutting down DiscordClient...");
        match tokio::time::timeout(Duration::from_secs(10), self.shard_manager.shutdown_all()).await {
            Ok(_) => info!("Discord shards shut down successfully"),
            Err(_) => warn!("Timed out while shutting down Discord shards"),
        }
    }

    /// Runs the gateway connection until it closes.
    pub async fn start(&self) -> Result<(), serenity::Error> {
        let Some(mut client) = self.client.lock().await.take() else {
            return Err(serenity::Error::Other("Discord client has already been started"));
        };
        info!("Starting...");
        client.start().await
    }
}
