mod document;
mod errors;
mod file;
mod models;
mod registry;

use std::sync::Arc;
use async_trait::async_trait;
use log::{info, warn};
use serenity::model::id::GuildId;

use crate::config::Config;

pub use document::DocumentStore;
pub use errors::StorageError;
pub use file::FileStore;
pub use models::{parse_role_id, ChannelsSettings, GuildConfig, RoleSelection, UNSET_CHANNEL};
pub use registry::{GuildConfigs, GuildEntry, Mutation};

#[cfg(test)]
pub(crate) use registry::tests::RecordingStore;

/// Persistence for per-guild configuration.
///
/// `load` never fails just because a guild has nothing stored yet, it hands
/// back a defaulted config instead.
#[async_trait]
pub trait GuildStore: Send + Sync {
    async fn load(&self, guild_id: GuildId) -> Result<GuildConfig, StorageError>;

    async fn save(&self, guild_id: GuildId, config: &GuildConfig) -> Result<(), StorageError>;
}

/// Opens the backend selected by the config.
pub async fn open(config: &Config) -> Result<Arc<dyn GuildStore>, StorageError> {
    if config.use_mongo_db {
        info!("Using MongoDB for guild storage");
        Ok(Arc::new(DocumentStore::connect(&config.mongo_server_string).await?))
    } else {
        warn!("It's highly recommended to use MongoDB over flat files in a production environment.");
        info!("Using per-guild files in {}", config.database_dir.display());
        Ok(Arc::new(FileStore::new(&config.database_dir)))
    }
}
