use std::collections::HashMap;
use std::sync::Arc;
use log::{debug, warn};
use serenity::model::id::GuildId;
use tokio::sync::{Mutex, RwLock};

use super::{GuildConfig, GuildStore, StorageError};

pub type GuildEntry = Arc<Mutex<GuildConfig>>;

/// What an [`GuildConfigs::update`] closure did to the config.
pub enum Mutation<T> {
    /// Nothing changed, skip the write.
    Keep(T),
    /// The config changed and must be written back.
    Persist(T),
}

/// In-memory view of every guild's config, backed by a [`GuildStore`].
///
/// Guilds are loaded the first time they are touched. Each guild has its own
/// lock, held across validate, mutate and persist so two interactions in the
/// same guild can't interleave their writes.
pub struct GuildConfigs {
    store: Arc<dyn GuildStore>,
    guilds: RwLock<HashMap<GuildId, GuildEntry>>,
}

impl GuildConfigs {
    pub fn new(store: Arc<dyn GuildStore>) -> Self {
        Self {
            store,
            guilds: RwLock::new(HashMap::new()),
        }
    }

    pub async fn entry(&self, guild_id: GuildId) -> GuildEntry {
        if let Some(entry) = self.guilds.read().await.get(&guild_id) {
            return Arc::clone(entry);
        }

        let config = match self.store.load(guild_id).await {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config for guild {}, using defaults: {}", guild_id, e);
                GuildConfig::default()
            }
        };
        debug!("Loaded config for guild {}", guild_id);

        let mut guilds = self.guilds.write().await;
        Arc::clone(
            guilds
                .entry(guild_id)
                .or_insert_with(|| Arc::new(Mutex::new(config))),
        )
    }

    /// Loads every guild up front, used once the gateway reports which guilds we are in.
    pub async fn preload<I>(&self, guild_ids: I)
    where
        I: IntoIterator<Item = GuildId>,
    {
        for guild_id in guild_ids {
            self.entry(guild_id).await;
        }
    }

    /// Copy of the guild's current config.
    pub async fn snapshot(&self, guild_id: GuildId) -> GuildConfig {
        self.entry(guild_id).await.lock().await.clone()
    }

    /// Runs `f` under the guild lock and persists the result when it reports a change.
    ///
    /// A failed write rolls the in-memory config back so it keeps matching storage.
    pub async fn update<T, F>(&self, guild_id: GuildId, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut GuildConfig) -> Mutation<T>,
    {
        let entry = self.entry(guild_id).await;
        let mut config = entry.lock().await;
        let before = config.clone();

        match f(&mut config) {
            Mutation::Keep(value) => Ok(value),
            Mutation::Persist(value) => match self.store.save(guild_id, &config).await {
                Ok(()) => Ok(value),
                Err(e) => {
                    *config = before;
                    Err(e)
                }
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serenity::model::id::RoleId;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Store double that counts calls and can be told to fail writes.
    #[derive(Default)]
    pub(crate) struct RecordingStore {
        pub loads: AtomicUsize,
        pub saves: AtomicUsize,
        pub fail_saves: AtomicBool,
        pub saved: parking_lot::Mutex<HashMap<GuildId, GuildConfig>>,
    }

    #[async_trait]
    impl GuildStore for RecordingStore {
        async fn load(&self, guild_id: GuildId) -> Result<GuildConfig, StorageError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.saved.lock().get(&guild_id).cloned().unwrap_or_default())
        }

        async fn save(&self, guild_id: GuildId, config: &GuildConfig) -> Result<(), StorageError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.saved.lock().insert(guild_id, config.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn entry_loads_once() {
        let store = Arc::new(RecordingStore::default());
        let configs = GuildConfigs::new(store.clone());

        configs.entry(GuildId::new(1)).await;
        configs.entry(GuildId::new(1)).await;
        configs.preload([GuildId::new(1), GuildId::new(2)]).await;

        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn keep_skips_the_write() {
        let store = Arc::new(RecordingStore::default());
        let configs = GuildConfigs::new(store.clone());

        let added = configs
            .update(GuildId::new(1), |_| Mutation::Keep(false))
            .await
            .unwrap();

        assert!(!added);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn persist_writes_through() {
        let store = Arc::new(RecordingStore::default());
        let configs = GuildConfigs::new(store.clone());
        let guild = GuildId::new(1);

        configs
            .update(guild, |config| {
                config.add_role(RoleId::new(10));
                Mutation::Persist(())
            })
            .await
            .unwrap();

        assert_eq!(store.saved.lock()[&guild].managed_roles(), ["10"]);
        assert_eq!(configs.snapshot(guild).await.managed_roles(), ["10"]);
    }

    #[tokio::test]
    async fn failed_write_rolls_back() {
        let store = Arc::new(RecordingStore::default());
        store.fail_saves.store(true, Ordering::SeqCst);
        let configs = GuildConfigs::new(store.clone());
        let guild = GuildId::new(1);

        let result = configs
            .update(guild, |config| {
                config.add_role(RoleId::new(10));
                Mutation::Persist(())
            })
            .await;

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(configs.snapshot(guild).await.managed_roles().is_empty());
    }
}
