use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use log::{debug, warn};
use serenity::model::id::GuildId;

use super::{GuildConfig, GuildStore, StorageError};

/// One TOML file per guild, `<dir>/<guild id>.toml`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, guild_id: GuildId) -> PathBuf {
        self.dir.join(format!("{}.toml", guild_id))
    }
}

#[async_trait]
impl GuildStore for FileStore {
    async fn load(&self, guild_id: GuildId) -> Result<GuildConfig, StorageError> {
        let path = self.path_for(guild_id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(GuildConfig::default()),
            Err(e) => return Err(e.into()),
        };

        match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Could not parse {}, using defaults: {}", path.display(), e);
                Ok(GuildConfig::default())
            }
        }
    }

    async fn save(&self, guild_id: GuildId, config: &GuildConfig) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(guild_id);
        tokio::fs::write(&path, toml::to_string(config)?).await?;
        debug!("Saved guild {} to {}", guild_id, path.display());
        Ok(())
    }
}
