use std::path::{Path, PathBuf};
use std::fs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::logging::LogLevel;

/// Token placeholder written into a fresh config file.
pub const UNSET_TOKEN: &str = "SETME";

const TOKEN_ENV_VAR: &str = "ROLEBOT_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file {0} is missing; a new one has been generated, please configure the bot and try again")]
    Missing(PathBuf),

    #[error("I/O error on config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file could not be parsed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Application (client) id of the bot.
    pub user_id: u64,
    pub token: String,
    /// Location of the document store. Read only when `use_mongo_db` is set.
    pub mongo_server_string: String,
    /// Shown as the bot's activity once it is ready.
    pub version: String,
    pub command_prefix: String,
    /// Selects the document store backend; the per-guild file backend otherwise.
    pub use_mongo_db: bool,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default = "default_database_dir")]
    pub database_dir: PathBuf,
}

fn default_database_dir() -> PathBuf {
    PathBuf::from("databases")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: 0,
            token: UNSET_TOKEN.to_string(),
            mongo_server_string: UNSET_TOKEN.to_string(),
            version: "v1.0.0".to_string(),
            command_prefix: "~".to_string(),
            use_mongo_db: true,
            log_level: LogLevel::default(),
            database_dir: default_database_dir(),
        }
    }
}

impl Config {
    pub const CONFIG_PATH: &'static str = "Config.toml";

    /// Loads the config at `path`.
    ///
    /// A missing file is replaced by a template with default values and
    /// reported as [`ConfigError::Missing`], the bot cannot run until it has
    /// been filled in.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            Config::default().save(path)?;
            return Err(ConfigError::Missing(path.to_path_buf()));
        }

        let mut config: Config = toml::from_str(&fs::read_to_string(path)?)?;
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                config.token = token;
            }
        }
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn is_token_configured(&self) -> bool {
        !self.token.is_empty() && self.token != UNSET_TOKEN
    }

    /// First characters of the token, enough to tell which one was tried.
    pub fn token_hint(&self) -> String {
        let hint: String = self.token.chars().take(10).collect();
        format!("{}...", hint)
    }
}
