use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}
