use clap::Parser;
use rolebot::config::{Config, ConfigError};
use rolebot::error::BotError;
use rolebot::{logging, run};
use std::path::PathBuf;

/// Discord bot for self-assignable roles.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the config file, generated with defaults when missing.
    #[arg(short, long, default_value = Config::CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), BotError> {
    let args = Args::parse();

    let config = match Config::new(&args.config) {
        Ok(config) => config,
        Err(e @ ConfigError::Missing(_)) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    logging::init(config.log_level)?;
    run(config).await
}
