use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Verbose,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Verbose => LevelFilter::Trace,
        }
    }
}

/// Short component name for a log target, `rolebot::discord::commands::ping` becomes `ping`.
pub fn component_name(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// Installs the console logger: `[HH:MM:SS] LEVEL component: message`.
///
/// Our own modules log at `level`, dependencies are held at warn so the
/// gateway chatter from serenity stays out of the console.
pub fn init(level: LogLevel) -> Result<(), log::SetLoggerError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}] {} {}: {}",
                chrono::Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                component_name(record.target()),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for("rolebot", level.filter())
        .chain(std::io::stdout())
        .apply()
}
