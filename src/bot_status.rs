use log::info;
use serenity::gateway::ActivityData;
use serenity::model::user::OnlineStatus;
use serenity::prelude::Context;

/// What the bot shows as its presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotStatus {
    /// Connected but still registering commands.
    Starting,
    /// Serving interactions, the activity shows the running version.
    Ready { version: String },
}

impl BotStatus {
    pub fn activity(&self) -> ActivityData {
        match self {
            BotStatus::Starting => ActivityData::playing("Starting"),
            BotStatus::Ready { version } => ActivityData::playing(version.as_str()),
        }
    }

    pub fn online_status(&self) -> OnlineStatus {
        match self {
            BotStatus::Starting => OnlineStatus::DoNotDisturb,
            BotStatus::Ready { .. } => OnlineStatus::Online,
        }
    }

    pub fn apply(&self, ctx: &Context) {
        ctx.set_presence(Some(self.activity()), self.online_status());
        info!("Bot status changed to: {:?}", self);
    }
}
