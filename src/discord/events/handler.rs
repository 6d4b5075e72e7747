use serenity::async_trait;
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::model::prelude::*;
use serenity::prelude::*;
use crate::bot_status::BotStatus;
use crate::config::Config;
use crate::storage::GuildConfigs;
use std::sync::Arc;
use log::{debug, error, info};
use crate::discord::commands::{self, add_role, ping, remove_role, send_role_button, set_roles_channel};
use crate::discord::components;

pub struct EventHandler {
    config: Arc<Config>,
    guilds: Arc<GuildConfigs>,
}

impl EventHandler {
    pub fn new(config: Arc<Config>, guilds: Arc<GuildConfigs>) -> Self {
        Self { config, guilds }
    }

    async fn run_command(&self, ctx: &Context, command: &CommandInteraction) -> Result<(), serenity::Error> {
        let guilds = self.guilds.as_ref();
        match command.data.name.as_str() {
            "ping" => ping::run(ctx, command).await,
            "setroleschannel" => set_roles_channel::run(ctx, command, guilds).await,
            "sendrolebutton" => send_role_button::run(ctx, command, guilds).await,
            "addroletolist" => add_role::run(ctx, command, guilds).await,
            "removerolefromlist" => remove_role::run(ctx, command, guilds).await,
            _ => {
                command.create_response(&ctx.http, CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content("Command not implemented")
                        .ephemeral(true)
                )).await
            }
        }
    }
}

#[async_trait]
impl serenity::client::EventHandler for EventHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        BotStatus::Starting.apply(&ctx);

        let guild_ids: Vec<_> = ready.guilds.iter().map(|guild| guild.id).collect();
        self.guilds.preload(guild_ids).await;

        match Command::set_global_commands(&ctx.http, commands::register_all()).await {
            Ok(registered) => debug!("Registered {} slash commands", registered.len()),
            Err(why) => error!("Could not register slash commands: {}", why),
        }

        BotStatus::Ready { version: self.config.version.clone() }.apply(&ctx);
        info!("Bot has initialised.");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => {
                debug!("Received command /{} from {}", command.data.name, command.user.id);
                if let Err(why) = self.run_command(&ctx, &command).await {
                    error!("Cannot respond to slash command /{}: {}", command.data.name, why);
                }
            }
            Interaction::Component(component) => {
                if let Err(why) = components::handle(&ctx, &component, &self.guilds).await {
                    error!("Cannot handle component {}: {}", component.data.custom_id, why);
                }
            }
            _ => {}
        }
    }
}
