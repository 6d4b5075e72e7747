use log::{error, info};
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::prelude::*;
use serenity::prelude::*;

use super::{acknowledge, finish, reply_guild_only, staff_only};
use crate::discord::{embeds, guild};
use crate::storage::{GuildConfigs, Mutation};

pub fn register() -> CreateCommand {
    staff_only(
        CreateCommand::new("setroleschannel")
            .description("Specify a roles selection channel.")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Channel, "channel", "The channel to send the role selection list to.")
                    .required(true)
            )
    )
}

fn channel_option(command: &CommandInteraction) -> Option<(ChannelId, String)> {
    command.data.options().into_iter().find_map(|option| match option.value {
        ResolvedValue::Channel(channel) => Some((channel.id, channel.name.clone().unwrap_or_default())),
        _ => None,
    })
}

pub async fn run(ctx: &Context, command: &CommandInteraction, configs: &GuildConfigs) -> Result<(), serenity::Error> {
    let (Some(guild_id), Some((channel_id, channel_name))) = (command.guild_id, channel_option(command)) else {
        return reply_guild_only(ctx, command).await;
    };
    acknowledge(ctx, command, "Saving your changes...").await?;

    let guild_name = guild::guild_name(ctx, guild_id);
    let result = configs
        .update(guild_id, |config| {
            config.set_roles_channel(channel_id);
            Mutation::Persist(())
        })
        .await;

    let embed = match result {
        Ok(()) => {
            info!("Roles channel in guild \"{}\" (ID: {}) successfully set to #{}", guild_name, guild_id, channel_name);
            embeds::success(format!("Roles channel set to <#{}> successfully.", channel_id))
        }
        Err(e) => {
            error!("Could not set roles channel in guild \"{}\" (ID: {}) to #{}: {}", guild_name, guild_id, channel_name, e);
            embeds::error("The roles channel could not be set due to an internal error.")
        }
    };

    finish(ctx, command, embed).await
}
