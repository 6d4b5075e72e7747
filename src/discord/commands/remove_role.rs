use log::{error, info};
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::prelude::*;
use serenity::prelude::*;

use super::{acknowledge, finish, reply_guild_only, role_option, staff_only};
use crate::discord::{embeds, guild};
use crate::storage::{GuildConfigs, Mutation, StorageError};

pub fn register() -> CreateCommand {
    staff_only(
        CreateCommand::new("removerolefromlist")
            .description("Removes a role from the role channel selection list.")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Role, "role", "The role to remove from the role channel selection list.")
                    .required(true)
            )
    )
}

/// `Ok(false)` when the role was not on the list.
pub(crate) async fn remove_from_list(configs: &GuildConfigs, guild_id: GuildId, role_id: RoleId) -> Result<bool, StorageError> {
    configs
        .update(guild_id, |config| {
            if config.remove_role(role_id) {
                Mutation::Persist(true)
            } else {
                Mutation::Keep(false)
            }
        })
        .await
}

pub async fn run(ctx: &Context, command: &CommandInteraction, configs: &GuildConfigs) -> Result<(), serenity::Error> {
    let (Some(guild_id), Some(role)) = (command.guild_id, role_option(command)) else {
        return reply_guild_only(ctx, command).await;
    };
    acknowledge(ctx, command, "Saving your changes...").await?;

    let guild_name = guild::guild_name(ctx, guild_id);
    let embed = match remove_from_list(configs, guild_id, role.id).await {
        Ok(true) => {
            info!("Removed role \"{}\" (ID: {}) from the selection list in guild \"{}\" (ID {}) successfully.", role.name, role.id, guild_name, guild_id);
            embeds::success(format!("Removed the <@&{}> role from the selection list successfully.", role.id))
        }
        Ok(false) => embeds::error("The role you have specified isn't in the role selection list."),
        Err(e) => {
            error!("Failed to remove role \"{}\" (ID: {}) from the selection list in guild \"{}\" (ID {}): {}", role.name, role.id, guild_name, guild_id, e);
            embeds::error(format!("Could not remove the <@&{}> role from the selection list due to an internal error.", role.id))
        }
    };

    finish(ctx, command, embed).await
}
