use log::{error, info, warn};
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::prelude::*;
use serenity::prelude::*;

use super::{acknowledge, finish, reply_guild_only, role_option, staff_only};
use crate::discord::guild::{self, BotStanding};
use crate::discord::embeds;
use crate::storage::{GuildConfigs, Mutation, StorageError};

pub fn register() -> CreateCommand {
    staff_only(
        CreateCommand::new("addroletolist")
            .description("Adds a role to the role channel selection list.")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Role, "role", "The role to add to the role channel selection list.")
                    .required(true)
            )
    )
}

/// The parts of a role that decide whether the bot can hand it out.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoleFacts {
    pub id: RoleId,
    /// Owned by an integration or bot, Discord won't let anyone assign it.
    pub managed: bool,
    pub position: u16,
}

impl From<&Role> for RoleFacts {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            managed: role.managed,
            position: role.position,
        }
    }
}

/// Rejects the everyone role, integration roles and anything at or above
/// the bot's highest role.
pub(crate) fn is_assignable(role: &RoleFacts, guild_id: GuildId, standing: Option<BotStanding>) -> bool {
    let Some(standing) = standing else {
        return false;
    };
    role.id.get() != guild_id.get()
        && !role.managed
        && standing.can_manage_roles
        && role.position < standing.top_position
}

/// Adds the role to the managed list. `Ok(false)` means it was rejected and
/// nothing was changed or written.
pub(crate) async fn add_to_list(
    configs: &GuildConfigs,
    guild_id: GuildId,
    role: &RoleFacts,
    standing: Option<BotStanding>,
) -> Result<bool, StorageError> {
    if !is_assignable(role, guild_id, standing) {
        return Ok(false);
    }

    configs
        .update(guild_id, |config| {
            if config.add_role(role.id) {
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

    let standing = match guild::bot_standing(ctx, guild_id).await {
        Ok(standing) => standing,
        Err(e) => {
            warn!("Could not look up the bot's roles in guild {}: {}", guild_id, e);
            None
        }
    };

    let guild_name = guild::guild_name(ctx, guild_id);
    let embed = match add_to_list(configs, guild_id, &RoleFacts::from(role), standing).await {
        Ok(true) => {
            info!("Added role \"{}\" (ID: {}) to the selection list in guild \"{}\" (ID {}) successfully.", role.name, role.id, guild_name, guild_id);
            embeds::success(format!("Added the <@&{}> role to the selection list successfully.", role.id))
        }
        Ok(false) => embeds::error("The role you have specified can't be assigned by this bot or is already in the list."),
        Err(e) => {
            error!("Failed to add role \"{}\" (ID: {}) to the selection list in guild \"{}\" (ID {}): {}", role.name, role.id, guild_name, guild_id, e);
            embeds::error(format!("Could not add the <@&{}> role to the selection list due to an internal error.", role.id))
        }
    };

    finish(ctx, command, embed).await
}
