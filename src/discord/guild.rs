//! Guild lookups that prefer the gateway cache and fall back to HTTP.

use std::collections::HashMap;
use serenity::model::prelude::*;
use serenity::prelude::*;

/// Role names keyed by id for every role currently in the guild.
pub async fn live_roles(ctx: &Context, guild_id: GuildId) -> Result<HashMap<RoleId, String>, serenity::Error> {
    let cached = ctx.cache.guild(guild_id).map(|guild| {
        guild
            .roles
            .iter()
            .map(|(id, role)| (*id, role.name.clone()))
            .collect::<HashMap<_, _>>()
    });
    if let Some(roles) = cached {
        return Ok(roles);
    }

    let roles = guild_id.roles(&ctx.http).await?;
    Ok(roles.into_iter().map(|(id, role)| (id, role.name)).collect())
}

pub async fn channel_exists(ctx: &Context, guild_id: GuildId, channel_id: ChannelId) -> Result<bool, serenity::Error> {
    let cached = ctx
        .cache
        .guild(guild_id)
        .map(|guild| guild.channels.contains_key(&channel_id));
    if let Some(exists) = cached {
        return Ok(exists);
    }

    Ok(guild_id.channels(&ctx.http).await?.contains_key(&channel_id))
}

pub fn guild_name(ctx: &Context, guild_id: GuildId) -> String {
    guild_id.name(&ctx.cache).unwrap_or_else(|| guild_id.to_string())
}

/// Where the bot sits in a guild's role hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotStanding {
    pub top_position: u16,
    pub can_manage_roles: bool,
}

pub async fn bot_standing(ctx: &Context, guild_id: GuildId) -> Result<Option<BotStanding>, serenity::Error> {
    let bot_id = ctx.cache.current_user().id;
    let member = guild_id.member(ctx, bot_id).await?;

    Ok(ctx.cache.guild(guild_id).map(|guild| {
        let everyone = RoleId::new(guild_id.get());
        let held: Vec<&Role> = std::iter::once(&everyone)
            .chain(member.roles.iter())
            .filter_map(|id| guild.roles.get(id))
            .collect();

        let permissions = held
            .iter()
            .fold(Permissions::empty(), |acc, role| acc | role.permissions);

        BotStanding {
            top_position: held.iter().map(|role| role.position).max().unwrap_or(0),
            can_manage_roles: guild.owner_id == bot_id
                || permissions.administrator()
                || permissions.manage_roles(),
        }
    }))
}
