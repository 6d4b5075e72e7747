use log::{error, info};
use serenity::builder::{CreateCommand, CreateEmbed, CreateMessage};
use serenity::model::prelude::*;
use serenity::prelude::*;

use super::{acknowledge, finish, reply_guild_only, staff_only};
use crate::discord::{components, embeds, guild};
use crate::storage::GuildConfigs;

const NO_CHANNEL: &str = "You have not set a roles selection channel, or the one you have set it to no longer exists. Please use `/setroleschannel` to set one.";

pub fn register() -> CreateCommand {
    staff_only(CreateCommand::new("sendrolebutton").description("Resend role selection button in your saved roles channel."))
}

async fn configured_channel(configs: &GuildConfigs, guild_id: GuildId) -> Option<ChannelId> {
    configs.snapshot(guild_id).await.roles_channel()
}

/// Posts the "Get roles..." button, returning the channel it went to or
/// `None` when no usable roles channel is configured.
async fn send_button(ctx: &Context, guild_id: GuildId, configs: &GuildConfigs) -> Result<Option<ChannelId>, serenity::Error> {
    let Some(channel_id) = configured_channel(configs, guild_id).await else {
        return Ok(None);
    };
    if !guild::channel_exists(ctx, guild_id, channel_id).await? {
        return Ok(None);
    }

    channel_id
        .send_message(&ctx.http, CreateMessage::new().components(vec![components::role_button_row(guild_id)]))
        .await?;
    Ok(Some(channel_id))
}

fn outcome_embed(outcome: &Result<Option<ChannelId>, serenity::Error>) -> CreateEmbed {
    match outcome {
        Ok(Some(channel_id)) => embeds::success(format!("Role selection button resent in <#{}> successfully.", channel_id)),
        Ok(None) => embeds::error(NO_CHANNEL),
        Err(_) => embeds::error("The role button could not be sent due to an internal error."),
    }
}

pub async fn run(ctx: &Context, command: &CommandInteraction, configs: &GuildConfigs) -> Result<(), serenity::Error> {
    let Some(guild_id) = command.guild_id else {
        return reply_guild_only(ctx, command).await;
    };
    acknowledge(ctx, command, "Sending role button...").await?;

    let outcome = send_button(ctx, guild_id, configs).await;
    match &outcome {
        Ok(Some(channel_id)) => info!("Role selection button sent to channel {} in guild \"{}\" (ID: {})", channel_id, guild::guild_name(ctx, guild_id), guild_id),
        Ok(None) => {}
        Err(e) => error!("Could not send role button in guild {}: {}", guild_id, e),
    }

    finish(ctx, command, outcome_embed(&outcome)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::storage::{Mutation, RecordingStore};

    fn description(embed: &CreateEmbed) -> String {
        serde_json::to_value(embed).unwrap()["description"].as_str().unwrap().to_string()
    }

    #[test]
    fn unset_channel_reports_setup_hint() {
        let embed = outcome_embed(&Ok(None));
        assert!(description(&embed).starts_with("You have not set a roles selection channel"));
    }

    #[test]
    fn sent_button_mentions_channel() {
        let embed = outcome_embed(&Ok(Some(ChannelId::new(77))));
        assert_eq!(description(&embed), "Role selection button resent in <#77> successfully.");
    }

    #[test]
    fn failures_are_generic() {
        let embed = outcome_embed(&Err(serenity::Error::Other("boom")));
        assert_eq!(description(&embed), "The role button could not be sent due to an internal error.");
    }

    #[tokio::test]
    async fn channel_lookup_needs_a_configured_channel() {
        let configs = GuildConfigs::new(Arc::new(RecordingStore::default()));
        let guild = GuildId::new(3);
        assert_eq!(configured_channel(&configs, guild).await, None);

        configs
            .update(guild, |config| {
                config.set_roles_channel(ChannelId::new(77));
                Mutation::Persist(())
            })
            .await
            .unwrap();
        assert_eq!(configured_channel(&configs, guild).await, Some(ChannelId::new(77)));
    }
}
