//! Slash commands. Every command is listed in [`register_all`] and
//! dispatched by name from the event handler.

pub mod add_role;
pub mod ping;
pub mod remove_role;
pub mod send_role_button;
pub mod set_roles_channel;

use serenity::builder::{
    CreateCommand, CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse,
};
use serenity::model::prelude::*;
use serenity::prelude::*;

use crate::discord::embeds;

pub fn register_all() -> Vec<CreateCommand> {
    vec![
        ping::register(),
        set_roles_channel::register(),
        send_role_button::register(),
        add_role::register(),
        remove_role::register(),
    ]
}

/// Restricts a command to server staff.
pub(crate) fn staff_only(command: CreateCommand) -> CreateCommand {
    command.default_member_permissions(Permissions::MANAGE_WEBHOOKS)
}

/// Private "Please wait" reply, later replaced through [`finish`].
pub(crate) async fn acknowledge(ctx: &Context, command: &CommandInteraction, description: &str) -> Result<(), serenity::Error> {
    command.create_response(&ctx.http, CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embeds::please_wait(description))
            .ephemeral(true)
    )).await
}

pub(crate) async fn finish(ctx: &Context, command: &CommandInteraction, embed: CreateEmbed) -> Result<(), serenity::Error> {
    command.edit_response(&ctx.http, EditInteractionResponse::new().embed(embed)).await?;
    Ok(())
}

pub(crate) async fn reply_guild_only(ctx: &Context, command: &CommandInteraction) -> Result<(), serenity::Error> {
    command.create_response(&ctx.http, CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content("This command can only be used in a server.")
            .ephemeral(true)
    )).await
}

pub(crate) fn role_option(command: &CommandInteraction) -> Option<&Role> {
    command.data.options().into_iter().find_map(|option| match option.value {
        ResolvedValue::Role(role) => Some(role),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_every_command_once() {
        let names: Vec<String> = register_all()
            .iter()
            .map(|command| serde_json::to_value(command).unwrap()["name"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(
            names,
            ["ping", "setroleschannel", "sendrolebutton", "addroletolist", "removerolefromlist"]
        );
    }

    #[test]
    fn commands_are_staff_only() {
        for command in register_all() {
            let json = serde_json::to_value(&command).unwrap();
            assert_eq!(
                json["default_member_permissions"],
                Permissions::MANAGE_WEBHOOKS.bits().to_string()
            );
        }
    }
}
