//! The "Get roles..." button and the role selection menus it opens.

use std::collections::{HashMap, HashSet};
use log::{debug, error, warn};
use serenity::builder::{
    CreateActionRow, CreateButton, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption,
    EditInteractionResponse,
};
use serenity::model::prelude::*;
use serenity::prelude::*;

use crate::discord::guild;
use crate::discord::roles::{apply_plan, GuildMemberRoles};
use crate::selection::{
    self, paginate, parse_custom_id, plan_selection, resolve_roles, ManagedRole, SelectionPage,
    BUTTON_NUMBER, MAX_MENUS_PER_MESSAGE,
};
use crate::storage::{parse_role_id, GuildConfigs, Mutation};

const NO_ROLES: &str = "There are currently no roles available.";
const LIST_CHANGED: &str = "The list of available roles has changed. Please press \"Get roles...\" again for the updated list.";
const UPDATE_FAILED: &str = "Your roles could not be updated due to an internal error. Please try again later.";

pub fn role_button_row(guild_id: GuildId) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(selection::custom_id(guild_id, BUTTON_NUMBER))
            .label("Get roles...")
            .style(ButtonStyle::Primary),
    ])
}

fn menu_row(guild_id: GuildId, page: &SelectionPage) -> CreateActionRow {
    let options = page
        .options
        .iter()
        .map(|option| {
            CreateSelectMenuOption::new(option.role.name.clone(), option.role.id.to_string())
                .default_selection(option.selected)
        })
        .collect();

    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(
            selection::custom_id(guild_id, page.number),
            CreateSelectMenuKind::String { options },
        )
        .placeholder(page.placeholder())
        .min_values(0)
        .max_values(1),
    )
}

/// One entry per message, each holding as many menus as Discord allows.
fn menu_messages(guild_id: GuildId, pages: &[SelectionPage]) -> Vec<Vec<CreateActionRow>> {
    pages
        .chunks(MAX_MENUS_PER_MESSAGE)
        .map(|chunk| chunk.iter().map(|page| menu_row(guild_id, page)).collect())
        .collect()
}

fn held_roles(component: &ComponentInteraction) -> HashSet<RoleId> {
    component
        .member
        .as_ref()
        .map(|member| member.roles.iter().copied().collect())
        .unwrap_or_default()
}

/// Option values of the menu that was submitted, read back from the message.
fn submitted_options(component: &ComponentInteraction) -> Vec<String> {
    component
        .message
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|c| match c {
            ActionRowComponent::SelectMenu(menu)
                if menu.custom_id.as_deref() == Some(component.data.custom_id.as_str()) =>
            {
                Some(menu.options.iter().map(|option| option.value.clone()).collect())
            }
            _ => None,
        })
        .unwrap_or_default()
}

/// Resolves every submitted option or none of them.
fn resolve_options(values: &[String], live: &HashMap<RoleId, String>) -> Option<Vec<ManagedRole>> {
    if values.is_empty() {
        return None;
    }
    values
        .iter()
        .map(|value| {
            let id = parse_role_id(value)?;
            live.get(&id).map(|name| ManagedRole::new(id, name.clone()))
        })
        .collect()
}

pub async fn handle(ctx: &Context, component: &ComponentInteraction, configs: &GuildConfigs) -> Result<(), serenity::Error> {
    let Some((target_guild, _)) = parse_custom_id(&component.data.custom_id) else {
        return Ok(());
    };
    let Some(guild_id) = component.guild_id else {
        return Ok(());
    };
    if target_guild != guild_id {
        warn!("Ignoring role selection component {} used in guild {}", component.data.custom_id, guild_id);
        return Ok(());
    }

    match &component.data.kind {
        ComponentInteractionDataKind::Button => open_selector(ctx, component, guild_id, configs).await,
        ComponentInteractionDataKind::StringSelect { values } => {
            apply_selection(ctx, component, guild_id, configs, values).await
        }
        _ => {
            debug!("Ignoring interaction from invalid roleSelection component: {}", component.data.custom_id);
            Ok(())
        }
    }
}

/// Resolves the guild's list against the live roles, dropping ids whose role
/// was deleted. A failed write leaves the list as it was and still hands back
/// the roles that resolve.
async fn selectable_roles(configs: &GuildConfigs, guild_id: GuildId, live: &HashMap<RoleId, String>) -> Vec<ManagedRole> {
    let pruned = configs
        .update(guild_id, |config| {
            let resolved = resolve_roles(config.managed_roles(), |id| live.get(&id).cloned());
            if resolved.stale.is_empty() {
                Mutation::Keep(resolved)
            } else {
                config.prune_roles(|id| !resolved.stale.iter().any(|stale| stale == id));
                Mutation::Persist(resolved)
            }
        })
        .await;

    match pruned {
        Ok(resolved) => {
            if !resolved.stale.is_empty() {
                debug!("Pruned {} deleted roles from the selection list in guild {}", resolved.stale.len(), guild_id);
            }
            resolved.roles
        }
        Err(e) => {
            error!("Could not save the pruned selection list for guild {}: {}", guild_id, e);
            resolve_roles(configs.snapshot(guild_id).await.managed_roles(), |id| live.get(&id).cloned()).roles
        }
    }
}

async fn open_selector(ctx: &Context, component: &ComponentInteraction, guild_id: GuildId, configs: &GuildConfigs) -> Result<(), serenity::Error> {
    let live = guild::live_roles(ctx, guild_id).await?;
    let roles = selectable_roles(configs, guild_id, &live).await;

    if roles.is_empty() {
        return component.create_response(&ctx.http, CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(NO_ROLES)
                .ephemeral(true)
        )).await;
    }

    let pages = paginate(&roles, &held_roles(component));
    let mut messages = menu_messages(guild_id, &pages).into_iter();

    if let Some(first) = messages.next() {
        component.create_response(&ctx.http, CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .components(first)
                .ephemeral(true)
        )).await?;
    }
    for rows in messages {
        component.create_followup(&ctx.http, CreateInteractionResponseFollowup::new()
            .components(rows)
            .ephemeral(true)
        ).await?;
    }

    Ok(())
}

async fn apply_selection(
    ctx: &Context,
    component: &ComponentInteraction,
    guild_id: GuildId,
    configs: &GuildConfigs,
    values: &[String],
) -> Result<(), serenity::Error> {
    let live = guild::live_roles(ctx, guild_id).await?;

    let Some(options) = resolve_options(&submitted_options(component), &live) else {
        return component.create_response(&ctx.http, CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(LIST_CHANGED)
                .ephemeral(true)
        )).await;
    };

    let managed = resolve_roles(configs.snapshot(guild_id).await.managed_roles(), |id| live.get(&id).cloned()).roles;
    let plan = plan_selection(&options, &managed, &held_roles(component), values);

    component.create_response(&ctx.http, CreateInteractionResponse::Defer(
        CreateInteractionResponseMessage::new().ephemeral(true)
    )).await?;

    let member = GuildMemberRoles::new(
        ctx.http.clone(),
        guild_id,
        guild::guild_name(ctx, guild_id),
        component.user.clone(),
    );
    let content = match apply_plan(&member, &plan).await {
        Ok(summary) => summary.message(),
        Err((summary, e)) => {
            error!(
                "Role update for user {} in guild {} stopped after {} changes: {}",
                component.user.id, guild_id, summary.added.len() + summary.removed.len(), e
            );
            UPDATE_FAILED.to_string()
        }
    };

    component.edit_response(&ctx.http, EditInteractionResponse::new().content(content)).await?;
    Ok(())
}
