use std::sync::Arc;
use async_trait::async_trait;
use log::info;
use serenity::http::Http;
use serenity::model::prelude::*;

use crate::selection::{ManagedRole, RoleChange, SelectionSummary};

const AUDIT_REASON: &str = "Self-assigned from the role selection menu";

/// Role mutations on a single member.
#[async_trait]
pub trait MemberRoles: Send + Sync {
    async fn grant(&self, role: &ManagedRole) -> Result<(), serenity::Error>;

    async fn revoke(&self, role: &ManagedRole) -> Result<(), serenity::Error>;
}

pub struct GuildMemberRoles {
    http: Arc<Http>,
    guild_id: GuildId,
    guild_name: String,
    user: User,
}

impl GuildMemberRoles {
    pub fn new(http: Arc<Http>, guild_id: GuildId, guild_name: String, user: User) -> Self {
        Self { http, guild_id, guild_name, user }
    }
}

#[async_trait]
impl MemberRoles for GuildMemberRoles {
    async fn grant(&self, role: &ManagedRole) -> Result<(), serenity::Error> {
        self.http
            .add_member_role(self.guild_id, self.user.id, role.id, Some(AUDIT_REASON))
            .await?;
        info!(
            "Gave user \"{}\" (User ID: {}) the \"{}\" role (Role ID: {}) in guild \"{}\" (Guild ID: {})",
            self.user.display_name(), self.user.id, role.name, role.id, self.guild_name, self.guild_id
        );
        Ok(())
    }

    async fn revoke(&self, role: &ManagedRole) -> Result<(), serenity::Error> {
        self.http
            .remove_member_role(self.guild_id, self.user.id, role.id, Some(AUDIT_REASON))
            .await?;
        info!(
            "Removed user \"{}\" (User ID: {}) from the \"{}\" role (Role ID: {}) in guild \"{}\" (Guild ID: {})",
            self.user.display_name(), self.user.id, role.name, role.id, self.guild_name, self.guild_id
        );
        Ok(())
    }
}

/// Applies `plan` in order and stops at the first failed call.
///
/// On failure the summary of what did go through is returned with the error.
pub async fn apply_plan<M>(member: &M, plan: &[RoleChange]) -> Result<SelectionSummary, (SelectionSummary, serenity::Error)>
where
    M: MemberRoles + ?Sized,
{
    let mut summary = SelectionSummary::default();
    for change in plan {
        let result = match change {
            RoleChange::Grant(role) => member.grant(role).await,
            RoleChange::Revoke(role) => member.revoke(role).await,
        };
        if let Err(e) = result {
            return Err((summary, e));
        }
        summary.record(change);
    }
    Ok(summary)
}
