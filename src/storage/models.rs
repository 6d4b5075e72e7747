use serde::{Deserialize, Serialize};
use serenity::model::id::{ChannelId, RoleId};

/// Stored in place of a channel id while no roles channel has been set.
pub const UNSET_CHANNEL: &str = "0";

/// Everything the bot persists for one guild.
///
/// Snowflakes are kept as strings so both backends store the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildConfig {
    #[serde(default)]
    pub channels_settings: ChannelsSettings,
    #[serde(default)]
    pub role_selection: RoleSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsSettings {
    #[serde(default = "unset_channel")]
    pub roles_channel_id: String,
}

impl Default for ChannelsSettings {
    fn default() -> Self {
        Self {
            roles_channel_id: unset_channel(),
        }
    }
}

fn unset_channel() -> String {
    UNSET_CHANNEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSelection {
    /// Managed role ids in display order.
    #[serde(default)]
    pub public_list: Vec<String>,
}

impl GuildConfig {
    /// The configured roles channel, `None` while unset.
    pub fn roles_channel(&self) -> Option<ChannelId> {
        self.channels_settings
            .roles_channel_id
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(ChannelId::new)
    }

    pub fn set_roles_channel(&mut self, channel_id: ChannelId) {
        self.channels_settings.roles_channel_id = channel_id.to_string();
    }

    pub fn managed_roles(&self) -> &[String] {
        &self.role_selection.public_list
    }

    pub fn contains_role(&self, role_id: RoleId) -> bool {
        let id = role_id.to_string();
        self.role_selection.public_list.iter().any(|r| *r == id)
    }

    /// Appends `role_id`, returns false when it is already listed.
    pub fn add_role(&mut self, role_id: RoleId) -> bool {
        if self.contains_role(role_id) {
            return false;
        }
        self.role_selection.public_list.push(role_id.to_string());
        true
    }

    /// Removes `role_id`, returns false when it was not listed.
    pub fn remove_role(&mut self, role_id: RoleId) -> bool {
        let id = role_id.to_string();
        let before = self.role_selection.public_list.len();
        self.role_selection.public_list.retain(|r| *r != id);
        before != self.role_selection.public_list.len()
    }

    /// Keeps only the ids accepted by `keep`, preserving order. Returns the
    /// ids that were dropped.
    pub fn prune_roles<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let mut dropped = Vec::new();
        self.role_selection.public_list.retain(|id| {
            if keep(id) {
                true
            } else {
                dropped.push(id.clone());
                false
            }
        });
        dropped
    }
}

/// Parses a stored role id, rejecting anything that is not a valid snowflake.
pub fn parse_role_id(raw: &str) -> Option<RoleId> {
    raw.parse::<u64>().ok().filter(|id| *id != 0).map(RoleId::new)
}
