use async_trait::async_trait;
use log::{debug, warn};
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};
use serenity::model::id::GuildId;

use super::{GuildConfig, GuildStore, StorageError};

const CHANNELS: &str = "Channels";
const ROLES_CHANNEL: &str = "RolesChannel";
const CHANNEL_ID: &str = "ChannelID";

const ROLES: &str = "Roles";
const ROLE_SELECTION_LIST: &str = "RoleSelectionList";
const PUBLIC_LIST: &str = "PublicList";

/// MongoDB backend.
///
/// Every guild gets its own database named after the guild id. The bot uses
/// two documents in it, keyed by `_id`:
///
/// | collection | `_id`               | field        |
/// |------------|---------------------|--------------|
/// | `Channels` | `RolesChannel`      | `ChannelID`  |
/// | `Roles`    | `RoleSelectionList` | `PublicList` |
///
/// Saves `$set` only those fields with upsert, other fields on the documents
/// are left alone.
pub struct DocumentStore {
    client: Client,
}

impl DocumentStore {
    /// Parses the connection string. The driver connects lazily, so an
    /// unreachable server shows up on the first load or save.
    pub async fn connect(uri: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self { client })
    }

    fn collection(&self, guild_id: GuildId, name: &str) -> Collection<Document> {
        self.client.database(&guild_id.to_string()).collection(name)
    }

    async fn fields(&self, guild_id: GuildId, collection: &str, id: &str) -> Result<Option<Document>, StorageError> {
        let document = self
            .collection(guild_id, collection)
            .find_one(doc! { "_id": id })
            .await?;
        Ok(document.map(strip_id))
    }

    async fn set_field(&self, guild_id: GuildId, collection: &str, id: &str, update: Document) -> Result<(), StorageError> {
        self.collection(guild_id, collection)
            .update_one(doc! { "_id": id }, update)
            .upsert(true)
            .await?;
        Ok(())
    }
}

fn strip_id(mut document: Document) -> Document {
    document.remove("_id");
    document
}

/// Snowflakes are stored as strings, older documents may hold plain integers.
fn snowflake(value: &Bson) -> Option<String> {
    match value {
        Bson::String(id) => Some(id.clone()),
        Bson::Int64(id) => Some(id.to_string()),
        Bson::Int32(id) => Some(id.to_string()),
        _ => None,
    }
}

fn read_channels(config: &mut GuildConfig, fields: &Document, guild_id: GuildId) {
    let Some(value) = fields.get(CHANNEL_ID) else {
        return;
    };
    match snowflake(value) {
        Some(id) => config.channels_settings.roles_channel_id = id,
        None => warn!("Ignoring malformed {} in guild {}: {}", CHANNEL_ID, guild_id, value),
    }
}

fn read_roles(config: &mut GuildConfig, fields: &Document, guild_id: GuildId) {
    let Some(value) = fields.get(PUBLIC_LIST) else {
        return;
    };
    let ids = match value {
        Bson::Array(items) => items.iter().map(snowflake).collect::<Option<Vec<_>>>(),
        _ => None,
    };
    match ids {
        Some(ids) => config.role_selection.public_list = ids,
        None => warn!("Ignoring malformed {} in guild {}: {}", PUBLIC_LIST, guild_id, value),
    }
}

fn set(field: &str, value: impl Into<Bson>) -> Document {
    let mut fields = Document::new();
    fields.insert(field, value);
    doc! { "$set": fields }
}

fn channels_update(config: &GuildConfig) -> Document {
    set(CHANNEL_ID, config.channels_settings.roles_channel_id.clone())
}

fn roles_update(config: &GuildConfig) -> Document {
    set(PUBLIC_LIST, config.role_selection.public_list.clone())
}

#[async_trait]
impl GuildStore for DocumentStore {
    async fn load(&self, guild_id: GuildId) -> Result<GuildConfig, StorageError> {
        let mut config = GuildConfig::default();

        if let Some(fields) = self.fields(guild_id, CHANNELS, ROLES_CHANNEL).await? {
            read_channels(&mut config, &fields, guild_id);
        }
        if let Some(fields) = self.fields(guild_id, ROLES, ROLE_SELECTION_LIST).await? {
            read_roles(&mut config, &fields, guild_id);
        }

        Ok(config)
    }

    async fn save(&self, guild_id: GuildId, config: &GuildConfig) -> Result<(), StorageError> {
        self.set_field(guild_id, CHANNELS, ROLES_CHANNEL, channels_update(config)).await?;
        self.set_field(guild_id, ROLES, ROLE_SELECTION_LIST, roles_update(config)).await?;
        debug!("Saved guild {} to MongoDB", guild_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GuildConfig {
        let mut config = GuildConfig::default();
        config.channels_settings.roles_channel_id = "555".to_string();
        config.role_selection.public_list = vec!["30".into(), "10".into(), "20".into()];
        config
    }

    fn loaded(channels: Option<Document>, roles: Option<Document>) -> GuildConfig {
        let guild = GuildId::new(1);
        let mut config = GuildConfig::default();
        if let Some(fields) = channels.map(strip_id) {
            read_channels(&mut config, &fields, guild);
        }
        if let Some(fields) = roles.map(strip_id) {
            read_roles(&mut config, &fields, guild);
        }
        config
    }

    #[test]
    fn updates_set_only_owned_fields() {
        assert_eq!(channels_update(&sample()), doc! { "$set": { "ChannelID": "555" } });
        assert_eq!(roles_update(&sample()), doc! { "$set": { "PublicList": ["30", "10", "20"] } });
    }

    #[test]
    fn documents_read_back_into_config() {
        let config = loaded(
            Some(doc! { "_id": "RolesChannel", "ChannelID": "555" }),
            Some(doc! { "_id": "RoleSelectionList", "PublicList": ["30", "10", "20"] }),
        );
        assert_eq!(config, sample());
    }

    #[test]
    fn id_and_foreign_fields_are_ignored() {
        let fields = strip_id(doc! { "_id": "RoleSelectionList", "Note": "kept", "PublicList": [] });
        assert!(!fields.contains_key("_id"));
        assert!(fields.contains_key("Note"));
    }

    #[test]
    fn missing_documents_load_default() {
        assert_eq!(loaded(None, None), GuildConfig::default());
        assert_eq!(loaded(Some(doc! { "_id": "RolesChannel" }), None), GuildConfig::default());
    }

    #[test]
    fn integer_snowflakes_are_accepted() {
        let config = loaded(
            Some(doc! { "ChannelID": 555_i64 }),
            Some(doc! { "PublicList": [30_i64, "10"] }),
        );
        assert_eq!(config.channels_settings.roles_channel_id, "555");
        assert_eq!(config.role_selection.public_list, ["30", "10"]);
    }

    #[test]
    fn malformed_fields_keep_defaults() {
        let config = loaded(
            Some(doc! { "ChannelID": true }),
            Some(doc! { "PublicList": "not a list" }),
        );
        assert_eq!(config, GuildConfig::default());

        let config = loaded(None, Some(doc! { "PublicList": ["10", { "nested": 1 }] }));
        assert!(config.managed_roles().is_empty());
    }

    #[tokio::test]
    async fn connection_string_is_parsed() {
        assert!(DocumentStore::connect("mongodb://localhost:27017").await.is_ok());
        assert!(matches!(
            DocumentStore::connect("SETME").await,
            Err(StorageError::Mongo(_))
        ));
    }
}
