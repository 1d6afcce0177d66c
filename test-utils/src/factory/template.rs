//! Template factory for creating test template records.
//!
//! The payload is a minimal but complete template document with empty structure lists,
//! so records created here load cleanly through the store.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test template records with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::template::TemplateFactory;
///
/// let record = TemplateFactory::new(&db)
///     .name("snapshot_42")
///     .role_count(3)
///     .build()
///     .await?;
/// ```
pub struct TemplateFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    source_guild_id: u64,
    source_name: String,
    role_count: i32,
    category_count: i32,
    channel_count: i32,
    created_at: DateTime<Utc>,
}

impl<'a> TemplateFactory<'a> {
    /// Creates a new TemplateFactory with default values.
    ///
    /// Defaults:
    /// - name: `"template_{id}"` where id is auto-incremented
    /// - source_guild_id: `{id}`
    /// - source_name: `"Guild {id}"`
    /// - all counts: `0`
    /// - created_at: now
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            name: format!("template_{}", id),
            source_guild_id: id,
            source_name: format!("Guild {}", id),
            role_count: 0,
            category_count: 0,
            channel_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Sets the template name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the source guild display name.
    pub fn source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }

    /// Sets the stored role count.
    pub fn role_count(mut self, count: i32) -> Self {
        self.role_count = count;
        self
    }

    /// Sets the stored category count.
    pub fn category_count(mut self, count: i32) -> Self {
        self.category_count = count;
        self
    }

    /// Sets the stored channel count.
    pub fn channel_count(mut self, count: i32) -> Self {
        self.channel_count = count;
        self
    }

    /// Sets the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the template record into the database.
    ///
    /// # Returns
    /// - `Ok(entity::template::Model)` - Created template record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::template::Model, DbErr> {
        let payload = serde_json::json!({
            "source_name": self.source_name,
            "source_guild_id": self.source_guild_id,
            "created_at": self.created_at.to_rfc3339(),
            "roles": [],
            "categories": [],
            "channels": [],
            "emojis": [],
            "stickers": [],
        });

        entity::template::ActiveModel {
            name: ActiveValue::Set(self.name),
            source_guild_id: ActiveValue::Set(self.source_guild_id.to_string()),
            source_name: ActiveValue::Set(self.source_name),
            role_count: ActiveValue::Set(self.role_count),
            category_count: ActiveValue::Set(self.category_count),
            channel_count: ActiveValue::Set(self.channel_count),
            emoji_count: ActiveValue::Set(0),
            sticker_count: ActiveValue::Set(0),
            payload: ActiveValue::Set(payload.to_string()),
            created_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a template record with default values.
///
/// Shorthand for `TemplateFactory::new(db).build().await`.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(entity::template::Model)` - Created template record
/// - `Err(DbErr)` - Database error during insert
pub async fn create_template(db: &DatabaseConnection) -> Result<entity::template::Model, DbErr> {
    TemplateFactory::new(db).build().await
}
