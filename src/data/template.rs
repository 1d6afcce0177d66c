//! Template store.
//!
//! A template is kept as one record: the serialized template in `payload`, plus
//! denormalized counts so listings never parse payloads. Records are keyed by name and
//! saving an existing name replaces the whole record.

use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::model::template::{Template, TemplateSummary};

pub struct TemplateRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TemplateRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Saves a template under `name`, replacing any record with the same name.
    ///
    /// # Arguments
    /// - `name` - Store key
    /// - `template` - Template to persist
    ///
    /// # Returns
    /// - `Ok(Model)` - Stored record
    /// - `Err(DbErr::Custom)` - Template could not be serialized
    /// - `Err(DbErr)` - Database error during upsert
    pub async fn save(
        &self,
        name: &str,
        template: &Template,
    ) -> Result<entity::template::Model, DbErr> {
        let payload = serde_json::to_string(template)
            .map_err(|e| DbErr::Custom(format!("Failed to serialize template {}: {}", name, e)))?;

        entity::prelude::Template::insert(entity::template::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            source_guild_id: ActiveValue::Set(template.source_guild_id.to_string()),
            source_name: ActiveValue::Set(template.source_name.clone()),
            role_count: ActiveValue::Set(template.roles.len() as i32),
            category_count: ActiveValue::Set(template.categories.len() as i32),
            channel_count: ActiveValue::Set(template.channel_count() as i32),
            emoji_count: ActiveValue::Set(template.emojis.len() as i32),
            sticker_count: ActiveValue::Set(template.stickers.len() as i32),
            payload: ActiveValue::Set(payload),
            created_at: ActiveValue::Set(template.created_at),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(entity::template::Column::Name)
                .update_columns([
                    entity::template::Column::SourceGuildId,
                    entity::template::Column::SourceName,
                    entity::template::Column::RoleCount,
                    entity::template::Column::CategoryCount,
                    entity::template::Column::ChannelCount,
                    entity::template::Column::EmojiCount,
                    entity::template::Column::StickerCount,
                    entity::template::Column::Payload,
                    entity::template::Column::CreatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await
    }

    /// Loads the template stored under `name`.
    ///
    /// # Returns
    /// - `Ok(Some(Template))` - Template found and parsed
    /// - `Ok(None)` - No template with this name
    /// - `Err(DbErr::Custom)` - Stored payload could not be parsed
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Template>, DbErr> {
        let Some(record) = entity::prelude::Template::find()
            .filter(entity::template::Column::Name.eq(name))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        serde_json::from_str(&record.payload)
            .map(Some)
            .map_err(|e| DbErr::Custom(format!("Failed to parse template {}: {}", name, e)))
    }

    /// Summaries of every stored template, newest first.
    pub async fn get_all_summaries(&self) -> Result<Vec<TemplateSummary>, DbErr> {
        let records = entity::prelude::Template::find()
            .order_by_desc(entity::template::Column::CreatedAt)
            .order_by_asc(entity::template::Column::Name)
            .all(self.db)
            .await?;

        Ok(records.into_iter().map(summary_from_record).collect())
    }
}

fn summary_from_record(record: entity::template::Model) -> TemplateSummary {
    TemplateSummary {
        name: record.name,
        source_name: record.source_name,
        created_at: record.created_at,
        roles: record.role_count.max(0) as usize,
        categories: record.category_count.max(0) as usize,
        channels: record.channel_count.max(0) as usize,
        emojis: record.emoji_count.max(0) as usize,
        stickers: record.sticker_count.max(0) as usize,
    }
}
