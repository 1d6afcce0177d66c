use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Template::Table)
                    .if_not_exists()
                    .col(pk_auto(Template::Id))
                    .col(string_uniq(Template::Name))
                    .col(string(Template::SourceGuildId))
                    .col(string(Template::SourceName))
                    .col(integer(Template::RoleCount))
                    .col(integer(Template::CategoryCount))
                    .col(integer(Template::ChannelCount))
                    .col(integer(Template::EmojiCount))
                    .col(integer(Template::StickerCount))
                    .col(text(Template::Payload))
                    .col(timestamp_with_time_zone(Template::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Template::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum Template {
    Table,
    Id,
    Name,
    SourceGuildId,
    SourceName,
    RoleCount,
    CategoryCount,
    ChannelCount,
    EmojiCount,
    StickerCount,
    Payload,
    CreatedAt,
}
