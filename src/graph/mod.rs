//! Collaborator interfaces onto a guild's resource graph.
//!
//! The snapshot engine reads a source guild through `GraphReader` and the apply engine
//! writes to a target guild through `GraphWriter`. Authentication, pagination and the
//! platform's own rate limiter live behind these traits; the engines only see IDs,
//! names and permission bitsets.
//!
//! `discord` holds the Serenity-backed implementations used by the bot.

pub mod discord;
pub mod pacing;

#[cfg(test)]
pub mod mock;

use serenity::async_trait;

use crate::{
    error::graph::{ReadError, WriteError},
    model::template::{
        ChannelKind, GuildSettings, TemplateCategory, TemplateChannel, TemplateEmoji,
        TemplateRole, TemplateSticker,
    },
};

/// Guild-level metadata of the source guild.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphGuild {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub settings: GuildSettings,
}

/// Role as it exists on the source guild.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRole {
    pub id: u64,
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub mentionable: bool,
    pub permissions: u64,
    pub position: u16,
    /// Role is owned by an integration (bot, booster, etc.).
    pub managed: bool,
    /// Role is the guild's implicit `@everyone` role.
    pub everyone: bool,
    pub display_icon: Option<String>,
}

/// Category as it exists on the source guild.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphCategory {
    pub id: u64,
    pub name: String,
    pub position: u16,
    pub nsfw: bool,
}

/// Non-category channel as it exists on the source guild.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphChannel {
    pub id: u64,
    pub name: String,
    pub position: u16,
    pub nsfw: bool,
    /// Type-specific attributes, or why they could not be read.
    pub kind: Result<ChannelKind, ReadError>,
}

/// Target of a source-side permission overwrite, by ID.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphOverwriteTarget {
    Role(u64),
    Member(u64),
    /// A target kind the snapshot does not capture.
    Other(String),
}

/// Permission overwrite as it exists on the source guild.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphOverwrite {
    pub target: GraphOverwriteTarget,
    pub allow: u64,
    pub deny: u64,
}

/// Read-only view of a source guild.
#[async_trait]
pub trait GraphReader: Send + Sync {
    async fn guild_info(&self) -> Result<GraphGuild, ReadError>;

    /// All roles, including `@everyone` and managed roles.
    async fn list_roles(&self) -> Result<Vec<GraphRole>, ReadError>;

    async fn list_categories(&self) -> Result<Vec<GraphCategory>, ReadError>;

    /// Channels without a parent category.
    async fn list_top_level_channels(&self) -> Result<Vec<GraphChannel>, ReadError>;

    async fn list_channels_of(&self, category_id: u64) -> Result<Vec<GraphChannel>, ReadError>;

    /// Permission overwrites of a category or channel.
    async fn list_overwrites(&self, resource_id: u64) -> Result<Vec<GraphOverwrite>, ReadError>;

    /// Resolves a member's display name for member-type overwrites.
    async fn member_name(&self, user_id: u64) -> Result<String, ReadError>;

    async fn list_emojis(&self) -> Result<Vec<TemplateEmoji>, ReadError>;

    async fn list_stickers(&self) -> Result<Vec<TemplateSticker>, ReadError>;
}

/// Mutating view of a target guild.
///
/// Every create call returns the new entity's ID so later phases can reference it.
#[async_trait]
pub trait GraphWriter: Send + Sync {
    async fn create_role(&self, role: &TemplateRole) -> Result<u64, WriteError>;

    /// Creates the category itself. Its channels and overwrites are applied separately.
    async fn create_category(&self, category: &TemplateCategory) -> Result<u64, WriteError>;

    /// Creates a channel, parented to `parent` when given. Overwrites are applied separately.
    async fn create_channel(
        &self,
        channel: &TemplateChannel,
        parent: Option<u64>,
    ) -> Result<u64, WriteError>;

    /// Sets a role permission overwrite on a category or channel.
    ///
    /// `role_id` may be the guild's `@everyone` role.
    async fn set_overwrite(
        &self,
        resource_id: u64,
        role_id: u64,
        allow: u64,
        deny: u64,
    ) -> Result<(), WriteError>;

    /// ID of the target guild's `@everyone` role.
    fn everyone_role_id(&self) -> u64;

    /// Highest voice bitrate the target guild accepts.
    fn max_bitrate(&self) -> u32;
}
