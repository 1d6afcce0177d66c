//! Serenity-backed guild graph collaborators.
//!
//! `DiscordGraphReader` snapshots a source guild and `DiscordGraphWriter` creates
//! entities on a target guild. Both are built with `load`, which fetches the guild up
//! front so a missing or inaccessible guild is reported before anything else happens.
//!
//! Channel creation posts a raw JSON body through `Http::create_channel` so every
//! type-specific attribute, including forum tags, is carried in a single call.

use dioxus_logger::tracing;
use serde::Serialize;
use serenity::{
    all::{
        ChannelId, ChannelType, EditRole, Emoji, GuildChannel, GuildId, PartialGuild,
        PermissionOverwrite, PermissionOverwriteType, Permissions, PremiumTier, Role, RoleId,
        Sticker, UserId,
    },
    async_trait,
    http::Http,
};
use std::sync::Arc;

use crate::{
    error::{
        graph::{ReadError, WriteError},
        AppError,
    },
    graph::{
        GraphCategory, GraphChannel, GraphGuild, GraphOverwrite, GraphOverwriteTarget,
        GraphReader, GraphRole, GraphWriter,
    },
    model::template::{
        ChannelKind, GuildSettings, TemplateCategory, TemplateChannel, TemplateEmoji,
        TemplateRole, TemplateSticker,
    },
};

/// Bitrate used when Discord omits it on a voice-capable channel.
const FALLBACK_BITRATE: u32 = 64_000;

const DISCORD_CDN_URL: &str = "https://cdn.discordapp.com";

/// Highest voice bitrate a guild accepts at the given boost tier.
pub fn max_bitrate_for(tier: PremiumTier) -> u32 {
    match tier {
        PremiumTier::Tier1 => 128_000,
        PremiumTier::Tier2 => 256_000,
        PremiumTier::Tier3 => 384_000,
        _ => 96_000,
    }
}

/// Fetches a guild, mapping any failure to `NotFound`.
///
/// Discord answers 403/404 alike for guilds the bot is not a member of, so both are
/// reported as the guild not being available.
async fn fetch_guild(http: &Arc<Http>, guild_id: GuildId) -> Result<PartialGuild, AppError> {
    guild_id.to_partial_guild(http).await.map_err(|e| {
        tracing::debug!("Failed to fetch guild {}: {}", guild_id, e);
        AppError::NotFound(format!(
            "Guild {} not found or the bot is not a member of it",
            guild_id
        ))
    })
}

/// Read-only view of a source guild over the Discord API.
pub struct DiscordGraphReader {
    http: Arc<Http>,
    guild: PartialGuild,
    channels: Vec<GuildChannel>,
}

impl DiscordGraphReader {
    /// Fetches the guild and its channel list.
    ///
    /// # Returns
    /// - `Ok(DiscordGraphReader)` - Reader ready to snapshot the guild
    /// - `Err(AppError::NotFound)` - Guild does not exist or is not accessible to the bot
    /// - `Err(AppError::CollectionFailure)` - Channel list could not be fetched
    pub async fn load(http: Arc<Http>, guild_id: GuildId) -> Result<Self, AppError> {
        let guild = fetch_guild(&http, guild_id).await?;

        let mut channels: Vec<GuildChannel> = guild_id
            .channels(&http)
            .await
            .map_err(|e| ReadError::from_serenity("list channels", e))?
            .into_values()
            .collect();
        channels.sort_by_key(|channel| (channel.position, channel.id));

        Ok(Self {
            http,
            guild,
            channels,
        })
    }

    fn channel(&self, channel_id: u64) -> Result<&GuildChannel, ReadError> {
        self.channels
            .iter()
            .find(|channel| channel.id.get() == channel_id)
            .ok_or_else(|| ReadError::new("read channel", format!("unknown channel {}", channel_id)))
    }
}

#[async_trait]
impl GraphReader for DiscordGraphReader {
    async fn guild_info(&self) -> Result<GraphGuild, ReadError> {
        let afk = self.guild.afk_metadata.as_ref();

        Ok(GraphGuild {
            id: self.guild.id.get(),
            name: self.guild.name.clone(),
            description: self.guild.description.clone(),
            icon_url: self.guild.icon_url(),
            settings: GuildSettings {
                banner_url: self.guild.banner_url(),
                afk_channel: afk
                    .and_then(|afk| self.channel(afk.afk_channel_id.get()).ok())
                    .map(|channel| channel.name.clone()),
                afk_timeout: afk.map(|afk| u16::from(afk.afk_timeout)),
                verification_level: Some(u8::from(self.guild.verification_level)),
                default_notifications: Some(u8::from(self.guild.default_message_notifications)),
                explicit_content_filter: Some(u8::from(self.guild.explicit_content_filter)),
            },
        })
    }

    async fn list_roles(&self) -> Result<Vec<GraphRole>, ReadError> {
        Ok(self
            .guild
            .roles
            .values()
            .map(|role| graph_role(self.guild.id, role))
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<GraphCategory>, ReadError> {
        Ok(self
            .channels
            .iter()
            .filter(|channel| channel.kind == ChannelType::Category)
            .map(|channel| GraphCategory {
                id: channel.id.get(),
                name: channel.name.clone(),
                position: channel.position,
                nsfw: channel.nsfw,
            })
            .collect())
    }

    async fn list_top_level_channels(&self) -> Result<Vec<GraphChannel>, ReadError> {
        Ok(self
            .channels
            .iter()
            .filter(|channel| channel.kind != ChannelType::Category && channel.parent_id.is_none())
            .map(graph_channel)
            .collect())
    }

    async fn list_channels_of(&self, category_id: u64) -> Result<Vec<GraphChannel>, ReadError> {
        Ok(self
            .channels
            .iter()
            .filter(|channel| channel.parent_id.map(ChannelId::get) == Some(category_id))
            .map(graph_channel)
            .collect())
    }

    async fn list_overwrites(&self, resource_id: u64) -> Result<Vec<GraphOverwrite>, ReadError> {
        Ok(self
            .channel(resource_id)?
            .permission_overwrites
            .iter()
            .map(graph_overwrite)
            .collect())
    }

    async fn member_name(&self, user_id: u64) -> Result<String, ReadError> {
        let member = self
            .guild
            .id
            .member(&self.http, UserId::new(user_id))
            .await
            .map_err(|e| ReadError::from_serenity(format!("fetch member {}", user_id), e))?;

        Ok(member.user.name)
    }

    async fn list_emojis(&self) -> Result<Vec<TemplateEmoji>, ReadError> {
        let emojis = self
            .guild
            .id
            .emojis(&self.http)
            .await
            .map_err(|e| ReadError::from_serenity("list emojis", e))?;

        Ok(emojis.iter().map(template_emoji).collect())
    }

    async fn list_stickers(&self) -> Result<Vec<TemplateSticker>, ReadError> {
        let stickers = self
            .guild
            .id
            .stickers(&self.http)
            .await
            .map_err(|e| ReadError::from_serenity("list stickers", e))?;

        Ok(stickers.iter().map(template_sticker).collect())
    }
}

/// Converts a Serenity role, flagging the guild's `@everyone` role.
pub fn graph_role(guild_id: GuildId, role: &Role) -> GraphRole {
    GraphRole {
        id: role.id.get(),
        name: role.name.clone(),
        color: role.colour.0,
        hoist: role.hoist,
        mentionable: role.mentionable,
        permissions: role.permissions.bits(),
        position: role.position,
        managed: role.managed,
        everyone: role.id == guild_id.everyone_role(),
        display_icon: role
            .icon
            .as_ref()
            .map(|hash| format!("{}/role-icons/{}/{}.png", DISCORD_CDN_URL, role.id, hash)),
    }
}

pub fn graph_channel(channel: &GuildChannel) -> GraphChannel {
    GraphChannel {
        id: channel.id.get(),
        name: channel.name.clone(),
        position: channel.position,
        nsfw: channel.nsfw,
        kind: channel_kind(channel),
    }
}

/// Reads the type-specific attributes of a channel.
///
/// Announcement channels are captured as text channels. Types that cannot be
/// recreated (threads, directories) are reported as unreadable.
pub fn channel_kind(channel: &GuildChannel) -> Result<ChannelKind, ReadError> {
    let archive = channel.default_auto_archive_duration.map(u16::from);

    match channel.kind {
        ChannelType::Text | ChannelType::News => Ok(ChannelKind::Text {
            topic: channel.topic.clone(),
            slowmode_delay: channel.rate_limit_per_user.unwrap_or(0),
            default_auto_archive_duration: archive,
        }),
        ChannelType::Voice => Ok(ChannelKind::Voice {
            bitrate: channel.bitrate.unwrap_or(FALLBACK_BITRATE),
            user_limit: channel.user_limit.unwrap_or(0),
            rtc_region: channel.rtc_region.clone(),
        }),
        ChannelType::Stage => Ok(ChannelKind::Stage {
            bitrate: channel.bitrate.unwrap_or(FALLBACK_BITRATE),
            user_limit: channel.user_limit.unwrap_or(0),
            topic: channel.topic.clone(),
        }),
        ChannelType::Forum => Ok(ChannelKind::Forum {
            topic: channel.topic.clone(),
            slowmode_delay: channel.rate_limit_per_user.unwrap_or(0),
            default_auto_archive_duration: archive,
            available_tags: channel
                .available_tags
                .iter()
                .map(|tag| tag.name.clone())
                .collect(),
        }),
        other => Err(ReadError::new(
            format!("read channel {}", channel.name),
            format!("unsupported channel type {:?}", other),
        )),
    }
}

pub fn graph_overwrite(overwrite: &PermissionOverwrite) -> GraphOverwrite {
    let target = match &overwrite.kind {
        PermissionOverwriteType::Role(role_id) => GraphOverwriteTarget::Role(role_id.get()),
        PermissionOverwriteType::Member(user_id) => GraphOverwriteTarget::Member(user_id.get()),
        other => GraphOverwriteTarget::Other(format!("{:?}", other)),
    };

    GraphOverwrite {
        target,
        allow: overwrite.allow.bits(),
        deny: overwrite.deny.bits(),
    }
}

pub fn template_emoji(emoji: &Emoji) -> TemplateEmoji {
    TemplateEmoji {
        name: emoji.name.clone(),
        url: emoji.url(),
        animated: emoji.animated,
        require_colons: emoji.require_colons,
        managed: emoji.managed,
        available: emoji.available,
    }
}

pub fn template_sticker(sticker: &Sticker) -> TemplateSticker {
    TemplateSticker {
        name: sticker.name.clone(),
        description: sticker.description.clone(),
        emoji: sticker.tags.first().cloned(),
        format_type: u8::from(sticker.format_type),
        url: sticker.image_url(),
    }
}

/// Mutating view of a target guild over the Discord API.
pub struct DiscordGraphWriter {
    http: Arc<Http>,
    guild_id: GuildId,
    max_bitrate: u32,
}

impl DiscordGraphWriter {
    /// Fetches the target guild to learn its bitrate limit.
    ///
    /// # Returns
    /// - `Ok(DiscordGraphWriter)` - Writer bound to the guild
    /// - `Err(AppError::NotFound)` - Guild does not exist or is not accessible to the bot
    pub async fn load(http: Arc<Http>, guild_id: GuildId) -> Result<Self, AppError> {
        let guild = fetch_guild(&http, guild_id).await?;

        Ok(Self {
            http,
            guild_id,
            max_bitrate: max_bitrate_for(guild.premium_tier),
        })
    }
}

#[async_trait]
impl GraphWriter for DiscordGraphWriter {
    async fn create_role(&self, role: &TemplateRole) -> Result<u64, WriteError> {
        let builder = EditRole::new()
            .name(role.name.clone())
            .colour(role.color)
            .hoist(role.hoist)
            .mentionable(role.mentionable)
            .permissions(Permissions::from_bits_truncate(role.permissions));

        let created = self
            .guild_id
            .create_role(&self.http, builder)
            .await
            .map_err(WriteError::from_serenity)?;

        Ok(created.id.get())
    }

    async fn create_category(&self, category: &TemplateCategory) -> Result<u64, WriteError> {
        let body = ChannelBody::category(category);

        self.post_channel(&body).await
    }

    async fn create_channel(
        &self,
        channel: &TemplateChannel,
        parent: Option<u64>,
    ) -> Result<u64, WriteError> {
        let body = ChannelBody::channel(channel, parent);

        self.post_channel(&body).await
    }

    async fn set_overwrite(
        &self,
        resource_id: u64,
        role_id: u64,
        allow: u64,
        deny: u64,
    ) -> Result<(), WriteError> {
        let overwrite = PermissionOverwrite {
            allow: Permissions::from_bits_truncate(allow),
            deny: Permissions::from_bits_truncate(deny),
            kind: PermissionOverwriteType::Role(RoleId::new(role_id)),
        };

        ChannelId::new(resource_id)
            .create_permission(&self.http, overwrite)
            .await
            .map_err(WriteError::from_serenity)
    }

    fn everyone_role_id(&self) -> u64 {
        self.guild_id.everyone_role().get()
    }

    fn max_bitrate(&self) -> u32 {
        self.max_bitrate
    }
}

impl DiscordGraphWriter {
    async fn post_channel(&self, body: &ChannelBody<'_>) -> Result<u64, WriteError> {
        let created = self
            .http
            .create_channel(self.guild_id, body, None)
            .await
            .map_err(WriteError::from_serenity)?;

        Ok(created.id.get())
    }
}

#[derive(Serialize)]
struct TagBody<'a> {
    name: &'a str,
}

/// JSON body of Discord's create-guild-channel endpoint.
#[derive(Serialize)]
struct ChannelBody<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: u8,
    position: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    nsfw: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit_per_user: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rtc_region: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_auto_archive_duration: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    available_tags: Vec<TagBody<'a>>,
}

impl<'a> ChannelBody<'a> {
    fn empty(name: &'a str, kind: ChannelType, position: u16) -> Self {
        Self {
            name,
            kind: u8::from(kind),
            position,
            parent_id: None,
            nsfw: false,
            topic: None,
            rate_limit_per_user: None,
            bitrate: None,
            user_limit: None,
            rtc_region: None,
            default_auto_archive_duration: None,
            available_tags: Vec::new(),
        }
    }

    fn category(category: &'a TemplateCategory) -> Self {
        Self::empty(&category.name, ChannelType::Category, category.position)
    }

    fn channel(channel: &'a TemplateChannel, parent: Option<u64>) -> Self {
        let kind = match channel.kind {
            ChannelKind::Text { .. } => ChannelType::Text,
            ChannelKind::Voice { .. } => ChannelType::Voice,
            ChannelKind::Stage { .. } => ChannelType::Stage,
            ChannelKind::Forum { .. } => ChannelType::Forum,
        };

        let mut body = Self::empty(&channel.name, kind, channel.position);
        body.parent_id = parent.map(|id| id.to_string());
        body.nsfw = channel.nsfw;

        match &channel.kind {
            ChannelKind::Text {
                topic,
                slowmode_delay,
                default_auto_archive_duration,
            } => {
                body.topic = topic.as_deref();
                body.rate_limit_per_user = Some(*slowmode_delay);
                body.default_auto_archive_duration = *default_auto_archive_duration;
            }
            ChannelKind::Voice {
                bitrate,
                user_limit,
                rtc_region,
            } => {
                body.bitrate = Some(*bitrate);
                body.user_limit = Some(*user_limit);
                body.rtc_region = rtc_region.as_deref();
            }
            ChannelKind::Stage {
                bitrate,
                user_limit,
                topic,
            } => {
                body.bitrate = Some(*bitrate);
                body.user_limit = Some(*user_limit);
                body.topic = topic.as_deref();
            }
            ChannelKind::Forum {
                topic,
                slowmode_delay,
                default_auto_archive_duration,
                available_tags,
            } => {
                body.topic = topic.as_deref();
                body.rate_limit_per_user = Some(*slowmode_delay);
                body.default_auto_archive_duration = *default_auto_archive_duration;
                body.available_tags = available_tags
                    .iter()
                    .map(|name| TagBody { name })
                    .collect();
            }
        }

        body
    }
}
