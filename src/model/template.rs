//! Template domain models.
//!
//! A `Template` is the persisted structural snapshot of a guild: its roles, categories,
//! channels, permission overwrites, emojis and stickers. Overwrites reference their
//! targets by name rather than by ID because IDs are not portable between guilds.
//!
//! The serialized shape of these types is the store's payload format. New fields must
//! carry `#[serde(default)]` so records written by older builds stay readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default bitrate used when a stored voice or stage channel carries none.
const DEFAULT_BITRATE: u32 = 64_000;

fn default_bitrate() -> u32 {
    DEFAULT_BITRATE
}

/// Structural snapshot of a guild.
///
/// Treated as immutable once saved. Updating a template means overwriting the whole
/// record under the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Display name of the source guild at snapshot time.
    pub source_name: String,
    /// Discord ID of the source guild.
    #[serde(default)]
    pub source_guild_id: u64,
    /// Source guild description, captured for reference only.
    #[serde(default)]
    pub description: Option<String>,
    /// Source guild icon URL, captured for reference only.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Guild-level settings, captured for reference only.
    #[serde(default)]
    pub settings: GuildSettings,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    /// Roles, excluding `@everyone` and platform-managed roles.
    #[serde(default)]
    pub roles: Vec<TemplateRole>,
    /// Categories with their own channels and overwrites.
    #[serde(default)]
    pub categories: Vec<TemplateCategory>,
    /// Channels that do not belong to any category.
    #[serde(default)]
    pub channels: Vec<TemplateChannel>,
    #[serde(default)]
    pub emojis: Vec<TemplateEmoji>,
    #[serde(default)]
    pub stickers: Vec<TemplateSticker>,
}

impl Template {
    /// Creates an empty template for the given source guild.
    pub fn new(source_guild_id: u64, source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            source_guild_id,
            description: None,
            icon_url: None,
            settings: GuildSettings::default(),
            created_at: Utc::now(),
            roles: Vec::new(),
            categories: Vec::new(),
            channels: Vec::new(),
            emojis: Vec::new(),
            stickers: Vec::new(),
        }
    }

    /// Total number of channels, categorized and top-level.
    pub fn channel_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.channels.len())
            .sum::<usize>()
            + self.channels.len()
    }

    /// Builds the listing summary for this template stored under `name`.
    pub fn summary(&self, name: impl Into<String>) -> TemplateSummary {
        TemplateSummary {
            name: name.into(),
            source_name: self.source_name.clone(),
            created_at: self.created_at,
            roles: self.roles.len(),
            categories: self.categories.len(),
            channels: self.channel_count(),
            emojis: self.emojis.len(),
            stickers: self.stickers.len(),
        }
    }
}

/// Guild-level settings of the source guild. Never applied.
///
/// Levels are Discord's numeric values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildSettings {
    #[serde(default)]
    pub banner_url: Option<String>,
    /// Name of the AFK voice channel.
    #[serde(default)]
    pub afk_channel: Option<String>,
    /// Idle seconds before a member is moved to the AFK channel.
    #[serde(default)]
    pub afk_timeout: Option<u16>,
    #[serde(default)]
    pub verification_level: Option<u8>,
    #[serde(default)]
    pub default_notifications: Option<u8>,
    #[serde(default)]
    pub explicit_content_filter: Option<u8>,
}

/// Guild role as captured from the source guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRole {
    pub name: String,
    /// RGB color value, 0 for no color.
    pub color: u32,
    pub hoist: bool,
    pub mentionable: bool,
    /// Permission bitset.
    pub permissions: u64,
    /// Position in the source hierarchy. Defines creation order on apply.
    pub position: u16,
    #[serde(default)]
    pub display_icon: Option<String>,
}

/// Channel category with its permission overwrites and child channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCategory {
    pub name: String,
    pub position: u16,
    /// Captured only. Channels carry their own flag.
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub overwrites: Vec<TemplateOverwrite>,
    /// Child channels in stored order.
    #[serde(default)]
    pub channels: Vec<TemplateChannel>,
}

/// Guild channel with the attributes valid for its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateChannel {
    pub name: String,
    pub position: u16,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(flatten)]
    pub kind: ChannelKind,
    #[serde(default)]
    pub overwrites: Vec<TemplateOverwrite>,
}

/// Channel type with its type-specific attributes.
///
/// Serialized with a `type` tag of `text`, `voice`, `stage` or `forum`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelKind {
    Text {
        #[serde(default)]
        topic: Option<String>,
        /// Slowmode delay in seconds.
        #[serde(default)]
        slowmode_delay: u16,
        /// Default thread auto-archive duration in minutes.
        #[serde(default)]
        default_auto_archive_duration: Option<u16>,
    },
    Voice {
        #[serde(default = "default_bitrate")]
        bitrate: u32,
        /// Maximum connected users, 0 for unlimited.
        #[serde(default)]
        user_limit: u32,
        #[serde(default)]
        rtc_region: Option<String>,
    },
    Stage {
        #[serde(default = "default_bitrate")]
        bitrate: u32,
        #[serde(default)]
        user_limit: u32,
        #[serde(default)]
        topic: Option<String>,
    },
    Forum {
        #[serde(default)]
        topic: Option<String>,
        #[serde(default)]
        slowmode_delay: u16,
        #[serde(default)]
        default_auto_archive_duration: Option<u16>,
        /// Names of the forum's available tags.
        #[serde(default)]
        available_tags: Vec<String>,
    },
}

impl ChannelKind {
    /// Lowercase type name, matching the serialized tag.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Voice { .. } => "voice",
            Self::Stage { .. } => "stage",
            Self::Forum { .. } => "forum",
        }
    }

    /// Requested bitrate for voice-capable channels.
    pub fn bitrate(&self) -> Option<u32> {
        match self {
            Self::Voice { bitrate, .. } | Self::Stage { bitrate, .. } => Some(*bitrate),
            _ => None,
        }
    }

    /// Returns a copy with the bitrate lowered to `max` if it exceeds it.
    ///
    /// Channel types without a bitrate are returned unchanged.
    pub fn clamp_bitrate(&self, max: u32) -> Self {
        let mut kind = self.clone();
        if let Self::Voice { bitrate, .. } | Self::Stage { bitrate, .. } = &mut kind {
            *bitrate = (*bitrate).min(max);
        }
        kind
    }
}

/// Permission overwrite scoped to a role, a member or `@everyone`, referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateOverwrite {
    #[serde(flatten)]
    pub target: OverwriteTarget,
    /// Allowed permission bitset.
    pub allow: u64,
    /// Denied permission bitset.
    pub deny: u64,
}

/// Target of a permission overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverwriteTarget {
    Role { name: String },
    Member { name: String },
    /// The guild's implicit `@everyone` role. Resolves to the target guild's own.
    Everyone,
}

impl OverwriteTarget {
    /// Symbolic name of the role or member.
    pub fn name(&self) -> &str {
        match self {
            Self::Role { name } | Self::Member { name } => name,
            Self::Everyone => "@everyone",
        }
    }
}

/// Custom emoji descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEmoji {
    pub name: String,
    /// CDN URL of the emoji image.
    pub url: String,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub require_colons: bool,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub available: bool,
}

/// Guild sticker descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSticker {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the emoji associated with the sticker.
    #[serde(default)]
    pub emoji: Option<String>,
    /// Discord sticker format type (1 png, 2 apng, 3 lottie, 4 gif).
    #[serde(default)]
    pub format_type: u8,
    #[serde(default)]
    pub url: Option<String>,
}

/// Listing summary of a stored template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub name: String,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
    pub roles: usize,
    pub categories: usize,
    pub channels: usize,
    pub emojis: usize,
    pub stickers: usize,
}
