//! Test factory for creating Serenity GuildChannel objects.

use serenity::all::{GuildChannel, PermissionOverwrite};

/// Optional attributes of a test channel.
///
/// `kind` is Discord's numeric channel type (0 text, 2 voice, 4 category, 13 stage,
/// 15 forum). Unset attributes are sent as `null`, as Discord does for channel types
/// that do not carry them.
#[derive(Debug, Clone, Default)]
pub struct ChannelOptions {
    pub kind: u8,
    pub position: u16,
    pub parent_id: Option<u64>,
    pub nsfw: bool,
    pub topic: Option<String>,
    pub rate_limit_per_user: Option<u16>,
    pub bitrate: Option<u32>,
    pub user_limit: Option<u32>,
    pub tags: Vec<String>,
}

/// Creates a test Serenity GuildChannel.
///
/// # Arguments
/// - `channel_id` - Discord channel ID (snowflake)
/// - `guild_id` - Discord guild ID the channel belongs to
/// - `name` - Channel name
/// - `options` - Type and type-specific attributes
///
/// # Panics
/// - If the JSON cannot be deserialized into a GuildChannel (indicates invalid test data)
pub fn create_test_channel(
    channel_id: u64,
    guild_id: u64,
    name: &str,
    options: ChannelOptions,
) -> GuildChannel {
    let tags: Vec<serde_json::Value> = options
        .tags
        .iter()
        .enumerate()
        .map(|(index, tag)| {
            serde_json::json!({
                "id": (channel_id + index as u64 + 1).to_string(),
                "name": tag,
                "moderated": false,
                "emoji_id": null,
                "emoji_name": null,
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({
        "id": channel_id.to_string(),
        "guild_id": guild_id.to_string(),
        "type": options.kind,
        "name": name,
        "position": options.position,
        "parent_id": options.parent_id.map(|id| id.to_string()),
        "nsfw": options.nsfw,
        "topic": options.topic,
        "rate_limit_per_user": options.rate_limit_per_user,
        "bitrate": options.bitrate,
        "user_limit": options.user_limit,
        "rtc_region": null,
        "last_message_id": null,
        "permission_overwrites": [],
        "available_tags": tags,
        "flags": 0,
    }))
    .expect("Failed to create test channel - invalid JSON structure")
}

/// Creates a test Serenity PermissionOverwrite.
///
/// # Arguments
/// - `target_id` - Role or user ID the overwrite applies to
/// - `kind` - Discord overwrite type (0 role, 1 member)
/// - `allow` - Allowed permission bits
/// - `deny` - Denied permission bits
///
/// # Panics
/// - If the JSON cannot be deserialized into a PermissionOverwrite
pub fn create_test_overwrite(target_id: u64, kind: u8, allow: u64, deny: u64) -> PermissionOverwrite {
    serde_json::from_value(serde_json::json!({
        "id": target_id.to_string(),
        "type": kind,
        "allow": allow.to_string(),
        "deny": deny.to_string(),
    }))
    .expect("Failed to create test overwrite - invalid JSON structure")
}
