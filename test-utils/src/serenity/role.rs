//! Test factory for creating Serenity Role objects.

use serenity::all::Role;

/// Creates a test Serenity Role.
///
/// The role is not hoisted, not managed, not mentionable and carries no permissions.
///
/// # Arguments
/// - `role_id` - Discord role ID (snowflake); pass the guild ID for `@everyone`
/// - `name` - Role name
/// - `color` - Role color as a 32-bit integer (RGB)
/// - `position` - Role position in the hierarchy (higher = more important)
///
/// # Panics
/// - If the JSON cannot be deserialized into a Role (indicates invalid test data)
pub fn create_test_role(role_id: u64, name: &str, color: u32, position: u16) -> Role {
    role_from_json(serde_json::json!({
        "id": role_id.to_string(),
        "name": name,
        "color": color,
        "colors": { "primary_color": color, "secondary_color": null, "tertiary_color": null },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": "0",
        "managed": false,
        "mentionable": false,
    }))
}

/// Creates a test Serenity Role owned by an integration, such as a bot's own role.
///
/// # Arguments
/// - `role_id` - Discord role ID (snowflake)
/// - `name` - Role name
/// - `permissions` - Permission bits granted by the role
///
/// # Panics
/// - If the JSON cannot be deserialized into a Role (indicates invalid test data)
pub fn create_test_managed_role(role_id: u64, name: &str, permissions: u64) -> Role {
    role_from_json(serde_json::json!({
        "id": role_id.to_string(),
        "name": name,
        "color": 0,
        "colors": { "primary_color": 0, "secondary_color": null, "tertiary_color": null },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": 1,
        "permissions": permissions.to_string(),
        "managed": true,
        "mentionable": false,
        "tags": { "bot_id": "900000000000000000" },
    }))
}

fn role_from_json(value: serde_json::Value) -> Role {
    serde_json::from_value(value).expect("Failed to create test role - invalid JSON structure")
}
