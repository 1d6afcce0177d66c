//! Embed builders for command replies.

use serenity::all::{CreateEmbed, CreateEmbedFooter, GuildId};

use crate::model::{
    report::{ApplyReport, SnapshotReport},
    template::TemplateSummary,
};

const COLOR_SUCCESS: u32 = 0x2ECC71;
const COLOR_WARNING: u32 = 0xF1C40F;
const COLOR_ERROR: u32 = 0xE74C3C;
const COLOR_INFO: u32 = 0x3498DB;

/// Most misses listed in a reply. The rest are only counted.
const MAX_LISTED_MISSES: usize = 10;

pub fn error(message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Error")
        .description(message)
        .color(COLOR_ERROR)
}

pub fn snapshot(report: &SnapshotReport) -> CreateEmbed {
    let summary = &report.summary;
    let mut embed = CreateEmbed::new()
        .title("Snapshot saved")
        .description(format!("`{}`", report.name))
        .color(COLOR_SUCCESS)
        .field("Source", &summary.source_name, false)
        .field("Roles", summary.roles.to_string(), true)
        .field("Categories", summary.categories.to_string(), true)
        .field("Channels", summary.channels.to_string(), true)
        .field("Emojis", summary.emojis.to_string(), true)
        .field("Stickers", summary.stickers.to_string(), true);

    if !report.stats.skipped.is_empty() {
        embed = embed
            .color(COLOR_WARNING)
            .footer(CreateEmbedFooter::new(format!(
                "{} unreadable items were left out",
                report.stats.skipped.len()
            )));
    }

    embed
}

/// Prompt shown while the confirmation gate waits.
pub fn confirm_apply(name: &str, summary: &TemplateSummary, window_secs: u64) -> CreateEmbed {
    CreateEmbed::new()
        .title("Apply template?")
        .description(format!(
            "This will create {} roles, {} categories and {} channels in this server from `{}`.\n\
             Existing structure is not changed, so running it twice creates duplicates.\n\n\
             Type `CONFIRM` within {} seconds to continue.",
            summary.roles, summary.categories, summary.channels, name, window_secs
        ))
        .color(COLOR_WARNING)
}

pub fn applied(name: &str, report: &ApplyReport) -> CreateEmbed {
    let color = if report.misses.is_empty() {
        COLOR_SUCCESS
    } else {
        COLOR_WARNING
    };

    let mut embed = CreateEmbed::new()
        .title("Template applied")
        .description(format!("`{}`", name))
        .color(color)
        .field("Roles", report.roles_created.to_string(), true)
        .field("Categories", report.categories_created.to_string(), true)
        .field("Channels", report.channels_created.to_string(), true)
        .field(
            "Overwrites",
            format!(
                "{} applied, {} skipped",
                report.overwrites_applied, report.overwrites_dropped
            ),
            true,
        );

    if !report.misses.is_empty() {
        let mut lines: Vec<String> = report
            .misses
            .iter()
            .take(MAX_LISTED_MISSES)
            .map(|miss| format!("{} `{}`: {}", miss.kind, miss.name, miss.reason))
            .collect();
        if report.misses.len() > MAX_LISTED_MISSES {
            lines.push(format!(
                "...and {} more",
                report.misses.len() - MAX_LISTED_MISSES
            ));
        }
        embed = embed.field(
            format!("Failed ({})", report.misses.len()),
            lines.join("\n"),
            false,
        );
    }

    embed
}

pub fn templates(summaries: &[TemplateSummary]) -> CreateEmbed {
    let embed = CreateEmbed::new().title("Saved templates").color(COLOR_INFO);

    if summaries.is_empty() {
        return embed.description("No templates saved yet");
    }

    summaries.iter().fold(embed, |embed, summary| {
        embed.field(
            &summary.name,
            format!(
                "{} | {} roles, {} categories, {} channels | {}",
                summary.source_name,
                summary.roles,
                summary.categories,
                summary.channels,
                summary.created_at.format("%Y-%m-%d %H:%M UTC")
            ),
            false,
        )
    })
}

/// A guild the bot is in, with whether it holds Administrator there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildAccess {
    pub id: GuildId,
    pub name: String,
    pub admin: bool,
}

pub fn guilds(guilds: &[GuildAccess]) -> CreateEmbed {
    let description = if guilds.is_empty() {
        "Not in any servers".to_string()
    } else {
        guilds
            .iter()
            .map(|guild| {
                let access = if guild.admin { "✅ Admin" } else { "⚠️ Limited" };
                format!("{} (`{}`) {}", guild.name, guild.id, access)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    CreateEmbed::new()
        .title("Servers")
        .description(description)
        .color(COLOR_INFO)
        .footer(CreateEmbedFooter::new(
            "Snapshot and apply need Administrator in the server",
        ))
}

pub fn help(prefix: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Commands")
        .color(COLOR_INFO)
        .field(
            format!("{}snapshot [guild_id]", prefix),
            "Save the roles, categories, channels and permissions of a server. \
             Defaults to the current server. Administrators only.",
            false,
        )
        .field(
            format!("{}apply <template_name>", prefix),
            "Recreate a saved template in this server after confirmation. Administrators only.",
            false,
        )
        .field(format!("{}templates", prefix), "List saved templates", false)
        .field(format!("{}guilds", prefix), "List servers the bot is in", false)
        .field(format!("{}help", prefix), "Show this message", false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(embed: CreateEmbed) -> String {
        let value = serde_json::to_value(embed).unwrap();
        value["description"].as_str().unwrap_or_default().to_string()
    }

    #[test]
    fn marks_guild_access_per_line() {
        let embed = guilds(&[
            GuildAccess {
                id: GuildId::new(10),
                name: "Alpha".to_string(),
                admin: true,
            },
            GuildAccess {
                id: GuildId::new(20),
                name: "Beta".to_string(),
                admin: false,
            },
        ]);

        assert_eq!(
            description(embed),
            "Alpha (`10`) ✅ Admin\nBeta (`20`) ⚠️ Limited"
        );
    }

    #[test]
    fn reports_no_guilds() {
        assert_eq!(description(guilds(&[])), "Not in any servers");
    }
}
