use crate::{
    data::template::TemplateRepository,
    error::AppError,
    model::template::{
        ChannelKind, OverwriteTarget, Template, TemplateCategory, TemplateChannel,
        TemplateOverwrite, TemplateRole,
    },
};
use chrono::{Duration, Utc};
use entity::prelude::Template as TemplateEntity;
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod find_by_name;
mod get_all_summaries;
mod save;

/// Template with one role, one category holding a voice channel, and one top-level
/// text channel carrying a role overwrite.
fn sample_template(source_name: &str) -> Template {
    let mut template = Template::new(4242, source_name);
    template.roles.push(TemplateRole {
        name: "Admin".to_string(),
        color: 0xFF0000,
        hoist: true,
        mentionable: false,
        permissions: 8,
        position: 1,
        display_icon: None,
    });
    template.categories.push(TemplateCategory {
        name: "Voice".to_string(),
        position: 0,
        nsfw: false,
        overwrites: Vec::new(),
        channels: vec![TemplateChannel {
            name: "lounge".to_string(),
            position: 0,
            nsfw: false,
            kind: ChannelKind::Voice {
                bitrate: 96_000,
                user_limit: 10,
                rtc_region: None,
            },
            overwrites: Vec::new(),
        }],
    });
    template.channels.push(TemplateChannel {
        name: "rules".to_string(),
        position: 0,
        nsfw: false,
        kind: ChannelKind::Text {
            topic: Some("Read me".to_string()),
            slowmode_delay: 0,
            default_auto_archive_duration: None,
        },
        overwrites: vec![TemplateOverwrite {
            target: OverwriteTarget::Role {
                name: "Admin".to_string(),
            },
            allow: 8,
            deny: 0,
        }],
    });
    template
}
