//! Snapshot walk over a source guild.
//!
//! The walk is best-effort. Only a failed top-level listing (guild info, roles,
//! categories, top-level channels) aborts it. Anything below that level which cannot be
//! read is logged, tallied in `CollectionStats` and left out of the template.

use dioxus_logger::tracing;
use std::collections::HashMap;

use crate::{
    error::graph::ReadError,
    graph::{GraphChannel, GraphOverwrite, GraphOverwriteTarget, GraphReader},
    model::{
        report::{CollectionStats, ItemKind},
        template::{
            OverwriteTarget, Template, TemplateCategory, TemplateChannel, TemplateOverwrite,
            TemplateRole,
        },
    },
    service::progress::{ProgressSink, SnapshotPhase},
};

pub struct Collector<'a> {
    reader: &'a dyn GraphReader,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> Collector<'a> {
    pub fn new(reader: &'a dyn GraphReader) -> Self {
        Self {
            reader,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Walks the source guild and assembles a template.
    ///
    /// # Returns
    /// - `Ok((Template, CollectionStats))` - Snapshot and the items it had to leave out
    /// - `Err(ReadError)` - A top-level listing failed
    pub async fn collect(&self) -> Result<(Template, CollectionStats), ReadError> {
        let guild = self.reader.guild_info().await?;
        tracing::info!("Collecting snapshot of guild {} ({})", guild.name, guild.id);

        let mut template = Template::new(guild.id, guild.name);
        template.description = guild.description;
        template.icon_url = guild.icon_url;
        template.settings = guild.settings;
        let mut stats = CollectionStats::default();

        let source_roles = self.reader.list_roles().await?;
        let role_targets: HashMap<u64, OverwriteTarget> = source_roles
            .iter()
            .map(|role| {
                let target = if role.everyone {
                    OverwriteTarget::Everyone
                } else {
                    OverwriteTarget::Role {
                        name: role.name.clone(),
                    }
                };
                (role.id, target)
            })
            .collect();

        template.roles = source_roles
            .into_iter()
            .filter(|role| !role.everyone && !role.managed)
            .map(|role| TemplateRole {
                name: role.name,
                color: role.color,
                hoist: role.hoist,
                mentionable: role.mentionable,
                permissions: role.permissions,
                position: role.position,
                display_icon: role.display_icon,
            })
            .collect();
        template.roles.sort_by_key(|role| role.position);
        self.report(SnapshotPhase::Roles, template.roles.len()).await;

        template.emojis = match self.reader.list_emojis().await {
            Ok(emojis) => emojis,
            Err(e) => {
                tracing::warn!("Leaving emojis out of snapshot of {}: {}", template.source_name, e);
                Vec::new()
            }
        };
        template.stickers = match self.reader.list_stickers().await {
            Ok(stickers) => stickers,
            Err(e) => {
                tracing::warn!("Leaving stickers out of snapshot of {}: {}", template.source_name, e);
                Vec::new()
            }
        };
        self.report(SnapshotPhase::Emojis, template.emojis.len()).await;

        let mut categories = self.reader.list_categories().await?;
        categories.sort_by_key(|category| (category.position, category.id));

        for category in categories {
            let overwrites = match self.reader.list_overwrites(category.id).await {
                Ok(overwrites) => {
                    self.overwrites(&category.name, overwrites, &role_targets, &mut stats)
                        .await
                }
                Err(e) => {
                    tracing::error!("Dropping overwrites of category {}: {}", category.name, e);
                    stats.skip(ItemKind::Overwrite, format!("{} -> *", category.name), &e);
                    Vec::new()
                }
            };

            let channels = match self.reader.list_channels_of(category.id).await {
                Ok(channels) => self.channels(channels, &role_targets, &mut stats).await,
                Err(e) => {
                    tracing::error!("Skipping channels of category {}: {}", category.name, e);
                    stats.skip(ItemKind::Category, category.name.clone(), &e);
                    Vec::new()
                }
            };

            template.categories.push(TemplateCategory {
                name: category.name,
                position: category.position,
                nsfw: category.nsfw,
                overwrites,
                channels,
            });
        }

        let top_level = self.reader.list_top_level_channels().await?;
        template.channels = self.channels(top_level, &role_targets, &mut stats).await;
        self.report(SnapshotPhase::Categories, template.categories.len())
            .await;

        tracing::info!(
            "Collected {} roles, {} categories, {} channels from {} ({} skipped)",
            template.roles.len(),
            template.categories.len(),
            template.channel_count(),
            template.source_name,
            stats.skipped.len()
        );

        Ok((template, stats))
    }

    async fn report(&self, phase: SnapshotPhase, count: usize) {
        if let Some(progress) = self.progress {
            progress.snapshot_phase_done(phase, count).await;
        }
    }

    /// Converts a channel listing, ordered by position, skipping unreadable channels.
    async fn channels(
        &self,
        mut channels: Vec<GraphChannel>,
        role_targets: &HashMap<u64, OverwriteTarget>,
        stats: &mut CollectionStats,
    ) -> Vec<TemplateChannel> {
        channels.sort_by_key(|channel| (channel.position, channel.id));

        let mut collected = Vec::with_capacity(channels.len());
        for channel in channels {
            let kind = match channel.kind {
                Ok(kind) => kind,
                Err(e) => {
                    tracing::error!("Skipping channel {}: {}", channel.name, e);
                    stats.skip(ItemKind::Channel, channel.name, &e);
                    continue;
                }
            };

            let overwrites = match self.reader.list_overwrites(channel.id).await {
                Ok(overwrites) => {
                    self.overwrites(&channel.name, overwrites, role_targets, stats)
                        .await
                }
                Err(e) => {
                    tracing::error!("Skipping channel {}: {}", channel.name, e);
                    stats.skip(ItemKind::Channel, channel.name, &e);
                    continue;
                }
            };

            collected.push(TemplateChannel {
                name: channel.name,
                position: channel.position,
                nsfw: channel.nsfw,
                kind,
                overwrites,
            });
        }

        collected
    }

    /// Resolves overwrite targets to names.
    ///
    /// `@everyone` is kept as its own target. Roles missing from the listing and target
    /// kinds other than role or member are dropped, as are members whose name cannot be
    /// fetched.
    async fn overwrites(
        &self,
        resource: &str,
        overwrites: Vec<GraphOverwrite>,
        role_targets: &HashMap<u64, OverwriteTarget>,
        stats: &mut CollectionStats,
    ) -> Vec<TemplateOverwrite> {
        let mut resolved = Vec::with_capacity(overwrites.len());
        for overwrite in overwrites {
            let target = match overwrite.target {
                GraphOverwriteTarget::Role(id) => match role_targets.get(&id) {
                    Some(target) => target.clone(),
                    None => {
                        tracing::debug!("Dropping overwrite on {} for role {}", resource, id);
                        continue;
                    }
                },
                GraphOverwriteTarget::Member(id) => match self.reader.member_name(id).await {
                    Ok(name) => OverwriteTarget::Member { name },
                    Err(e) => {
                        tracing::error!("Dropping overwrite on {} for member {}: {}", resource, id, e);
                        stats.skip(ItemKind::Overwrite, format!("{} -> {}", resource, id), &e);
                        continue;
                    }
                },
                GraphOverwriteTarget::Other(kind) => {
                    tracing::error!("Dropping overwrite on {} with target kind {}", resource, kind);
                    stats.skip(
                        ItemKind::Overwrite,
                        format!("{} -> {}", resource, kind),
                        "unsupported target kind",
                    );
                    continue;
                }
            };

            resolved.push(TemplateOverwrite {
                target,
                allow: overwrite.allow,
                deny: overwrite.deny,
            });
        }

        resolved
    }
}
