//! Replays a template onto a target guild.
//!
//! Runs three phases in a fixed order: roles, then categories with their overwrites,
//! then channels with theirs. Each phase depends on IDs created by the one before it.
//! Overwrite targets are resolved through a name-to-ID table built from the roles
//! created in the first phase. `@everyone` overwrites go to the target guild's own
//! `@everyone` role.
//!
//! Every write is issued sequentially and followed by a pacing delay. A failed write is
//! logged and recorded as a miss, and the run continues with the next item. Running a
//! template twice against the same guild creates everything twice.

use dioxus_logger::tracing;
use std::{borrow::Cow, collections::HashMap, future::Future};

use crate::{
    error::graph::WriteError,
    graph::{
        pacing::{CallKind, Pacer, RetryPolicy},
        GraphWriter,
    },
    model::{
        report::{ApplyReport, ItemKind},
        template::{
            OverwriteTarget, Template, TemplateCategory, TemplateChannel, TemplateOverwrite,
        },
    },
    service::progress::{ApplyPhase, ProgressSink},
};

/// Miss reason for channels whose category could not be created.
const MISSING_PARENT: &str = "parent category was not created";

pub struct Reconstructor<'a> {
    writer: &'a dyn GraphWriter,
    pacer: &'a dyn Pacer,
    retry: RetryPolicy,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> Reconstructor<'a> {
    pub fn new(writer: &'a dyn GraphWriter, pacer: &'a dyn Pacer, retry: RetryPolicy) -> Self {
        Self {
            writer,
            pacer,
            retry,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Creates the template's structure on the target guild.
    ///
    /// Never fails as a whole. Item-level failures are reported in `ApplyReport::misses`.
    pub async fn apply(&self, template: &Template) -> ApplyReport {
        let mut report = ApplyReport::default();

        tracing::info!(
            "Applying snapshot of {}: {} roles, {} categories, {} channels",
            template.source_name,
            template.roles.len(),
            template.categories.len(),
            template.channel_count()
        );

        let role_ids = self.create_roles(template, &mut report).await;
        self.report(ApplyPhase::Roles, report.roles_created).await;

        let created_categories = self
            .create_categories(template, &role_ids, &mut report)
            .await;
        self.report(ApplyPhase::Categories, report.categories_created)
            .await;

        for (category, category_id) in &created_categories {
            for channel in &category.channels {
                self.create_channel(channel, Some(*category_id), &role_ids, &mut report)
                    .await;
            }
        }
        for channel in &template.channels {
            self.create_channel(channel, None, &role_ids, &mut report)
                .await;
        }
        self.report(ApplyPhase::Channels, report.channels_created)
            .await;

        tracing::info!(
            "Applied snapshot of {}: {} roles, {} categories, {} channels, {} overwrites ({} dropped, {} misses)",
            template.source_name,
            report.roles_created,
            report.categories_created,
            report.channels_created,
            report.overwrites_applied,
            report.overwrites_dropped,
            report.misses.len()
        );

        report
    }

    /// Creates roles in ascending position order, returning the name-to-ID table.
    async fn create_roles(
        &self,
        template: &Template,
        report: &mut ApplyReport,
    ) -> HashMap<String, u64> {
        let mut roles: Vec<_> = template.roles.iter().collect();
        roles.sort_by_key(|role| role.position);

        let mut role_ids = HashMap::with_capacity(roles.len());
        for role in roles {
            match self
                .write(CallKind::Role, &role.name, || self.writer.create_role(role))
                .await
            {
                Ok(id) => {
                    tracing::debug!("Created role {} ({})", role.name, id);
                    role_ids.insert(role.name.clone(), id);
                    report.roles_created += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to create role {}: {}", role.name, e);
                    report.miss(ItemKind::Role, role.name.clone(), e);
                }
            }
        }

        role_ids
    }

    /// Creates categories in ascending position order and applies their overwrites.
    ///
    /// Returns the categories that were created, with their new IDs, in creation order.
    /// Channels of a category that failed are recorded as misses here.
    async fn create_categories<'t>(
        &self,
        template: &'t Template,
        role_ids: &HashMap<String, u64>,
        report: &mut ApplyReport,
    ) -> Vec<(&'t TemplateCategory, u64)> {
        let mut categories: Vec<_> = template.categories.iter().collect();
        categories.sort_by_key(|category| category.position);

        let mut created = Vec::with_capacity(categories.len());
        for category in categories {
            match self
                .write(CallKind::Category, &category.name, || {
                    self.writer.create_category(category)
                })
                .await
            {
                Ok(id) => {
                    tracing::debug!("Created category {} ({})", category.name, id);
                    report.categories_created += 1;
                    self.apply_overwrites(
                        CallKind::Category,
                        &category.name,
                        id,
                        &category.overwrites,
                        role_ids,
                        report,
                    )
                    .await;
                    created.push((category, id));
                }
                Err(e) => {
                    tracing::error!("Failed to create category {}: {}", category.name, e);
                    report.miss(ItemKind::Category, category.name.clone(), e);
                    for channel in &category.channels {
                        report.miss(ItemKind::Channel, channel.name.clone(), MISSING_PARENT);
                    }
                }
            }
        }

        created
    }

    async fn create_channel(
        &self,
        channel: &TemplateChannel,
        parent: Option<u64>,
        role_ids: &HashMap<String, u64>,
        report: &mut ApplyReport,
    ) {
        let max_bitrate = self.writer.max_bitrate();
        let channel = match channel.kind.bitrate() {
            Some(bitrate) if bitrate > max_bitrate => {
                tracing::warn!(
                    "Clamping bitrate of channel {} from {} to {}",
                    channel.name,
                    bitrate,
                    max_bitrate
                );
                Cow::Owned(TemplateChannel {
                    kind: channel.kind.clamp_bitrate(max_bitrate),
                    ..channel.clone()
                })
            }
            _ => Cow::Borrowed(channel),
        };

        match self
            .write(CallKind::Channel, &channel.name, || {
                self.writer.create_channel(&channel, parent)
            })
            .await
        {
            Ok(id) => {
                tracing::debug!(
                    "Created {} channel {} ({})",
                    channel.kind.label(),
                    channel.name,
                    id
                );
                report.channels_created += 1;
                self.apply_overwrites(
                    CallKind::Channel,
                    &channel.name,
                    id,
                    &channel.overwrites,
                    role_ids,
                    report,
                )
                .await;
            }
            Err(e) => {
                tracing::error!("Failed to create channel {}: {}", channel.name, e);
                report.miss(ItemKind::Channel, channel.name.clone(), e);
            }
        }
    }

    /// Applies overwrites whose target resolves on the target guild and drops the rest.
    async fn apply_overwrites(
        &self,
        kind: CallKind,
        resource_name: &str,
        resource_id: u64,
        overwrites: &[TemplateOverwrite],
        role_ids: &HashMap<String, u64>,
        report: &mut ApplyReport,
    ) {
        for overwrite in overwrites {
            let role_id = match &overwrite.target {
                OverwriteTarget::Role { name } => role_ids.get(name).copied(),
                OverwriteTarget::Everyone => Some(self.writer.everyone_role_id()),
                OverwriteTarget::Member { .. } => None,
            };
            let Some(role_id) = role_id else {
                tracing::warn!(
                    "Dropping overwrite on {} for unresolved target {}",
                    resource_name,
                    overwrite.target.name()
                );
                report.overwrites_dropped += 1;
                continue;
            };

            let label = format!("{} -> {}", resource_name, overwrite.target.name());
            match self
                .write(kind, &label, || {
                    self.writer.set_overwrite(
                        resource_id,
                        role_id,
                        overwrite.allow,
                        overwrite.deny,
                    )
                })
                .await
            {
                Ok(()) => report.overwrites_applied += 1,
                Err(e) => {
                    tracing::error!("Failed to apply overwrite {}: {}", label, e);
                    report.miss(ItemKind::Overwrite, label, e);
                }
            }
        }
    }

    /// Issues a write, pacing after every attempt and retrying rate limits.
    async fn write<T, F, Fut>(&self, kind: CallKind, label: &str, call: F) -> Result<T, WriteError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, WriteError>>,
    {
        let mut attempt = 1;
        loop {
            let result = call().await;
            self.pacer.pace(kind).await;

            match result {
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt, e.retry_after());
                    tracing::warn!(
                        "Rate limited on {} (attempt {}/{}), retrying in {:?}",
                        label,
                        attempt,
                        self.retry.max_attempts,
                        delay
                    );
                    self.pacer.backoff(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn report(&self, phase: ApplyPhase, count: usize) {
        if let Some(progress) = self.progress {
            progress.apply_phase_done(phase, count).await;
        }
    }
}
