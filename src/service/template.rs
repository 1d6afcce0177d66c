//! Entry points for snapshotting, applying and listing templates.

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::{
    data::template::TemplateRepository,
    error::AppError,
    graph::GraphReader,
    model::{
        report::{ApplyReport, SnapshotReport},
        template::{Template, TemplateSummary},
    },
    service::{
        collector::Collector,
        confirmation::{ConfirmationGate, ConfirmationSource},
        progress::ProgressSink,
        reconstructor::Reconstructor,
    },
};

/// Store name for a snapshot of the given template.
///
/// Format: `snapshot_<sourceGuildId>_<YYYYmmdd_HHMMSS>`, in UTC.
pub fn snapshot_name(template: &Template) -> String {
    format!(
        "snapshot_{}_{}",
        template.source_guild_id,
        template.created_at.format("%Y%m%d_%H%M%S")
    )
}

pub struct TemplateService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TemplateService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Snapshots the source guild behind `reader` and stores the result.
    ///
    /// # Returns
    /// - `Ok(SnapshotReport)` - Stored name, summary and skipped items
    /// - `Err(AppError::CollectionFailure)` - A top-level listing failed
    /// - `Err(AppError::DbErr)` - Template could not be stored
    pub async fn snapshot(
        &self,
        reader: &dyn GraphReader,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<SnapshotReport, AppError> {
        let mut collector = Collector::new(reader);
        if let Some(progress) = progress {
            collector = collector.with_progress(progress);
        }

        let (template, stats) = collector.collect().await?;
        let name = snapshot_name(&template);

        TemplateRepository::new(self.db)
            .save(&name, &template)
            .await?;

        tracing::info!("Stored snapshot of {} as {}", template.source_name, name);

        Ok(SnapshotReport {
            summary: template.summary(name.clone()),
            name,
            stats,
        })
    }

    /// Applies a loaded template once `confirmation` passes the gate.
    ///
    /// Callers load the template with `get` first, so an unknown name fails before any
    /// confirmation is requested. Nothing is written unless the gate passes.
    ///
    /// # Returns
    /// - `Ok(ApplyReport)` - Final counts and misses
    /// - `Err(AppError::ConfirmationTimeout)` / `Err(AppError::ConfirmationDeclined)` -
    ///   Gate did not pass
    pub async fn apply(
        &self,
        template: &Template,
        reconstructor: &Reconstructor<'_>,
        gate: &ConfirmationGate,
        confirmation: &dyn ConfirmationSource,
    ) -> Result<ApplyReport, AppError> {
        gate.pass(confirmation).await?;

        Ok(reconstructor.apply(template).await)
    }

    /// Loads the template stored under `name`.
    ///
    /// # Returns
    /// - `Ok(Template)` - Stored template
    /// - `Err(AppError::NotFound)` - No template with this name
    /// - `Err(AppError::DbErr)` - Template could not be loaded
    pub async fn get(&self, name: &str) -> Result<Template, AppError> {
        TemplateRepository::new(self.db)
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Template {} not found", name)))
    }

    /// Summaries of every stored template, newest first.
    pub async fn list(&self) -> Result<Vec<TemplateSummary>, AppError> {
        Ok(TemplateRepository::new(self.db).get_all_summaries().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::{
            mock::{
                role_overwrite_of, source_role, source_text, MockGraph, RecordingPacer, WriteCall,
            },
            pacing::RetryPolicy,
            GraphCategory,
        },
        service::confirmation::tests::{Answer, Silent},
    };
    use chrono::TimeZone;
    use entity::prelude::Template as TemplateEntity;
    use std::time::Duration;
    use test_utils::builder::TestBuilder;

    fn source_guild() -> MockGraph {
        let mut graph = MockGraph::new();
        graph.guild.id = 777;
        graph.roles = vec![source_role(2, "Admin", 0), source_role(3, "Mod", 1)];
        graph.categories = vec![GraphCategory {
            id: 10,
            name: "General".to_string(),
            position: 0,
            nsfw: false,
        }];
        graph.children.insert(10, vec![source_text(11, "chat", 0)]);
        graph.top_level = vec![source_text(20, "rules", 0)];
        graph
            .overwrites
            .insert(11, vec![role_overwrite_of(2, 8, 0)]);
        graph
    }

    #[test]
    fn names_snapshot_after_guild_and_time() {
        let mut template = Template::new(42, "Guild");
        template.created_at = chrono::Utc
            .with_ymd_and_hms(2026, 10, 18, 9, 5, 3)
            .unwrap();

        assert_eq!(snapshot_name(&template), "snapshot_42_20261018_090503");
    }

    /// Tests that a stored snapshot loads back unchanged.
    ///
    /// Expected: loaded template equal to a fresh collection of the same guild
    #[tokio::test]
    async fn snapshot_round_trips_through_store() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(TemplateEntity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let graph = source_guild();

        let service = TemplateService::new(db);
        let report = service.snapshot(&graph, None).await?;
        let loaded = service.get(&report.name).await?;

        let (mut collected, _) = Collector::new(&graph).collect().await?;
        collected.created_at = loaded.created_at;
        assert_eq!(loaded, collected);
        assert!(report.name.starts_with("snapshot_777_"));
        assert_eq!(report.summary.channels, 2);

        Ok(())
    }

    /// Tests applying a stored template after confirmation.
    ///
    /// Expected: Ok with every entity created on the target
    #[tokio::test]
    async fn applies_stored_template_once_confirmed() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(TemplateEntity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let service = TemplateService::new(db);
        let report = service.snapshot(&source_guild(), None).await?;
        let template = service.get(&report.name).await?;

        let target = MockGraph::new();
        let pacer = RecordingPacer::default();
        let reconstructor = Reconstructor::new(&target, &pacer, RetryPolicy::default());
        let gate = ConfirmationGate::new(Duration::from_secs(5));

        let applied = service
            .apply(&template, &reconstructor, &gate, &Answer(true))
            .await?;

        assert_eq!(applied.roles_created, 2);
        assert_eq!(applied.categories_created, 1);
        assert_eq!(applied.channels_created, 2);
        assert_eq!(applied.overwrites_applied, 1);
        assert!(applied.misses.is_empty());

        Ok(())
    }

    /// Tests that an elapsed confirmation window issues no writes.
    ///
    /// Expected: Err(ConfirmationTimeout) and an untouched target
    #[tokio::test]
    async fn timeout_issues_no_writes() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(TemplateEntity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let service = TemplateService::new(db);
        let report = service.snapshot(&source_guild(), None).await?;
        let template = service.get(&report.name).await?;

        let target = MockGraph::new();
        let pacer = RecordingPacer::default();
        let reconstructor = Reconstructor::new(&target, &pacer, RetryPolicy::default());
        let gate = ConfirmationGate::new(Duration::from_millis(20));

        let result = service
            .apply(&template, &reconstructor, &gate, &Silent)
            .await;

        assert!(matches!(result, Err(AppError::ConfirmationTimeout { .. })));
        assert!(target.calls().is_empty());
        assert!(pacer.events().is_empty());

        Ok(())
    }

    /// Tests that a channel hidden from `@everyone` stays hidden on the target.
    ///
    /// Expected: the `@everyone` deny is written against the target's `@everyone` role
    #[tokio::test]
    async fn private_channel_stays_private() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(TemplateEntity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let service = TemplateService::new(db);

        let mut source = source_guild();
        let mut everyone = source_role(777, "@everyone", 0);
        everyone.everyone = true;
        source.roles.push(everyone);
        source.overwrites.insert(
            20,
            vec![role_overwrite_of(777, 0, 1024), role_overwrite_of(3, 1024, 0)],
        );
        let report = service.snapshot(&source, None).await?;
        let template = service.get(&report.name).await?;

        let mut target = MockGraph::new();
        target.guild.id = 888;
        let pacer = RecordingPacer::default();
        let reconstructor = Reconstructor::new(&target, &pacer, RetryPolicy::default());
        let gate = ConfirmationGate::new(Duration::from_secs(5));

        service
            .apply(&template, &reconstructor, &gate, &Answer(true))
            .await?;

        let rules = target
            .calls()
            .into_iter()
            .find_map(|call| match call {
                WriteCall::CreateChannel { name, id, .. } if name == "rules" => Some(id),
                _ => None,
            })
            .unwrap();
        assert!(target.calls().contains(&WriteCall::SetOverwrite {
            resource: rules,
            role: 888,
            allow: 0,
            deny: 1024,
        }));

        Ok(())
    }

    /// Tests loading a name that was never stored.
    ///
    /// Expected: Err(NotFound)
    #[tokio::test]
    async fn unknown_template_is_not_found() {
        let test = TestBuilder::new()
            .with_table(TemplateEntity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let result = TemplateService::new(db).get("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn lists_stored_snapshots() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(TemplateEntity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let service = TemplateService::new(db);

        let report = service.snapshot(&source_guild(), None).await?;
        let summaries = service.list().await?;

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, report.name);
        assert_eq!(summaries[0].roles, report.summary.roles);
        assert_eq!(summaries[0].channels, report.summary.channels);

        Ok(())
    }
}
