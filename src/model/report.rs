//! Outcome models for snapshot and apply runs.
//!
//! Item-level failures never abort a run. They are tallied here instead, so callers can
//! see exactly what was skipped without digging through logs.

use serde::Serialize;

use crate::model::template::TemplateSummary;

/// Kind of entity an item-level failure concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Role,
    Category,
    Channel,
    Overwrite,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Role => "role",
            Self::Category => "category",
            Self::Channel => "channel",
            Self::Overwrite => "overwrite",
        };
        f.write_str(label)
    }
}

/// A single item that could not be created or applied on the target guild.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Miss {
    pub kind: ItemKind,
    /// Name of the entity, or `resource -> target` for overwrites.
    pub name: String,
    pub reason: String,
}

/// Final counts of an apply run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    pub roles_created: usize,
    pub categories_created: usize,
    pub channels_created: usize,
    pub overwrites_applied: usize,
    /// Overwrites whose target did not resolve against the role mapping.
    ///
    /// These are dropped silently and are not misses.
    pub overwrites_dropped: usize,
    pub misses: Vec<Miss>,
}

impl ApplyReport {
    pub(crate) fn miss(&mut self, kind: ItemKind, name: impl Into<String>, reason: impl ToString) {
        self.misses.push(Miss {
            kind,
            name: name.into(),
            reason: reason.to_string(),
        });
    }
}

/// A source item left out of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub kind: ItemKind,
    pub name: String,
    pub reason: String,
}

/// Tally of what a snapshot walk had to leave out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionStats {
    pub skipped: Vec<Skipped>,
}

impl CollectionStats {
    pub(crate) fn skip(&mut self, kind: ItemKind, name: impl Into<String>, reason: impl ToString) {
        self.skipped.push(Skipped {
            kind,
            name: name.into(),
            reason: reason.to_string(),
        });
    }
}

/// Outcome of a snapshot run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotReport {
    /// Name the template was stored under.
    pub name: String,
    pub summary: TemplateSummary,
    pub stats: CollectionStats,
}
