//! Coarse progress reporting for snapshot and apply runs.
//!
//! Sinks are purely informational. A run behaves the same with or without one.

use serenity::async_trait;

/// Phase boundaries of a snapshot walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPhase {
    Roles,
    Emojis,
    Categories,
}

/// Phase boundaries of an apply run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPhase {
    Roles,
    Categories,
    Channels,
}

impl std::fmt::Display for SnapshotPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Roles => "roles",
            Self::Emojis => "emojis",
            Self::Categories => "categories",
        })
    }
}

impl std::fmt::Display for ApplyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Roles => "roles",
            Self::Categories => "categories",
            Self::Channels => "channels",
        })
    }
}

/// Receives phase-completion notices.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Called once a snapshot phase has been collected. `count` is the number of items kept.
    async fn snapshot_phase_done(&self, phase: SnapshotPhase, count: usize);

    /// Called once an apply phase has finished. `count` is the number of entities created.
    async fn apply_phase_done(&self, phase: ApplyPhase, count: usize);
}
