//! Application state shared across HTTP handlers.

use sea_orm::DatabaseConnection;
use std::time::Instant;

/// State handed to every Axum handler.
///
/// Cheap to clone: `DatabaseConnection` is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Template store connection.
    pub db: DatabaseConnection,

    /// When the process started, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            started_at: Instant::now(),
        }
    }
}
