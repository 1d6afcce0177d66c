//! Progress reporting through an editable status message.

use dioxus_logger::tracing;
use serenity::{
    all::{ChannelId, EditMessage, Message, MessageId},
    async_trait,
    http::Http,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::service::progress::{ApplyPhase, ProgressSink, SnapshotPhase};

/// Appends one line per finished phase to a message the bot posted.
pub struct StatusMessage {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
    lines: Mutex<Vec<String>>,
}

impl StatusMessage {
    pub fn new(http: Arc<Http>, message: &Message) -> Self {
        Self {
            http,
            channel_id: message.channel_id,
            message_id: message.id,
            lines: Mutex::new(Vec::new()),
        }
    }

    async fn push(&self, line: String) {
        let content = {
            let mut lines = self.lines.lock().await;
            lines.push(line);
            lines.join("\n")
        };

        let edit = EditMessage::new().content(content);
        if let Err(e) = self
            .http
            .edit_message(self.channel_id, self.message_id, &edit, vec![])
            .await
        {
            tracing::warn!("Failed to update status message {}: {}", self.message_id, e);
        }
    }
}

#[async_trait]
impl ProgressSink for StatusMessage {
    async fn snapshot_phase_done(&self, phase: SnapshotPhase, count: usize) {
        self.push(format!("Collected {} {}", count, phase)).await;
    }

    async fn apply_phase_done(&self, phase: ApplyPhase, count: usize) {
        self.push(format!("Created {} {}", count, phase)).await;
    }
}
