//! Confirmation over a Discord channel.

use serenity::{
    all::{ChannelId, Message, ShardMessenger, UserId},
    async_trait,
    collector::MessageCollector,
    futures::{stream::BoxStream, StreamExt},
};
use tokio::sync::Mutex;

use crate::service::confirmation::ConfirmationSource;

/// Keyword the invoking user must post to confirm.
pub const CONFIRM_KEYWORD: &str = "CONFIRM";

/// Waits for the invoking user to post the confirmation keyword in the invoking channel.
///
/// Other messages are ignored, so the wait only ends on the keyword, when the shard
/// stops delivering messages, or when the gate's window elapses. The collector is
/// registered on construction; create this before posting the prompt so an immediate
/// reply is not missed.
pub struct ChannelConfirmation {
    messages: Mutex<BoxStream<'static, Message>>,
}

impl ChannelConfirmation {
    pub fn new(shard: &ShardMessenger, author_id: UserId, channel_id: ChannelId) -> Self {
        let messages = MessageCollector::new(shard)
            .author_id(author_id)
            .channel_id(channel_id)
            .filter(|message| is_confirmation(&message.content))
            .stream()
            .boxed();

        Self {
            messages: Mutex::new(messages),
        }
    }
}

#[async_trait]
impl ConfirmationSource for ChannelConfirmation {
    async fn confirmed(&self) -> bool {
        self.messages.lock().await.next().await.is_some()
    }
}

pub fn is_confirmation(content: &str) -> bool {
    content.trim().eq_ignore_ascii_case(CONFIRM_KEYWORD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_keyword_in_any_case() {
        assert!(is_confirmation("CONFIRM"));
        assert!(is_confirmation("  confirm "));
    }

    #[test]
    fn rejects_anything_else() {
        assert!(!is_confirmation("yes"));
        assert!(!is_confirmation("CONFIRM please"));
        assert!(!is_confirmation(""));
    }
}
