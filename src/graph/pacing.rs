//! Pacing and retry for sequential write calls.
//!
//! Every write against the target guild is followed by a fixed delay sized to the
//! platform's burst limit for that route. Rate-limit rejections are retried with a
//! bounded exponential backoff. Both kinds of waiting go through `Pacer` so tests can
//! substitute an implementation that records instead of sleeping.

use serenity::async_trait;
use std::time::Duration;

/// Route family of a write call, each with its own burst limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Role,
    Category,
    Channel,
}

/// Source of the delays between write calls.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits after a write call of the given kind.
    async fn pace(&self, kind: CallKind);

    /// Waits before retrying a rate-limited call.
    async fn backoff(&self, delay: Duration);
}

/// Sleeps a fixed interval per call kind.
#[derive(Debug, Clone)]
pub struct FixedPacer {
    role: Duration,
    category: Duration,
    channel: Duration,
}

impl FixedPacer {
    pub fn new(role: Duration, category: Duration, channel: Duration) -> Self {
        Self {
            role,
            category,
            channel,
        }
    }

    /// Delay applied after a call of the given kind.
    pub fn delay_for(&self, kind: CallKind) -> Duration {
        match kind {
            CallKind::Role => self.role,
            CallKind::Category => self.category,
            CallKind::Channel => self.channel,
        }
    }
}

#[async_trait]
impl Pacer for FixedPacer {
    async fn pace(&self, kind: CallKind) {
        tokio::time::sleep(self.delay_for(kind)).await;
    }

    async fn backoff(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Bounded retry for rate-limited write calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first. Never less than 1.
    pub max_attempts: u32,
    /// Backoff before the first retry, doubled for each further retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Backoff before retry number `attempt` (1-based).
    ///
    /// A server-provided `retry_after` hint takes precedence.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| {
            let exponent = attempt.saturating_sub(1).min(16);
            self.base_delay.saturating_mul(1 << exponent)
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
