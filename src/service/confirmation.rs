//! Human approval step in front of an apply run.
//!
//! The gate is the only all-or-nothing boundary of an apply: if it does not pass, no
//! write has been issued. Once it passes, the run proceeds to completion.

use serenity::async_trait;
use std::time::Duration;

use crate::error::AppError;

/// Delivers a human confirmation signal.
#[async_trait]
pub trait ConfirmationSource: Send + Sync {
    /// Resolves once a decision is made: `true` to proceed, `false` to abort.
    ///
    /// May wait indefinitely. The gate bounds the wait.
    async fn confirmed(&self) -> bool;
}

/// Bounded wait for a confirmation.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationGate {
    window: Duration,
}

impl ConfirmationGate {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Waits for `source` to confirm within the window.
    ///
    /// # Returns
    /// - `Ok(())` - Confirmed in time
    /// - `Err(AppError::ConfirmationTimeout)` - Window elapsed without a decision
    /// - `Err(AppError::ConfirmationDeclined)` - Source ended without confirming
    pub async fn pass(&self, source: &dyn ConfirmationSource) -> Result<(), AppError> {
        match tokio::time::timeout(self.window, source.confirmed()).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::ConfirmationDeclined),
            Err(_) => Err(AppError::ConfirmationTimeout {
                seconds: self.window.as_secs(),
            }),
        }
    }
}
