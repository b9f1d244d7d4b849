//! Dry-run notifier for running without bot credentials.
//!
//! Logs what would have been delivered and reports success.

use crate::domain::{DeliveryError, LeadPayload};
use crate::ports::LeadNotifier;
use std::time::Duration;
use tracing::info;

/// Stand-in for the bot when BODYSHOP_BOT_TOKEN / BODYSHOP_CHAT_ID are unset.
pub struct DryRunNotifier {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl DryRunNotifier {
    /// Create a dry-run notifier with default delay (300ms).
    pub fn new() -> Self {
        Self { delay_ms: 300 }
    }

    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Default for DryRunNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LeadNotifier for DryRunNotifier {
    async fn send(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        info!(
            attachments = payload.attachments.len(),
            bytes = payload.attachments.iter().map(|a| a.bytes.len()).sum::<usize>(),
            "[DRY RUN] lead not delivered:\n{}",
            payload.message
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_always_succeeds() {
        let notifier = DryRunNotifier::with_delay(1);
        let payload = LeadPayload::text("<b>Новая заявка</b>");
        assert!(notifier.send(&payload).await.is_ok());
    }
}
