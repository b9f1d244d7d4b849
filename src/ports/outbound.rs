//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DeliveryError, LeadPayload};

/// Delivers a completed lead to the shop's messaging backend.
///
/// One call per submit action. Implementations must not retry and must not
/// fall back to a different request shape when the first one fails.
#[async_trait::async_trait]
pub trait LeadNotifier: Send + Sync {
    /// Deliver `payload`. Text-only payloads and payloads with attachments may
    /// use different requests, but each call issues exactly one.
    ///
    /// # Errors
    /// Returns `DeliveryError` on transport failure or a non-success API reply.
    async fn send(&self, payload: &LeadPayload) -> Result<(), DeliveryError>;
}
