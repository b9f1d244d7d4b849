//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/UI types here.

use super::errors::{DeliveryError, DomainError};

/// A binary image attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Image MIME type for a file extension. Unknown extensions fall back to JPEG,
    /// which is what the Bot API assumes for photos anyway.
    pub fn mime_for_extension(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "heic" => "image/heic",
            _ => "image/jpeg",
        }
    }
}

/// A completed lead ready for delivery: an HTML message plus ordered photos.
///
/// The notifier places no cap on `attachments`; forms enforce their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadPayload {
    pub message: String,
    pub attachments: Vec<Attachment>,
}

impl LeadPayload {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(message: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            message: message.into(),
            attachments,
        }
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}

/// Lifecycle of one form's submit action: `Idle -> InFlight -> Delivered | Failed`.
///
/// A second submit while `InFlight` is refused, so duplicate sends cannot happen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    InFlight,
    Delivered,
    Failed(String),
}

impl SubmitState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmitState::InFlight)
    }

    /// Enter `InFlight`. Allowed from every state except `InFlight`.
    pub fn begin(&mut self) -> Result<(), DomainError> {
        if self.is_in_flight() {
            return Err(DomainError::SubmitInFlight);
        }
        *self = SubmitState::InFlight;
        Ok(())
    }

    /// Record the outcome of the in-flight call.
    pub fn finish(&mut self, outcome: &Result<(), DeliveryError>) {
        *self = match outcome {
            Ok(()) => SubmitState::Delivered,
            Err(e) => SubmitState::Failed(e.to_string()),
        };
    }

    /// The in-flight call was dropped before it reported back.
    /// No-op unless `InFlight`.
    pub fn abandon(&mut self) {
        if self.is_in_flight() {
            *self = SubmitState::Failed(ABANDONED.to_string());
        }
    }
}

/// Failure reason recorded when a submit is cancelled mid-request.
pub const ABANDONED: &str = "submission cancelled before delivery completed";
