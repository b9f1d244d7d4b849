//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// Lead delivery to the messaging backend failed. Never retried.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Network failure, timeout, or an unreadable response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Backend answered with a non-success status or `ok: false`.
    #[error("messaging API error {status}: {description}")]
    Api { status: u16, description: String },

    /// Request could not be built (descriptor serialization, attachment MIME type).
    #[error("request encoding failed: {0}")]
    Encoding(String),
}

/// A lead form failed validation. Shown inline to the user; not a delivery error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("field is required: {0}")]
    MissingField(&'static str),

    #[error("enter a complete phone number")]
    InvalidPhone,

    #[error("consent to personal data processing is required")]
    ConsentRequired,

    #[error("at most {max} photos can be attached")]
    TooManyPhotos { max: usize },

    #[error("rating must be between 0.5 and 5 in steps of 0.5")]
    InvalidRating,

    #[error("desired date {0} is in the past")]
    DateInPast(chrono::NaiveDate),
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid form: {0}")]
    Form(#[from] FormError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    /// A previous submit is still in flight; the new one is refused.
    #[error("A submission is already in progress")]
    SubmitInFlight,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("UI error: {0}")]
    Ui(String),
}
