//! Core domain layer. No external I/O dependencies.
//!
//! Phone masking, lead forms and the submit lifecycle live here.

pub mod entities;
pub mod errors;
pub mod lead;
pub mod phone;
pub mod quiz;

pub use entities::{Attachment, LeadPayload, SubmitState};
pub use errors::{DeliveryError, DomainError, FormError};
pub use lead::{
    ContactMessage, LeadForm, MAX_PHOTOS, QuizAnswer, QuizRequest, RepairBooking,
    ReviewSubmission, ServiceRequest, VacancyApplication,
};
pub use phone::PhoneEntry;
pub use quiz::{Quiz, QuizStep};
