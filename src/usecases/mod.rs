//! Application use cases. Orchestrate domain logic via ports.

pub mod lead_service;

pub use lead_service::LeadService;
