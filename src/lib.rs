//! bodyshop-leads: lead capture for an auto body shop with Hexagonal Architecture.
//!
//! Masked phone entry, lead forms and delivery of leads to a Telegram chat.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
