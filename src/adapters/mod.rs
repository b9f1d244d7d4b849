//! Infrastructure adapters. Implement ports.
//!
//! Telegram Bot API delivery, terminal UI. Map errors to domain errors.

pub mod telegram;
pub mod ui;
