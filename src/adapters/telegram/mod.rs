//! Telegram Bot API delivery of leads.

pub mod bot_notifier;
pub mod dry_run;
pub mod media;

pub use bot_notifier::TelegramBotNotifier;
pub use dry_run::DryRunNotifier;
