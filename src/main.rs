//! Wiring & DI. Entry point: load config, pick the notifier, run the lead desk.
//! No business logic here.

use bodyshop_leads::adapters::telegram::{DryRunNotifier, TelegramBotNotifier};
use bodyshop_leads::adapters::ui::tui::TuiInputPort;
use bodyshop_leads::domain::Quiz;
use bodyshop_leads::ports::{InputPort, LeadNotifier};
use bodyshop_leads::shared::config::AppConfig;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    bodyshop_leads::adapters::ui::init_ui();

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    // --- Notifier: Telegram bot when credentials are present, dry run otherwise ---
    let notifier: Arc<dyn LeadNotifier> = match cfg.notifier_settings() {
        Some(settings) => {
            info!(
                chat_id = %settings.chat_id(),
                timeout_secs = settings.request_timeout().as_secs(),
                "Telegram notifier enabled"
            );
            Arc::new(TelegramBotNotifier::new(settings).map_err(|e| anyhow::anyhow!("{}", e))?)
        }
        None => {
            warn!("BODYSHOP_BOT_TOKEN / BODYSHOP_CHAT_ID not set, leads will only be logged");
            Arc::new(DryRunNotifier::new())
        }
    };

    let quiz = Quiz::embedded().map_err(|e| anyhow::anyhow!("embedded quiz: {}", e))?;
    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(notifier, quiz));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
