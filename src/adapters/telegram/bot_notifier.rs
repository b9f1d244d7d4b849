//! Telegram Bot API adapter. Implements LeadNotifier via `sendMessage` and
//! `sendMediaGroup`.
//!
//! Text-only leads go out as a single HTML message. Leads with photos go out as
//! one album whose first photo carries the message as caption. A failed request
//! is reported as is: no retry, no fallback to the other method.

use super::media::{PARSE_MODE_HTML, attach_token, build_media_group};
use crate::domain::{DeliveryError, DomainError, LeadPayload};
use crate::ports::LeadNotifier;
use crate::shared::config::NotifierSettings;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const SEND_MESSAGE: &str = "sendMessage";
const SEND_MEDIA_GROUP: &str = "sendMediaGroup";

/// Lead notifier backed by a Telegram bot posting into a fixed chat.
pub struct TelegramBotNotifier {
    client: Client,
    settings: NotifierSettings,
}

impl TelegramBotNotifier {
    /// Create a notifier. The HTTP client carries the configured request timeout.
    pub fn new(settings: NotifierSettings) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self { client, settings })
    }

    async fn send_text(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        let body = SendMessage {
            chat_id: self.settings.chat_id(),
            text: &payload.message,
            parse_mode: PARSE_MODE_HTML,
        };
        let res = self
            .client
            .post(self.settings.method_url(SEND_MESSAGE))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        check_response(res).await
    }

    async fn send_media_group(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        let media = serde_json::to_string(&build_media_group(payload))
            .map_err(|e| DeliveryError::Encoding(format!("media descriptors: {}", e)))?;

        let mut form = Form::new()
            .text("chat_id", self.settings.chat_id().to_string())
            .text("media", media);
        for (index, attachment) in payload.attachments.iter().enumerate() {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.mime)
                .map_err(|e| {
                    DeliveryError::Encoding(format!(
                        "attachment {} ({}): {}",
                        index, attachment.file_name, e
                    ))
                })?;
            form = form.part(attach_token(index), part);
        }

        let res = self
            .client
            .post(self.settings.method_url(SEND_MEDIA_GROUP))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        check_response(res).await
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Envelope every Bot API reply is wrapped in.
#[derive(Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// reqwest errors print the request URL, which embeds the bot token.
fn transport(e: reqwest::Error) -> DeliveryError {
    DeliveryError::Transport(e.without_url().to_string())
}

async fn check_response(res: reqwest::Response) -> Result<(), DeliveryError> {
    let status = res.status();
    let text = res.text().await.map_err(transport)?;
    let reply = serde_json::from_str::<ApiReply>(&text).ok();

    if status.is_success() && reply.as_ref().is_some_and(|r| r.ok) {
        return Ok(());
    }

    let description = reply
        .and_then(|r| r.description)
        .unwrap_or_else(|| text.chars().take(200).collect());
    warn!(status = %status, description = %description, "Bot API rejected lead");
    Err(DeliveryError::Api {
        status: status.as_u16(),
        description,
    })
}

#[async_trait::async_trait]
impl LeadNotifier for TelegramBotNotifier {
    async fn send(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        let attachments = payload.attachments.len();
        let method = if payload.has_attachments() {
            SEND_MEDIA_GROUP
        } else {
            SEND_MESSAGE
        };
        info!(
            chat_id = %self.settings.chat_id(),
            method,
            attachments,
            message_len = payload.message.len(),
            "delivering lead"
        );

        let result = if payload.has_attachments() {
            self.send_media_group(payload).await
        } else {
            self.send_text(payload).await
        };

        match &result {
            Ok(()) => info!(method, attachments, "lead delivered"),
            Err(e) => warn!(method, error = %e, "lead delivery failed"),
        }
        result
    }
}
