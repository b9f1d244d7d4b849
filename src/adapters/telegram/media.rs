//! Media-group descriptors for `sendMediaGroup`.
//!
//! Each attachment travels as its own multipart part and is referenced from the
//! JSON `media` field by an `attach://<token>` URI.

use crate::domain::LeadPayload;
use serde::Serialize;

pub const PARSE_MODE_HTML: &str = "HTML";

/// `InputMediaPhoto` as the Bot API expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputMediaPhoto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

/// Multipart field name for the attachment at `index`.
pub fn attach_token(index: usize) -> String {
    format!("photo_{}", index)
}

/// One descriptor per attachment, in order. Only the first carries the message
/// as its caption; the chat shows one caption for the whole album.
pub fn build_media_group(payload: &LeadPayload) -> Vec<InputMediaPhoto> {
    payload
        .attachments
        .iter()
        .enumerate()
        .map(|(index, _)| {
            let first = index == 0;
            InputMediaPhoto {
                kind: "photo",
                media: format!("attach://{}", attach_token(index)),
                caption: first.then(|| payload.message.clone()),
                parse_mode: first.then_some(PARSE_MODE_HTML),
            }
        })
        .collect()
}
