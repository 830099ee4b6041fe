//! Telegram Bot API client, the node's chat gateway.
//!
//! Both directions use plain GETs:
//!
//! | Call          | URL                                                  |
//! |---------------|------------------------------------------------------|
//! | poll          | `{base}/bot{token}/getUpdates?offset={n}&limit=10`   |
//! | notify        | `{base}/bot{token}/sendMessage?chat_id={id}&text={t}`|
//!
//! Updates without a text message (joins, stickers, edits) are returned
//! with `text: None` so the poller can still advance past them.

use serde::Deserialize;

use super::utils::escape_query;
use crate::app::commands::ChatMessage;
use crate::app::ports::{ChatPort, HttpClient};
use crate::error::CommsError;

/// Updates requested per poll. Keeps a backlog response well under the
/// HTTP client's body cap so the cursor can always move forward.
pub const POLL_BATCH: u8 = 10;

#[derive(Debug, Deserialize)]
struct UpdatesWire {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    result: Vec<UpdateWire>,
}

#[derive(Debug, Deserialize)]
struct UpdateWire {
    update_id: i64,
    #[serde(default)]
    message: Option<MessageWire>,
}

#[derive(Debug, Deserialize)]
struct MessageWire {
    #[serde(default)]
    text: Option<String>,
}

/// Decode a `getUpdates` body.
pub fn parse_updates(body: &[u8]) -> Result<Vec<ChatMessage>, CommsError> {
    let wire: UpdatesWire =
        serde_json::from_slice(body).map_err(|_| CommsError::MalformedPayload)?;
    if !wire.ok {
        return Err(CommsError::MalformedPayload);
    }
    Ok(wire
        .result
        .into_iter()
        .map(|u| ChatMessage {
            update_id: u.update_id,
            text: u.message.and_then(|m| m.text),
        })
        .collect())
}

pub struct TelegramClient<H> {
    http: H,
    api_root: String,
    chat_id: String,
}

impl<H: HttpClient> TelegramClient<H> {
    pub fn new(http: H, base_url: &str, bot_token: &str, chat_id: &str) -> Self {
        Self {
            http,
            api_root: format!("{}/bot{}", base_url.trim_end_matches('/'), bot_token),
            chat_id: chat_id.to_owned(),
        }
    }
}

impl<H: HttpClient> ChatPort for TelegramClient<H> {
    fn fetch_messages(&mut self, offset: i64) -> Result<Vec<ChatMessage>, CommsError> {
        let url = format!(
            "{}/getUpdates?offset={}&limit={}",
            self.api_root, offset, POLL_BATCH
        );
        let response = self.http.get(&url, &[])?;
        if response.status != 200 {
            return Err(CommsError::HttpStatus(response.status));
        }
        parse_updates(&response.body)
    }

    fn send_message(&mut self, text: &str) -> Result<(), CommsError> {
        let url = format!(
            "{}/sendMessage?chat_id={}&text={}",
            self.api_root,
            escape_query(&self.chat_id),
            escape_query(text)
        );
        let response = self.http.get(&url, &[])?;
        match response.status {
            200 => Ok(()),
            code => Err(CommsError::HttpStatus(code)),
        }
    }
}
