//! Telegram Bot API client
//!
//! Long-polling client over the HTTP Bot API. Raw update payloads are
//! converted into typed [`InboundMessage`] values before anything else sees
//! them; a payload the converter cannot make sense of (no sender, unknown
//! entity kinds) is logged and skipped rather than failing the poll loop.
//!
//! The update offset is advanced for every received update, including
//! skipped ones, so a malformed payload is never redelivered forever.

use crate::types::{BotError, ChatId, InboundMessage, Mention, User, UserId};
use serde::Deserialize;
use tracing::warn;

const API_BASE: &str = "https://api.telegram.org";

/// One update from the poll loop
///
/// `message` is `None` when the update carried nothing the bot handles
/// (edited messages, malformed payloads). The id still advances the offset.
#[derive(Debug)]
pub struct Update {
    /// Update id; the next poll asks for ids strictly greater than this
    pub id: i64,

    /// The converted message, if the update carried one
    pub message: Option<InboundMessage>,
}

/// Telegram Bot API client
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RawUpdate {
    update_id: i64,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    message_id: i64,
    from: Option<RawUser>,
    chat: RawChat,
    text: Option<String>,
    #[serde(default)]
    entities: Vec<RawEntity>,
    #[serde(default)]
    new_chat_members: Vec<RawUser>,
    left_chat_member: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: i64,
    first_name: String,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    #[serde(rename = "type")]
    kind: String,
    user: Option<RawUser>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        User {
            id: UserId::Id(raw.id),
            first_name: raw.first_name,
            username: raw.username,
        }
    }
}

/// Convert a raw message payload into the typed inbound message
///
/// Returns `None` for messages without a sender; the bot only reacts to
/// messages attributable to a member.
fn convert_message(raw: RawMessage) -> Option<InboundMessage> {
    let sender = match raw.from {
        Some(user) => User::from(user),
        None => {
            warn!(message_id = raw.message_id, "message without sender, skipping");
            return None;
        }
    };

    let mentions = raw
        .entities
        .into_iter()
        .filter_map(|entity| match entity.kind.as_str() {
            "text_mention" => entity.user.map(|user| Mention::Embedded(User::from(user))),
            "mention" => Some(Mention::Handle),
            _ => None,
        })
        .collect();

    Some(InboundMessage {
        id: raw.message_id,
        chat_id: raw.chat.id,
        sender,
        text: raw.text,
        mentions,
        new_member: raw.new_chat_members.into_iter().next().map(User::from),
        left_member: raw.left_chat_member.map(User::from),
    })
}

impl TelegramClient {
    /// Create a client for the given bot token
    pub fn new(token: &str) -> Self {
        TelegramClient {
            http: reqwest::Client::new(),
            base_url: format!("{}/bot{}", API_BASE, token),
        }
    }

    /// Resolve the bot's own user record
    ///
    /// Called once at startup; the result backs the guard that refuses
    /// credits naming the bot as debtor.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Transport`] if the request fails or the API
    /// rejects the token.
    pub async fn get_me(&self) -> Result<User, BotError> {
        let response: ApiResponse<RawUser> = self
            .http
            .get(format!("{}/getMe", self.base_url))
            .send()
            .await?
            .json()
            .await?;

        let raw = Self::unwrap_response(response, "getMe")?;
        Ok(User::from(raw))
    }

    /// Long-poll for updates after the given offset
    ///
    /// Blocks server-side for up to `timeout_secs` before returning an
    /// empty batch, so the poll loop is quiet when the chat is quiet.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Transport`] if the request fails; the caller is
    /// expected to log and resume polling.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, BotError> {
        let response: ApiResponse<Vec<RawUpdate>> = self
            .http
            .get(format!("{}/getUpdates", self.base_url))
            .query(&[("offset", offset.to_string()), ("timeout", timeout_secs.to_string())])
            .send()
            .await?
            .json()
            .await?;

        let raw_updates = Self::unwrap_response(response, "getUpdates")?;
        Ok(raw_updates
            .into_iter()
            .map(|raw| Update {
                id: raw.update_id,
                message: raw.message.and_then(convert_message),
            })
            .collect())
    }

    /// Send a reply into the given chat
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Transport`] if the request fails or the API
    /// rejects the message.
    pub async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), BotError> {
        let response: ApiResponse<serde_json::Value> = self
            .http
            .post(format!("{}/sendMessage", self.base_url))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?
            .json()
            .await?;

        Self::unwrap_response(response, "sendMessage")?;
        Ok(())
    }

    fn unwrap_response<T>(response: ApiResponse<T>, method: &str) -> Result<T, BotError> {
        if !response.ok {
            return Err(BotError::Transport {
                message: format!(
                    "{} failed: {}",
                    method,
                    response.description.unwrap_or_else(|| "no description".to_string())
                ),
            });
        }
        response.result.ok_or_else(|| BotError::Transport {
            message: format!("{} returned an empty result", method),
        })
    }
}
