//! Chat transport module
//!
//! Everything platform-specific lives here. The rest of the crate only sees
//! [`crate::types::InboundMessage`] going in and reply strings going out.
//!
//! # Components
//!
//! - `telegram` - Telegram Bot API client: long-poll updates, send replies,
//!   resolve the bot's own identity

pub mod telegram;

pub use telegram::{TelegramClient, Update};
