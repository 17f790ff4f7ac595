//! Command grammar
//!
//! Parses the free-form command messages into typed requests. The accepted
//! grammar is explicit and tested:
//!
//! - `/add <debtor> <amount> <description>` — debtor is a mention (either a
//!   rich mention entity or a plain `@name` token), amount is a positive
//!   decimal (`123` or `123.45`), description is any non-empty free text.
//! - `/undo <credit id>` — exactly one integer id.
//! - `/stats [<user>]` — optional single mention; absent means all users.
//!
//! Names are runs of Unicode letters (`\p{L}`), optionally separated by
//! spaces, so mentions work for any script rather than a hard-coded
//! character range.

use crate::types::{BotError, Credit, CreditId, InboundMessage, Mention, User};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Command prefix that adds a credit
pub const ADD: &str = "/add";
/// Command prefix that undoes a credit
pub const UNDO: &str = "/undo";
/// Command prefix that requests per-user stats
pub const STATS: &str = "/stats";
/// Command prefix that requests the netted bill
pub const BILL: &str = "/bill";
/// Command prefix that requests usage help
pub const HELP: &str = "/help";

static ADD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^/add\s+(?P<debtor>@?\p{L}[\p{L} ]*?)\s+(?P<amount>[0-9]+(?:\.[0-9]+)?)\s+(?P<description>\S.*)$",
    )
    .expect("add grammar compiles")
});

static UNDO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/undo\s+(?P<id>[0-9]+)\s*$").expect("undo grammar compiles"));

static STATS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/stats\s+(?P<user>@?\p{L}[\p{L} ]*)\s*$").expect("stats grammar compiles")
});

/// Parse an `/add` message into a credit record
///
/// The credit id is the message id, the donor is the sender, and the debtor
/// comes from the first mention. The bot itself can never be the debtor,
/// regardless of which mention form named it, and neither can the sender.
///
/// # Errors
///
/// - [`BotError::NoUserMentioned`] if no mention entity is present, or a
///   plain mention is missing its `@`
/// - [`BotError::InvalidCreditFormat`] if the remainder does not match
///   `<amount> <description>` or the amount is not positive
/// - [`BotError::CannotCreditBot`] if the debtor is the bot
/// - [`BotError::CannotCreditSelf`] if the debtor is the sender
pub fn parse_add(msg: &InboundMessage, bot: &User) -> Result<Credit, BotError> {
    let text = msg.text.as_deref().unwrap_or_default();
    let mention = msg.first_mention().ok_or(BotError::NoUserMentioned)?;

    let caps = ADD_RE
        .captures(text)
        .ok_or_else(|| BotError::invalid_credit_format(text))?;

    let amount = Decimal::from_str(&caps["amount"])
        .map_err(|_| BotError::invalid_credit_format(text))?;
    if amount <= Decimal::ZERO {
        return Err(BotError::invalid_credit_format(text));
    }

    let debtor = match mention {
        Mention::Embedded(user) => user.clone(),
        Mention::Handle => {
            let token = caps["debtor"].trim();
            if !token.starts_with('@') {
                return Err(BotError::NoUserMentioned);
            }
            User::from_handle(token)
        }
    };

    if debtor.same_identity(bot) {
        return Err(BotError::CannotCreditBot);
    }
    if debtor.same_identity(&msg.sender) {
        return Err(BotError::CannotCreditSelf);
    }

    Ok(Credit {
        id: msg.id,
        donor: msg.sender.clone(),
        debtor,
        amount,
        description: caps["description"].trim().to_string(),
    })
}

/// Parse an `/undo` message into the id of the credit to remove
///
/// # Errors
///
/// Returns [`BotError::InvalidUndoFormat`] unless the message is exactly
/// `/undo <integer id>`.
pub fn parse_undo(msg: &InboundMessage) -> Result<CreditId, BotError> {
    let text = msg.text.as_deref().unwrap_or_default();
    let caps = UNDO_RE
        .captures(text)
        .ok_or_else(|| BotError::invalid_undo_format(text))?;

    caps["id"]
        .parse::<CreditId>()
        .map_err(|_| BotError::invalid_undo_format(text))
}

/// Parse a `/stats` message into its optional user filter
///
/// A bare `/stats` (no mention) means all users. A rich mention resolves
/// directly; a plain mention must match `@name` exactly.
///
/// # Errors
///
/// Returns [`BotError::InvalidStatsFormat`] if a mention entity is present
/// but the trailing text is not a single `@name` token.
pub fn parse_stats(msg: &InboundMessage) -> Result<Option<User>, BotError> {
    let text = msg.text.as_deref().unwrap_or_default();
    match msg.first_mention() {
        None => Ok(None),
        Some(Mention::Embedded(user)) => Ok(Some(user.clone())),
        Some(Mention::Handle) => {
            let caps = STATS_RE
                .captures(text)
                .ok_or_else(|| BotError::invalid_stats_format(text))?;
            let token = caps["user"].trim();
            if !token.starts_with('@') {
                return Err(BotError::invalid_stats_format(text));
            }
            Ok(Some(User::from_handle(token)))
        }
    }
}
