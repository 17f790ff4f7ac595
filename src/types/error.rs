//! Error types for the credits bot
//!
//! This module defines all errors that can occur while handling chat
//! commands. Almost everything here is recoverable: a bad command earns the
//! sender a reply explaining the problem and the bot keeps running. Only
//! configuration errors at startup are fatal.
//!
//! # Error Categories
//!
//! - **Parse errors**: missing mention, malformed command text, crediting
//!   the bot or yourself
//! - **Ledger errors**: unknown credit id, undo by someone other than the
//!   donor
//! - **Netting errors**: pair-mismatch invariant violation (a bug, never
//!   surfaced to the chat)
//! - **Collaborator errors**: store I/O, transport I/O, configuration

use super::credit::CreditId;
use thiserror::Error;

/// Main error type for the credits bot
///
/// Each variant carries the context needed for a useful log line. The
/// user-facing reply text is produced separately by [`crate::core::replies`];
/// variants without a reply mapping fall back to the generic
/// "didn't understand" answer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BotError {
    /// A credit request did not mention a user
    ///
    /// Recoverable: the sender is asked to mention the debtor with `@name`.
    #[error("no user mentioned in credit request")]
    NoUserMentioned,

    /// A credit request did not match `/add <debtor> <amount> <description>`
    ///
    /// Recoverable: the sender is shown the expected format.
    #[error("invalid credit format: {text}")]
    InvalidCreditFormat {
        /// The offending message text
        text: String,
    },

    /// An undo request did not match `/undo <credit id>`
    ///
    /// Recoverable: the sender is shown the expected format.
    #[error("invalid undo format: {text}")]
    InvalidUndoFormat {
        /// The offending message text
        text: String,
    },

    /// A stats request had trailing text that is not a user mention
    ///
    /// Recoverable: the sender is shown the expected format.
    #[error("invalid stats format: {text}")]
    InvalidStatsFormat {
        /// The offending message text
        text: String,
    },

    /// The mentioned debtor is the bot itself
    ///
    /// Recoverable: the bot politely declines to be lent money.
    #[error("credit request names the bot as debtor")]
    CannotCreditBot,

    /// The mentioned debtor is the sender of the request
    ///
    /// Recoverable: a member cannot lend money to themselves.
    #[error("credit request names the donor as debtor")]
    CannotCreditSelf,

    /// No credit exists with the requested id
    ///
    /// Recoverable: the undo request is rejected, the ledger is unchanged.
    #[error("credit {id} does not exist")]
    CreditNotFound {
        /// The requested credit id
        id: CreditId,
    },

    /// An undo was requested by someone other than the donor
    ///
    /// Recoverable: the undo request is rejected, the ledger is unchanged.
    #[error("credit {id} belongs to {owner}")]
    NotCreditOwner {
        /// The requested credit id
        id: CreditId,
        /// Display name of the donor who owns the credit
        owner: String,
    },

    /// Two transfers covering different user pairs were merged
    ///
    /// This violates the netting engine's accumulator invariant and
    /// indicates a bug; it is logged and answered with the generic
    /// fallback, never with a specific reply.
    #[error("transfers do not involve the same pair of users")]
    PairMismatch,

    /// The document store failed to read or write
    #[error("store error: {message}")]
    Store {
        /// Description of the store failure
        message: String,
    },

    /// The chat transport failed to deliver or receive
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The application configuration could not be loaded
    ///
    /// This is the one fatal category: without a token and a store path the
    /// process cannot start.
    #[error("config error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },
}

impl From<std::io::Error> for BotError {
    fn from(error: std::io::Error) -> Self {
        BotError::Store {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(error: serde_json::Error) -> Self {
        BotError::Store {
            message: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::Transport {
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for BotError {
    fn from(error: toml::de::Error) -> Self {
        BotError::Config {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BotError {
    /// Create an InvalidCreditFormat error
    pub fn invalid_credit_format(text: &str) -> Self {
        BotError::InvalidCreditFormat {
            text: text.to_string(),
        }
    }

    /// Create an InvalidUndoFormat error
    pub fn invalid_undo_format(text: &str) -> Self {
        BotError::InvalidUndoFormat {
            text: text.to_string(),
        }
    }

    /// Create an InvalidStatsFormat error
    pub fn invalid_stats_format(text: &str) -> Self {
        BotError::InvalidStatsFormat {
            text: text.to_string(),
        }
    }

    /// Create a CreditNotFound error
    pub fn credit_not_found(id: CreditId) -> Self {
        BotError::CreditNotFound { id }
    }

    /// Create a NotCreditOwner error
    pub fn not_credit_owner(id: CreditId, owner: &str) -> Self {
        BotError::NotCreditOwner {
            id,
            owner: owner.to_string(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        BotError::Config {
            message: message.into(),
        }
    }
}
