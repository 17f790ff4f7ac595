//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `user`: User identity types
//! - `credit`: Credit records and derived transfers
//! - `message`: Inbound chat messages and mention entities
//! - `error`: Error types for the credits bot

pub mod credit;
pub mod error;
pub mod message;
pub mod user;

pub use credit::{Credit, CreditId, Transfer};
pub use error::BotError;
pub use message::{ChatId, InboundMessage, Mention, MessageId};
pub use user::{User, UserId};
