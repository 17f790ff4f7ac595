//! Core business logic module
//!
//! This module contains the core credit-handling components:
//! - `ledger` - Credit collection with idempotent insert and owner-gated removal
//! - `netting` - Debt netting into minimal pairwise transfers
//! - `dispatcher` - Intent classification and request routing
//! - `replies` - All user-facing reply texts

pub mod dispatcher;
pub mod ledger;
pub mod netting;
pub mod replies;

pub use dispatcher::{Dispatcher, Intent};
pub use ledger::LedgerStore;
pub use netting::net_credits;
