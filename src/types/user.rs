//! User identity types
//!
//! Chat-platform users appear in two forms: fully resolved users delivered by
//! the transport (numeric id, display name, optional username) and users that
//! are only ever named through a plain `@name` token in message text. Both are
//! represented by [`User`], with the distinction carried in [`UserId`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier
///
/// Users mentioned through rich mention entities carry their numeric platform
/// id. Users mentioned only by a plain `@name` token have no resolvable id, so
/// the handle itself (including the `@`) becomes their identity, matching how
/// the ledger stores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// Numeric platform identifier
    Id(i64),
    /// Plain-text `@name` handle used as identity
    Handle(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Id(id) => write!(f, "{}", id),
            UserId::Handle(handle) => write!(f, "{}", handle),
        }
    }
}

/// A chat group member
///
/// Identity comparisons throughout the ledger and netting engine go through
/// [`User::same_identity`], which compares by [`UserId`] only; display names
/// are presentation data and may change between messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity of the user (numeric id or `@name` handle)
    pub id: UserId,

    /// Display name used in replies
    pub first_name: String,

    /// Platform username without the leading `@`, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl User {
    /// Create a user with a numeric platform id
    pub fn with_id(id: i64, first_name: impl Into<String>) -> Self {
        User {
            id: UserId::Id(id),
            first_name: first_name.into(),
            username: None,
        }
    }

    /// Create a user known only through a plain `@name` handle
    ///
    /// The handle (with its leading `@`) becomes the identity and the name
    /// behind the `@` becomes the display name, so `@anna` and a later
    /// `@anna` mention compare equal.
    pub fn from_handle(handle: &str) -> Self {
        User {
            id: UserId::Handle(handle.to_string()),
            first_name: handle.trim_start_matches('@').to_string(),
            username: Some(handle.trim_start_matches('@').to_string()),
        }
    }

    /// Whether two user records refer to the same member
    ///
    /// Compares by id. A handle identity additionally matches a resolved
    /// user whose username equals the handle, so `@anna` and the resolved
    /// user `anna` net against each other.
    pub fn same_identity(&self, other: &User) -> bool {
        if self.id == other.id {
            return true;
        }
        match (&self.id, &other.id) {
            (UserId::Handle(handle), _) => Self::handle_matches(handle, other),
            (_, UserId::Handle(handle)) => Self::handle_matches(handle, self),
            _ => false,
        }
    }

    fn handle_matches(handle: &str, user: &User) -> bool {
        user.username
            .as_deref()
            .is_some_and(|name| name == handle.trim_start_matches('@'))
    }
}
