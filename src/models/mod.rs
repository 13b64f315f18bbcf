//! Shared types used across all modules.
//!
//! The user record, the form input it is edited through, and the pure merge
//! functions that reconcile server responses with the local collection.
//! Other modules import from here rather than reaching into each other's
//! internals.

pub mod user;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use user::{NewUser, User, UserForm, UserId, merge_update, next_id, with_assigned_id};

/// How a freshly created user gets its id in the local collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Ignore the id echoed by the server and use `max(existing) + 1`.
    #[default]
    Local,
    /// Keep the id echoed by the server, unless it collides with one
    /// already in the collection.
    Server,
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Local => write!(f, "local"),
            IdStrategy::Server => write!(f, "server"),
        }
    }
}

impl std::str::FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(IdStrategy::Local),
            "server" => Ok(IdStrategy::Server),
            other => Err(format!(
                "unsupported id strategy: '{other}'. Supported: local, server"
            )),
        }
    }
}
