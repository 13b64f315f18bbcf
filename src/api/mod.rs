//! UserApi trait and the remote collection endpoint.
//!
//! The controller talks to the collection only through [`UserApi`], so tests
//! can substitute an in-memory implementation for the HTTP one.

pub mod rest;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User, UserId};

pub use rest::RestUserApi;

/// Errors from the collection endpoint.
///
/// The `Display` text is the cause shown after the operation prefix in the
/// error banner, e.g. `Failed to load users: HTTP error! status: 500`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// A remote collection of user records.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Fetch the whole collection.
    async fn list(&self) -> Result<Vec<User>, ApiError>;

    /// Create a user; returns the record as echoed by the server.
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;

    /// Replace the record with `user.id`; returns the server's version.
    async fn update(&self, user: &User) -> Result<User, ApiError>;

    /// Delete the record with `id`.
    async fn delete(&self, id: UserId) -> Result<(), ApiError>;
}
