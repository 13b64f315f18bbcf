//! User records and the reconciliation rules applied after each mutation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::IdStrategy;
use crate::constants::DEFAULT_WEBSITE;

/// Identifier of a user record.
pub type UserId = u64;

/// A user record as served by the collection endpoint.
///
/// Only `id`, `name`, `email` and `phone` are interpreted; everything else
/// the API returns (`username`, `website`, `address`, ...) is kept in
/// `extra` and sent back untouched on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Build a record with no passthrough fields.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            extra: Map::new(),
        }
    }

    /// The full replacement body for a PUT: this record with its editable
    /// fields overwritten by the form.
    pub fn with_form(&self, form: &UserForm) -> User {
        User {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            ..self.clone()
        }
    }

    /// Look up a passthrough string field such as `username` or `website`.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// The editable fields of a user, as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl UserForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Pre-fill the form from an existing record.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }

    /// Whether `user`'s editable fields equal this form.
    pub fn matches(&self, user: &User) -> bool {
        user.name == self.name && user.email == self.email && user.phone == self.phone
    }
}

/// POST body for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub website: String,
}

impl NewUser {
    /// Derive the create payload from a submitted form.
    ///
    /// `username` is the name lowercased with all whitespace removed.
    pub fn from_form(form: &UserForm) -> Self {
        let username = form
            .name
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            username,
            website: DEFAULT_WEBSITE.to_string(),
        }
    }
}

/// One greater than the largest id in `users`, or 1 when empty.
///
/// `None` once the largest id is `UserId::MAX`.
pub fn next_id(users: &[User]) -> Option<UserId> {
    match users.iter().map(|u| u.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Give a server-echoed record its id in the local collection.
///
/// `None` when a fresh id is needed and none is left.
pub fn with_assigned_id(created: User, users: &[User], strategy: IdStrategy) -> Option<User> {
    let id = match strategy {
        IdStrategy::Local => next_id(users)?,
        IdStrategy::Server if users.iter().any(|u| u.id == created.id) => {
            tracing::warn!(
                server_id = created.id,
                "server id already present locally; assigning a fresh one"
            );
            next_id(users)?
        }
        IdStrategy::Server => created.id,
    };
    Some(User { id, ..created })
}

/// Reconcile a PUT response with what was submitted.
///
/// The server is authoritative for every field except `phone`, which keeps
/// the submitted value.
pub fn merge_update(server: User, submitted: &UserForm) -> User {
    User {
        phone: submitted.phone.clone(),
        ..server
    }
}
