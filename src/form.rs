//! The add/edit user form.
//!
//! Holds the fields being typed, which record (if any) is being edited, and
//! the inline error shown inside the form.

use std::fmt;

use thiserror::Error;

use crate::models::{User, UserForm, UserId};

/// Rejected form input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
}

/// Every field must be non-empty after trimming.
pub fn validate(form: &UserForm) -> Result<(), ValidationError> {
    let blank = [&form.name, &form.email, &form.phone]
        .iter()
        .any(|f| f.trim().is_empty());
    if blank {
        Err(ValidationError::MissingFields)
    } else {
        Ok(())
    }
}

/// An editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Phone];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "Name"),
            Field::Email => write!(f, "Email"),
            Field::Phone => write!(f, "Phone"),
        }
    }
}

/// Whether the form creates a new user or edits an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(User),
}

/// An open form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub mode: FormMode,
    pub fields: UserForm,
    /// Inline error, shown until a field changes or the form is resubmitted.
    pub error: Option<String>,
}

impl FormState {
    /// Open an empty form for a new user.
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            fields: UserForm::default(),
            error: None,
        }
    }

    /// Open a form pre-filled from `user`.
    pub fn edit(user: User) -> Self {
        Self {
            fields: UserForm::from_user(&user),
            mode: FormMode::Edit(user),
            error: None,
        }
    }

    /// Id of the record being edited, if any.
    pub fn target_id(&self) -> Option<UserId> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(user) => Some(user.id),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add user",
            FormMode::Edit(_) => "Edit user",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add",
            FormMode::Edit(_) => "Update",
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.fields.name,
            Field::Email => &self.fields.email,
            Field::Phone => &self.fields.phone,
        }
    }

    /// Change one field; clears the inline error.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.fields.name = value,
            Field::Email => self.fields.email = value,
            Field::Phone => self.fields.phone = value,
        }
        self.error = None;
    }
}
