//! The list/filter/paginate/sync controller.
//!
//! Owns the session [`AppState`] and the [`UserApi`] it synchronises with.
//! Every operation sends at most one request, then dispatches actions to
//! the store; the local collection is patched from the response rather than
//! re-fetched.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::api::{ApiError, UserApi};
use crate::config::Config;
use crate::form::{Field, FormMode, ValidationError};
use crate::listing::PageView;
use crate::models::{self, IdStrategy, NewUser, User, UserForm, UserId};
use crate::notice::NoticeTimer;
use crate::store::{self, Action, AppState};

/// A remote operation, used to prefix failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Load => "Failed to load users",
            Operation::Create => "Failed to add user",
            Operation::Update => "Failed to update user",
            Operation::Delete => "Failed to delete user",
        }
    }
}

/// Errors surfaced to the form layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}: {source}", .operation.failure_prefix())]
    Api {
        operation: Operation,
        source: ApiError,
    },

    #[error("no user with id {0}")]
    UnknownUser(UserId),

    #[error("no form is open")]
    NoForm,

    #[error("no free user id left")]
    IdsExhausted,
}

/// Session controller.
pub struct Controller {
    api: Arc<dyn UserApi>,
    state: AppState,
    id_strategy: IdStrategy,
    notice_ttl: Duration,
    timer: NoticeTimer,
    events: UnboundedReceiver<Action>,
}

impl Controller {
    /// Create a controller with settings from `config`.
    pub fn new(api: Arc<dyn UserApi>, config: &Config) -> Self {
        Self::with_settings(
            api,
            config.ui.page_size,
            Duration::from_secs(config.ui.notice_secs),
            config.sync.id_strategy,
        )
    }

    pub fn with_settings(
        api: Arc<dyn UserApi>,
        page_size: usize,
        notice_ttl: Duration,
        id_strategy: IdStrategy,
    ) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        Self {
            api,
            state: AppState::new(page_size),
            id_strategy,
            notice_ttl,
            timer: NoticeTimer::new(sender),
            events,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The page currently visible.
    pub fn view(&self) -> PageView {
        self.state.view()
    }

    /// Apply an action and keep the notice timer in step with the notice.
    pub fn dispatch(&mut self, action: Action) {
        let before = self.state.notice.as_ref().map(|n| n.generation);
        let state = std::mem::replace(&mut self.state, AppState::new(1));
        self.state = store::reduce(state, action);

        let after = self.state.notice.as_ref().map(|n| n.generation);
        if before != after {
            match after {
                Some(generation) => self.timer.schedule(generation, self.notice_ttl),
                None => self.timer.cancel(),
            }
        }
    }

    /// Apply timer events that have already fired. Returns how many there were.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.events.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    /// Wait for the next timer event and apply it.
    pub async fn next_event(&mut self) {
        if let Some(action) = self.events.recv().await {
            self.dispatch(action);
        }
    }

    // ── Collection synchronisation ──────────────────────────────────

    /// Fetch the whole collection, replacing the local copy.
    ///
    /// Failures only show the error banner.
    pub async fn load(&mut self) {
        self.dispatch(Action::LoadStarted);
        match self.api.list().await {
            Ok(users) => {
                tracing::info!(count = users.len(), "loaded users");
                self.dispatch(Action::Loaded(users));
            }
            Err(e) => {
                let err = api_error(Operation::Load, e);
                tracing::warn!(error = %err, "load failed");
                self.dispatch(Action::LoadFailed(err.to_string()));
            }
        }
    }

    /// Create a user and append it locally. Returns the stored record.
    pub async fn create(&mut self, input: UserForm) -> Result<User, ControllerError> {
        self.dispatch(Action::MutationStarted);
        let payload = NewUser::from_form(&input);
        match self.api.create(&payload).await {
            Ok(created) => {
                tracing::info!(server_id = created.id, "created user");
                let users = &self.state.users;
                let Some(user) = models::with_assigned_id(created, users, self.id_strategy) else {
                    let err = ControllerError::IdsExhausted;
                    tracing::warn!(error = %err, "cannot store created user");
                    self.dispatch(Action::MutationFailed(format!(
                        "{}: {err}",
                        Operation::Create.failure_prefix()
                    )));
                    return Err(err);
                };
                self.dispatch(Action::Created(user.clone()));
                Ok(user)
            }
            Err(e) => Err(self.fail(Operation::Create, e)),
        }
    }

    /// Replace user `id` remotely and patch the local copy.
    pub async fn update(&mut self, id: UserId, input: UserForm) -> Result<User, ControllerError> {
        let current = self
            .state
            .user(id)
            .cloned()
            .ok_or(ControllerError::UnknownUser(id))?;

        self.dispatch(Action::MutationStarted);
        match self.api.update(&current.with_form(&input)).await {
            Ok(server) => {
                tracing::info!(id, "updated user");
                self.dispatch(Action::Updated {
                    id,
                    server,
                    submitted: input,
                });
                self.state.user(id).cloned().ok_or(ControllerError::UnknownUser(id))
            }
            Err(e) => Err(self.fail(Operation::Update, e)),
        }
    }

    /// Ask for confirmation before deleting user `id`.
    ///
    /// Returns `false` (and shows an error) if there is no such user.
    pub fn request_delete(&mut self, id: UserId) -> bool {
        self.dispatch(Action::RequestDelete(id));
        self.state.pending_delete == Some(id)
    }

    /// Resolve a pending delete. Returns `true` if a user was deleted.
    ///
    /// Declining sends nothing. A failed request only shows the error banner.
    pub async fn confirm_delete(&mut self, accepted: bool) -> bool {
        let Some(id) = self.state.pending_delete else {
            return false;
        };
        if !accepted {
            self.dispatch(Action::CancelDelete);
            return false;
        }

        self.dispatch(Action::MutationStarted);
        match self.api.delete(id).await {
            Ok(()) => {
                tracing::info!(id, "deleted user");
                self.dispatch(Action::Deleted(id));
                true
            }
            Err(e) => {
                self.dispatch(Action::CancelDelete);
                self.fail(Operation::Delete, e);
                false
            }
        }
    }

    fn fail(&mut self, operation: Operation, source: ApiError) -> ControllerError {
        let err = api_error(operation, source);
        tracing::warn!(error = %err, "request failed");
        self.dispatch(Action::MutationFailed(err.to_string()));
        err
    }

    // ── Form ────────────────────────────────────────────────────────

    pub fn open_create_form(&mut self) {
        self.dispatch(Action::OpenCreateForm);
    }

    /// Open the form for user `id`. Returns `false` if there is no such user.
    pub fn open_edit_form(&mut self, id: UserId) -> bool {
        self.dispatch(Action::OpenEditForm(id));
        self.state.form.is_some()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.dispatch(Action::SetField(field, value.into()));
    }

    pub fn close_form(&mut self) {
        self.dispatch(Action::CloseForm);
    }

    /// Validate and submit the open form.
    ///
    /// On success the form closes. On failure it stays open with the error
    /// shown inline, and the error is returned.
    pub async fn submit_form(&mut self) -> Result<User, ControllerError> {
        let form = self.state.form.clone().ok_or(ControllerError::NoForm)?;

        if let Err(e) = crate::form::validate(&form.fields) {
            self.dispatch(Action::FormFailed(e.to_string()));
            return Err(e.into());
        }

        let result = match form.mode {
            FormMode::Create => self.create(form.fields).await,
            FormMode::Edit(user) => self.update(user.id, form.fields).await,
        };

        match result {
            Ok(user) => {
                self.dispatch(Action::CloseForm);
                Ok(user)
            }
            Err(e) => {
                let inline = match &e {
                    ControllerError::Api { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                self.dispatch(Action::FormFailed(inline));
                Err(e)
            }
        }
    }

    // ── Search & pagination ─────────────────────────────────────────

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.dispatch(Action::SetSearch(search.into()));
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.dispatch(Action::GoToPage(page));
    }

    pub fn next_page(&mut self) {
        self.dispatch(Action::NextPage);
    }

    pub fn prev_page(&mut self) {
        self.dispatch(Action::PrevPage);
    }
}

fn api_error(operation: Operation, source: ApiError) -> ControllerError {
    ControllerError::Api { operation, source }
}
