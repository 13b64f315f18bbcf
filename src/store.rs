//! Session state and the reducer that updates it.
//!
//! All state the interface renders from lives in [`AppState`]. It only
//! changes through [`reduce`], one [`Action`] at a time; nothing else
//! mutates it.

use crate::form::{Field, FormState};
use crate::listing::{self, PageView};
use crate::models::{self, User, UserForm, UserId};
use crate::notice::Notice;

/// Everything the interface shows.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// The local copy of the collection.
    pub users: Vec<User>,
    pub search: String,
    /// Current 1-based page of the filtered view.
    pub page: usize,
    pub page_size: usize,
    pub loading: bool,
    /// Error banner; replaced by the next error or cleared when an
    /// operation starts.
    pub error: Option<String>,
    pub notice: Option<Notice>,
    /// Open add/edit form.
    pub form: Option<FormState>,
    /// User awaiting delete confirmation.
    pub pending_delete: Option<UserId>,
    notice_seq: u64,
}

impl AppState {
    pub fn new(page_size: usize) -> Self {
        Self {
            users: Vec::new(),
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
            loading: false,
            error: None,
            notice: None,
            form: None,
            pending_delete: None,
            notice_seq: 0,
        }
    }

    /// The current page of the filtered view.
    pub fn view(&self) -> PageView {
        listing::page_view(&self.users, &self.search, self.page, self.page_size)
    }

    /// Number of pages in the filtered view.
    pub fn total_pages(&self) -> usize {
        listing::page_count(
            listing::filter_by_name(&self.users, &self.search).len(),
            self.page_size,
        )
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn with_notice(mut self, message: impl Into<String>) -> Self {
        self.notice_seq += 1;
        self.notice = Some(Notice {
            message: message.into(),
            generation: self.notice_seq,
        });
        self
    }

    /// Replace the collection; the page goes back to 1.
    fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self.page = 1;
        self
    }
}

/// A state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadStarted,
    Loaded(Vec<User>),
    LoadFailed(String),
    /// A create/update/delete request is about to be sent.
    MutationStarted,
    MutationFailed(String),
    /// A user was created; carries the record with its local id assigned.
    Created(User),
    /// The server echoed the updated user `id`.
    Updated {
        id: UserId,
        server: User,
        submitted: UserForm,
    },
    Deleted(UserId),
    NoticeExpired(u64),
    SetSearch(String),
    GoToPage(usize),
    NextPage,
    PrevPage,
    OpenCreateForm,
    OpenEditForm(UserId),
    SetField(Field, String),
    /// Show an error inside the open form and keep it open.
    FormFailed(String),
    CloseForm,
    RequestDelete(UserId),
    CancelDelete,
}

/// Apply `action` to `state`.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::LoadStarted => AppState {
            loading: true,
            error: None,
            ..state
        },
        Action::Loaded(users) => AppState {
            loading: false,
            ..state
        }
        .with_users(users),
        Action::LoadFailed(message) => AppState {
            loading: false,
            error: Some(message),
            ..state
        },

        Action::MutationStarted => AppState {
            error: None,
            notice: None,
            ..state
        },
        Action::MutationFailed(message) => AppState {
            error: Some(message),
            ..state
        },
        Action::Created(user) => {
            let mut users = state.users.clone();
            users.push(user);
            state.with_users(users).with_notice("User added successfully!")
        }
        Action::Updated { id, server, submitted } => {
            let merged = User {
                id,
                ..models::merge_update(server, &submitted)
            };
            let users = state
                .users
                .iter()
                .map(|u| if u.id == id { merged.clone() } else { u.clone() })
                .collect();
            state.with_users(users).with_notice("User updated successfully!")
        }
        Action::Deleted(id) => {
            let users = state.users.iter().filter(|u| u.id != id).cloned().collect();
            AppState {
                pending_delete: None,
                ..state
            }
            .with_users(users)
            .with_notice("User deleted successfully!")
        }

        Action::NoticeExpired(generation) => {
            if state.notice.as_ref().is_some_and(|n| n.generation == generation) {
                AppState {
                    notice: None,
                    ..state
                }
            } else {
                state
            }
        }

        Action::SetSearch(search) => AppState {
            search,
            page: 1,
            ..state
        },
        Action::GoToPage(page) => {
            let page = listing::normalize_page(page, state.total_pages());
            AppState { page, ..state }
        }
        Action::NextPage => {
            let page = if state.page < state.total_pages() {
                state.page + 1
            } else {
                state.page
            };
            AppState { page, ..state }
        }
        Action::PrevPage => AppState {
            page: state.page.saturating_sub(1).max(1),
            ..state
        },

        Action::OpenCreateForm => AppState {
            form: Some(FormState::create()),
            ..state
        },
        Action::OpenEditForm(id) => match state.user(id).cloned() {
            Some(user) => AppState {
                form: Some(FormState::edit(user)),
                ..state
            },
            None => AppState {
                error: Some(format!("No user with id {id}")),
                ..state
            },
        },
        Action::SetField(field, value) => {
            let mut state = state;
            if let Some(form) = state.form.as_mut() {
                form.set_field(field, value);
            }
            state
        }
        Action::FormFailed(message) => {
            let mut state = state;
            if let Some(form) = state.form.as_mut() {
                form.error = Some(message);
            }
            state
        }
        Action::CloseForm => AppState { form: None, ..state },

        Action::RequestDelete(id) => {
            if state.user(id).is_some() {
                AppState {
                    pending_delete: Some(id),
                    ..state
                }
            } else {
                AppState {
                    error: Some(format!("No user with id {id}")),
                    ..state
                }
            }
        }
        Action::CancelDelete => AppState {
            pending_delete: None,
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loaded(n: u64, page_size: usize) -> AppState {
        let users = (1..=n).map(|i| User::new(i, format!("User {i}"), "", "")).collect();
        reduce(AppState::new(page_size), Action::Loaded(users))
    }

    #[test]
    fn load_lifecycle() {
        let state = reduce(AppState::new(5), Action::LoadStarted);
        assert!(state.loading);

        let state = reduce(state, Action::Loaded(vec![User::new(1, "Ann", "", "")]));
        assert!(!state.loading);
        assert_eq!(state.users.len(), 1);

        let state = reduce(state, Action::LoadStarted);
        let state = reduce(state, Action::LoadFailed("Failed to load users: boom".into()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Failed to load users: boom"));
        // A failed reload keeps what was there.
        assert_eq!(state.users.len(), 1);
    }

    #[test]
    fn search_resets_page() {
        let state = reduce(loaded(12, 5), Action::GoToPage(3));
        assert_eq!(state.page, 3);
        let state = reduce(state, Action::SetSearch("user 1".into()));
        assert_eq!(state.page, 1);
        // "User 1", "User 10", "User 11", "User 12"
        assert_eq!(state.view().matches, 4);
    }

    #[test]
    fn navigation_stops_at_edges() {
        let state = loaded(12, 5);
        let state = reduce(state, Action::PrevPage);
        assert_eq!(state.page, 1);
        let state = reduce(reduce(state, Action::NextPage), Action::NextPage);
        assert_eq!(state.page, 3);
        let state = reduce(state, Action::NextPage);
        assert_eq!(state.page, 3);
    }

    #[test]
    fn go_to_missing_page_falls_back_to_first() {
        let state = reduce(loaded(25, 10), Action::GoToPage(4));
        assert_eq!(state.page, 1);
        let state = reduce(state, Action::GoToPage(0));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn created_appends_and_notifies() {
        let state = reduce(loaded(3, 5), Action::MutationStarted);
        let state = reduce(state, Action::Created(User::new(4, "Cy", "cy@example.com", "1")));
        assert_eq!(state.users.len(), 4);
        assert_eq!(state.users.last().unwrap().id, 4);
        assert_eq!(state.notice.as_ref().unwrap().message, "User added successfully!");
    }

    #[test]
    fn updated_replaces_one_record() {
        let state = loaded(3, 5);
        let submitted = UserForm::new("Bee", "bee@example.com", "555-0102");
        let server = User::new(2, "Bee", "bee@example.com", "server-phone");
        let state = reduce(
            state,
            Action::Updated {
                id: 2,
                server,
                submitted: submitted.clone(),
            },
        );
        assert_eq!(state.users.len(), 3);
        let matching: Vec<_> = state.users.iter().filter(|u| submitted.matches(u)).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, 2);
        assert_eq!(state.notice.as_ref().unwrap().message, "User updated successfully!");
    }

    #[test]
    fn deleted_removes_record_and_pending_confirmation() {
        let state = reduce(loaded(3, 5), Action::RequestDelete(2));
        assert_eq!(state.pending_delete, Some(2));
        let state = reduce(state, Action::Deleted(2));
        assert_eq!(state.users.len(), 2);
        assert!(state.user(2).is_none());
        assert_eq!(state.pending_delete, None);
    }

    #[test]
    fn request_delete_of_unknown_user_sets_error() {
        let state = reduce(loaded(1, 5), Action::RequestDelete(42));
        assert_eq!(state.pending_delete, None);
        assert_eq!(state.error.as_deref(), Some("No user with id 42"));
    }

    #[test]
    fn collection_change_resets_page() {
        let state = reduce(loaded(12, 5), Action::GoToPage(3));
        let state = reduce(state, Action::Deleted(12));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn stale_notice_expiry_is_ignored() {
        let state = reduce(loaded(3, 5), Action::Deleted(1));
        let first = state.notice.clone().unwrap();
        let state = reduce(state, Action::Deleted(2));
        let second = state.notice.clone().unwrap();
        assert!(second.generation > first.generation);

        let state = reduce(state, Action::NoticeExpired(first.generation));
        assert_eq!(state.notice, Some(second.clone()));
        let state = reduce(state, Action::NoticeExpired(second.generation));
        assert_eq!(state.notice, None);
    }

    #[test]
    fn mutation_start_clears_banners() {
        let mut state = reduce(loaded(2, 5), Action::Deleted(1));
        state.error = Some("old".into());
        let state = reduce(state, Action::MutationStarted);
        assert_eq!(state.error, None);
        assert_eq!(state.notice, None);
    }

    #[test]
    fn form_lifecycle() {
        let state = reduce(loaded(2, 5), Action::OpenEditForm(2));
        assert_eq!(state.form.as_ref().unwrap().target_id(), Some(2));

        let state = reduce(state, Action::FormFailed("HTTP error! status: 500".into()));
        assert_eq!(
            state.form.as_ref().unwrap().error.as_deref(),
            Some("HTTP error! status: 500")
        );

        let state = reduce(state, Action::SetField(Field::Phone, "1".into()));
        let form = state.form.as_ref().unwrap();
        assert_eq!(form.fields.phone, "1");
        assert!(form.error.is_none());

        let state = reduce(state, Action::CloseForm);
        assert!(state.form.is_none());
    }

    #[test]
    fn open_edit_for_unknown_user_keeps_form_closed() {
        let state = reduce(loaded(2, 5), Action::OpenEditForm(9));
        assert!(state.form.is_none());
        assert!(state.error.is_some());
    }
}
