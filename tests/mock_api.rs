//! Integration tests using a mock collection endpoint.
//!
//! Drives the controller end-to-end without HTTP by implementing `UserApi`
//! in memory, and checks the reconciliation properties after each mutation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use roster::api::{ApiError, UserApi};
use roster::controller::{Controller, ControllerError, Operation};
use roster::models::{IdStrategy, NewUser, User, UserForm, UserId};

/// A mock endpoint that echoes requests, optionally failing with a status.
struct MockApi {
    seed: Vec<User>,
    server_id: UserId,
    fail_with: Mutex<Option<u16>>,
}

impl MockApi {
    fn new(seed: Vec<User>) -> Self {
        Self {
            seed,
            server_id: 11,
            fail_with: Mutex::new(None),
        }
    }

    fn fail_next(&self, status: u16) {
        *self.fail_with.lock().unwrap() = Some(status);
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.fail_with.lock().unwrap().take() {
            Some(status) => Err(ApiError::Status(status)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserApi for MockApi {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.check()?;
        Ok(self.seed.clone())
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        self.check()?;
        let mut created = User::new(self.server_id, &user.name, &user.email, &user.phone);
        created
            .extra
            .insert("username".into(), serde_json::json!(user.username));
        Ok(created)
    }

    async fn update(&self, user: &User) -> Result<User, ApiError> {
        self.check()?;
        // Echo with a normalised phone, which the client must not keep.
        Ok(User {
            phone: "server-side".to_string(),
            ..user.clone()
        })
    }

    async fn delete(&self, _id: UserId) -> Result<(), ApiError> {
        self.check()
    }
}

fn jsonplaceholder_like(n: u64) -> Vec<User> {
    (1..=n)
        .map(|i| {
            User::new(
                i,
                format!("Person {i}"),
                format!("p{i}@example.com"),
                format!("555-{i:04}"),
            )
        })
        .collect()
}

async fn loaded(api: Arc<MockApi>, strategy: IdStrategy) -> Controller {
    let mut ctrl = Controller::with_settings(api, 10, Duration::from_secs(3), strategy);
    ctrl.load().await;
    ctrl
}

#[tokio::test]
async fn create_adds_exactly_one_with_next_id() {
    let api = Arc::new(MockApi::new(jsonplaceholder_like(10)));
    let mut ctrl = loaded(api, IdStrategy::Local).await;
    let before = ctrl.state().users.len();
    let max = ctrl.state().users.iter().map(|u| u.id).max().unwrap();

    let user = ctrl
        .create(UserForm::new("New Person", "new@example.com", "555-0000"))
        .await
        .unwrap();

    assert_eq!(ctrl.state().users.len(), before + 1);
    assert_eq!(user.id, max + 1);
    assert_eq!(user.extra_str("username"), Some("newperson"));
    assert_eq!(
        ctrl.state().notice.as_ref().map(|n| n.message.as_str()),
        Some("User added successfully!")
    );
}

#[tokio::test]
async fn create_into_empty_collection_starts_at_one() {
    let api = Arc::new(MockApi::new(vec![]));
    let mut ctrl = loaded(api, IdStrategy::Local).await;
    let user = ctrl.create(UserForm::new("A", "a@x", "1")).await.unwrap();
    assert_eq!(user.id, 1);
}

#[tokio::test]
async fn server_strategy_keeps_server_id() {
    let api = Arc::new(MockApi::new(jsonplaceholder_like(3)));
    let mut ctrl = loaded(api, IdStrategy::Server).await;

    let first = ctrl.create(UserForm::new("A", "a@x", "1")).await.unwrap();
    assert_eq!(first.id, 11);
    // Server echoes 11 again; the local copy must stay unique.
    let second = ctrl.create(UserForm::new("B", "b@x", "2")).await.unwrap();
    assert_eq!(second.id, 12);
}

#[tokio::test]
async fn update_changes_exactly_one_record() {
    let api = Arc::new(MockApi::new(jsonplaceholder_like(10)));
    let mut ctrl = loaded(api, IdStrategy::Local).await;
    let form = UserForm::new("Renamed", "renamed@example.com", "555-9999");

    ctrl.update(4, form.clone()).await.unwrap();

    assert_eq!(ctrl.state().users.len(), 10);
    let matching: Vec<UserId> = ctrl
        .state()
        .users
        .iter()
        .filter(|u| form.matches(u))
        .map(|u| u.id)
        .collect();
    assert_eq!(matching, vec![4]);
}

#[tokio::test]
async fn update_of_unknown_id_is_rejected() {
    let api = Arc::new(MockApi::new(jsonplaceholder_like(2)));
    let mut ctrl = loaded(api, IdStrategy::Local).await;
    let err = ctrl.update(99, UserForm::new("x", "y", "z")).await.unwrap_err();
    assert_eq!(err, ControllerError::UnknownUser(99));
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let api = Arc::new(MockApi::new(jsonplaceholder_like(10)));
    let mut ctrl = loaded(api, IdStrategy::Local).await;

    assert!(ctrl.request_delete(7));
    assert!(ctrl.confirm_delete(true).await);

    assert_eq!(ctrl.state().users.len(), 9);
    assert!(ctrl.state().users.iter().all(|u| u.id != 7));
}

#[tokio::test]
async fn failed_mutations_leave_collection_untouched() {
    let api = Arc::new(MockApi::new(jsonplaceholder_like(3)));
    let mut ctrl = loaded(api.clone(), IdStrategy::Local).await;
    let before = ctrl.state().users.clone();

    api.fail_next(503);
    let err = ctrl.create(UserForm::new("A", "a@x", "1")).await.unwrap_err();
    assert_eq!(
        err,
        ControllerError::Api {
            operation: Operation::Create,
            source: ApiError::Status(503),
        }
    );
    assert_eq!(
        ctrl.state().error.as_deref(),
        Some("Failed to add user: HTTP error! status: 503")
    );

    api.fail_next(500);
    ctrl.request_delete(1);
    assert!(!ctrl.confirm_delete(true).await);

    assert_eq!(ctrl.state().users, before);
}

#[tokio::test]
async fn shrinking_collection_resets_stale_page() {
    let api = Arc::new(MockApi::new(jsonplaceholder_like(26)));
    let mut ctrl = loaded(api, IdStrategy::Local).await;
    ctrl.go_to_page(3);
    assert_eq!(ctrl.view().page, 3);

    ctrl.request_delete(26);
    ctrl.confirm_delete(true).await;
    let view = ctrl.view();
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.page, 1);

    // 25 left at 10 per page: page 4 does not exist.
    ctrl.go_to_page(4);
    assert_eq!(ctrl.view().page, 1);
}

#[tokio::test(start_paused = true)]
async fn newer_notice_outlives_older_timer() {
    let api = Arc::new(MockApi::new(jsonplaceholder_like(3)));
    let mut ctrl = loaded(api, IdStrategy::Local).await;

    ctrl.request_delete(1);
    ctrl.confirm_delete(true).await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    ctrl.request_delete(2);
    ctrl.confirm_delete(true).await;

    // The first timer was cancelled, so the second notice stays for its full 3s.
    tokio::time::sleep(Duration::from_secs(2)).await;
    ctrl.drain_events();
    assert!(ctrl.state().notice.is_some());

    ctrl.next_event().await;
    assert!(ctrl.state().notice.is_none());
}
