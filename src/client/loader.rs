//! Dashboard loading orchestration.
//!
//! One sequential chain per page view: read credentials → validate the
//! session → fetch records → aggregate → publish to shared state. A
//! rejected session short-circuits the fetch; the two steps are never in
//! flight concurrently for one session. Dropping the returned future
//! abandons any in-flight request without touching shared state, because
//! publication happens only after the whole chain succeeds.

use std::sync::Arc;

use uuid::Uuid;

use crate::client::api::{ApiFailure, AuthApi, UsersApi};
use crate::client::guard::{RoleRequirement, SessionGuard};
use crate::client::notify::{NotificationSink, Severity};
use crate::client::session::SessionStore;
use crate::client::state::SharedState;
use crate::client::{LoadOutcome, RejectReason};
use crate::models::user::UserResponse;
use crate::services::usage::{self, FleetMetrics, StorageUsage};

/// Everything the admin overview renders.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboard {
    pub users: Vec<UserResponse>,
    pub metrics: FleetMetrics,
    /// Display-only currency estimate derived from `metrics.total_bought`.
    pub revenue_eur: f64,
}

/// Everything the member homepage renders.
#[derive(Debug, Clone, PartialEq)]
pub struct UserHome {
    pub user: UserResponse,
    pub storage: StorageUsage,
}

/// How the user arrived on the homepage, for the one-shot entry toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEvent {
    /// Fresh registration: greet the new account.
    Registered,
    /// Repeat login: the welcome-back toast is intentionally suppressed.
    ReturningLogin,
}

pub struct DashboardLoader {
    auth: Arc<dyn AuthApi>,
    users: Arc<dyn UsersApi>,
    session: Arc<dyn SessionStore>,
    shared: Arc<SharedState>,
    sink: Arc<dyn NotificationSink>,
}

struct Credentials {
    id: Uuid,
    token: String,
}

impl DashboardLoader {
    pub fn new(
        auth: Arc<dyn AuthApi>,
        users: Arc<dyn UsersApi>,
        session: Arc<dyn SessionStore>,
        shared: Arc<SharedState>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            auth,
            users,
            session,
            shared,
            sink,
        }
    }

    /// Load the admin overview: validate against the admin gate, fetch the
    /// fleet, aggregate.
    pub async fn load_admin_dashboard(&self) -> LoadOutcome<AdminDashboard> {
        let Some(creds) = self.credentials() else {
            return self.reject(RejectReason::MissingCredentials);
        };

        let mut guard = SessionGuard::new(Arc::clone(&self.auth));
        if let Err(reason) = guard.start(Some(&creds.token), RoleRequirement::Admin).await {
            return self.reject(reason);
        }

        let users = match self.users.get_all_users(&creds.token).await {
            Ok(users) => users,
            Err(e) => return self.reject(classify_fetch(e)),
        };

        let metrics = usage::aggregate_fleet(&users);
        tracing::info!(
            user_count = metrics.user_count,
            total_files = metrics.total_files,
            "Admin dashboard loaded"
        );
        LoadOutcome::Loaded(AdminDashboard {
            revenue_eur: usage::revenue_estimate(metrics.total_bought),
            users,
            metrics,
        })
    }

    /// Load the member homepage: validate, fetch the user's own record
    /// (unless already cached for the same identity), derive usage, publish.
    pub async fn load_user_home(&self, entry: Option<EntryEvent>) -> LoadOutcome<UserHome> {
        match entry {
            Some(EntryEvent::Registered) => self
                .sink
                .notify("Your account has been created!", Severity::Success),
            Some(EntryEvent::ReturningLogin) => {
                // Welcome-back toast deliberately stays silent.
            }
            None => {}
        }

        let Some(creds) = self.credentials() else {
            return self.reject(RejectReason::MissingCredentials);
        };

        let mut guard = SessionGuard::new(Arc::clone(&self.auth));
        if let Err(reason) = guard
            .start(Some(&creds.token), RoleRequirement::AnyValid)
            .await
        {
            return self.reject(reason);
        }

        // Same identity already in shared state: skip the redundant fetch.
        if let Some(cached) = self.shared.user() {
            if cached.id == creds.id {
                let storage = usage::compute_usage(&cached);
                return LoadOutcome::Loaded(UserHome {
                    user: cached,
                    storage,
                });
            }
        }

        let fetched = match self.users.get_user_data(creds.id, &creds.token).await {
            Ok(fetched) => fetched,
            Err(e) => return self.reject(classify_fetch(e)),
        };
        let Some(user) = fetched else {
            return self.reject(RejectReason::InvalidInput);
        };

        let storage = usage::compute_usage(&user);
        self.shared.update(user.clone());
        self.shared.update_storage(storage);

        LoadOutcome::Loaded(UserHome { user, storage })
    }

    /// Both artifacts must be present before anything goes on the wire.
    fn credentials(&self) -> Option<Credentials> {
        let id = self.session.identifier()?;
        let token = self.session.token()?;
        Some(Credentials { id, token })
    }

    /// The single rejection path: apply the session policy, emit exactly
    /// one notification, attach the redirect.
    fn reject<T>(&self, reason: RejectReason) -> LoadOutcome<T> {
        if !reason.preserves_session() {
            self.session.clear();
        }
        self.sink.notify(reason.message(), Severity::Error);
        tracing::warn!(?reason, "Dashboard load rejected");
        LoadOutcome::Rejected {
            reason,
            redirect: reason.redirect(),
        }
    }
}

fn classify_fetch(failure: ApiFailure) -> RejectReason {
    match failure {
        ApiFailure::Unauthorized => RejectReason::Unauthorized,
        ApiFailure::Transport(_) => RejectReason::FetchFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::RoleClaims;
    use crate::client::notify::MemorySink;
    use crate::client::session::MemorySessionStore;
    use crate::client::Redirect;
    use crate::models::file::StoredFile;
    use crate::models::user::UserRole;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockAuth {
        verdict: Result<UserRole, ApiFailure>,
        calls: AtomicUsize,
    }

    impl MockAuth {
        fn ok(role: UserRole) -> Self {
            Self {
                verdict: Ok(role),
                calls: AtomicUsize::new(0),
            }
        }

        fn unauthorized() -> Self {
            Self {
                verdict: Err(ApiFailure::Unauthorized),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AuthApi for MockAuth {
        async fn verify_token(&self, _token: &str) -> Result<RoleClaims, ApiFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.verdict {
                Ok(role) => Ok(RoleClaims {
                    subject: Uuid::nil(),
                    role: *role,
                }),
                Err(ApiFailure::Unauthorized) => Err(ApiFailure::Unauthorized),
                Err(ApiFailure::Transport(msg)) => Err(ApiFailure::Transport(msg.clone())),
            }
        }
    }

    enum FetchBehavior {
        Users(Vec<UserResponse>),
        Unauthorized,
        Transport,
    }

    struct MockUsers {
        behavior: FetchBehavior,
        calls: AtomicUsize,
    }

    impl MockUsers {
        fn with(behavior: FetchBehavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UsersApi for MockUsers {
        async fn get_all_users(&self, _token: &str) -> Result<Vec<UserResponse>, ApiFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                FetchBehavior::Users(users) => Ok(users.clone()),
                FetchBehavior::Unauthorized => Err(ApiFailure::Unauthorized),
                FetchBehavior::Transport => Err(ApiFailure::Transport("down".to_string())),
            }
        }

        async fn get_user_data(
            &self,
            id: Uuid,
            _token: &str,
        ) -> Result<Option<UserResponse>, ApiFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                FetchBehavior::Users(users) => Ok(users.iter().find(|u| u.id == id).cloned()),
                FetchBehavior::Unauthorized => Err(ApiFailure::Unauthorized),
                FetchBehavior::Transport => Err(ApiFailure::Transport("down".to_string())),
            }
        }
    }

    fn user_with_files(quota: u64, sizes: &[u64]) -> UserResponse {
        let id = Uuid::new_v4();
        UserResponse {
            id,
            email: format!("{id}@example.com"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: UserRole::Member,
            total_user_storage: quota,
            files: sizes
                .iter()
                .map(|&size| StoredFile {
                    id: Uuid::new_v4(),
                    owner_id: id,
                    name: format!("file-{size}"),
                    size,
                    uploaded_at: Utc::now(),
                })
                .collect(),
            created_at: Utc::now(),
        }
    }

    struct Harness {
        loader: DashboardLoader,
        users: Arc<MockUsers>,
        session: Arc<MemorySessionStore>,
        shared: Arc<SharedState>,
        sink: Arc<MemorySink>,
    }

    fn harness(auth: MockAuth, users: MockUsers) -> Harness {
        let users = Arc::new(users);
        let session = Arc::new(MemorySessionStore::new());
        let shared = Arc::new(SharedState::new());
        let sink = Arc::new(MemorySink::new());
        let loader = DashboardLoader::new(
            Arc::new(auth),
            users.clone(),
            session.clone(),
            shared.clone(),
            sink.clone(),
        );
        Harness {
            loader,
            users,
            session,
            shared,
            sink,
        }
    }

    #[tokio::test]
    async fn missing_identifier_rejected_without_network() {
        let h = harness(
            MockAuth::ok(UserRole::Admin),
            MockUsers::with(FetchBehavior::Users(vec![])),
        );
        h.session.set_token("x");

        let outcome = h.loader.load_admin_dashboard().await;
        assert_eq!(
            outcome.rejection(),
            Some(RejectReason::MissingCredentials)
        );
        assert_eq!(h.users.calls(), 0);
        assert_eq!(h.sink.count(), 1);
    }

    #[tokio::test]
    async fn missing_token_rejected_without_network() {
        let h = harness(
            MockAuth::ok(UserRole::Admin),
            MockUsers::with(FetchBehavior::Users(vec![])),
        );
        h.session.set_identifier(Uuid::new_v4());

        let outcome = h.loader.load_user_home(None).await;
        assert_eq!(
            outcome.rejection(),
            Some(RejectReason::MissingCredentials)
        );
        assert_eq!(h.users.calls(), 0);
    }

    #[tokio::test]
    async fn admin_flow_aggregates_fleet() {
        let fleet = vec![
            user_with_files(1000, &[100]),
            user_with_files(2000, &[]),
            user_with_files(3000, &[50, 50]),
        ];
        let h = harness(
            MockAuth::ok(UserRole::Admin),
            MockUsers::with(FetchBehavior::Users(fleet)),
        );
        h.session.store(Uuid::new_v4(), "admin-token");

        let outcome = h.loader.load_admin_dashboard().await;
        let LoadOutcome::Loaded(dashboard) = outcome else {
            panic!("expected a loaded dashboard");
        };
        assert_eq!(dashboard.metrics.total_bought, 6000);
        assert_eq!(dashboard.metrics.total_used, 200);
        assert_eq!(dashboard.metrics.total_files, 3);
        assert_eq!(dashboard.metrics.user_count, 3);
        assert_eq!(h.sink.count(), 0);
    }

    #[tokio::test]
    async fn member_on_admin_gate_keeps_session() {
        let h = harness(
            MockAuth::ok(UserRole::Member),
            MockUsers::with(FetchBehavior::Users(vec![])),
        );
        let id = Uuid::new_v4();
        h.session.store(id, "member-token");

        let outcome = h.loader.load_admin_dashboard().await;
        match outcome {
            LoadOutcome::Rejected { reason, redirect } => {
                assert_eq!(reason, RejectReason::InsufficientRole);
                assert_eq!(redirect, Redirect::Home);
            }
            LoadOutcome::Loaded(_) => panic!("member must not load the admin dashboard"),
        }
        // Soft failure: artifacts are still there.
        assert_eq!(h.session.identifier(), Some(id));
        assert!(h.session.token().is_some());
        assert_eq!(h.users.calls(), 0);
        assert_eq!(h.sink.count(), 1);
    }

    #[tokio::test]
    async fn fetch_401_clears_session() {
        let h = harness(
            MockAuth::ok(UserRole::Admin),
            MockUsers::with(FetchBehavior::Unauthorized),
        );
        h.session.store(Uuid::new_v4(), "stale-token");

        let outcome = h.loader.load_admin_dashboard().await;
        match outcome {
            LoadOutcome::Rejected { reason, redirect } => {
                assert_eq!(reason, RejectReason::Unauthorized);
                assert_eq!(redirect, Redirect::Login);
            }
            LoadOutcome::Loaded(_) => panic!("401 must reject the load"),
        }
        assert!(h.session.identifier().is_none());
        assert!(h.session.token().is_none());
        assert_eq!(h.sink.count(), 1);
    }

    #[tokio::test]
    async fn fetch_outage_keeps_session_and_stays_in_app() {
        let h = harness(
            MockAuth::ok(UserRole::Member),
            MockUsers::with(FetchBehavior::Transport),
        );
        let id = Uuid::new_v4();
        h.session.store(id, "token");

        let outcome = h.loader.load_user_home(None).await;
        match outcome {
            LoadOutcome::Rejected { reason, redirect } => {
                assert_eq!(reason, RejectReason::FetchFailed);
                assert_eq!(redirect, Redirect::Home);
            }
            LoadOutcome::Loaded(_) => panic!("outage must reject the load"),
        }
        assert_eq!(h.session.identifier(), Some(id));
        assert_eq!(h.sink.count(), 1);
    }

    #[tokio::test]
    async fn verification_failure_clears_session() {
        let h = harness(
            MockAuth::unauthorized(),
            MockUsers::with(FetchBehavior::Users(vec![])),
        );
        h.session.store(Uuid::new_v4(), "bad-token");

        let outcome = h.loader.load_user_home(None).await;
        assert_eq!(outcome.rejection(), Some(RejectReason::VerificationFailed));
        assert!(h.session.token().is_none());
        assert_eq!(h.users.calls(), 0);
        assert_eq!(h.sink.count(), 1);
    }

    #[tokio::test]
    async fn user_home_publishes_record_and_usage() {
        let user = user_with_files(1000, &[200, 300]);
        let id = user.id;
        let h = harness(
            MockAuth::ok(UserRole::Member),
            MockUsers::with(FetchBehavior::Users(vec![user])),
        );
        h.session.store(id, "token");

        let outcome = h.loader.load_user_home(None).await;
        let LoadOutcome::Loaded(home) = outcome else {
            panic!("expected a loaded homepage");
        };
        assert_eq!(home.storage.used_storage, 500);
        assert_eq!(home.storage.available_storage, 500);

        assert_eq!(h.shared.user().unwrap().id, id);
        assert_eq!(h.shared.storage().unwrap().used_storage, 500);
    }

    #[tokio::test]
    async fn unknown_identifier_is_invalid_input() {
        let h = harness(
            MockAuth::ok(UserRole::Member),
            MockUsers::with(FetchBehavior::Users(vec![])),
        );
        h.session.store(Uuid::new_v4(), "token");

        let outcome = h.loader.load_user_home(None).await;
        assert_eq!(outcome.rejection(), Some(RejectReason::InvalidInput));
        assert_eq!(h.sink.count(), 1);
    }

    #[tokio::test]
    async fn cached_record_skips_fetch_with_equal_metrics() {
        let user = user_with_files(1000, &[200, 300]);
        let id = user.id;
        let h = harness(
            MockAuth::ok(UserRole::Member),
            MockUsers::with(FetchBehavior::Users(vec![user.clone()])),
        );
        h.session.store(id, "token");

        let first = h.loader.load_user_home(None).await;
        assert_eq!(h.users.calls(), 1);

        let second = h.loader.load_user_home(None).await;
        assert_eq!(h.users.calls(), 1, "cached load must not refetch");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn repeated_loads_are_idempotent() {
        let fleet = vec![user_with_files(1000, &[100]), user_with_files(500, &[])];
        let h = harness(
            MockAuth::ok(UserRole::Admin),
            MockUsers::with(FetchBehavior::Users(fleet)),
        );
        h.session.store(Uuid::new_v4(), "admin-token");

        let first = h.loader.load_admin_dashboard().await;
        let second = h.loader.load_admin_dashboard().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn registration_entry_emits_one_success_toast() {
        let user = user_with_files(1000, &[]);
        let id = user.id;
        let h = harness(
            MockAuth::ok(UserRole::Member),
            MockUsers::with(FetchBehavior::Users(vec![user])),
        );
        h.session.store(id, "token");

        let outcome = h.loader.load_user_home(Some(EntryEvent::Registered)).await;
        assert!(outcome.is_loaded());

        let messages = h.sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, Severity::Success);
    }

    #[tokio::test]
    async fn returning_login_entry_stays_silent() {
        let user = user_with_files(1000, &[]);
        let id = user.id;
        let h = harness(
            MockAuth::ok(UserRole::Member),
            MockUsers::with(FetchBehavior::Users(vec![user])),
        );
        h.session.store(id, "token");

        let outcome = h
            .loader
            .load_user_home(Some(EntryEvent::ReturningLogin))
            .await;
        assert!(outcome.is_loaded());
        assert_eq!(h.sink.count(), 0);
    }
}
