//! Session validation state machine.
//!
//! One guard instance covers one session attempt:
//! `Unauthenticated → Validating → { Authorized, Rejected }`. The guard is
//! a pure decision layer — it never touches the session store or emits
//! notifications; the loader applies the session policy to its verdict.

use std::sync::Arc;

use crate::client::api::{AuthApi, RoleClaims};
use crate::client::RejectReason;
use crate::models::user::UserRole;

/// Role gate for a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Admin-gated flows (the admin dashboard).
    Admin,
    /// Member flows: any successfully decoded role passes.
    AnyValid,
}

impl RoleRequirement {
    pub fn accepts(&self, role: UserRole) -> bool {
        match self {
            RoleRequirement::Admin => role == UserRole::Admin,
            RoleRequirement::AnyValid => true,
        }
    }
}

/// States of one session attempt. `Rejected` is terminal for the request.
#[derive(Debug, Clone)]
pub enum SessionState {
    Unauthenticated,
    Validating,
    Authorized(RoleClaims),
    Rejected(RejectReason),
}

pub struct SessionGuard {
    auth: Arc<dyn AuthApi>,
    state: SessionState,
}

impl SessionGuard {
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        Self {
            auth,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Drive the attempt to a terminal state. An absent or empty token is
    /// rejected without any network call.
    pub async fn start(
        &mut self,
        token: Option<&str>,
        required: RoleRequirement,
    ) -> Result<RoleClaims, RejectReason> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            self.state = SessionState::Rejected(RejectReason::MissingCredentials);
            return Err(RejectReason::MissingCredentials);
        };

        self.state = SessionState::Validating;
        match self.auth.verify_token(token).await {
            Ok(claims) if required.accepts(claims.role) => {
                self.state = SessionState::Authorized(claims.clone());
                Ok(claims)
            }
            Ok(claims) => {
                tracing::debug!(role = ?claims.role, "Role does not satisfy gate");
                self.state = SessionState::Rejected(RejectReason::InsufficientRole);
                Err(RejectReason::InsufficientRole)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                self.state = SessionState::Rejected(RejectReason::VerificationFailed);
                Err(RejectReason::VerificationFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::ApiFailure;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Auth port stub returning a fixed verdict and counting calls.
    struct StubAuth {
        verdict: Result<UserRole, ()>,
        calls: AtomicUsize,
    }

    impl StubAuth {
        fn ok(role: UserRole) -> Self {
            Self {
                verdict: Ok(role),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                verdict: Err(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthApi for StubAuth {
        async fn verify_token(&self, _token: &str) -> Result<RoleClaims, ApiFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.verdict {
                Ok(role) => Ok(RoleClaims {
                    subject: Uuid::nil(),
                    role,
                }),
                Err(()) => Err(ApiFailure::Transport("boom".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn missing_token_rejected_without_network() {
        let auth = Arc::new(StubAuth::ok(UserRole::Admin));
        let mut guard = SessionGuard::new(auth.clone());

        let err = guard.start(None, RoleRequirement::Admin).await.unwrap_err();
        assert_eq!(err, RejectReason::MissingCredentials);
        assert_eq!(auth.calls(), 0);
        assert!(matches!(guard.state(), SessionState::Rejected(_)));
    }

    #[tokio::test]
    async fn empty_token_treated_as_missing() {
        let auth = Arc::new(StubAuth::ok(UserRole::Admin));
        let mut guard = SessionGuard::new(auth.clone());

        let err = guard
            .start(Some(""), RoleRequirement::AnyValid)
            .await
            .unwrap_err();
        assert_eq!(err, RejectReason::MissingCredentials);
        assert_eq!(auth.calls(), 0);
    }

    #[tokio::test]
    async fn admin_token_authorized_on_admin_gate() {
        let auth = Arc::new(StubAuth::ok(UserRole::Admin));
        let mut guard = SessionGuard::new(auth.clone());

        let claims = guard
            .start(Some("tok"), RoleRequirement::Admin)
            .await
            .unwrap();
        assert_eq!(claims.role, UserRole::Admin);
        assert!(matches!(guard.state(), SessionState::Authorized(_)));
    }

    #[tokio::test]
    async fn member_token_rejected_on_admin_gate() {
        let auth = Arc::new(StubAuth::ok(UserRole::Member));
        let mut guard = SessionGuard::new(auth.clone());

        let err = guard
            .start(Some("tok"), RoleRequirement::Admin)
            .await
            .unwrap_err();
        assert_eq!(err, RejectReason::InsufficientRole);
    }

    #[tokio::test]
    async fn member_token_passes_any_valid_gate() {
        let auth = Arc::new(StubAuth::ok(UserRole::Member));
        let mut guard = SessionGuard::new(auth.clone());

        let claims = guard
            .start(Some("tok"), RoleRequirement::AnyValid)
            .await
            .unwrap();
        assert_eq!(claims.role, UserRole::Member);
    }

    #[tokio::test]
    async fn verification_error_rejected() {
        let auth = Arc::new(StubAuth::failing());
        let mut guard = SessionGuard::new(auth.clone());

        let err = guard
            .start(Some("tok"), RoleRequirement::AnyValid)
            .await
            .unwrap_err();
        assert_eq!(err, RejectReason::VerificationFailed);
        assert_eq!(auth.calls(), 1);
    }
}
