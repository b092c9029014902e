//! Dashboard-loading client core.
//!
//! The validate → fetch → aggregate workflow behind the admin metrics view
//! and the member homepage. Everything here is a pure decision layer over
//! the external Auth/Users service ports: outcomes are returned as tagged
//! values, and the thin adapters owning navigation and toasts act on them.

pub mod api;
pub mod guard;
pub mod loader;
pub mod notify;
pub mod session;
pub mod state;

/// Why a load or validation attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Identifier or token missing from local session state.
    MissingCredentials,
    /// The auth service could not validate the token.
    VerificationFailed,
    /// Token is valid but the role does not satisfy the gate.
    InsufficientRole,
    /// The data fetch came back HTTP 401.
    Unauthorized,
    /// The data fetch failed for any non-auth reason (including timeout).
    FetchFailed,
    /// The fetch succeeded but returned no usable record.
    InvalidInput,
}

impl RejectReason {
    /// Whether session artifacts survive this rejection. A role mismatch or
    /// a flaky fetch does not invalidate the session itself.
    pub fn preserves_session(&self) -> bool {
        matches!(
            self,
            RejectReason::InsufficientRole | RejectReason::FetchFailed
        )
    }

    /// Where the caller should navigate after this rejection.
    pub fn redirect(&self) -> Redirect {
        if self.preserves_session() {
            Redirect::Home
        } else {
            Redirect::Login
        }
    }

    /// The single user-visible message for this rejection.
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::MissingCredentials => {
                "Your session is incomplete, please sign in again."
            }
            RejectReason::VerificationFailed => "An error occurred, please sign in again.",
            RejectReason::InsufficientRole => {
                "You do not have permission to access this page."
            }
            RejectReason::Unauthorized => "Your session has expired, please sign in again.",
            RejectReason::FetchFailed => "An error occurred while fetching your data.",
            RejectReason::InvalidInput => "Something went wrong, please try again later.",
        }
    }
}

/// Navigation target attached to a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// The login entry point.
    Login,
    /// The safe default in-app area (the member homepage).
    Home,
}

/// Outcome of one dashboard load. Pure value: the caller performs the
/// actual navigation and rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(T),
    Rejected {
        reason: RejectReason,
        redirect: Redirect,
    },
}

impl<T> LoadOutcome<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            LoadOutcome::Loaded(_) => None,
            LoadOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }
}
