//! Session contract between the identity provider and the API client
//!
//! A [`Session`] is the proof of authentication: an opaque bearer token plus
//! the user it belongs to. The [`SessionHandle`] holds the current
//! [`SessionState`] (loading flag and optional session) and is passed
//! explicitly to every component that reads or changes it. There is no
//! process-wide session singleton.
//!
//! # Module Layout
//!
//! - [`store`] -- persistence of the session between runs (OS keyring or a
//!   JSON file)

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::api::types::{AuthResponse, UserProfile};
use crate::error::{CallsumError, Result};

pub mod store;

pub use store::{FileSessionStore, KeyringSessionStore, SessionStore};

/// Seconds before `expires_at` at which a session is already treated as
/// expired, so that a request does not race the expiry.
const EXPIRY_BUFFER_SECONDS: i64 = 60;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Proof of authentication
///
/// # Examples
///
/// ```
/// use callsum::api::types::UserProfile;
/// use callsum::session::Session;
///
/// let session = Session::new(
///     "opaque-token",
///     UserProfile {
///         id: "u1".to_string(),
///         email: "ana@example.com".to_string(),
///         full_name: None,
///         created_at: None,
///     },
/// );
///
/// // Non-JWT tokens carry no expiry and never expire locally.
/// assert!(session.expires_at.is_none());
/// assert!(!session.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer access token
    pub access_token: String,

    /// Refresh token, when the identity provider issued one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// The signed-in user
    pub user: UserProfile,

    /// Expiry read from the token's `exp` claim
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session for `user`, deriving the expiry from the token.
    pub fn new(access_token: impl Into<String>, user: UserProfile) -> Self {
        let access_token = access_token.into();
        let expires_at = jwt_expiry(&access_token);
        Self {
            access_token,
            refresh_token: None,
            user,
            expires_at,
        }
    }

    /// Build a session from a sign-up or sign-in response.
    pub fn from_auth_response(response: &AuthResponse) -> Self {
        let mut session = Self::new(
            response.session.access_token.clone(),
            response.user.clone(),
        );
        session.refresh_token = response.session.refresh_token.clone();
        session
    }

    /// Returns `true` when the token is expired or about to expire.
    ///
    /// Sessions without an expiry are treated as valid until the backend
    /// rejects them.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            None => false,
            Some(expires_at) => {
                Utc::now() >= expires_at - chrono::Duration::seconds(EXPIRY_BUFFER_SECONDS)
            }
        }
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Reads the `exp` claim from a JWT without verifying it.
///
/// Returns `None` for anything that is not a three-part token with a JSON
/// payload carrying a numeric `exp`.
fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claim.exp?, 0)
}

// ---------------------------------------------------------------------------
// SessionState / SessionHandle
// ---------------------------------------------------------------------------

/// Observable session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// `true` until the provider has finished restoring the session
    pub loading: bool,
    /// The current session, if any
    pub session: Option<Session>,
}

impl SessionState {
    /// State of a provider that has not resolved yet
    pub fn loading() -> Self {
        Self {
            loading: true,
            session: None,
        }
    }

    /// Resolved state with the given session
    pub fn resolved(session: Option<Session>) -> Self {
        Self {
            loading: false,
            session,
        }
    }

    /// Whether a session is present
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Source of the current session for outbound requests.
///
/// `Ok(None)` means "signed out"; `Err` means the session could not be
/// acquired. Callers must not block a request on either outcome.
#[async_trait]
pub trait SessionProvider: Send + Sync + std::fmt::Debug {
    /// Returns the session to authenticate the next request with.
    async fn current_session(&self) -> Result<Option<Session>>;
}

/// Shared, explicitly passed handle to the session state
///
/// Cloning the handle shares the same underlying state. Readers call
/// [`snapshot`](Self::snapshot) or [`subscribe`](Self::subscribe);
/// only the auth flow and start-up code write to it.
///
/// # Examples
///
/// ```
/// use callsum::session::SessionHandle;
///
/// let handle = SessionHandle::new();
/// assert!(handle.snapshot().loading);
///
/// handle.resolve(None);
/// assert!(!handle.snapshot().loading);
/// assert!(!handle.snapshot().is_authenticated());
/// ```
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionHandle {
    /// Create a handle in the loading state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::loading());
        Self {
            state: Arc::new(tx),
        }
    }

    /// Create a handle that is already resolved to `session`.
    pub fn with_session(session: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::resolved(session));
        Self {
            state: Arc::new(tx),
        }
    }

    /// Current state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Enter the loading phase, keeping any current session.
    pub fn begin_loading(&self) {
        self.state.send_modify(|state| state.loading = true);
    }

    /// Leave the loading phase with the given session.
    pub fn resolve(&self, session: Option<Session>) {
        self.state.send_replace(SessionState::resolved(session));
    }

    /// Replace the session after a successful sign-in.
    pub fn sign_in(&self, session: Session) {
        tracing::info!("Signed in as {}", session.user.email);
        self.resolve(Some(session));
    }

    /// Drop the session.
    pub fn sign_out(&self) {
        tracing::info!("Signed out");
        self.resolve(None);
    }

    /// Restore the session from `store` and leave the loading phase.
    ///
    /// A store failure resolves to "signed out" and is logged; it never
    /// aborts start-up. An expired stored session is dropped from the store.
    pub fn restore_from(&self, store: &dyn SessionStore) {
        self.begin_loading();
        let session = match store.load() {
            Ok(Some(session)) if session.is_expired() => {
                tracing::info!("Stored session for {} has expired", session.user.email);
                if let Err(e) = store.clear() {
                    tracing::warn!("Failed to clear expired session: {}", e);
                }
                None
            }
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to restore stored session: {}", e);
                None
            }
        };
        self.resolve(session);
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for SessionHandle {
    async fn current_session(&self) -> Result<Option<Session>> {
        let state = self.snapshot();
        if state.loading {
            return Err(CallsumError::Session("session is still loading".to_string()).into());
        }
        match state.session {
            Some(session) if session.is_expired() => {
                Err(CallsumError::Session("session has expired".to_string()).into())
            }
            other => Ok(other),
        }
    }
}
