//! Authentication state machine
//!
//! ```text
//!                 SignInStarted            SignedIn
//! Unauthenticated ─────────────▶ Pending ───────────▶ Ready
//!        ▲                        │  ▲                  │
//!        │          SignInFailed  ▼  │ SignInStarted    │
//!        │                       Failed                 │
//!        └──────────────────── SignedOut ◀──────────────┘
//! ```
//!
//! Events that do not apply in the current state are rejected and leave
//! the state untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{AuthError, AuthResult};

/// User id of the placeholder identity
pub const GUEST_USER_ID: &str = "guest";

/// An authenticated user as reported by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            display_name: None,
        }
    }

    /// Builder method: set email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder method: set display name
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Placeholder used when guest access is enabled
    pub fn guest() -> Self {
        Self::new(GUEST_USER_ID).display_name("Guest")
    }

    pub fn is_guest(&self) -> bool {
        self.user_id == GUEST_USER_ID
    }
}

/// Where a session stands with the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AuthState {
    #[default]
    Unauthenticated,
    /// Waiting on the identity provider
    Pending,
    Ready { identity: Identity },
    Failed { reason: String },
}

impl AuthState {
    pub fn name(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::Pending => "pending",
            AuthState::Ready { .. } => "ready",
            AuthState::Failed { .. } => "failed",
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Ready { identity } => Some(identity),
            _ => None,
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discrete notifications from the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignInStarted,
    SignedIn(Identity),
    SignInFailed(String),
    SignedOut,
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::SignInStarted => "sign_in_started",
            AuthEvent::SignedIn(_) => "signed_in",
            AuthEvent::SignInFailed(_) => "sign_in_failed",
            AuthEvent::SignedOut => "signed_out",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthMachine {
    state: AuthState,
}

impl AuthMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Apply an event
    pub fn handle(&mut self, event: AuthEvent) -> AuthResult<&AuthState> {
        let next = match (&self.state, event) {
            (AuthState::Unauthenticated | AuthState::Failed { .. }, AuthEvent::SignInStarted) => {
                AuthState::Pending
            }
            (AuthState::Pending, AuthEvent::SignedIn(identity)) => AuthState::Ready { identity },
            (AuthState::Pending, AuthEvent::SignInFailed(reason)) => AuthState::Failed { reason },
            (_, AuthEvent::SignedOut) => AuthState::Unauthenticated,
            (state, event) => {
                return Err(AuthError::InvalidTransition {
                    from: state.name().to_string(),
                    event: event.name().to_string(),
                })
            }
        };

        tracing::debug!(from = %self.state, to = %next, "Auth state transition");
        self.state = next;
        Ok(&self.state)
    }
}
