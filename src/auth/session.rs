//! Authentication session
//!
//! Drives an [`AuthMachine`] from identity-provider results.

use std::sync::Arc;

use super::error::AuthResult;
use super::provider::IdentityProvider;
use super::state::{AuthEvent, AuthMachine, AuthState, Identity};

/// One client's sign-in state
pub struct AuthSession {
    machine: AuthMachine,
    provider: Arc<dyn IdentityProvider>,
    allow_guest: bool,
}

impl AuthSession {
    pub fn new(provider: Arc<dyn IdentityProvider>, allow_guest: bool) -> Self {
        Self {
            machine: AuthMachine::new(),
            provider,
            allow_guest,
        }
    }

    pub fn state(&self) -> &AuthState {
        self.machine.state()
    }

    /// Verify `token` with the provider.
    ///
    /// The session passes through `pending` and ends in `ready` or
    /// `failed`. A session that is already signed in must sign out first.
    pub async fn sign_in(&mut self, token: &str) -> AuthResult<Identity> {
        self.machine.handle(AuthEvent::SignInStarted)?;

        match self.provider.verify(token).await {
            Ok(identity) => {
                tracing::info!(
                    provider = self.provider.name(),
                    user_id = %identity.user_id,
                    "Signed in"
                );
                self.machine.handle(AuthEvent::SignedIn(identity.clone()))?;
                Ok(identity)
            }
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Sign-in failed");
                self.machine.handle(AuthEvent::SignInFailed(e.to_string()))?;
                Err(e)
            }
        }
    }

    pub fn sign_out(&mut self) {
        if let Err(e) = self.machine.handle(AuthEvent::SignedOut) {
            tracing::error!(error = %e, "Sign-out rejected by the auth state machine");
        }
    }

    /// The signed-in identity, or the guest placeholder when guest access
    /// is enabled
    pub fn identity(&self) -> Option<Identity> {
        if let Some(identity) = self.machine.state().identity() {
            return Some(identity.clone());
        }
        if self.allow_guest {
            tracing::warn!(state = %self.machine.state(), "No signed-in user, using guest identity");
            return Some(Identity::guest());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, StaticTokenProvider};

    fn provider() -> Arc<dyn IdentityProvider> {
        Arc::new(StaticTokenProvider::new().with_token("good", Identity::new("alice")))
    }

    #[tokio::test]
    async fn test_sign_in_ready() {
        let mut session = AuthSession::new(provider(), false);
        let identity = session.sign_in("good").await.unwrap();
        assert_eq!(identity.user_id, "alice");
        assert_eq!(session.state().name(), "ready");
        assert_eq!(session.identity().unwrap().user_id, "alice");
    }

    #[tokio::test]
    async fn test_sign_in_failed() {
        let mut session = AuthSession::new(provider(), false);
        assert!(session.sign_in("bad").await.is_err());
        assert_eq!(session.state().name(), "failed");
        assert!(session.identity().is_none());

        // retry from failed
        session.sign_in("good").await.unwrap();
        assert_eq!(session.state().name(), "ready");
    }

    #[tokio::test]
    async fn test_sign_in_twice_rejected() {
        let mut session = AuthSession::new(provider(), false);
        session.sign_in("good").await.unwrap();
        assert!(matches!(
            session.sign_in("good").await,
            Err(AuthError::InvalidTransition { .. })
        ));

        session.sign_out();
        assert_eq!(session.state(), &AuthState::Unauthenticated);
        session.sign_in("good").await.unwrap();
    }

    #[tokio::test]
    async fn test_guest_only_when_allowed() {
        let session = AuthSession::new(provider(), false);
        assert!(session.identity().is_none());

        let session = AuthSession::new(provider(), true);
        assert!(session.identity().unwrap().is_guest());
    }
}
