//! Authentication
//!
//! Sign-in state is an explicit machine (`unauthenticated`, `pending`,
//! `ready`, `failed`) fed by events from an external identity provider.
//!
//! - **state**: `AuthState`, `AuthEvent`, `AuthMachine`, `Identity`
//! - **provider**: the `IdentityProvider` trait and its implementations
//! - **session**: `AuthSession`, which drives the machine from a provider

pub mod error;
pub mod provider;
pub mod session;
pub mod state;

pub use error::{AuthError, AuthResult};
pub use provider::{HttpIdentityProvider, IdentityProvider, StaticTokenProvider};
pub use session::AuthSession;
pub use state::{AuthEvent, AuthMachine, AuthState, Identity, GUEST_USER_ID};
