//! Session Routes
//!
//! - GET /api/v1/session - Authentication state for the presented token

use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;

use crate::api::dto::SessionResponse;
use crate::api::error::ApiResult;
use crate::api::extract::bearer_token;
use crate::api::state::AppState;
use crate::auth::{AuthError, AuthSession, AuthState};

/// GET /api/v1/session
///
/// A rejected token shows up as the `failed` state. An identity provider
/// that cannot be reached is a 503, not a verdict on the token.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionResponse>> {
    let mut session = AuthSession::new(Arc::clone(&state.identity), state.allow_guest);

    if let Some(token) = bearer_token(&headers) {
        match session.sign_in(token).await {
            Ok(_) | Err(AuthError::Rejected(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Session check could not reach the identity provider");
                return Err(e.into());
            }
        }
    }

    let effective_identity = match session.state() {
        AuthState::Failed { .. } => None,
        _ => session.identity(),
    };

    Ok(Json(SessionResponse {
        state: session.state().clone(),
        effective_identity,
    }))
}
