//! Request extractors

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::auth::{AuthError, AuthSession, Identity};

/// The identity a request is served as.
///
/// A bearer token is verified with the identity provider; a bad token is
/// always rejected. Requests without a token are rejected unless guest
/// access is enabled.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = authenticate(&parts.headers, state).await?;
        session
            .identity()
            .map(CurrentUser)
            .ok_or(ApiError::Auth(AuthError::MissingToken))
    }
}

/// Run a fresh session for this request's credentials
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<AuthSession, ApiError> {
    let mut session = AuthSession::new(Arc::clone(&state.identity), state.allow_guest);
    if let Some(token) = bearer_token(headers) {
        session.sign_in(token).await?;
    }
    Ok(session)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
