//! Identity providers
//!
//! The external service that turns a bearer token into an [`Identity`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::error::{AuthError, AuthResult};
use super::state::Identity;

/// Something that can vouch for a bearer token
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Resolve a token to the identity it belongs to
    async fn verify(&self, token: &str) -> AuthResult<Identity>;
}

/// Verifies tokens against an OpenID-style userinfo endpoint
pub struct HttpIdentityProvider {
    client: Client,
    userinfo_url: String,
}

/// Userinfo response body
#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(userinfo_url: impl Into<String>, timeout: Duration) -> AuthResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            userinfo_url: userinfo_url.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn verify(&self, token: &str) -> AuthResult<Identity> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::Timeout
                } else if e.is_connect() {
                    AuthError::Unavailable
                } else {
                    AuthError::Request(e)
                }
            })?;

        match response.status() {
            status if status.is_success() => {
                let info: UserInfo = response.json().await?;
                Ok(Identity {
                    user_id: info.sub,
                    email: info.email,
                    display_name: info.name,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::Rejected("identity provider refused the token".to_string()))
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(AuthError::Provider {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Fixed token table, for local setups and tests
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: accept `token` as `identity`
    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn verify(&self, token: &str) -> AuthResult<Identity> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::Rejected("unknown token".to_string()))
    }
}
