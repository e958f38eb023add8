//! Caller identity resolution
//!
//! Services never look at raw credentials. The auth middleware hands the
//! bearer token to an [`IdentityProvider`] and stores the resolved user id in
//! the request extensions.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_trait::async_trait;
use crypto_core::jwt::JwtKeys;
use uuid::Uuid;

/// Authentication failures surfaced to HTTP clients as 401
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No access token found in call")]
    MissingToken,

    #[error("Invalid Authorization header format")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

/// Resolves an opaque caller token to a stable user identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// `IdentityProvider` backed by HS256 JWTs
#[derive(Debug, Clone)]
pub struct JwtIdentityProvider {
    keys: JwtKeys,
}

impl JwtIdentityProvider {
    pub fn new(keys: JwtKeys) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Uuid, AuthError> {
        self.keys.get_user_id_from_token(token).map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            AuthError::InvalidToken(e.to_string())
        })
    }
}
