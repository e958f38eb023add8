//! # Crypto Core
//!
//! Shared credential primitives for Pulse services.
//!
//! ## Modules
//! - `jwt`: HS256 access token issuing and validation
//! - `password`: Argon2id password hashing

pub mod jwt;
pub mod password;

/// Errors raised by token and password operations
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("token generation failed: {0}")]
    Encode(String),

    #[error("token validation failed: {0}")]
    InvalidToken(String),

    #[error("invalid user id in token: {0}")]
    InvalidSubject(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
