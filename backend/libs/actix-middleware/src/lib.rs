//! # Actix Middleware Library
//!
//! Authentication plumbing shared by Pulse Actix services
//!
//! ## Modules
//! - `identity`: `IdentityProvider` trait and its JWT implementation
//! - `jwt_auth`: bearer token middleware and the `UserId` extractor

pub mod identity;
pub mod jwt_auth;

pub use identity::{AuthError, IdentityProvider, JwtIdentityProvider};
pub use jwt_auth::{JwtAuthMiddleware, UserId};
