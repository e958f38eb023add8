/// Request payloads accepted by the HTTP layer
///
/// String fields default to empty so a missing field is reported as a
/// validation error rather than a parse failure.
use crate::domain::Vote;
use crate::validators;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "validators::validate_first_name"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(custom(function = "validators::validate_last_name"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(custom(function = "validators::validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validators::validate_username"))]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "validators::validate_password"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub description: String,
}

/// `{"dir": "UP" | "DOWN"}`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VoteRequest {
    pub dir: Vote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyRequest {
    #[serde(default)]
    pub content: String,
}
