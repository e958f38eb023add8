/// Post Service Library
///
/// Posts, votes and threaded comments for the Pulse social platform, plus the
/// account endpoints that issue the tokens those routes require.
///
/// # Modules
///
/// - `domain`: Entities and the vote ledger
/// - `repository`: `Store` trait with PostgreSQL and in-memory implementations
/// - `services`: Business logic layer
/// - `handlers`: HTTP request handlers and route table
/// - `storage`: Image uploads for posts
/// - `dto`: Request payloads
/// - `validators`: Registration field rules
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod services;
pub mod storage;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
