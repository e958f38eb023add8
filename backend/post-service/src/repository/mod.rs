//! Persistence boundary
//!
//! Votes are stored once, keyed by `(post, user)`. `Post::votes` and
//! `User::voted_posts` are both read from that single record, so the two
//! views cannot drift apart.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::domain::{Comment, NewComment, NewPost, NewUser, Post, User, Vote};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Durable storage for users, posts, votes and comments
#[async_trait]
pub trait Store: Send + Sync {
    /// Load a user with `voted_posts` populated
    async fn get_user(&self, id: Uuid) -> Result<User>;

    /// Case-insensitive username lookup
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Fails with `Conflict` when the username or email is taken
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Persist profile fields (names, bio, image)
    async fn save_user(&self, user: &User) -> Result<()>;

    /// Load a post with `votes` and `author` populated
    async fn get_post(&self, id: Uuid) -> Result<Post>;

    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn create_post(&self, post: NewPost) -> Result<Post>;

    /// Persist description and images
    async fn save_post(&self, post: &Post) -> Result<()>;

    /// Upsert the single vote record for `(post_id, user_id)`
    async fn record_vote(&self, post_id: Uuid, user_id: Uuid, vote: Vote) -> Result<()>;

    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;

    async fn get_comment(&self, id: Uuid) -> Result<Comment>;

    /// Top-level comments on a post, newest first
    async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    /// Delete a comment together with its reply subtree
    async fn delete_comment(&self, id: Uuid) -> Result<()>;
}
