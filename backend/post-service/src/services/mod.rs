/// Business logic layer
///
/// Services own an `Arc<dyn Store>` and are cheap to build per request.
pub mod auth;
pub mod comments;
pub mod posts;

pub use auth::AuthService;
pub use comments::CommentService;
pub use posts::PostService;
