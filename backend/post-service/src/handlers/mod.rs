/// HTTP handlers for post-service endpoints
///
/// - Auth: register and login (public)
/// - Users: the caller's own profile
/// - Posts: create, list, read and vote
/// - Comments: threaded comments on posts
pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

use crate::error::AppError;
use crate::repository::Store;
use crate::storage::ImageStore;
use actix_middleware::{IdentityProvider, JwtAuthMiddleware};
use actix_web::{guard, web};
use crypto_core::jwt::JwtKeys;
use std::sync::Arc;

/// Shared state handed to every handler through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub keys: JwtKeys,
    pub images: Option<Arc<dyn ImageStore>>,
    pub max_upload_bytes: usize,
}

/// Register every route; the users, posts and comments scopes require a token
pub fn configure(cfg: &mut web::ServiceConfig, identity: Arc<dyn IdentityProvider>) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .route("/health", web::get().to(health::health))
    .route("/ready", web::get().to(health::ready))
    .service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login)),
    )
    .service(
        web::scope("/users")
            .wrap(JwtAuthMiddleware::new(identity.clone()))
            .route("/me", web::get().to(users::me)),
    )
    .service(
        web::scope("/posts")
            .wrap(JwtAuthMiddleware::new(identity.clone()))
            .route("", web::get().to(posts::list_posts))
            .route(
                "",
                web::post()
                    .guard(guard::fn_guard(posts::is_multipart))
                    .to(posts::create_post_multipart),
            )
            .route("", web::post().to(posts::create_post))
            .route("/{id}", web::get().to(posts::get_post))
            .route("/{id}/vote", web::post().to(posts::vote_post))
            .route("/{id}/comments", web::post().to(comments::add_comment))
            .route("/{id}/comments", web::get().to(comments::post_comments)),
    )
    .service(
        web::scope("/comments")
            .wrap(JwtAuthMiddleware::new(identity))
            .route("/{id}", web::post().to(comments::reply))
            .route("/{id}", web::get().to(comments::get_comment))
            .route("/{id}", web::delete().to(comments::delete_comment)),
    );
}
