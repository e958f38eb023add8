/// Comment handlers
use super::AppState;
use crate::dto::{CommentRequest, ReplyRequest};
use crate::error::Result;
use crate::services::CommentService;
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

fn service(state: &AppState) -> CommentService {
    CommentService::new(state.store.clone())
}

/// Comment on a post
pub async fn add_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let comment = service(&state)
        .add_comment(post_id.into_inner(), user_id.0, &req.comment)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Top-level comments on a post, newest first
pub async fn post_comments(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = service(&state).post_comments(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Reply to a comment
pub async fn reply(
    state: web::Data<AppState>,
    user_id: UserId,
    comment_id: web::Path<Uuid>,
    req: web::Json<ReplyRequest>,
) -> Result<HttpResponse> {
    let reply = service(&state)
        .reply(comment_id.into_inner(), user_id.0, &req.content)
        .await?;
    Ok(HttpResponse::Created().json(reply))
}

pub async fn get_comment(
    state: web::Data<AppState>,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment = service(&state).get_comment(comment_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment the caller wrote
pub async fn delete_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service(&state)
        .delete_comment(comment_id.into_inner(), user_id.0)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
