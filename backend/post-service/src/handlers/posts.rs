/// Post handlers - HTTP endpoints for post operations
use super::AppState;
use crate::dto::{CreatePostRequest, VoteRequest};
use crate::error::{AppError, Result};
use crate::services::posts::ImageUpload;
use crate::services::PostService;
use actix_middleware::UserId;
use actix_multipart::Multipart;
use actix_web::guard::GuardContext;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use uuid::Uuid;

fn service(state: &AppState) -> PostService {
    PostService::with_images(state.store.clone(), state.images.clone())
}

/// Route guard selecting the multipart variant of `POST /posts`
pub fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// List all posts, newest first
pub async fn list_posts(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let posts = service(&state).list_posts(user_id.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Create a text-only post from a JSON body
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = service(&state)
        .create_post(user_id.0, &req.description, None)
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// Create a post from a multipart form with `description` and optional `image`
pub async fn create_post_multipart(
    state: web::Data<AppState>,
    user_id: UserId,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut description = String::new();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Multipart read error: {}", e)))?;
            if data.len() + chunk.len() > state.max_upload_bytes {
                return Err(AppError::BadRequest(format!(
                    "Upload exceeds {} bytes",
                    state.max_upload_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "description" => {
                description = String::from_utf8(data)
                    .map_err(|_| AppError::invalid("description", "is invalid"))?;
            }
            "image" if !data.is_empty() => {
                image = Some(ImageUpload {
                    filename: filename.unwrap_or_default(),
                    bytes: data,
                });
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let post = service(&state)
        .create_post(user_id.0, &description, image)
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// Get a post with its score and the caller's vote
pub async fn get_post(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service(&state)
        .get_post(post_id.into_inner(), user_id.0)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Vote a post up or down
pub async fn vote_post(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<VoteRequest>,
) -> Result<HttpResponse> {
    let view = service(&state)
        .vote(post_id.into_inner(), user_id.0, req.dir)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}
