use super::AppState;
use crate::error::Result;
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};

/// Profile of the authenticated caller
pub async fn me(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = state.store.get_user(user_id.0).await?;
    Ok(HttpResponse::Ok().json(user.profile()))
}
