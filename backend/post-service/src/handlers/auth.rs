/// Account handlers - registration and login
use super::AppState;
use crate::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::error::Result;
use crate::services::AuthService;
use actix_web::{web, HttpResponse};

/// Register a new account
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let service = AuthService::new(state.store.clone(), state.keys.clone());
    let user = service.register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(user.profile()))
}

/// Exchange username and password for an access token
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let service = AuthService::new(state.store.clone(), state.keys.clone());
    let token = service.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
