/// Account registration and login
use crate::domain::{NewUser, User};
use crate::dto::{LoginRequest, RegisterRequest};
use crate::error::{AppError, Result};
use crate::repository::Store;
use crypto_core::jwt::JwtKeys;
use crypto_core::password::{hash_password, verify_password};
use std::sync::Arc;
use validator::Validate;

const WRONG_CREDENTIALS: &str = "username or password is wrong!";

pub struct AuthService {
    store: Arc<dyn Store>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    /// Validate and create an account; username and email are stored lower-cased
    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        req.validate()?;

        let password_hash = hash_password(&req.password)?;
        let user = self
            .store
            .create_user(NewUser {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name,
                username: req.username.to_lowercase(),
                email: req.email.to_lowercase(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, req: LoginRequest) -> Result<String> {
        if req.username.is_empty() {
            return Err(AppError::invalid("username", "can't be blank"));
        }
        if req.password.is_empty() {
            return Err(AppError::invalid("password", "can't be blank"));
        }

        let user = self
            .store
            .find_user_by_username(&req.username.to_lowercase())
            .await?
            .ok_or_else(|| AppError::invalid("credentials", WRONG_CREDENTIALS))?;

        if !verify_password(&req.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "login rejected");
            return Err(AppError::invalid("credentials", WRONG_CREDENTIALS));
        }

        let token = self.keys.generate_access_token(user.id, &user.username)?;
        tracing::info!(
            user_id = %user.id,
            expires_in = self.keys.ttl_seconds(),
            "user logged in"
        );
        Ok(token)
    }
}
