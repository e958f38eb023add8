/// JWT issuing and validation for Pulse services
///
/// Tokens are signed with HS256 using a shared secret. The secret is held by
/// a [`JwtKeys`] value built once at startup and shared between the login
/// handler (which issues tokens) and the auth middleware (which validates
/// them).
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt::JwtKeys;
/// use uuid::Uuid;
///
/// let keys = JwtKeys::from_secret("change-me", 60).unwrap();
/// let token = keys.generate_access_token(Uuid::new_v4(), "alice").unwrap();
/// let user_id = keys.get_user_id_from_token(&token).unwrap();
/// ```
use crate::{CryptoError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token lifetime
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 60;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Username at issue time
    pub username: String,
}

/// Signing and verification keys derived from one shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("ttl_days", &self.ttl.num_days())
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Build keys from a shared secret and token lifetime in days
    pub fn from_secret(secret: &str, ttl_days: i64) -> Result<Self> {
        if secret.is_empty() {
            return Err(CryptoError::EmptySecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        })
    }

    /// Token lifetime in seconds
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Generate a new access token for a user
    pub fn generate_access_token(&self, user_id: Uuid, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            username: username.to_string(),
        };

        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding)
            .map_err(|e| CryptoError::Encode(e.to_string()))
    }

    /// Validate and decode a JWT token
    ///
    /// Verifies the HS256 signature and the `exp` claim. Tokens signed with
    /// any other algorithm are rejected.
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| CryptoError::InvalidToken(e.to_string()))
    }

    /// Extract user ID from a validated token
    pub fn get_user_id_from_token(&self, token: &str) -> Result<Uuid> {
        let token_data = self.validate_token(token)?;
        Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| CryptoError::InvalidSubject(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::from_secret("unit-test-secret", DEFAULT_TOKEN_TTL_DAYS).unwrap()
    }

    #[test]
    fn test_generate_access_token() {
        let token = keys()
            .generate_access_token(Uuid::new_v4(), "testuser")
            .unwrap();
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_round_trip_user_id() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.generate_access_token(user_id, "testuser").unwrap();

        assert_eq!(keys.get_user_id_from_token(&token).unwrap(), user_id);
        let data = keys.validate_token(&token).unwrap();
        assert_eq!(data.claims.username, "testuser");
        assert_eq!(data.claims.exp - data.claims.iat, 60 * 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys()
            .generate_access_token(Uuid::new_v4(), "testuser")
            .unwrap();
        let other = JwtKeys::from_secret("another-secret", 60).unwrap();

        assert!(matches!(
            other.validate_token(&token),
            Err(CryptoError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
            username: "old".to_string(),
        };
        let token = keys.encode_claims(&claims).unwrap();

        assert!(keys.validate_token(&token).is_err());
    }

    #[test]
    fn test_non_uuid_subject() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            iat: now,
            exp: now + 3600,
            username: "x".to_string(),
        };
        let token = keys.encode_claims(&claims).unwrap();

        assert!(matches!(
            keys.get_user_id_from_token(&token),
            Err(CryptoError::InvalidSubject(_))
        ));
    }

    #[test]
    fn test_empty_secret() {
        assert!(matches!(
            JwtKeys::from_secret("", 60),
            Err(CryptoError::EmptySecret)
        ));
    }

    #[test]
    fn test_malformed_token() {
        assert!(keys().validate_token("not.a.jwt").is_err());
    }
}
