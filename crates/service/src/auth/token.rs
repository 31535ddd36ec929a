use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

/// Access-token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email.
    pub sub: String,
    /// User id.
    pub uid: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.uid).map_err(|_| AuthError::Unauthorized)
    }
}

pub fn issue_token(secret: &str, user_id: Uuid, email: &str, ttl_minutes: i64) -> Result<String, AuthError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        uid: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::minutes(ttl_minutes)).timestamp(),
    };
    encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Any decode failure (signature, expiry, shape) is reported as `Unauthorized`.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::Unauthorized)
}
