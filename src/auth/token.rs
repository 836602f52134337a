use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::User;

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: i64,
    pub email: String,
    pub name: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies HMAC-signed bearer tokens.
///
/// Tokens are stateless and time-bounded: minted at login with a one-hour
/// expiry, verified on every gated request, never revoked server-side.
/// The signing secret is shared between the administrator service (which
/// mints) and the gateway (which verifies).
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
}

/// Token lifetime in seconds.
const TOKEN_TTL: i64 = 60 * 60;

impl TokenIssuer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Mints a token for an authenticated user, carrying the subject id,
    /// email, and display name.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::seconds(TOKEN_TTL))
            .ok_or_else(|| AppError::Internal("Token expiry overflowed".into()))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token's signature and expiry and decodes its claims.
    ///
    /// Every verification failure (malformed, expired, bad signature)
    /// collapses into the same `Unauthorized` error so nothing about the
    /// failure mode leaks to the caller.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized("Invalid token".into()))
    }
}
