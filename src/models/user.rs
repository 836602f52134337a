use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user as held by the administrator service. The password field is the
/// bcrypt digest, never the plaintext, and the entity is never serialized
/// outward; external callers only ever see [`UserView`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    /// Unique across all users.
    pub email: String,
    pub name: String,
    /// bcrypt digest of the password.
    pub password: String,
}

/// Registration payload. The password arrives transport-encrypted; the
/// administrator service decrypts it before hashing.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email, length(max = 100))]
    pub email: String,
    /// Base64 ciphertext of the password.
    #[validate(length(min = 1, max = 255))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Login payload. The password arrives transport-encrypted, same as on
/// registration.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub password: String,
}

/// The outward projection of a user. No credential field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
