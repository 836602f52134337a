//!
//! # User Service
//!
//! Registration, login, and token issuance. Passwords arrive
//! transport-encrypted: the service decrypts them with the credential
//! cipher, then either hashes for storage (registration) or verifies
//! against the stored digest (login). The plaintext never leaves this
//! module and the digest never leaves the administrator process.

use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::crypto::{hash_password, verify_password, CredentialCipher};
use crate::error::AppError;
use crate::models::{CreateUserRequest, LoginRequest, TokenResponse, User, UserView};
use crate::store::UserRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    cipher: CredentialCipher,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cipher: CredentialCipher,
        tokens: TokenIssuer,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            cipher,
            tokens,
            bcrypt_cost,
        }
    }

    /// Registers a user: decrypt the transport password, hash it for
    /// storage, persist, and return the credential-free projection.
    pub async fn create(&self, dto: CreateUserRequest) -> Result<UserView, AppError> {
        let plaintext = self.cipher.decrypt(&dto.password)?;
        let digest = hash_password(&plaintext, self.bcrypt_cost)?;

        let user = self
            .users
            .save(User {
                id: 0,
                email: dto.email,
                name: dto.name,
                password: digest,
            })
            .await?;

        Ok(UserView::from(&user))
    }

    /// Authenticates a user and mints a bearer token carrying the subject
    /// id, email, and name.
    ///
    /// Unknown email and wrong password both yield `Unauthorized`, each
    /// with its own message.
    pub async fn login(&self, dto: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid Email".into()))?;

        let plaintext = self.cipher.decrypt(&dto.password)?;
        if !verify_password(&plaintext, &user.password)? {
            return Err(AppError::Unauthorized("Invalid Password".into()));
        }

        Ok(TokenResponse {
            access_token: self.tokens.issue(&user)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const TEST_COST: u32 = 4;

    fn service() -> (UserService, CredentialCipher, TokenIssuer) {
        let cipher = CredentialCipher::new("cipher-secret");
        let tokens = TokenIssuer::new("jwt-secret");
        let service = UserService::new(
            Arc::new(MemoryStore::new()),
            cipher.clone(),
            tokens.clone(),
            TEST_COST,
        );
        (service, cipher, tokens)
    }

    fn register_dto(cipher: &CredentialCipher, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: cipher.encrypt("test1234").unwrap(),
            name: "A".to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_create_returns_view_without_credential() {
        let (service, cipher, _) = service();

        let view = service
            .create(register_dto(&cipher, "a@b.com"))
            .await
            .unwrap();
        assert_eq!(view.email, "a@b.com");
        assert_eq!(view.name, "A");
        assert!(view.id > 0);
    }

    #[actix_rt::test]
    async fn test_create_with_duplicate_email_is_bad_request() {
        let (service, cipher, _) = service();
        service
            .create(register_dto(&cipher, "a@b.com"))
            .await
            .unwrap();

        match service.create(register_dto(&cipher, "a@b.com")).await {
            Err(AppError::BadRequest(_)) => {}
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_create_with_malformed_ciphertext_fails() {
        let (service, _, _) = service();
        let dto = CreateUserRequest {
            email: "a@b.com".to_string(),
            password: "plainly-not-ciphertext".to_string(),
            name: "A".to_string(),
        };
        assert!(matches!(
            service.create(dto).await,
            Err(AppError::Decryption(_))
        ));
    }

    #[actix_rt::test]
    async fn test_login_success_token_subject_matches_user() {
        let (service, cipher, tokens) = service();
        let view = service
            .create(register_dto(&cipher, "a@b.com"))
            .await
            .unwrap();

        let response = service
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: cipher.encrypt("test1234").unwrap(),
            })
            .await
            .unwrap();

        let claims = tokens.verify(&response.access_token).unwrap();
        assert_eq!(claims.sub, view.id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.name, "A");
    }

    #[actix_rt::test]
    async fn test_login_unknown_email_is_unauthorized() {
        let (service, cipher, _) = service();

        match service
            .login(LoginRequest {
                email: "nobody@b.com".to_string(),
                password: cipher.encrypt("test1234").unwrap(),
            })
            .await
        {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid Email"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let (service, cipher, _) = service();
        service
            .create(register_dto(&cipher, "a@b.com"))
            .await
            .unwrap();

        match service
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: cipher.encrypt("wrong-password").unwrap(),
            })
            .await
        {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid Password"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }
}
