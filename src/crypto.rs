//!
//! # Credential Cipher
//!
//! Passwords travel encrypted through the transport layer: the client
//! applies a reversible symmetric transform before transmission, and the
//! administrator service reverses it before hashing (registration) or
//! verification (login). At rest only the bcrypt digest is stored.
//!
//! The transport transform is AES-256-GCM with a fresh random 12-byte nonce
//! per encryption, the nonce prepended to the ciphertext and the whole blob
//! base64-encoded. The 256-bit key is derived from the configured shared
//! secret with SHA-256.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AppError;

const NONCE_LEN: usize = 12;

/// Reversible transform for credentials in transit.
#[derive(Clone)]
pub struct CredentialCipher {
    key: [u8; 32],
}

impl CredentialCipher {
    /// Derives the cipher key from a shared secret string.
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypts a plaintext credential for transmission.
    ///
    /// Generates a fresh random nonce per call, so encrypting the same
    /// plaintext twice yields different ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, AppError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| AppError::Internal(format!("Failed to encrypt credential: {}", e)))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    /// Decrypts a transport-encrypted credential.
    ///
    /// Any malformed input (bad base64, truncated blob, failed
    /// authentication tag, non-UTF-8 plaintext) yields
    /// `AppError::Decryption`.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, AppError> {
        let blob = BASE64
            .decode(ciphertext)
            .map_err(|e| AppError::Decryption(format!("Malformed ciphertext: {}", e)))?;

        if blob.len() <= NONCE_LEN {
            return Err(AppError::Decryption("Ciphertext too short".into()));
        }
        let (nonce_bytes, payload) = blob.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), payload)
            .map_err(|_| AppError::Decryption("Failed to decrypt credential".into()))?;

        String::from_utf8(plaintext)
            .map_err(|_| AppError::Decryption("Decrypted credential is not valid UTF-8".into()))
    }
}

/// Hashes a plaintext password for at-rest storage.
///
/// bcrypt generates a fresh random salt per call and embeds it in the
/// digest.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a plaintext password against a stored digest, recomputing with
/// the digest's embedded salt.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, hashed_password)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}
