//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used by both the
//! gateway and the administrator service. Domain code raises typed failures
//! locally; the dispatch layer converts them into error envelopes before
//! they leave the administrator process, and the gateway converts envelopes
//! back into client-visible HTTP errors.
//!
//! `AppError` implements `actix_web::error::ResponseError` so gateway
//! handlers can return it directly. `From` implementations for
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError`, and
//! `serde_json::Error` allow conversion with the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Bad credentials or a missing/invalid bearer token (HTTP 401).
    Unauthorized(String),
    /// An ownership violation: the requesting user does not own the
    /// entity it is trying to mutate (HTTP 403).
    Forbidden(String),
    /// A requested entity was not found (HTTP 404).
    NotFound(String),
    /// A malformed or conflicting request, e.g. a duplicate email on
    /// registration (HTTP 400).
    BadRequest(String),
    /// A transport-encrypted credential could not be decrypted. Treated as
    /// an internal failure (HTTP 500) so nothing about the cipher leaks.
    Decryption(String),
    /// Anything unanticipated (HTTP 500).
    Internal(String),
    /// The gateway-side image of an error envelope received from the
    /// administrator service. The code maps 1:1 to an HTTP status.
    Remote { code: u16, message: String },
}

impl AppError {
    /// The numeric code carried across the process boundary in an error
    /// envelope. Maps 1:1 to HTTP status semantics.
    pub fn code(&self) -> u16 {
        match self {
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::BadRequest(_) => 400,
            AppError::Decryption(_) | AppError::Internal(_) => 500,
            AppError::Remote { code, .. } => *code,
        }
    }

    /// The human-readable message carried alongside the code.
    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Decryption(msg)
            | AppError::Internal(msg)
            | AppError::Remote { message: msg, .. } => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Decryption(msg) => write!(f, "Decryption Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::Remote { code, message } => write!(f, "Remote Error ({}): {}", code, message),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This lets Actix Web translate errors returned from gateway handlers into
/// the correct HTTP status codes with JSON bodies.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "statusCode": self.code(),
            "message": self.message(),
        }))
    }
}

/// JWT processing failures (verification, encoding) surface as 401.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// Password hashing failures are internal errors.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

/// DTO validation failures are client errors.
impl From<validator::ValidationErrors> for AppError {
    fn from(error: validator::ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

/// Payload (de)serialization failures at the dispatch boundary are internal
/// errors; validation proper happens upstream of the services.
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> AppError {
        AppError::Internal(error.to_string())
    }
}
