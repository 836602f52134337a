//!
//! # User Routes
//!
//! Registration and login, forwarded to the administrator service. These
//! are the only two operations reachable without a bearer token.

use actix_web::{post, web, HttpResponse, Responder};
use serde_json::Value;
use validator::Validate;

use crate::envelope::decode_reply;
use crate::error::AppError;
use crate::models::{CreateUserRequest, LoginRequest};
use crate::rpc::SharedCommandClient;

/// Registers a user. The password field carries ciphertext, not the
/// plaintext password. Responds 201 with the credential-free projection.
#[post("")]
pub async fn create(
    client: web::Data<SharedCommandClient>,
    user_data: web::Json<CreateUserRequest>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let reply = client
        .send("createUser", serde_json::to_value(user_data.into_inner())?)
        .await?;
    let view: Value = decode_reply(reply)?;

    Ok(HttpResponse::Created().json(view))
}

/// Authenticates a user. Responds 200 with `{ "access_token": ... }`, or
/// 401 for an unknown email or wrong password.
#[post("/login")]
pub async fn login(
    client: web::Data<SharedCommandClient>,
    user_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let reply = client
        .send("login", serde_json::to_value(user_data.into_inner())?)
        .await?;
    let token: Value = decode_reply(reply)?;

    Ok(HttpResponse::Ok().json(token))
}
