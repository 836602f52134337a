//!
//! # Error Envelope Protocol
//!
//! A thrown failure cannot cross the process boundary between the gateway
//! and the administrator service, so failures travel as plain data: an
//! envelope of the shape `{ "error": true, "message": ..., "code": ... }`
//! in the same channel (and the same JSON slot) as success payloads.
//!
//! The administrator side converts exactly once, at the dispatch boundary
//! (`ErrorEnvelope::from`). The gateway side converts back exactly once, at
//! the forwarding boundary (`RpcReply::into_result`). Decoding uses a
//! discriminated union rather than field-sniffing on the success path: the
//! envelope arm only matches when the literal `error` field deserializes to
//! `true`, so a success payload that happens to carry an `error` field with
//! any other value is never misclassified.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// A failure represented as a plain data value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    /// Discriminant. Always serialized as `true`; deserialization rejects
    /// anything else so the envelope arm of [`RpcReply`] cannot swallow
    /// success payloads.
    #[serde(deserialize_with = "literal_true")]
    pub error: bool,
    pub message: String,
    /// HTTP-status-semantics code. Left untyped on the wire: a missing or
    /// non-numeric code is treated as internal (500) by the consumer.
    #[serde(default)]
    pub code: Value,
}

fn literal_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    if bool::deserialize(deserializer)? {
        Ok(true)
    } else {
        Err(serde::de::Error::custom("error discriminant must be true"))
    }
}

impl ErrorEnvelope {
    /// The wire form of the envelope. Infallible, so the dispatch layer can
    /// always produce a reply value.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "error": self.error,
            "message": self.message,
            "code": self.code,
        })
    }

    /// The code as an HTTP status, defaulting to 500 when absent or not a
    /// number in the valid status range.
    pub fn status_code(&self) -> u16 {
        self.code
            .as_u64()
            .and_then(|code| u16::try_from(code).ok())
            .filter(|code| (100..=599).contains(code))
            .unwrap_or(500)
    }
}

/// The single point converting a raised failure into a plain value. Called
/// by the dispatch layer for every failure, domain or unexpected.
impl From<&AppError> for ErrorEnvelope {
    fn from(error: &AppError) -> Self {
        Self {
            error: true,
            message: error.message().to_string(),
            code: Value::from(error.code()),
        }
    }
}

/// What comes back over the RPC bridge: either the success DTO or an error
/// envelope, discriminated at deserialization time.
///
/// The envelope arm is tried first; it only matches when `error` is
/// literally `true`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RpcReply<T> {
    Err(ErrorEnvelope),
    Ok(T),
}

impl<T> RpcReply<T> {
    /// The single point converting an envelope back into a raised failure.
    /// Success values pass through unchanged.
    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            RpcReply::Ok(value) => Ok(value),
            RpcReply::Err(envelope) => Err(AppError::Remote {
                code: envelope.status_code(),
                message: envelope.message,
            }),
        }
    }
}

/// Decodes a raw administrator response into the expected success type or
/// the error it carries.
pub fn decode_reply<T: serde::de::DeserializeOwned>(response: Value) -> Result<T, AppError> {
    serde_json::from_value::<RpcReply<T>>(response)?.into_result()
}
