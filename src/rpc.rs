//!
//! # RPC Bridge
//!
//! The request/response exchange between the gateway and the administrator
//! service. Each call carries a command frame `{ "pattern": ..., "data": ... }`
//! and awaits exactly one reply: the success DTO or an error envelope, both
//! traveling through the same JSON slot.
//!
//! The TCP transport uses one newline-delimited frame pair per connection,
//! which keeps request/reply correlation implicit; concurrent calls simply
//! use concurrent connections, with no ordering guarantee between them.
//! There is no timeout here beyond the transport's own. This is a pragmatic
//! bridge, not a message-durability system: nothing is retried or persisted
//! across restarts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::dispatch::Dispatcher;
use crate::error::AppError;

/// One command crossing the process boundary.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandFrame {
    pub pattern: String,
    #[serde(default)]
    pub data: Value,
}

/// Gateway-side sender: builds a command, awaits the single reply.
///
/// A transport failure surfaces as `AppError::Internal`, which the
/// forwarding layer maps to the default internal code like any other
/// unanticipated failure.
#[async_trait]
pub trait CommandClient: Send + Sync {
    async fn send(&self, pattern: &str, data: Value) -> Result<Value, AppError>;
}

pub type SharedCommandClient = Arc<dyn CommandClient>;

/// Sends commands over TCP, one connection per call.
pub struct TcpCommandClient {
    addr: String,
}

impl TcpCommandClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

#[async_trait]
impl CommandClient for TcpCommandClient {
    async fn send(&self, pattern: &str, data: Value) -> Result<Value, AppError> {
        let frame = CommandFrame {
            pattern: pattern.to_string(),
            data,
        };
        let mut line = serde_json::to_string(&frame)?;
        line.push('\n');

        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| AppError::Internal(format!("Administrator unreachable: {}", e)))?;
        let (reader, mut writer) = stream.into_split();

        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send command: {}", e)))?;

        let mut reply = String::new();
        BufReader::new(reader)
            .read_line(&mut reply)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read reply: {}", e)))?;
        if reply.is_empty() {
            return Err(AppError::Internal(
                "Administrator closed the connection without replying".into(),
            ));
        }

        Ok(serde_json::from_str(&reply)?)
    }
}

/// Runs commands against a dispatcher in the same process. Used by the
/// test suite and for single-process deployments.
pub struct InProcessClient {
    dispatcher: Arc<Dispatcher>,
}

impl InProcessClient {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl CommandClient for InProcessClient {
    async fn send(&self, pattern: &str, data: Value) -> Result<Value, AppError> {
        Ok(self.dispatcher.dispatch(pattern, data).await)
    }
}

/// Administrator-side accept loop: one tokio task per connection, one
/// command frame and one reply per connection.
pub async fn serve(listener: TcpListener, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, dispatcher).await {
                log::warn!("Connection from {} failed: {}", peer, e);
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    dispatcher: Arc<Dispatcher>,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();

    let mut line = String::new();
    BufReader::new(reader).read_line(&mut line).await?;
    if line.trim().is_empty() {
        return Ok(());
    }

    let frame: CommandFrame = match serde_json::from_str(&line) {
        Ok(frame) => frame,
        Err(e) => {
            log::warn!("Dropping malformed command frame: {}", e);
            return Ok(());
        }
    };

    let reply = dispatcher.dispatch(&frame.pattern, frame.data).await;
    let mut reply_line = reply.to_string();
    reply_line.push('\n');
    writer.write_all(reply_line.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use crate::crypto::CredentialCipher;
    use crate::services::{TaskService, UserService};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn dispatcher() -> (Arc<Dispatcher>, CredentialCipher) {
        let store = Arc::new(MemoryStore::new());
        let cipher = CredentialCipher::new("cipher-secret");
        let tasks = Arc::new(TaskService::new(store.clone(), store.clone()));
        let users = Arc::new(UserService::new(
            store,
            cipher.clone(),
            TokenIssuer::new("jwt-secret"),
            4,
        ));
        (Arc::new(Dispatcher::new(tasks, users)), cipher)
    }

    #[tokio::test]
    async fn test_tcp_roundtrip() {
        let (dispatcher, cipher) = dispatcher();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, dispatcher));

        let client = TcpCommandClient::new(addr.to_string());

        let reply = client
            .send(
                "createUser",
                json!({
                    "email": "a@b.com",
                    "password": cipher.encrypt("test1234").unwrap(),
                    "name": "A",
                }),
            )
            .await
            .unwrap();
        assert_eq!(reply["email"], "a@b.com");

        // Failures arrive as envelope values, not transport errors.
        let reply = client.send("findOneTask", json!(42)).await.unwrap();
        assert_eq!(reply["error"], true);
        assert_eq!(reply["code"], 404);
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let (dispatcher, _) = dispatcher();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, dispatcher));

        let mut handles = Vec::new();
        for id in 1..=8 {
            let addr = addr.to_string();
            handles.push(tokio::spawn(async move {
                TcpCommandClient::new(addr)
                    .send("findOneTask", json!(id))
                    .await
                    .unwrap()
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            let reply = handle.await.unwrap();
            assert_eq!(
                reply["message"],
                format!("Task not found with id {}", i + 1)
            );
        }
    }

    #[tokio::test]
    async fn test_unreachable_administrator_is_internal_error() {
        // Port 1 is reserved and never listening.
        let client = TcpCommandClient::new("127.0.0.1:1");
        match client.send("findAllTasks", json!("")).await {
            Err(AppError::Internal(_)) => {}
            other => panic!("Expected Internal, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_in_process_client_matches_dispatcher() {
        let (dispatcher, _) = dispatcher();
        let client = InProcessClient::new(dispatcher);
        let reply = client.send("findAllTasks", json!("")).await.unwrap();
        assert_eq!(reply, json!([]));
    }
}
