//!
//! # Command Dispatch
//!
//! The administrator-side router. Each cross-process call names a command
//! and carries a self-describing JSON payload; the dispatcher resolves the
//! command to its handler, invokes the matching domain operation, and
//! normalizes the outcome: a success value passes through as-is, a raised
//! failure is converted into an error envelope and returned as a normal
//! value, never re-thrown, because the transport cannot carry a failure
//! across the process boundary.
//!
//! An unknown command name is a wiring defect, not a client error: the
//! command table is built once at startup from a fixed set, so a miss
//! panics instead of surfacing as a 500 that would hide the bug.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::envelope::ErrorEnvelope;
use crate::error::AppError;
use crate::models::{RemoveTaskPayload, UpdateTaskPayload};
use crate::services::{TaskService, UserService};

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, AppError>> + Send>>;
type Handler = Box<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

pub struct Dispatcher {
    handlers: HashMap<&'static str, Handler>,
}

impl Dispatcher {
    /// Wires the full command surface onto the given services.
    pub fn new(tasks: Arc<TaskService>, users: Arc<UserService>) -> Self {
        let mut dispatcher = Self {
            handlers: HashMap::new(),
        };

        let service = tasks.clone();
        dispatcher.register("createTask", move |payload| {
            let service = service.clone();
            Box::pin(async move {
                let dto = serde_json::from_value(payload)?;
                Ok(serde_json::to_value(service.create(dto).await?)?)
            })
        });

        let service = tasks.clone();
        dispatcher.register("findAllTasks", move |_payload| {
            let service = service.clone();
            Box::pin(async move { Ok(serde_json::to_value(service.find_all().await?)?) })
        });

        let service = tasks.clone();
        dispatcher.register("findOneTask", move |payload| {
            let service = service.clone();
            Box::pin(async move {
                let id: crate::models::NumericId = serde_json::from_value(payload)?;
                Ok(serde_json::to_value(service.find_one(id.value()).await?)?)
            })
        });

        let service = tasks.clone();
        dispatcher.register("updateTask", move |payload| {
            let service = service.clone();
            Box::pin(async move {
                let data: UpdateTaskPayload = serde_json::from_value(payload)?;
                let view = service
                    .update(data.user_id.value(), data.task.id.value(), data.task)
                    .await?;
                Ok(serde_json::to_value(view)?)
            })
        });

        let service = tasks;
        dispatcher.register("removeTask", move |payload| {
            let service = service.clone();
            Box::pin(async move {
                let data: RemoveTaskPayload = serde_json::from_value(payload)?;
                let removed = service
                    .remove(data.task_id.value(), data.user_id.value())
                    .await?;
                Ok(Value::from(removed))
            })
        });

        let service = users.clone();
        dispatcher.register("createUser", move |payload| {
            let service = service.clone();
            Box::pin(async move {
                let dto = serde_json::from_value(payload)?;
                Ok(serde_json::to_value(service.create(dto).await?)?)
            })
        });

        let service = users;
        dispatcher.register("login", move |payload| {
            let service = service.clone();
            Box::pin(async move {
                let dto = serde_json::from_value(payload)?;
                Ok(serde_json::to_value(service.login(dto).await?)?)
            })
        });

        dispatcher
    }

    fn register<F>(&mut self, name: &'static str, handler: F)
    where
        F: Fn(Value) -> HandlerFuture + Send + Sync + 'static,
    {
        self.handlers.insert(name, Box::new(handler));
    }

    /// The command names this dispatcher serves.
    pub fn commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Resolves and runs a command, normalizing any failure into an error
    /// envelope value.
    ///
    /// # Panics
    ///
    /// Panics on an unregistered command name.
    pub async fn dispatch(&self, name: &str, payload: Value) -> Value {
        let handler = self
            .handlers
            .get(name)
            .unwrap_or_else(|| panic!("No handler registered for command '{}'", name));

        match handler(payload).await {
            Ok(value) => value,
            Err(error) => {
                log::error!("{}", error);
                ErrorEnvelope::from(&error).to_value()
            }
        }
    }
}
