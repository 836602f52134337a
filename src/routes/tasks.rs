//!
//! # Task Routes
//!
//! The gateway's forwarding layer for tasks. Each handler translates the
//! public HTTP operation into a named command sent over the RPC bridge,
//! awaits the single reply, and either passes the success DTO through to
//! the client unchanged or surfaces the error envelope's code and message
//! as the HTTP response.

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::envelope::decode_reply;
use crate::error::AppError;
use crate::models::{CreateTaskRequest, UpdateTaskRequest};
use crate::rpc::SharedCommandClient;

/// The requesting user, delivered as a query parameter on mutating routes.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Creates a task for the user named in the body. Responds 201 with the
/// task projection, or 404 if that user does not exist.
#[post("")]
pub async fn create(
    client: web::Data<SharedCommandClient>,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let reply = client
        .send("createTask", serde_json::to_value(task_data.into_inner())?)
        .await?;
    let view: Value = decode_reply(reply)?;

    Ok(HttpResponse::Created().json(view))
}

/// Lists all tasks with their owners.
#[get("")]
pub async fn find_all(client: web::Data<SharedCommandClient>) -> Result<impl Responder, AppError> {
    let reply = client.send("findAllTasks", json!("")).await?;
    let views: Value = decode_reply(reply)?;

    Ok(HttpResponse::Ok().json(views))
}

/// Fetches a single task. 404 if it does not exist.
#[get("/{id}")]
pub async fn find_one(
    client: web::Data<SharedCommandClient>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let reply = client
        .send("findOneTask", json!(task_id.into_inner()))
        .await?;
    let view: Value = decode_reply(reply)?;

    Ok(HttpResponse::Ok().json(view))
}

/// Updates the task named in the body on behalf of the `userId` query
/// parameter. 403 when that user is not the owner, 404 when the task is
/// missing.
#[put("")]
pub async fn update(
    client: web::Data<SharedCommandClient>,
    query: web::Query<UserIdQuery>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let reply = client
        .send(
            "updateTask",
            json!({
                "userId": query.into_inner().user_id,
                "task": serde_json::to_value(task_data.into_inner())?,
            }),
        )
        .await?;
    let view: Value = decode_reply(reply)?;

    Ok(HttpResponse::Ok().json(view))
}

/// Deletes a task on behalf of the `userId` query parameter. Responds 204
/// with no body; the administrator's boolean result is not forwarded.
#[delete("/{id}")]
pub async fn remove(
    client: web::Data<SharedCommandClient>,
    task_id: web::Path<i64>,
    query: web::Query<UserIdQuery>,
) -> Result<impl Responder, AppError> {
    let reply = client
        .send(
            "removeTask",
            json!({
                "taskId": task_id.into_inner(),
                "userId": query.into_inner().user_id,
            }),
        )
        .await?;
    let _removed: bool = decode_reply(reply)?;

    Ok(HttpResponse::NoContent().finish())
}
