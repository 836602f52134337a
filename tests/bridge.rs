use std::sync::Arc;

use actix_web::{test, web, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use taskbridge::auth::{AuthMiddleware, TokenIssuer};
use taskbridge::crypto::CredentialCipher;
use taskbridge::dispatch::Dispatcher;
use taskbridge::routes;
use taskbridge::rpc::{self, SharedCommandClient, TcpCommandClient};
use taskbridge::services::{TaskService, UserService};
use taskbridge::store::MemoryStore;

const JWT_SECRET: &str = "bridge-jwt-secret";
const CIPHER_SECRET: &str = "bridge-cipher-secret";

async fn spawn_administrator() -> String {
    let store = Arc::new(MemoryStore::new());
    let tasks = Arc::new(TaskService::new(store.clone(), store.clone()));
    let users = Arc::new(UserService::new(
        store,
        CredentialCipher::new(CIPHER_SECRET),
        TokenIssuer::new(JWT_SECRET),
        4,
    ));
    let dispatcher = Arc::new(Dispatcher::new(tasks, users));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(rpc::serve(listener, dispatcher));
    addr
}

// The same flow as the in-process suite, but with the gateway talking to
// the administrator over the real TCP bridge.
#[actix_rt::test]
async fn test_gateway_to_administrator_over_tcp() {
    let addr = spawn_administrator().await;
    let client: SharedCommandClient = Arc::new(TcpCommandClient::new(addr));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(client))
            .wrap(AuthMiddleware::new(TokenIssuer::new(JWT_SECRET)))
            .configure(routes::config),
    )
    .await;

    let cipher = CredentialCipher::new(CIPHER_SECRET);

    let req = test::TestRequest::post()
        .uri("/v1/users")
        .set_json(json!({
            "email": "a@b.com",
            "password": cipher.encrypt("test1234").unwrap(),
            "name": "A",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let user: Value = test::read_body_json(resp).await;
    let user_id = user["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/v1/users/login")
        .set_json(json!({
            "email": "a@b.com",
            "password": cipher.encrypt("test1234").unwrap(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/v1/tasks")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "title": "T1",
            "description": "d",
            "status": "TO_DO",
            "user": user_id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let task: Value = test::read_body_json(resp).await;
    assert_eq!(task["user"]["id"], user_id);

    // An envelope crossing the wire keeps its status semantics.
    let req = test::TestRequest::get()
        .uri("/v1/tasks/999")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

// A gateway whose administrator is down surfaces transport failures as 500.
#[actix_rt::test]
async fn test_unreachable_administrator_surfaces_as_internal() {
    let client: SharedCommandClient = Arc::new(TcpCommandClient::new("127.0.0.1:1"));
    let user = taskbridge::models::User {
        id: 1,
        email: "a@b.com".to_string(),
        name: "A".to_string(),
        password: "digest".to_string(),
    };
    let token = TokenIssuer::new(JWT_SECRET).issue(&user).unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(client))
            .wrap(AuthMiddleware::new(TokenIssuer::new(JWT_SECRET)))
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/v1/tasks")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
}
