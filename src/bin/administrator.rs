use std::sync::Arc;

use tokio::net::TcpListener;

use taskbridge::auth::TokenIssuer;
use taskbridge::config::AdministratorConfig;
use taskbridge::crypto::CredentialCipher;
use taskbridge::dispatch::Dispatcher;
use taskbridge::rpc;
use taskbridge::services::{TaskService, UserService};
use taskbridge::store::MemoryStore;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let config = AdministratorConfig::from_env();

    let store = Arc::new(MemoryStore::new());
    let tasks = Arc::new(TaskService::new(store.clone(), store.clone()));
    let users = Arc::new(UserService::new(
        store,
        CredentialCipher::new(&config.cipher_secret),
        TokenIssuer::new(config.jwt_secret.clone()),
        config.bcrypt_cost,
    ));
    let dispatcher = Arc::new(Dispatcher::new(tasks, users));

    let listener = TcpListener::bind(&config.listen_addr).await?;
    log::info!(
        "Administrator service listening on {}",
        config.listen_addr
    );
    rpc::serve(listener, dispatcher).await
}
