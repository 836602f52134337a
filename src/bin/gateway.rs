use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use taskbridge::auth::{AuthMiddleware, TokenIssuer};
use taskbridge::config::GatewayConfig;
use taskbridge::routes;
use taskbridge::rpc::{SharedCommandClient, TcpCommandClient};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let config = GatewayConfig::from_env();

    let issuer = TokenIssuer::new(config.jwt_secret.clone());
    let client: SharedCommandClient =
        Arc::new(TcpCommandClient::new(config.administrator_addr.clone()));

    log::info!("Gateway listening at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(client.clone()))
            .wrap(AuthMiddleware::new(issuer.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.clone(), config.server_port))?
    .run()
    .await
}
