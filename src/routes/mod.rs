pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .service(health::health)
            .service(
                web::scope("/tasks")
                    .service(tasks::find_all)
                    .service(tasks::create)
                    .service(tasks::find_one)
                    .service(tasks::update)
                    .service(tasks::remove),
            )
            .service(
                web::scope("/users")
                    .service(users::create)
                    .service(users::login),
            ),
    );
}
