pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::auth::{AuthMiddleware, TokenManager};

/// Wires the `/api` route tree.
///
/// The auth endpoints are public; the user and task scopes sit behind
/// [`AuthMiddleware`], which verifies the bearer access token before any
/// handler runs.
pub fn config(cfg: &mut web::ServiceConfig, tokens: &TokenManager) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::refresh),
    )
    .service(
        web::scope("/users")
            .wrap(AuthMiddleware::new(tokens.clone()))
            .service(users::get_me)
            .service(users::update_me),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware::new(tokens.clone()))
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
