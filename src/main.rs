use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use sqlx::PgPool;

use tasklane::auth::{AuthService, TokenManager};
use tasklane::config::Config;
use tasklane::routes;
use tasklane::store::{PgStore, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let tokens = TokenManager::new(
        &config.jwt_secret,
        config.access_token_minutes,
        config.refresh_token_days,
    );
    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    let store_data = web::Data::from(store.clone());
    let auth_service = web::Data::new(AuthService::new(store, tokens.clone()));

    log::info!("Starting tasklane server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(store_data.clone())
            .app_data(auth_service.clone())
            .service(routes::health::health)
            .service(web::scope("/api").configure(|cfg| routes::config(cfg, &tokens)))
    })
    .bind(bind_addr)?
    .run()
    .await
}
