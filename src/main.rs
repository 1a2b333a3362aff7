use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::info;
use serde_json::json;
use std::env;

mod config;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use config::AuthConfig;
use services::{AuthService, MongoDBService, TokenService, VendorService};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("SERVER_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("SERVER_PORT must be a number");
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(log_level));

    let mongodb = MongoDBService::init()
        .await
        .expect("Failed to initialize MongoDB");
    let mongodb_data = web::Data::new(mongodb);

    let auth_config = AuthConfig::load().expect("Failed to load auth configuration");
    let token_service = web::Data::new(TokenService::new(
        auth_config.jwt_secret,
        auth_config.token_ttl_hours,
    ));

    let auth_service = web::Data::new(AuthService::new(
        mongodb_data.clone(),
        token_service.get_ref().clone(),
    ));
    let vendor_service = web::Data::new(VendorService::new(mongodb_data.clone()));

    info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_headers(vec!["content-type", "content-length", "accept"])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(mongodb_data.clone())
            .app_data(token_service.clone())
            .app_data(auth_service.clone())
            .app_data(vendor_service.clone())
            .configure(routes::configure)
            .route(
                "/api/health",
                web::get().to(|| async {
                    info!("Health check");
                    HttpResponse::Ok().json(json!({
                        "message": "Sabi Market server is running",
                        "timestamp": chrono::Utc::now().to_rfc3339()
                    }))
                }),
            )
    })
    .bind(format!("{host}:{port}"))?
    .run()
    .await?;

    info!("Server shutting down");
    Ok(())
}
