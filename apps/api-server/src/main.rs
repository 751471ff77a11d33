//! # Blogflow API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);

    tracing::info!(
        "Starting Blogflow API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(config.database.as_ref(), config.jwt.clone()).await;

    if let Some(seed) = &config.admin {
        if let Err(e) = state.seed_admin(seed).await {
            tracing::error!("Failed to seed admin account: {}", e);
        }
    }

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
