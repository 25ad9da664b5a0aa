//! # Blogicum web server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;
mod urls;
mod views;

use config::AppConfig;
use middleware::csrf::CsrfGuard;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{LogFormat, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(LogFormat::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Blogicum on {}:{} (page size {})",
        config.host,
        config.port,
        config.page_size
    );

    let state = AppState::new(&config).await;

    HttpServer::new(move || {
        App::new()
            .wrap(CsrfGuard)
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
