//! FlotaRental Backend Server
//!
//! Back-office API for a car rental fleet: bookings, fleet and customer
//! management, and revenue reporting.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use flota_api::handlers::{
    configure_auth, configure_customers, configure_reservations, configure_stats,
    configure_users, configure_vehicles,
};
use flota_auth::{JwtService, PasswordService};
use flota_core::AppConfig;
use flota_db::create_pool;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "flota-rental",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Health check
            .route("/health", web::get().to(health_check))
            // Auth endpoints
            .configure(configure_auth)
            // Fleet endpoints
            .configure(configure_vehicles)
            // Customer endpoints
            .configure(configure_customers)
            // Booking endpoints
            .configure(configure_reservations)
            // Revenue reports and dashboard
            .configure(configure_stats)
            // User administration endpoints (admin only)
            .configure(configure_users),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "flota_rental={},flota_api={},flota_services={},flota_db={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!(
        "Starting FlotaRental Backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration (defaults, config files, then FLOTA__* env vars)
    let config = AppConfig::load().expect("Failed to load configuration");

    // Create auth services
    let jwt_service = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_secs,
    ));
    let password_service = Arc::new(PasswordService::new());

    info!(
        "JWT service configured with {} second token expiration",
        config.auth.jwt_expiration_secs
    );

    info!("Connecting to database...");
    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .expect("Failed to create database pool");

    info!(
        "Database connection established with {} max connections",
        config.database.max_connections
    );

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    let cors_origins = config.cors_origins();

    // Clone services for closure
    let jwt_service_clone = jwt_service.clone();
    let password_service_clone = password_service.clone();

    // Create and run server
    HttpServer::new(move || {
        // Configure CORS - clone origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                if let Ok(origin_str) = origin.to_str() {
                    cors_origins_inner.iter().any(|o| o == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::COOKIE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            // Add database pool to app data
            .app_data(web::Data::new(pool.clone()))
            // Add auth services
            .app_data(web::Data::new(jwt_service_clone.clone()))
            .app_data(web::Data::new(password_service_clone.clone()))
            // Malformed query strings get the standard envelope
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "code": "400",
                        "message": error_message,
                        "data": null,
                    })),
                )
                .into()
            }))
            // Middleware
            .wrap(cors)
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            // Configure routes
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
