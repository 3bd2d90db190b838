//! Rally API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use rally_application::{EventService, ImageService, MAX_IMAGE_BYTES, SessionLogService};
use rally_core::AppError;
use rally_infrastructure::{
    GeocoderConfig, HttpImageStore, HttpImageStoreConfig, HttpPrincipalResolver,
    NominatimGeocodingGateway, PostgresEventRepository, PostgresSessionLogRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api_config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let http_client = reqwest::Client::new();

    let event_repository = Arc::new(PostgresEventRepository::new(pool.clone()));
    let geocoder = Arc::new(NominatimGeocodingGateway::new(GeocoderConfig {
        base_url: config.geocoder_base_url.clone(),
        user_agent: config.geocoder_user_agent.clone(),
        timeout: config.geocoder_timeout,
    })?);
    let session_log_repository = Arc::new(PostgresSessionLogRepository::new(pool.clone()));
    let image_store = Arc::new(HttpImageStore::new(
        http_client.clone(),
        HttpImageStoreConfig {
            upload_url: config.image_store_upload_url.clone(),
            api_key: config.image_store_api_key.clone(),
        },
    ));
    let principal_resolver = Arc::new(HttpPrincipalResolver::new(
        http_client,
        config.auth_introspect_url.clone(),
    ));

    let app_state = AppState {
        event_service: EventService::new(event_repository, geocoder),
        session_log_service: SessionLogService::new(session_log_repository),
        image_service: ImageService::new(image_store),
        principal_resolver,
    };

    let protected_routes = Router::new()
        .route("/api/events", post(handlers::events::create_event_handler))
        .route(
            "/api/events/mine",
            get(handlers::events::list_my_events_handler),
        )
        .route(
            "/api/events/{event_id}",
            put(handlers::events::update_event_handler)
                .delete(handlers::events::delete_event_handler),
        )
        .route(
            "/api/events/image",
            post(handlers::images::upload_image_handler)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024)),
        )
        .route(
            "/api/session-logs",
            get(handlers::session_logs::list_session_logs_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/events", get(handlers::events::list_events_handler))
        .route(
            "/api/events/search",
            get(handlers::events::search_events_handler),
        )
        .route(
            "/api/events/{event_id}",
            get(handlers::events::get_event_handler),
        );

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&config.frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&config.api_host).map_err(|error| {
        AppError::Internal(format!("invalid API_HOST '{}': {error}", config.api_host))
    })?;
    let address = SocketAddr::from((host, config.api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "rally-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
