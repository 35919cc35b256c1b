//! Route table and HTTP middleware

use crate::handlers::{health, thumbnail_upload, video_upload};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::Config;

/// Setup all application routes
///
/// Each upload route carries its own body limit; the outer request limit only
/// caps the largest of them.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api_routes = Router::new()
        .route("/api/healthz", get(health::healthz))
        .route(
            "/api/thumbnail_upload/{video_id}",
            post(thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(config.max_thumbnail_size_bytes)),
        )
        .route(
            "/api/video_upload/{video_id}",
            post(video_upload::upload_video)
                .layer(DefaultBodyLimit::max(config.max_video_size_bytes)),
        );

    let app = api_routes
        .nest_service("/assets", ServeDir::new(&config.assets_root))
        .layer(RequestBodyLimitLayer::new(
            config
                .max_video_size_bytes
                .max(config.max_thumbnail_size_bytes),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
