pub mod analysis;
pub mod health;
pub mod quiz;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{cors::cors_layer, rate_limit};
use crate::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn router(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .route("/api/quiz/categories", get(quiz::list_categories))
        .route("/api/quiz/generate", post(quiz::generate_quiz))
        .route("/api/quiz/score", post(quiz::score_quiz))
        .route("/api/analyze", post(analysis::analyze_quiz))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(config.public_rps),
            rate_limit::rps_middleware,
        ));

    let mut app = Router::new()
        .route("/health", get(health::health))
        .merge(api);

    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving static files from: {}", dir);
        let index = Path::new(dir).join("index.html");
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(config.cors_origin.as_deref()))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
    )
}
