use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// CORS for the browser front end. Any origin unless one is configured.
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    match origin {
        None => layer.allow_origin(Any),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS_ORIGIN; allowing any origin");
                layer.allow_origin(Any)
            }
        },
    }
}
