use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Browser front ends call the builder API from their own origin.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any)
}
