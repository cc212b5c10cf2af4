use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[axum::debug_handler]
pub async fn root() -> impl IntoResponse {
    let body = json!({
        "status": "ok",
        "message": "Training Hub Builder Backend Live",
    });
    (StatusCode::OK, Json(body))
}

#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
