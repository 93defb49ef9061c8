use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;

pub mod quizzes;
pub mod ranks;
pub mod submissions;
pub mod users;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "astroquiz-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("failed to encode metrics: {}", err);
        return (StatusCode::INTERNAL_SERVER_ERROR, "encoding error").into_response();
    }
    ([(header::CONTENT_TYPE, encoder.format_type())], buffer).into_response()
}
