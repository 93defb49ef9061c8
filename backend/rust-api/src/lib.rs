use axum::{
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/v1/quizzes", post(handlers::quizzes::create_quiz))
        .route(
            "/api/v1/quizzes/{id}",
            get(handlers::quizzes::get_quiz).delete(handlers::quizzes::delete_quiz),
        )
        .route(
            "/api/v1/quizzes/{id}/status",
            put(handlers::quizzes::update_quiz_status),
        )
        .route(
            "/api/v1/submissions",
            post(handlers::submissions::submit_quiz),
        )
        .route("/api/v1/users", post(handlers::users::register_user))
        .route("/api/v1/ranks", post(handlers::ranks::create_rank))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
