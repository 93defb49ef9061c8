use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::error::AppError;
use crate::models::RegisterUserRequest;
use crate::services::{user_service::UserService, AppState};

pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = UserService::new(state.store.clone());
    let user = service.register(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
