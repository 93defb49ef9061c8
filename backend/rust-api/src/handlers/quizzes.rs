use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{CreateQuizRequest, UpdateQuizStatusRequest};
use crate::services::{quiz_service::QuizService, AppState};

#[derive(Debug, Deserialize)]
pub struct DeleteQuizParams {
    pub user_id: Uuid,
}

pub async fn create_quiz(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    tracing::info!(created_by = %req.created_by, title = %req.title, "creating quiz");

    let service = QuizService::new(state.store.clone(), state.scheduler.clone());
    let quiz = service.create_quiz(req).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = QuizService::new(state.store.clone(), state.scheduler.clone());
    let quiz = service.get_quiz(quiz_id).await?;
    Ok(Json(quiz))
}

pub async fn update_quiz_status(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
    Json(req): Json<UpdateQuizStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(quiz_id = %quiz_id, status = %req.status, "manual quiz status override");

    let service = QuizService::new(state.store.clone(), state.scheduler.clone());
    let quiz = service.update_quiz_status(quiz_id, req.status).await?;
    Ok(Json(quiz))
}

pub async fn delete_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
    Query(params): Query<DeleteQuizParams>,
) -> Result<impl IntoResponse, AppError> {
    let service = QuizService::new(state.store.clone(), state.scheduler.clone());
    service.delete_quiz(quiz_id, params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
