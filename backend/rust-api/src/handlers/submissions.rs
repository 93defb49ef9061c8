use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::QuizSubmissionRequest;
use crate::services::{submission_service::SubmissionService, AppState};

pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuizSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(
        user_id = %req.user_id,
        answers = req.answers.len(),
        "processing quiz submission"
    );

    let service = SubmissionService::new(state.store.clone(), state.submission_locks.clone());
    let participation = service
        .process_quiz_submission(req.user_id, &req.answers)
        .await?;
    Ok(Json(participation))
}
