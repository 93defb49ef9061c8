use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::CreateRankRequest;
use crate::services::{rank_service::RankService, AppState};

pub async fn create_rank(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRankRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = RankService::new(state.store.clone());
    let rank = service.create_rank(req).await?;
    Ok((StatusCode::CREATED, Json(rank)))
}
