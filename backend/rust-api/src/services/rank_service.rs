use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateRankRequest, Rank};
use crate::store::Store;

pub struct RankService {
    store: Arc<dyn Store>,
}

impl RankService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Highest-qualifying band for a point total: the rank with the largest
    /// `min_points` not exceeding `points`. `Ok(None)` when ranks exist but
    /// none qualifies, `NoRanksConfigured` when the table is empty.
    pub async fn resolve(&self, points: i32) -> Result<Option<Rank>, AppError> {
        if let Some(rank) = self.store.find_top_rank_by_min_points(points).await? {
            return Ok(Some(rank));
        }
        if self.store.first_configured_rank().await?.is_none() {
            return Err(AppError::NoRanksConfigured);
        }
        Ok(None)
    }

    /// Bootstrap default for freshly registered users: the first rank ever
    /// configured. Deliberately not the promotion-path tie-break.
    pub async fn default_rank(&self) -> Result<Rank, AppError> {
        self.store
            .first_configured_rank()
            .await?
            .ok_or(AppError::NoRanksConfigured)
    }

    pub async fn create_rank(&self, req: CreateRankRequest) -> Result<Rank, AppError> {
        if req.min_points < 0 {
            return Err(AppError::BadRequest(
                "Minimum points cannot be negative".to_string(),
            ));
        }
        if let Some(max_points) = req.max_points {
            if req.min_points >= max_points {
                return Err(AppError::BadRequest(
                    "Minimum points must be less than maximum points when max is specified"
                        .to_string(),
                ));
            }
        }

        let rank = Rank {
            id: Uuid::new_v4(),
            title: req.title,
            abbreviation: req.abbreviation,
            min_points: req.min_points,
            max_points: req.max_points,
        };
        Ok(self.store.save_rank(rank).await?)
    }
}
