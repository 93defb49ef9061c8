use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point band `[min_points, max_points)`. Promotion resolves the rank
/// with the largest `min_points` not exceeding the user's total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rank {
    pub id: Uuid,
    pub title: String,
    pub abbreviation: Option<String>,
    pub min_points: i32,
    pub max_points: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRankRequest {
    pub title: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    pub min_points: i32,
    #[serde(default)]
    pub max_points: Option<i32>,
}
