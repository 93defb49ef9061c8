use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of a quiz. Moves strictly forward: CREATED -> LIVE -> FINISHED.
/// Only the scheduler's timed jobs and the administrative status override
/// are allowed to mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizStatus {
    Created,
    Live,
    Finished,
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuizStatus::Created => "CREATED",
            QuizStatus::Live => "LIVE",
            QuizStatus::Finished => "FINISHED",
        };
        write!(f, "{}", s)
    }
}

/// Visibility mode. Opaque to the core; carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizMode {
    Public,
    Private,
    Official,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty_id: Uuid,
    pub topic: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub start_date_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: QuizStatus,
    pub mode: QuizMode,
}

impl Quiz {
    /// Instant at which the quiz must flip from LIVE to FINISHED.
    pub fn end_date_time(&self) -> DateTime<Utc> {
        self.start_date_time + Duration::minutes(self.duration_minutes)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    pub created_by: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty_id: Uuid,
    #[serde(default)]
    pub topic: String,
    pub start_date_time: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub duration_minutes: i64,
    pub mode: QuizMode,
    /// Questions created together with the quiz, in one call.
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1))]
    pub points: i32,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<CreateOptionRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOptionRequest {
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(default)]
    pub valid: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuizStatusRequest {
    pub status: QuizStatus,
}
