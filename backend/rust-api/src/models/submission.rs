use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded answer. At most one per (user, question) pair; the store
/// enforces the uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub option_id: Uuid,
    pub score: i32,
    pub completion_time: DateTime<Utc>,
}

/// Per (user, quiz) rollup. Created lazily on first submission; its score
/// is overwritten with each batch total, not accumulated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestParticipation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    pub score: i32,
    pub completion_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: Uuid,
    pub option_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct QuizSubmissionRequest {
    pub user_id: Uuid,
    pub answers: Vec<AnswerSubmission>,
}
