use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ContestParticipation, Question, QuestionOption, Quiz, Rank, Submission, User};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user {user_id} already has a submission for question {question_id}")]
    DuplicateSubmission { user_id: Uuid, question_id: Uuid },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateSubmission { question_id, .. } => AppError::BadRequest(format!(
                "User already submitted answer for question: {}",
                question_id
            )),
            StoreError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence gateway for the core. Point lookups and single-row writes;
/// real backends are expected to make each write atomic.
#[async_trait]
pub trait Store: Send + Sync {
    // Quizzes
    async fn save_quiz(&self, quiz: Quiz) -> StoreResult<Quiz>;
    async fn find_quiz(&self, id: Uuid) -> StoreResult<Option<Quiz>>;
    /// Cascade delete: options first, then questions, then the quiz row.
    async fn delete_quiz(&self, id: Uuid) -> StoreResult<()>;

    // Questions & options
    async fn save_question(&self, question: Question) -> StoreResult<Question>;
    async fn find_question(&self, id: Uuid) -> StoreResult<Option<Question>>;
    async fn find_questions_by_quiz(&self, quiz_id: Uuid) -> StoreResult<Vec<Question>>;
    async fn save_option(&self, option: QuestionOption) -> StoreResult<QuestionOption>;
    async fn find_option(&self, id: Uuid) -> StoreResult<Option<QuestionOption>>;
    async fn find_options_by_question(&self, question_id: Uuid)
        -> StoreResult<Vec<QuestionOption>>;

    // Submissions
    async fn submission_exists(&self, user_id: Uuid, question_id: Uuid) -> StoreResult<bool>;
    /// Fails with `DuplicateSubmission` when a (user, question) row exists.
    async fn insert_submission(&self, submission: Submission) -> StoreResult<Submission>;
    async fn find_submissions_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Submission>>;

    // Contest participations
    async fn find_participation(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
    ) -> StoreResult<Option<ContestParticipation>>;
    async fn save_participation(
        &self,
        participation: ContestParticipation,
    ) -> StoreResult<ContestParticipation>;

    // Users
    async fn save_user(&self, user: User) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    // Ranks
    async fn save_rank(&self, rank: Rank) -> StoreResult<Rank>;
    /// Highest rank whose `min_points` does not exceed `points`.
    async fn find_top_rank_by_min_points(&self, points: i32) -> StoreResult<Option<Rank>>;
    /// The earliest-configured rank; the registration bootstrap default.
    async fn first_configured_rank(&self) -> StoreResult<Option<Rank>>;
}
