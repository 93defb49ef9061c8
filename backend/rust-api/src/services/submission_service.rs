use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics;
use crate::models::{
    AnswerSubmission, ContestParticipation, Question, QuestionOption, QuizStatus, Submission, User,
};
use crate::services::rank_service::RankService;
use crate::store::Store;

/// One async mutex per user, created on demand. Concurrent submissions for
/// the same user serialize here, which covers both the duplicate-answer
/// race and the read-modify-write on the participation row and points
/// total. Different users never contend.
#[derive(Clone, Default)]
pub struct SubmissionLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

impl SubmissionLocks {
    fn for_user(&self, user_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(user_id).or_default().clone()
    }

    /// Drop the map entry once the caller's clone is the last one outside
    /// the map. Waiters hold their own clones and keep the entry alive;
    /// the last of them to release sweeps it, so the map stays bounded by
    /// the number of in-flight submissions.
    fn release(&self, user_id: Uuid, lock: Arc<AsyncMutex<()>>) {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // map entry + `lock`; new clones need the map mutex we hold
        if Arc::strong_count(&lock) == 2 {
            map.remove(&user_id);
        }
    }
}

pub struct SubmissionService {
    store: Arc<dyn Store>,
    locks: SubmissionLocks,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn Store>, locks: SubmissionLocks) -> Self {
        Self { store, locks }
    }

    /// Validate, score and record one batch of answers for one user, then
    /// roll the batch total into the contest participation and the user's
    /// cumulative points/rank. All validation happens before the first
    /// write, so a rejected batch persists nothing.
    pub async fn process_quiz_submission(
        &self,
        user_id: Uuid,
        answers: &[AnswerSubmission],
    ) -> Result<ContestParticipation, AppError> {
        let lock = self.locks.for_user(user_id);
        let result = {
            let _guard = lock.lock().await;
            self.submit_under_lock(user_id, answers).await
        };
        self.locks.release(user_id, lock);
        result
    }

    async fn submit_under_lock(
        &self,
        user_id: Uuid,
        answers: &[AnswerSubmission],
    ) -> Result<ContestParticipation, AppError> {
        let quiz_id = self.validate_same_quiz(answers).await?;

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let scored = self.validate_answers(user_id, answers).await?;

        let now = Utc::now();
        let mut total_score = 0;
        for (question, option, score) in &scored {
            let submission = Submission {
                id: Uuid::new_v4(),
                user_id,
                question_id: question.id,
                option_id: option.id,
                score: *score,
                completion_time: now,
            };
            self.store.insert_submission(submission).await?;
            metrics::record_submission(*score > 0);
            total_score += *score;
        }

        self.update_participation(user, quiz_id, total_score, now)
            .await
    }

    /// Every answer's question must resolve to one single quiz, and that
    /// quiz must currently be LIVE.
    async fn validate_same_quiz(&self, answers: &[AnswerSubmission]) -> Result<Uuid, AppError> {
        let mut quiz_ids = HashSet::new();
        for answer in answers {
            let question = self.find_question(answer.question_id).await?;
            quiz_ids.insert(question.quiz_id);
        }

        let mut ids = quiz_ids.into_iter();
        let quiz_id = match (ids.next(), ids.next()) {
            (Some(id), None) => id,
            _ => {
                return Err(AppError::BadRequest(
                    "All questions must be from the same quiz".to_string(),
                ))
            }
        };

        let quiz = self
            .store
            .find_quiz(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz not found: {}", quiz_id)))?;
        if quiz.status != QuizStatus::Live {
            return Err(AppError::BadRequest(format!(
                "Quiz is not Live! Current status: {}",
                quiz.status
            )));
        }

        Ok(quiz_id)
    }

    async fn validate_answers(
        &self,
        user_id: Uuid,
        answers: &[AnswerSubmission],
    ) -> Result<Vec<(Question, QuestionOption, i32)>, AppError> {
        let mut scored = Vec::with_capacity(answers.len());
        let mut seen_questions = HashSet::new();

        for answer in answers {
            if !seen_questions.insert(answer.question_id)
                || self
                    .store
                    .submission_exists(user_id, answer.question_id)
                    .await?
            {
                return Err(AppError::BadRequest(format!(
                    "User already submitted answer for question: {}",
                    answer.question_id
                )));
            }

            let question = self.find_question(answer.question_id).await?;
            let option = self
                .store
                .find_option(answer.option_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Option not found: {}", answer.option_id))
                })?;
            if option.question_id != question.id {
                return Err(AppError::NotFound(format!(
                    "Option {} does not belong to question {}",
                    option.id, question.id
                )));
            }

            let score = if option.valid { question.points } else { 0 };
            scored.push((question, option, score));
        }

        Ok(scored)
    }

    async fn update_participation(
        &self,
        mut user: User,
        quiz_id: Uuid,
        total_score: i32,
        now: DateTime<Utc>,
    ) -> Result<ContestParticipation, AppError> {
        let mut participation = self
            .store
            .find_participation(user.id, quiz_id)
            .await?
            .unwrap_or_else(|| ContestParticipation {
                id: Uuid::new_v4(),
                user_id: user.id,
                quiz_id,
                score: 0,
                completion_time: now,
            });
        // batch total, not a running sum
        participation.score = total_score;
        participation.completion_time = now;

        user.points += total_score;
        let rank_service = RankService::new(self.store.clone());
        if let Some(new_rank) = rank_service.resolve(user.points).await? {
            if user.rank_id != Some(new_rank.id) {
                tracing::info!(
                    user_id = %user.id,
                    rank = %new_rank.title,
                    points = user.points,
                    "user rank updated"
                );
                user.rank_id = Some(new_rank.id);
            }
        }
        self.store.save_user(user).await?;

        Ok(self.store.save_participation(participation).await?)
    }

    async fn find_question(&self, question_id: Uuid) -> Result<Question, AppError> {
        self.store
            .find_question(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question not found: {}", question_id)))
    }
}
