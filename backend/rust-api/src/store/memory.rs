use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{ContestParticipation, Question, QuestionOption, Quiz, Rank, Submission, User};

#[derive(Default)]
struct Inner {
    quizzes: HashMap<Uuid, Quiz>,
    questions: HashMap<Uuid, Question>,
    options: HashMap<Uuid, QuestionOption>,
    submissions: HashMap<Uuid, Submission>,
    // (user_id, question_id) uniqueness index
    submission_index: HashSet<(Uuid, Uuid)>,
    participations: HashMap<Uuid, ContestParticipation>,
    // (user_id, quiz_id) -> participation id
    participation_index: HashMap<(Uuid, Uuid), Uuid>,
    users: HashMap<Uuid, User>,
    // insertion order matters for the registration bootstrap default
    ranks: Vec<Rank>,
}

/// In-memory persistence gateway. A single `RwLock` over the whole state
/// gives every write the single-row atomicity the `Store` contract asks for.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn save_quiz(&self, quiz: Quiz) -> StoreResult<Quiz> {
        let mut inner = self.inner.write().await;
        inner.quizzes.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn find_quiz(&self, id: Uuid) -> StoreResult<Option<Quiz>> {
        let inner = self.inner.read().await;
        Ok(inner.quizzes.get(&id).cloned())
    }

    async fn delete_quiz(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let question_ids: Vec<Uuid> = inner
            .questions
            .values()
            .filter(|q| q.quiz_id == id)
            .map(|q| q.id)
            .collect();
        inner
            .options
            .retain(|_, option| !question_ids.contains(&option.question_id));
        inner.questions.retain(|_, question| question.quiz_id != id);
        inner.quizzes.remove(&id);
        Ok(())
    }

    async fn save_question(&self, question: Question) -> StoreResult<Question> {
        let mut inner = self.inner.write().await;
        inner.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn find_question(&self, id: Uuid) -> StoreResult<Option<Question>> {
        let inner = self.inner.read().await;
        Ok(inner.questions.get(&id).cloned())
    }

    async fn find_questions_by_quiz(&self, quiz_id: Uuid) -> StoreResult<Vec<Question>> {
        let inner = self.inner.read().await;
        Ok(inner
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn save_option(&self, option: QuestionOption) -> StoreResult<QuestionOption> {
        let mut inner = self.inner.write().await;
        inner.options.insert(option.id, option.clone());
        Ok(option)
    }

    async fn find_option(&self, id: Uuid) -> StoreResult<Option<QuestionOption>> {
        let inner = self.inner.read().await;
        Ok(inner.options.get(&id).cloned())
    }

    async fn find_options_by_question(
        &self,
        question_id: Uuid,
    ) -> StoreResult<Vec<QuestionOption>> {
        let inner = self.inner.read().await;
        Ok(inner
            .options
            .values()
            .filter(|o| o.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn submission_exists(&self, user_id: Uuid, question_id: Uuid) -> StoreResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner.submission_index.contains(&(user_id, question_id)))
    }

    async fn insert_submission(&self, submission: Submission) -> StoreResult<Submission> {
        let mut inner = self.inner.write().await;
        let key = (submission.user_id, submission.question_id);
        if !inner.submission_index.insert(key) {
            return Err(StoreError::DuplicateSubmission {
                user_id: submission.user_id,
                question_id: submission.question_id,
            });
        }
        inner.submissions.insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn find_submissions_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Submission>> {
        let inner = self.inner.read().await;
        Ok(inner
            .submissions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_participation(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
    ) -> StoreResult<Option<ContestParticipation>> {
        let inner = self.inner.read().await;
        Ok(inner
            .participation_index
            .get(&(user_id, quiz_id))
            .and_then(|id| inner.participations.get(id))
            .cloned())
    }

    async fn save_participation(
        &self,
        participation: ContestParticipation,
    ) -> StoreResult<ContestParticipation> {
        let mut inner = self.inner.write().await;
        inner
            .participation_index
            .insert((participation.user_id, participation.quiz_id), participation.id);
        inner
            .participations
            .insert(participation.id, participation.clone());
        Ok(participation)
    }

    async fn save_user(&self, user: User) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn save_rank(&self, rank: Rank) -> StoreResult<Rank> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.ranks.iter_mut().find(|r| r.id == rank.id) {
            *existing = rank.clone();
        } else {
            inner.ranks.push(rank.clone());
        }
        Ok(rank)
    }

    async fn find_top_rank_by_min_points(&self, points: i32) -> StoreResult<Option<Rank>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ranks
            .iter()
            .filter(|r| r.min_points <= points)
            .max_by_key(|r| r.min_points)
            .cloned())
    }

    async fn first_configured_rank(&self) -> StoreResult<Option<Rank>> {
        let inner = self.inner.read().await;
        Ok(inner.ranks.first().cloned())
    }
}
