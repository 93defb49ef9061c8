use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateQuizRequest, Question, QuestionOption, Quiz, QuizStatus};
use crate::services::quiz_scheduler::QuizScheduler;
use crate::store::Store;

/// Coordinates quiz creation and deletion with the lifecycle scheduler.
pub struct QuizService {
    store: Arc<dyn Store>,
    scheduler: QuizScheduler,
}

impl QuizService {
    pub fn new(store: Arc<dyn Store>, scheduler: QuizScheduler) -> Self {
        Self { store, scheduler }
    }

    pub async fn create_quiz(&self, req: CreateQuizRequest) -> Result<Quiz, AppError> {
        let now = Utc::now();

        self.store
            .find_user(req.created_by)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if req.start_date_time <= now {
            return Err(AppError::BadRequest(
                "Start date must be in the future".to_string(),
            ));
        }

        let quiz = Quiz {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            difficulty_id: req.difficulty_id,
            topic: req.topic,
            created_by: req.created_by,
            created_at: now,
            start_date_time: req.start_date_time,
            duration_minutes: req.duration_minutes,
            status: QuizStatus::Created,
            mode: req.mode,
        };
        let quiz = self.store.save_quiz(quiz).await?;

        for question_req in &req.questions {
            let question = Question {
                id: Uuid::new_v4(),
                quiz_id: quiz.id,
                text: question_req.text.clone(),
                points: question_req.points,
                tags: question_req.tags.clone(),
                image_url: question_req.image_url.clone(),
            };
            let question = self.store.save_question(question).await?;
            for option_req in &question_req.options {
                let option = QuestionOption {
                    id: Uuid::new_v4(),
                    question_id: question.id,
                    text: option_req.text.clone(),
                    valid: option_req.valid,
                };
                self.store.save_option(option).await?;
            }
        }

        if let Err(err) = self.scheduler.schedule(&quiz) {
            // a persisted quiz without pending transitions would never go
            // live; roll the whole creation back instead
            self.store.delete_quiz(quiz.id).await?;
            return Err(err);
        }

        Ok(quiz)
    }

    pub async fn get_quiz(&self, quiz_id: Uuid) -> Result<Quiz, AppError> {
        self.store
            .find_quiz(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz not found with id: {}", quiz_id)))
    }

    /// Administrative override. Cancels the pending timed transitions so a
    /// stale timer cannot later undo the manual status change.
    pub async fn update_quiz_status(
        &self,
        quiz_id: Uuid,
        new_status: QuizStatus,
    ) -> Result<Quiz, AppError> {
        let mut quiz = self.get_quiz(quiz_id).await?;
        self.scheduler.unschedule(quiz_id);
        quiz.status = new_status;
        Ok(self.store.save_quiz(quiz).await?)
    }

    pub async fn delete_quiz(&self, quiz_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let quiz = self.get_quiz(quiz_id).await?;
        if quiz.created_by != user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own quizzes".to_string(),
            ));
        }

        self.scheduler.unschedule(quiz_id);
        self.store.delete_quiz(quiz_id).await?;
        tracing::info!(quiz_id = %quiz_id, "quiz deleted");
        Ok(())
    }
}
