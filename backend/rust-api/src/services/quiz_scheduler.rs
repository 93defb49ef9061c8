use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics;
use crate::models::{Quiz, QuizStatus};
use crate::store::{Store, StoreResult};

/// Time-driven quiz state machine. Every scheduled quiz owns one timer
/// task keyed by its id that walks the lifecycle in order: sleep until
/// the start instant, flip the status to LIVE, sleep until start +
/// duration, flip it to FINISHED. Fire times already in the past fire
/// immediately (catch-up), and the sequential walk means an overdue quiz
/// still passes through LIVE before it finishes.
#[derive(Clone)]
pub struct QuizScheduler {
    store: Arc<dyn Store>,
    jobs: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
}

impl QuizScheduler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register the timed transitions for a quiz. Replaces any pending
    /// job for the same quiz id, so a delete-then-recreate race cannot
    /// leave stale timers behind.
    pub fn schedule(&self, quiz: &Quiz) -> Result<(), AppError> {
        if quiz.duration_minutes <= 0 {
            return Err(AppError::Internal(format!(
                "cannot schedule quiz {} with non-positive duration",
                quiz.id
            )));
        }

        // the map lock is held across spawn + insert, so an unschedule
        // for the same id cannot slip in between and miss the new job
        let mut jobs = lock_jobs(&self.jobs);
        let runner = self.spawn_lifecycle(quiz.id, quiz.start_date_time, quiz.end_date_time());
        if let Some(stale) = jobs.insert(quiz.id, runner) {
            stale.abort();
        }

        tracing::info!(
            quiz_id = %quiz.id,
            live_at = %quiz.start_date_time,
            finished_at = %quiz.end_date_time(),
            "quiz transitions scheduled"
        );
        Ok(())
    }

    /// Cancel the pending transitions for a quiz id. Idempotent: unknown
    /// ids and repeated calls are not errors.
    pub fn unschedule(&self, quiz_id: Uuid) {
        let removed = lock_jobs(&self.jobs).remove(&quiz_id);
        if let Some(job) = removed {
            job.abort();
            tracing::info!(quiz_id = %quiz_id, "quiz transitions unscheduled");
        }
    }

    fn spawn_lifecycle(
        &self,
        quiz_id: Uuid,
        live_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> JoinHandle<()> {
        let store = self.store.clone();
        let jobs = self.jobs.clone();
        tokio::spawn(async move {
            sleep_until(live_at).await;
            if let Err(err) = apply_transition(store.as_ref(), quiz_id, QuizStatus::Live).await {
                // per-quiz failure: log and keep other quizzes' timers alive
                tracing::error!(
                    quiz_id = %quiz_id,
                    status = %QuizStatus::Live,
                    error = %err,
                    "quiz transition failed"
                );
            }
            sleep_until(finished_at).await;
            if let Err(err) = apply_transition(store.as_ref(), quiz_id, QuizStatus::Finished).await
            {
                tracing::error!(
                    quiz_id = %quiz_id,
                    status = %QuizStatus::Finished,
                    error = %err,
                    "quiz transition failed"
                );
            }
            lock_jobs(&jobs).remove(&quiz_id);
        })
    }
}

fn lock_jobs(jobs: &Mutex<HashMap<Uuid, JoinHandle<()>>>) -> MutexGuard<'_, HashMap<Uuid, JoinHandle<()>>> {
    jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn sleep_until(instant: DateTime<Utc>) {
    let delay = (instant - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    tokio::time::sleep(delay).await;
}

/// Re-reads the persisted quiz before writing: a quiz deleted between
/// scheduling and fire time is a no-op, and the status only ever walks
/// forward along CREATED -> LIVE -> FINISHED.
async fn apply_transition(
    store: &dyn Store,
    quiz_id: Uuid,
    target: QuizStatus,
) -> StoreResult<()> {
    let Some(mut quiz) = store.find_quiz(quiz_id).await? else {
        tracing::debug!(quiz_id = %quiz_id, "quiz deleted before its transition fired");
        return Ok(());
    };

    let allowed = match target {
        QuizStatus::Live => quiz.status == QuizStatus::Created,
        QuizStatus::Finished => quiz.status == QuizStatus::Live,
        QuizStatus::Created => false,
    };
    if !allowed {
        tracing::debug!(
            quiz_id = %quiz_id,
            current = %quiz.status,
            target = %target,
            "skipping stale quiz transition"
        );
        return Ok(());
    }

    quiz.status = target;
    store.save_quiz(quiz).await?;
    metrics::record_quiz_transition(&target.to_string());
    tracing::info!(quiz_id = %quiz_id, status = %target, "quiz status updated");
    Ok(())
}
