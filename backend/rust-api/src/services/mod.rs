use std::sync::Arc;

use crate::config::Config;
use crate::store::Store;

pub mod quiz_scheduler;
pub mod quiz_service;
pub mod rank_seed;
pub mod rank_service;
pub mod submission_service;
pub mod user_service;

pub use quiz_scheduler::QuizScheduler;
pub use submission_service::SubmissionLocks;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub scheduler: QuizScheduler,
    pub submission_locks: SubmissionLocks,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let scheduler = QuizScheduler::new(store.clone());
        Self {
            config,
            store,
            scheduler,
            submission_locks: SubmissionLocks::default(),
        }
    }
}
