use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{RegisterUserRequest, User};
use crate::services::rank_service::RankService;
use crate::store::Store;

pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registration bootstrap: fresh users start at zero points with the
    /// first-configured rank.
    pub async fn register(&self, req: RegisterUserRequest) -> Result<User, AppError> {
        let default_rank = RankService::new(self.store.clone()).default_rank().await?;

        let user = User {
            id: Uuid::new_v4(),
            username: req.username,
            email: req.email,
            points: 0,
            rank_id: Some(default_rank.id),
        };
        Ok(self.store.save_user(user).await?)
    }
}
