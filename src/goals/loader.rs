//! Goal context loading for a single chat request.

use std::sync::Arc;

use crate::config::StoreTarget;
use crate::error::GoalLookupError;
use crate::goals::{Goal, GoalStore};

/// Resolves the goals of an optional user through a [`GoalStore`].
#[derive(Clone)]
pub struct GoalLoader {
    store: Arc<dyn GoalStore>,
}

impl GoalLoader {
    pub fn new(store: Arc<dyn GoalStore>) -> Self {
        Self { store }
    }

    /// Load goals for `user_id`.
    ///
    /// An absent or empty id returns no goals without touching the store.
    pub async fn load(&self, target: &StoreTarget, user_id: Option<&str>) -> Result<Vec<Goal>, GoalLookupError> {
        match user_id.filter(|id| !id.is_empty()) {
            None => Ok(Vec::new()),
            Some(id) => self.store.fetch_goals(target, id).await,
        }
    }
}
