//! Goal store capability and its PostgREST implementation.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::StoreTarget;
use crate::error::GoalLookupError;
use crate::goals::Goal;

/// Query capability over the user's goal selections.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Fetch the goals selected by `user_id`, in store order.
    async fn fetch_goals(&self, target: &StoreTarget, user_id: &str) -> Result<Vec<Goal>, GoalLookupError>;
}

/// One `user_goals` row with its joined goal.
#[derive(Debug, Deserialize)]
struct UserGoalRow {
    mental_health_goals: Option<Goal>,
}

/// Goal store backed by a PostgREST endpoint (`/rest/v1`).
#[derive(Clone, Default)]
pub struct PostgrestGoalStore {
    client: reqwest::Client,
}

impl PostgrestGoalStore {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn table_url(base: &str) -> String {
        format!("{}/rest/v1/user_goals", base.trim_end_matches('/'))
    }
}

/// Decode a `user_goals` response, skipping rows with no joined goal.
pub(crate) fn decode_rows(body: &[u8]) -> Result<Vec<Goal>, GoalLookupError> {
    let rows: Vec<UserGoalRow> =
        serde_json::from_slice(body).map_err(|e| GoalLookupError::Decode(e.to_string()))?;
    Ok(rows.into_iter().filter_map(|r| r.mental_health_goals).collect())
}

#[async_trait]
impl GoalStore for PostgrestGoalStore {
    async fn fetch_goals(&self, target: &StoreTarget, user_id: &str) -> Result<Vec<Goal>, GoalLookupError> {
        let user_filter = format!("eq.{}", user_id);
        let response = self
            .client
            .get(Self::table_url(&target.url))
            .query(&[
                ("select", "mental_health_goals(name,description)"),
                ("user_id", user_filter.as_str()),
            ])
            .header("apikey", target.service_key.as_str())
            .bearer_auth(&target.service_key)
            .send()
            .await
            .map_err(|e| GoalLookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GoalLookupError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GoalLookupError::Transport(e.to_string()))?;
        let goals = decode_rows(&body)?;

        tracing::debug!(goal_count = goals.len(), "Resolved user goals");
        Ok(goals)
    }
}
