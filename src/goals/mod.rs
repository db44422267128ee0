//! Goal context subsystem.
//!
//! # Data Flow
//! ```text
//! userId (optional)
//!     → loader.rs (skip when absent, otherwise one store query)
//!     → store.rs (GoalStore trait, PostgREST implementation)
//!     → Vec<Goal> or GoalLookupError
//!     → GoalLookupPolicy (degrade to no goals, or fail the request)
//! ```

pub mod loader;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, GoalLookupError};
use crate::observability::metrics;

pub use loader::GoalLoader;
pub use store::{GoalStore, PostgrestGoalStore};

/// A personalization topic the user selected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Goal {
    pub name: String,
    pub description: String,
}

impl Goal {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Handling of a failed goal lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalLookupPolicy {
    /// Continue without personalization.
    #[default]
    Degrade,
    /// Fail the chat request.
    Fail,
}

impl GoalLookupPolicy {
    /// Turn a lookup outcome into the goals the prompt should use.
    pub fn apply(self, outcome: Result<Vec<Goal>, GoalLookupError>) -> Result<Vec<Goal>, ChatError> {
        match outcome {
            Ok(goals) => Ok(goals),
            Err(e) => {
                metrics::record_goal_lookup_failure();
                match self {
                    GoalLookupPolicy::Degrade => {
                        tracing::warn!(error = %e, "Goal lookup failed, continuing without personalization");
                        Ok(Vec::new())
                    }
                    GoalLookupPolicy::Fail => {
                        tracing::error!(error = %e, "Goal lookup failed");
                        Err(ChatError::GoalLookup(e))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrade_swallows_failure() {
        let goals = GoalLookupPolicy::Degrade
            .apply(Err(GoalLookupError::Status(500)))
            .unwrap();
        assert!(goals.is_empty());
    }

    #[test]
    fn test_fail_surfaces_failure() {
        let err = GoalLookupPolicy::Fail
            .apply(Err(GoalLookupError::Transport("refused".into())))
            .unwrap_err();
        assert_eq!(err.kind(), "goal_lookup");
    }

    #[test]
    fn test_success_passes_through_either_policy() {
        let goals = vec![Goal::new("Feel calm", "reduce anxiety")];
        for policy in [GoalLookupPolicy::Degrade, GoalLookupPolicy::Fail] {
            assert_eq!(policy.apply(Ok(goals.clone())).unwrap(), goals);
        }
    }
}
