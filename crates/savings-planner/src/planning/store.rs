use super::domain::{Contribution, Goal, GoalId, OwnerId};

/// Persistence collaborator owning goals and their contribution history.
pub trait GoalStore: Send + Sync {
    /// Snapshot of every goal owned by `owner`.
    fn goals_for_owner(&self, owner: &OwnerId) -> Result<Vec<Goal>, StoreError>;

    /// Atomically raises the goal's current amount and appends the contribution to its history.
    fn add_contribution(
        &self,
        owner: &OwnerId,
        goal_id: &GoalId,
        contribution: Contribution,
    ) -> Result<Goal, StoreError>;
}

/// Error enumeration for goal store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("goal not found")]
    NotFound,
    #[error("goal belongs to another owner")]
    Forbidden,
    #[error("contribution rejected: {0}")]
    InvalidContribution(String),
    #[error("goal store unavailable: {0}")]
    Unavailable(String),
}
