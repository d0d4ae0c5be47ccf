use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{Contribution, Goal, GoalId, Money, OwnerId, SavingsFrequency, SavingsInput};
use super::engine::{GoalPlanner, PlanningError, Projection};
use super::lump_sum::LumpSumPlan;
use super::store::{GoalStore, StoreError};

/// Service composing the goal store with the planner.
pub struct GoalPlanningService<S> {
    store: Arc<S>,
    planner: GoalPlanner,
    default_frequency: SavingsFrequency,
}

impl<S> GoalPlanningService<S>
where
    S: GoalStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            planner: GoalPlanner::new(),
            default_frequency: SavingsFrequency::Monthly,
        }
    }

    pub fn with_default_frequency(mut self, frequency: SavingsFrequency) -> Self {
        self.default_frequency = frequency;
        self
    }

    /// Frequency applied when a caller does not name one.
    pub fn default_frequency(&self) -> SavingsFrequency {
        self.default_frequency
    }

    /// Project the owner's current goals against a recurring savings rate.
    pub fn project(
        &self,
        owner: &OwnerId,
        input: SavingsInput,
        as_of: NaiveDate,
    ) -> Result<Projection, PlanningServiceError> {
        let goals = self.store.goals_for_owner(owner)?;
        let projection = self.planner.project(&goals, input, as_of)?;

        info!(
            %owner,
            goals = projection.results.len(),
            all_met_on_time = projection.verdict.all_met_on_time,
            "goal projection served"
        );
        Ok(projection)
    }

    /// Build a lump-sum plan without touching the store.
    pub fn preview_auto_allocation(
        &self,
        owner: &OwnerId,
        amount: Money,
    ) -> Result<LumpSumPlan, PlanningServiceError> {
        let goals = self.store.goals_for_owner(owner)?;
        let plan = self.planner.plan_lump_sum(&goals, amount)?;
        Ok(plan)
    }

    /// Plan a lump sum and commit every non-zero item as a contribution dated `on`.
    pub fn auto_allocate(
        &self,
        owner: &OwnerId,
        amount: Money,
        on: NaiveDate,
    ) -> Result<AutoAllocation, PlanningServiceError> {
        let plan = self.preview_auto_allocation(owner, amount)?;
        let report = self.commit_plan(owner, &plan, on);

        info!(
            %owner,
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            "auto-allocation committed"
        );
        Ok(AutoAllocation { plan, report })
    }

    /// Apply plan items one by one. Failures are recorded and never stop later items.
    pub fn commit_plan(&self, owner: &OwnerId, plan: &LumpSumPlan, on: NaiveDate) -> CommitReport {
        let mut report = CommitReport::default();

        for item in plan.commit_items() {
            report.attempted += 1;
            let contribution = Contribution {
                amount: item.amount_to_allocate,
                date: on,
            };

            match self.store.add_contribution(owner, &item.goal_id, contribution) {
                Ok(goal) => {
                    report.succeeded += 1;
                    report.updated_goals.push(goal);
                }
                Err(error) => {
                    warn!(%owner, goal_id = %item.goal_id, %error, "contribution failed");
                    report.failed += 1;
                    if report.first_error.is_none() {
                        report.first_error = Some(error.to_string());
                    }
                    report.failures.push(CommitFailure {
                        goal_id: item.goal_id.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// Plan plus the outcome of committing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAllocation {
    pub plan: LumpSumPlan,
    pub report: CommitReport,
}

/// Aggregate result of committing a plan; not transactional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub first_error: Option<String>,
    pub failures: Vec<CommitFailure>,
    pub updated_goals: Vec<Goal>,
}

impl CommitReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFailure {
    pub goal_id: GoalId,
    pub error: String,
}

/// Error raised by the planning service.
#[derive(Debug, thiserror::Error)]
pub enum PlanningServiceError {
    #[error(transparent)]
    Planning(#[from] PlanningError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlanningServiceError {
    /// HTTP status reported for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Planning(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Forbidden) => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
