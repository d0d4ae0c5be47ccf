//! Goal funding order, waterfall projection, deadline checks and lump-sum allocation.
//!
//! Everything under `sorting`, `simulation`, `deadline`, `verdict` and `lump_sum` is pure:
//! it takes an immutable goal snapshot and returns a fresh result. `service` and `router`
//! wire the planner to a [`GoalStore`] and to HTTP.

pub mod deadline;
pub mod domain;
mod engine;
pub mod import;
pub mod lump_sum;
pub mod router;
pub mod service;
pub mod simulation;
pub mod sorting;
pub mod store;
pub mod verdict;

#[cfg(test)]
mod tests;

pub use deadline::{AllocationResult, DeadlineStatus, RequiredContribution, TimeDifference};
pub use domain::{Contribution, Goal, GoalId, Money, OwnerId, SavingsFrequency, SavingsInput};
pub use engine::{GoalPlanner, PlanningError, Projection};
pub use import::{read_goals, read_goals_from_path, GoalImportError};
pub use lump_sum::{AllocationPlanItem, LumpSumPlan};
pub use router::{planning_router, GoalProjectionView, ProjectionView};
pub use service::{
    AutoAllocation, CommitFailure, CommitReport, GoalPlanningService, PlanningServiceError,
};
pub use simulation::{Completion, FundingSchedule};
pub use sorting::{sort_goals, NO_PRIORITY};
pub use store::{GoalStore, StoreError};
pub use verdict::Verdict;
