use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::deadline::{self, AllocationResult};
use super::domain::{Goal, GoalId, Money, SavingsFrequency, SavingsInput};
use super::lump_sum::{self, LumpSumPlan};
use super::simulation;
use super::sorting::sort_goals;
use super::verdict::{self, Verdict};

/// Rejected planner input. Raised before any computation runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    #[error("at least one goal is required")]
    EmptyGoals,
    #[error("savings per period must be positive (got {0})")]
    NonPositiveRate(Money),
    #[error("allocation amount must be positive (got {0})")]
    NonPositiveAmount(Money),
    #[error("goal '{goal_id}' is invalid: {reason}")]
    InvalidGoal { goal_id: GoalId, reason: String },
    #[error("goal '{0}' appears more than once")]
    DuplicateGoal(GoalId),
    #[error("amount {0} exceeds the supported maximum of {max}", max = MAX_AMOUNT)]
    AmountTooLarge(Money),
}

/// Largest target, balance, rate or lump sum accepted. Keeps every sum the planner forms
/// far below `Decimal::MAX`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

fn check_bounded(amount: Money) -> Result<(), PlanningError> {
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(PlanningError::AmountTooLarge(amount));
    }
    Ok(())
}

/// Projection of a goal set against a recurring savings rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub as_of: NaiveDate,
    pub amount_per_period: Money,
    pub frequency: SavingsFrequency,
    /// One result per goal, in funding order.
    pub results: Vec<AllocationResult>,
    pub verdict: Verdict,
}

impl Projection {
    pub fn result_for(&self, goal_id: &GoalId) -> Option<&AllocationResult> {
        self.results.iter().find(|result| &result.goal_id == goal_id)
    }
}

/// Stateless entry point for both planner modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalPlanner;

impl GoalPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Sorts, simulates, evaluates and aggregates a goal snapshot.
    pub fn project(
        &self,
        goals: &[Goal],
        input: SavingsInput,
        as_of: NaiveDate,
    ) -> Result<Projection, PlanningError> {
        validate_goals(goals)?;
        if input.amount_per_period <= Decimal::ZERO {
            return Err(PlanningError::NonPositiveRate(input.amount_per_period));
        }
        check_bounded(input.amount_per_period)?;

        let sorted = sort_goals(goals);
        let schedule = simulation::simulate(&sorted, input.amount_per_period);

        let results: Vec<AllocationResult> = sorted
            .iter()
            .zip(schedule.entries())
            .map(|(goal, (_, completion))| {
                deadline::evaluate(goal, *completion, input.frequency, as_of)
            })
            .collect();

        let verdict = verdict::aggregate(&results, input.amount_per_period);
        debug!(
            goals = results.len(),
            all_met_on_time = verdict.all_met_on_time,
            "projection computed"
        );

        Ok(Projection {
            as_of,
            amount_per_period: input.amount_per_period,
            frequency: input.frequency,
            results,
            verdict,
        })
    }

    /// Distributes a one-time amount across goals in funding order.
    pub fn plan_lump_sum(
        &self,
        goals: &[Goal],
        amount: Money,
    ) -> Result<LumpSumPlan, PlanningError> {
        validate_goals(goals)?;
        if amount <= Decimal::ZERO {
            return Err(PlanningError::NonPositiveAmount(amount));
        }
        check_bounded(amount)?;

        let sorted = sort_goals(goals);
        let plan = lump_sum::plan(&sorted, amount);
        debug!(
            total_allocated = %plan.total_allocated,
            leftover = %plan.leftover,
            "lump sum planned"
        );

        Ok(plan)
    }
}

fn validate_goals(goals: &[Goal]) -> Result<(), PlanningError> {
    if goals.is_empty() {
        return Err(PlanningError::EmptyGoals);
    }

    let mut seen = HashSet::with_capacity(goals.len());
    for goal in goals {
        if goal.target_amount <= Decimal::ZERO {
            return Err(PlanningError::InvalidGoal {
                goal_id: goal.id.clone(),
                reason: format!("target amount must be positive (got {})", goal.target_amount),
            });
        }
        if goal.current_amount < Decimal::ZERO {
            return Err(PlanningError::InvalidGoal {
                goal_id: goal.id.clone(),
                reason: format!(
                    "current amount cannot be negative (got {})",
                    goal.current_amount
                ),
            });
        }
        if goal.target_amount > Decimal::from(MAX_AMOUNT)
            || goal.current_amount > Decimal::from(MAX_AMOUNT)
        {
            return Err(PlanningError::InvalidGoal {
                goal_id: goal.id.clone(),
                reason: format!("amounts may not exceed {MAX_AMOUNT}"),
            });
        }
        if !seen.insert(&goal.id) {
            return Err(PlanningError::DuplicateGoal(goal.id.clone()));
        }
    }

    Ok(())
}
