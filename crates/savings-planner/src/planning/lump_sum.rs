use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{Goal, GoalId, Money};

/// Share of a lump sum earmarked for one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlanItem {
    pub goal_id: GoalId,
    pub amount_to_allocate: Money,
}

/// Greedy distribution of a one-time amount across goals in funding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LumpSumPlan {
    pub amount: Money,
    /// One item per goal in funding order, zero allocations included.
    pub items: Vec<AllocationPlanItem>,
    pub total_allocated: Money,
    pub leftover: Money,
}

impl LumpSumPlan {
    /// Items worth committing to the goal store.
    pub fn commit_items(&self) -> impl Iterator<Item = &AllocationPlanItem> {
        self.items
            .iter()
            .filter(|item| item.amount_to_allocate > Decimal::ZERO)
    }
}

/// Fills each goal's remaining balance in order until the amount runs out.
pub fn allocate(sorted_goals: &[Goal], amount: Money) -> Vec<AllocationPlanItem> {
    let mut remaining_to_allocate = amount.max(Decimal::ZERO);

    sorted_goals
        .iter()
        .map(|goal| {
            let allocated = goal.remaining().min(remaining_to_allocate);
            remaining_to_allocate -= allocated;
            AllocationPlanItem {
                goal_id: goal.id.clone(),
                amount_to_allocate: allocated,
            }
        })
        .collect()
}

/// Runs [`allocate`] and totals the result.
pub fn plan(sorted_goals: &[Goal], amount: Money) -> LumpSumPlan {
    let items = allocate(sorted_goals, amount);
    let total_allocated: Money = items.iter().map(|item| item.amount_to_allocate).sum();

    LumpSumPlan {
        amount,
        items,
        total_allocated,
        leftover: amount - total_allocated,
    }
}
