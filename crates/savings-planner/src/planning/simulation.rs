use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Goal, GoalId, Money};

/// Completion epoch of a goal in the shared-stream waterfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "periods", rename_all = "snake_case")]
pub enum Completion {
    /// Nothing left to fund; costs zero periods.
    AlreadyMet,
    /// Target reached once this many periods of the stream have elapsed.
    AfterPeriods(u32),
    /// The stream never reaches this goal.
    Unreachable,
}

impl Completion {
    /// Periods until completion, `Some(0)` for goals already met.
    pub fn periods(self) -> Option<u32> {
        match self {
            Completion::AlreadyMet => Some(0),
            Completion::AfterPeriods(periods) => Some(periods),
            Completion::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        !matches!(self, Completion::Unreachable)
    }
}

/// Per-goal completion epochs in funding order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundingSchedule {
    entries: Vec<(GoalId, Completion)>,
}

impl FundingSchedule {
    pub fn get(&self, goal_id: &GoalId) -> Option<Completion> {
        self.entries
            .iter()
            .find(|(id, _)| id == goal_id)
            .map(|(_, completion)| *completion)
    }

    pub fn entries(&self) -> &[(GoalId, Completion)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walks goals in funding order, letting each one absorb the whole stream until funded.
///
/// Goals already met cost no periods. When the stream is not positive every unfunded goal
/// is unreachable and the cumulative counter never moves.
pub fn simulate(sorted_goals: &[Goal], amount_per_period: Money) -> FundingSchedule {
    let mut cumulative: u32 = 0;
    let mut entries = Vec::with_capacity(sorted_goals.len());

    for goal in sorted_goals {
        let remaining = goal.remaining();

        let completion = if remaining <= Decimal::ZERO {
            Completion::AlreadyMet
        } else if amount_per_period <= Decimal::ZERO {
            Completion::Unreachable
        } else {
            match periods_to_fund(remaining, amount_per_period)
                .and_then(|periods| cumulative.checked_add(periods))
            {
                Some(epoch) => {
                    cumulative = epoch;
                    Completion::AfterPeriods(epoch)
                }
                None => Completion::Unreachable,
            }
        };

        debug!(goal_id = %goal.id, ?completion, cumulative, "waterfall step");
        entries.push((goal.id.clone(), completion));
    }

    FundingSchedule { entries }
}

fn periods_to_fund(remaining: Money, amount_per_period: Money) -> Option<u32> {
    remaining
        .checked_div(amount_per_period)
        .map(|ratio| ratio.ceil())
        .and_then(|periods| periods.to_u32())
}
