use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::domain::{Goal, GoalId, Money, SavingsFrequency};
use super::simulation::Completion;

/// Whether the projected completion lands on or before the goal's deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Met,
    Missed,
    /// The goal has no deadline to compare against.
    NoDeadline,
}

impl DeadlineStatus {
    /// Tri-state view: `None` when there is no deadline.
    pub const fn as_option(self) -> Option<bool> {
        match self {
            Self::Met => Some(true),
            Self::Missed => Some(false),
            Self::NoDeadline => None,
        }
    }
}

/// Per-period amount that would hit the deadline if this goal had the stream to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum RequiredContribution {
    /// Nothing remains to be saved.
    AlreadyMet,
    PerPeriod(Money),
    /// The deadline is less than one period away and money is still missing.
    Infeasible,
}

impl RequiredContribution {
    /// Finite amount per period; `None` when infeasible.
    pub fn amount(self) -> Option<Money> {
        match self {
            Self::AlreadyMet => Some(Decimal::ZERO),
            Self::PerPeriod(amount) => Some(amount),
            Self::Infeasible => None,
        }
    }
}

/// Gap between projected completion and deadline, counted in savings periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "periods", rename_all = "snake_case")]
pub enum TimeDifference {
    OnTime,
    Ahead(u64),
    Behind(u64),
    /// Dated goal the stream never reaches.
    ProjectedMiss,
    /// Undated goal with a projected completion.
    Completes,
    /// Undated goal the stream never reaches.
    NotApplicable,
}

impl TimeDifference {
    fn from_signed(diff: i64) -> Self {
        match diff {
            0 => Self::OnTime,
            d if d > 0 => Self::Ahead(d.unsigned_abs()),
            d => Self::Behind(d.unsigned_abs()),
        }
    }

    /// Signed period count, positive when ahead of the deadline.
    pub fn periods(self) -> Option<i64> {
        match self {
            Self::OnTime => Some(0),
            Self::Ahead(periods) => i64::try_from(periods).ok(),
            Self::Behind(periods) => i64::try_from(periods).ok().map(|p| -p),
            Self::ProjectedMiss | Self::Completes | Self::NotApplicable => None,
        }
    }

    pub fn label(self, frequency: SavingsFrequency) -> String {
        match self {
            Self::OnTime => "on time".to_string(),
            Self::Ahead(periods) => format!("{periods} {} ahead", frequency.unit(periods)),
            Self::Behind(periods) => format!("{periods} {} behind", frequency.unit(periods)),
            Self::ProjectedMiss => "projected miss".to_string(),
            Self::Completes => "completes".to_string(),
            Self::NotApplicable => "not applicable".to_string(),
        }
    }
}

/// Projection outcome for one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub goal_id: GoalId,
    pub goal_name: String,
    pub remaining: Money,
    pub completion: Completion,
    /// `None` for goals without a deadline.
    pub required_per_period: Option<RequiredContribution>,
    pub projected_periods: Option<u32>,
    pub projected_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub deadline_status: DeadlineStatus,
    pub time_difference: TimeDifference,
}

impl AllocationResult {
    pub fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Turns a waterfall completion into calendar terms and checks it against the deadline.
pub fn evaluate(
    goal: &Goal,
    completion: Completion,
    frequency: SavingsFrequency,
    as_of: NaiveDate,
) -> AllocationResult {
    // An epoch past the calendar range is as unreachable as one the stream never hits.
    let (completion, projected_periods, projected_date) = match completion
        .periods()
        .and_then(|periods| frequency.advance(as_of, periods).map(|date| (periods, date)))
    {
        Some((periods, date)) => (completion, Some(periods), Some(date)),
        None => (Completion::Unreachable, None, None),
    };
    let remaining = goal.remaining();

    let (deadline_status, time_difference, required_per_period) = match goal.deadline {
        Some(deadline) => {
            let (status, difference) = match projected_date {
                Some(projected) => {
                    let status = if projected <= deadline {
                        DeadlineStatus::Met
                    } else {
                        DeadlineStatus::Missed
                    };
                    let diff = frequency.periods_between(projected, deadline);
                    (status, TimeDifference::from_signed(diff))
                }
                None => (DeadlineStatus::Missed, TimeDifference::ProjectedMiss),
            };
            let required = required_to_meet(remaining, frequency.periods_between(as_of, deadline));
            (status, difference, Some(required))
        }
        None => {
            let difference = if projected_date.is_some() {
                TimeDifference::Completes
            } else {
                TimeDifference::NotApplicable
            };
            (DeadlineStatus::NoDeadline, difference, None)
        }
    };

    AllocationResult {
        goal_id: goal.id.clone(),
        goal_name: goal.name.clone(),
        remaining,
        completion,
        required_per_period,
        projected_periods,
        projected_date,
        deadline: goal.deadline,
        deadline_status,
        time_difference,
    }
}

fn required_to_meet(remaining: Money, periods_to_deadline: i64) -> RequiredContribution {
    if remaining <= Decimal::ZERO {
        return RequiredContribution::AlreadyMet;
    }
    if periods_to_deadline <= 0 {
        return RequiredContribution::Infeasible;
    }

    let per_period = (remaining / Decimal::from(periods_to_deadline))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    RequiredContribution::PerPeriod(per_period)
}
