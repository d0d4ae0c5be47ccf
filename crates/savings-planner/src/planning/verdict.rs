use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::deadline::{AllocationResult, DeadlineStatus};
use super::domain::Money;

/// Overall feasibility of the goal set at a given savings rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub all_met_on_time: bool,
    /// Extra per-period savings estimated to close the gap; `None` when nothing is missed.
    pub additional_savings_needed: Option<Money>,
}

/// Reduces per-goal evaluations into a single verdict.
///
/// The shortfall sums each dated goal's stand-alone required rate and compares it with the
/// shared stream. It is not reconciled with the waterfall, so it is an estimate.
pub fn aggregate(results: &[AllocationResult], amount_per_period: Money) -> Verdict {
    let all_met_on_time = !results
        .iter()
        .any(|result| result.deadline_status == DeadlineStatus::Missed);

    if all_met_on_time {
        return Verdict {
            all_met_on_time,
            additional_savings_needed: None,
        };
    }

    let total_required = results
        .iter()
        .filter(|result| result.has_deadline())
        .filter_map(|result| result.required_per_period.and_then(|required| required.amount()))
        .fold(Decimal::ZERO, |total, amount| {
            total.checked_add(amount).unwrap_or(Decimal::MAX)
        });

    Verdict {
        all_met_on_time,
        additional_savings_needed: Some((total_required - amount_per_period).max(Decimal::ZERO)),
    }
}
