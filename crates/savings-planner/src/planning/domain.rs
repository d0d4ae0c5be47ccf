use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary amounts are carried as exact decimals.
pub type Money = Decimal;

/// Identifier wrapper for savings goals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GoalId(pub String);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for the user owning a set of goals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only snapshot of a savings goal as handed to the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    /// Smaller is more urgent.
    #[serde(default)]
    pub priority: Option<i32>,
}

impl Goal {
    /// Amount still missing before the target is reached, never negative.
    pub fn remaining(&self) -> Money {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    pub fn is_met(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Cadence of the recurring savings stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsFrequency {
    Monthly,
    Annually,
}

impl SavingsFrequency {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" | "m" => Some(Self::Monthly),
            "annually" | "annual" | "yearly" | "year" | "y" => Some(Self::Annually),
            _ => None,
        }
    }

    const fn months_per_period(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Annually => 12,
        }
    }

    /// Unit name used in human readable labels.
    pub fn unit(self, count: u64) -> &'static str {
        match (self, count) {
            (Self::Monthly, 1) => "month",
            (Self::Monthly, _) => "months",
            (Self::Annually, 1) => "year",
            (Self::Annually, _) => "years",
        }
    }

    /// Date reached after `periods` periods, clamping to month end. `None` on calendar overflow.
    pub fn advance(self, from: NaiveDate, periods: u32) -> Option<NaiveDate> {
        let months = periods.checked_mul(self.months_per_period())?;
        from.checked_add_months(Months::new(months))
    }

    /// Whole periods elapsed from `from` to `to`, truncated toward zero.
    pub fn periods_between(self, from: NaiveDate, to: NaiveDate) -> i64 {
        whole_months_between(from, to) / i64::from(self.months_per_period())
    }
}

/// Calendar months between two dates, counting only completed months.
///
/// A month ending on the last day of a shorter month counts as complete, so this is the
/// inverse of month-end clamping in [`SavingsFrequency::advance`].
fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());

    if months > 0 && to.day() < from.day() && !is_month_end(to) {
        months -= 1;
    } else if months < 0 && to.day() > from.day() && !is_month_end(from) {
        months += 1;
    }

    months
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt()
        .map_or(true, |next| next.month() != date.month())
}

/// Recurring savings capacity used for projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsInput {
    pub amount_per_period: Money,
    pub frequency: SavingsFrequency,
}

/// Single contribution appended to a goal's history by the goal store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub amount: Money,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn remaining_never_goes_negative() {
        let goal = Goal {
            id: GoalId("g".to_string()),
            name: "Overfunded".to_string(),
            target_amount: dec!(100),
            current_amount: dec!(140),
            deadline: None,
            priority: None,
        };
        assert_eq!(goal.remaining(), Decimal::ZERO);
        assert!(goal.is_met());
    }

    #[test]
    fn advance_clamps_to_month_end() {
        let jan_31 = date(2025, 1, 31);
        assert_eq!(
            SavingsFrequency::Monthly.advance(jan_31, 1),
            Some(date(2025, 2, 28))
        );
        assert_eq!(
            SavingsFrequency::Annually.advance(date(2024, 2, 29), 1),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn periods_between_counts_whole_months_only() {
        let from = date(2025, 1, 15);
        assert_eq!(SavingsFrequency::Monthly.periods_between(from, date(2025, 4, 15)), 3);
        assert_eq!(SavingsFrequency::Monthly.periods_between(from, date(2025, 4, 14)), 2);
        assert_eq!(SavingsFrequency::Monthly.periods_between(from, date(2024, 10, 15)), -3);
        assert_eq!(SavingsFrequency::Monthly.periods_between(from, date(2024, 10, 16)), -2);
        assert_eq!(SavingsFrequency::Monthly.periods_between(from, date(2025, 1, 31)), 0);
    }

    #[test]
    fn month_end_clamping_still_counts_whole_periods() {
        let monthly = SavingsFrequency::Monthly;
        let jan_31 = date(2025, 1, 31);
        for n in 0..=36 {
            let later = monthly.advance(jan_31, n).expect("date in range");
            assert_eq!(monthly.periods_between(jan_31, later), i64::from(n));
            assert_eq!(monthly.periods_between(later, jan_31), -i64::from(n));
        }

        assert_eq!(monthly.periods_between(jan_31, date(2025, 4, 30)), 3);
        assert_eq!(monthly.periods_between(date(2025, 1, 30), date(2025, 2, 28)), 1);
        assert_eq!(monthly.periods_between(jan_31, date(2025, 2, 27)), 0);

        let annually = SavingsFrequency::Annually;
        let leap_day = date(2024, 2, 29);
        let next_year = annually.advance(leap_day, 1).expect("date in range");
        assert_eq!(annually.periods_between(leap_day, next_year), 1);
        assert_eq!(annually.periods_between(next_year, leap_day), -1);
    }

    #[test]
    fn annual_periods_truncate_toward_zero() {
        let from = date(2025, 6, 1);
        assert_eq!(SavingsFrequency::Annually.periods_between(from, date(2027, 5, 31)), 1);
        assert_eq!(SavingsFrequency::Annually.periods_between(from, date(2027, 6, 1)), 2);
        assert_eq!(SavingsFrequency::Annually.periods_between(from, date(2024, 1, 1)), -1);
    }

    #[test]
    fn parses_frequency_aliases() {
        assert_eq!(SavingsFrequency::parse(" Monthly "), Some(SavingsFrequency::Monthly));
        assert_eq!(SavingsFrequency::parse("yearly"), Some(SavingsFrequency::Annually));
        assert_eq!(SavingsFrequency::parse("weekly"), None);
    }
}
