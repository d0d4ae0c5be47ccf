use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use savings_planner::planning::{
    Contribution, Goal, GoalId, GoalStore, Money, OwnerId, SavingsFrequency, StoreError,
};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Goal store kept in process memory, keyed by owner.
#[derive(Default, Clone)]
pub(crate) struct InMemoryGoalStore {
    goals: Arc<Mutex<HashMap<OwnerId, Vec<Goal>>>>,
    history: Arc<Mutex<HashMap<(OwnerId, GoalId), Vec<Contribution>>>>,
}

impl InMemoryGoalStore {
    /// Replaces the owner's goal set.
    pub(crate) fn seed(&self, owner: OwnerId, goals: Vec<Goal>) -> Result<(), StoreError> {
        lock(&self.goals)?.insert(owner, goals);
        Ok(())
    }

    pub(crate) fn contributions(
        &self,
        owner: &OwnerId,
        goal_id: &GoalId,
    ) -> Result<Vec<Contribution>, StoreError> {
        Ok(lock(&self.history)?
            .get(&(owner.clone(), goal_id.clone()))
            .cloned()
            .unwrap_or_default())
    }
}

impl GoalStore for InMemoryGoalStore {
    fn goals_for_owner(&self, owner: &OwnerId) -> Result<Vec<Goal>, StoreError> {
        Ok(lock(&self.goals)?.get(owner).cloned().unwrap_or_default())
    }

    fn add_contribution(
        &self,
        owner: &OwnerId,
        goal_id: &GoalId,
        contribution: Contribution,
    ) -> Result<Goal, StoreError> {
        if contribution.amount <= Decimal::ZERO {
            return Err(StoreError::InvalidContribution(format!(
                "amount must be positive (got {})",
                contribution.amount
            )));
        }

        let mut goals = lock(&self.goals)?;
        let owns_goal = goals
            .get(owner)
            .is_some_and(|owned| owned.iter().any(|goal| &goal.id == goal_id));
        if !owns_goal {
            let held_elsewhere = goals.values().flatten().any(|goal| &goal.id == goal_id);
            return Err(if held_elsewhere {
                StoreError::Forbidden
            } else {
                StoreError::NotFound
            });
        }

        let goal = goals
            .get_mut(owner)
            .and_then(|owned| owned.iter_mut().find(|goal| &goal.id == goal_id))
            .ok_or(StoreError::NotFound)?;
        goal.current_amount += contribution.amount;
        let updated = goal.clone();
        lock(&self.history)?
            .entry((owner.clone(), goal_id.clone()))
            .or_default()
            .push(contribution);

        Ok(updated)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("goal store mutex poisoned".to_string()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_money(raw: &str) -> Result<Money, String> {
    Decimal::from_str(raw.trim())
        .map_err(|err| format!("failed to parse '{raw}' as an amount ({err})"))
}

pub(crate) fn parse_frequency(raw: &str) -> Result<SavingsFrequency, String> {
    SavingsFrequency::parse(raw)
        .ok_or_else(|| format!("unknown frequency '{raw}' (expected monthly or annually)"))
}
