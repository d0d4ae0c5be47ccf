use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::planning::domain::{Contribution, Goal, GoalId, Money, OwnerId};
use crate::planning::service::GoalPlanningService;
use crate::planning::store::{GoalStore, StoreError};

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
}

pub(super) fn months_out(months: u32) -> NaiveDate {
    as_of()
        .checked_add_months(chrono::Months::new(months))
        .expect("valid date")
}

pub(super) fn owner() -> OwnerId {
    OwnerId("household-1".to_string())
}

pub(super) fn goal(
    id: &str,
    remaining: Money,
    deadline: Option<NaiveDate>,
    priority: Option<i32>,
) -> Goal {
    Goal {
        id: GoalId(id.to_string()),
        name: format!("Goal {id}"),
        target_amount: remaining + dec!(100),
        current_amount: dec!(100),
        deadline,
        priority,
    }
}

/// Scenario goals: A due in 3 months with $300 left, B due in 6 months with $600 left.
pub(super) fn scenario_goals() -> Vec<Goal> {
    vec![
        goal("b", dec!(600), Some(months_out(6)), Some(1)),
        goal("a", dec!(300), Some(months_out(3)), Some(1)),
    ]
}

#[derive(Default)]
pub(super) struct MemoryStore {
    goals: Mutex<HashMap<OwnerId, Vec<Goal>>>,
    history: Mutex<Vec<(GoalId, Contribution)>>,
    failing: HashSet<GoalId>,
}

impl MemoryStore {
    pub(super) fn with_goals(owner: OwnerId, goals: Vec<Goal>) -> Self {
        let store = Self::default();
        store
            .goals
            .lock()
            .expect("store mutex poisoned")
            .insert(owner, goals);
        store
    }

    pub(super) fn failing_on(mut self, goal_id: &str) -> Self {
        self.failing.insert(GoalId(goal_id.to_string()));
        self
    }

    pub(super) fn history(&self) -> Vec<(GoalId, Contribution)> {
        self.history.lock().expect("history mutex poisoned").clone()
    }

    pub(super) fn goal(&self, owner: &OwnerId, goal_id: &str) -> Option<Goal> {
        self.goals
            .lock()
            .expect("store mutex poisoned")
            .get(owner)
            .and_then(|goals| goals.iter().find(|goal| goal.id.0 == goal_id).cloned())
    }
}

impl GoalStore for MemoryStore {
    fn goals_for_owner(&self, owner: &OwnerId) -> Result<Vec<Goal>, StoreError> {
        let guard = self.goals.lock().expect("store mutex poisoned");
        Ok(guard.get(owner).cloned().unwrap_or_default())
    }

    fn add_contribution(
        &self,
        owner: &OwnerId,
        goal_id: &GoalId,
        contribution: Contribution,
    ) -> Result<Goal, StoreError> {
        if self.failing.contains(goal_id) {
            return Err(StoreError::Unavailable(format!("write to {} timed out", goal_id)));
        }

        let mut guard = self.goals.lock().expect("store mutex poisoned");
        let goals = guard.get_mut(owner).ok_or(StoreError::Forbidden)?;
        let goal = goals
            .iter_mut()
            .find(|goal| &goal.id == goal_id)
            .ok_or(StoreError::NotFound)?;
        goal.current_amount += contribution.amount;
        let updated = goal.clone();

        self.history
            .lock()
            .expect("history mutex poisoned")
            .push((goal_id.clone(), contribution));
        Ok(updated)
    }
}

pub(super) struct UnavailableStore;

impl GoalStore for UnavailableStore {
    fn goals_for_owner(&self, _owner: &OwnerId) -> Result<Vec<Goal>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn add_contribution(
        &self,
        _owner: &OwnerId,
        _goal_id: &GoalId,
        _contribution: Contribution,
    ) -> Result<Goal, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(
    goals: Vec<Goal>,
) -> (GoalPlanningService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_goals(owner(), goals));
    let service = GoalPlanningService::new(store.clone());
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
