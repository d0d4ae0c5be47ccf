use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::deadline::{AllocationResult, DeadlineStatus, RequiredContribution};
use super::domain::{GoalId, Money, OwnerId, SavingsFrequency, SavingsInput};
use super::engine::Projection;
use super::service::{GoalPlanningService, PlanningServiceError};
use super::store::GoalStore;
use super::verdict::Verdict;

/// Router builder exposing projection and auto-allocation endpoints.
pub fn planning_router<S>(service: Arc<GoalPlanningService<S>>) -> Router
where
    S: GoalStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/owners/:owner_id/goals/projection",
            post(projection_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/goals/auto-allocate/preview",
            post(preview_handler::<S>),
        )
        .route(
            "/api/v1/owners/:owner_id/goals/auto-allocate",
            post(auto_allocate_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub amount_per_period: Money,
    #[serde(default)]
    pub frequency: Option<SavingsFrequency>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub amount: Money,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Flattened projection row with display labels for clients.
#[derive(Debug, Clone, Serialize)]
pub struct GoalProjectionView {
    pub goal_id: GoalId,
    pub goal_name: String,
    pub remaining: Money,
    pub required_per_period: Option<Money>,
    pub required_infeasible: bool,
    pub projected_periods: Option<u32>,
    pub projected_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub deadline_met: Option<bool>,
    pub time_difference_periods: Option<i64>,
    pub time_difference_label: String,
}

impl GoalProjectionView {
    fn from_result(result: &AllocationResult, frequency: SavingsFrequency) -> Self {
        Self {
            goal_id: result.goal_id.clone(),
            goal_name: result.goal_name.clone(),
            remaining: result.remaining,
            required_per_period: result.required_per_period.and_then(RequiredContribution::amount),
            required_infeasible: result.required_per_period
                == Some(RequiredContribution::Infeasible),
            projected_periods: result.projected_periods,
            projected_date: result.projected_date,
            deadline: result.deadline,
            deadline_met: result.deadline_status.as_option(),
            time_difference_periods: result.time_difference.periods(),
            time_difference_label: result.time_difference.label(frequency),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionView {
    pub as_of: NaiveDate,
    pub amount_per_period: Money,
    pub frequency: SavingsFrequency,
    pub goals: Vec<GoalProjectionView>,
    pub verdict: Verdict,
    pub missed_goals: usize,
}

impl From<&Projection> for ProjectionView {
    fn from(projection: &Projection) -> Self {
        Self {
            as_of: projection.as_of,
            amount_per_period: projection.amount_per_period,
            frequency: projection.frequency,
            goals: projection
                .results
                .iter()
                .map(|result| GoalProjectionView::from_result(result, projection.frequency))
                .collect(),
            verdict: projection.verdict,
            missed_goals: projection
                .results
                .iter()
                .filter(|result| result.deadline_status == DeadlineStatus::Missed)
                .count(),
        }
    }
}

pub(crate) async fn projection_handler<S>(
    State(service): State<Arc<GoalPlanningService<S>>>,
    Path(owner_id): Path<String>,
    axum::Json(request): axum::Json<ProjectionRequest>,
) -> Response
where
    S: GoalStore + 'static,
{
    let owner = OwnerId(owner_id);
    let input = SavingsInput {
        amount_per_period: request.amount_per_period,
        frequency: request
            .frequency
            .unwrap_or_else(|| service.default_frequency()),
    };
    let as_of = request.as_of.unwrap_or_else(|| Local::now().date_naive());

    match service.project(&owner, input, as_of) {
        Ok(projection) => {
            let view = ProjectionView::from(&projection);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<S>(
    State(service): State<Arc<GoalPlanningService<S>>>,
    Path(owner_id): Path<String>,
    axum::Json(request): axum::Json<AllocationRequest>,
) -> Response
where
    S: GoalStore + 'static,
{
    let owner = OwnerId(owner_id);
    match service.preview_auto_allocation(&owner, request.amount) {
        Ok(plan) => (StatusCode::OK, axum::Json(plan)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn auto_allocate_handler<S>(
    State(service): State<Arc<GoalPlanningService<S>>>,
    Path(owner_id): Path<String>,
    axum::Json(request): axum::Json<AllocationRequest>,
) -> Response
where
    S: GoalStore + 'static,
{
    let owner = OwnerId(owner_id);
    let on = request.date.unwrap_or_else(|| Local::now().date_naive());

    match service.auto_allocate(&owner, request.amount, on) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: PlanningServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}
