use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::planning::router::{self, planning_router, AllocationRequest, ProjectionRequest};
use crate::planning::service::GoalPlanningService;

fn post_json(uri: &str, body: Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serializable body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn projection_route_returns_labels_and_verdict() {
    let (service, _) = build_service(scenario_goals());
    let app = planning_router(Arc::new(service));

    let response = app
        .oneshot(post_json(
            "/api/v1/owners/household-1/goals/projection",
            json!({ "amount_per_period": 100, "frequency": "monthly", "as_of": "2025-01-01" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let goals = payload["goals"].as_array().expect("goal rows");
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0]["goal_id"], json!("a"));
    assert_eq!(goals[0]["time_difference_label"], json!("on time"));
    assert_eq!(goals[1]["time_difference_label"], json!("3 months behind"));
    assert_eq!(goals[1]["time_difference_periods"], json!(-3));
    assert_eq!(goals[1]["deadline_met"], json!(false));
    assert_eq!(payload["verdict"]["all_met_on_time"], json!(false));
    assert_eq!(payload["missed_goals"], json!(1));
}

#[tokio::test]
async fn projection_handler_rejects_zero_rate() {
    let (service, _) = build_service(scenario_goals());

    let response = router::projection_handler(
        State(Arc::new(service)),
        Path("household-1".to_string()),
        axum::Json(ProjectionRequest {
            amount_per_period: dec!(0),
            frequency: None,
            as_of: Some(as_of()),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        json!("savings per period must be positive (got 0)")
    );
}

#[tokio::test]
async fn projection_handler_maps_store_outage_to_internal_error() {
    let service = Arc::new(GoalPlanningService::new(Arc::new(UnavailableStore)));

    let response = router::projection_handler(
        State(service),
        Path("household-1".to_string()),
        axum::Json(ProjectionRequest {
            amount_per_period: dec!(100),
            frequency: None,
            as_of: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn preview_route_returns_plan_without_committing() {
    let (service, store) = build_service(scenario_goals());
    let app = planning_router(Arc::new(service));

    let response = app
        .oneshot(post_json(
            "/api/v1/owners/household-1/goals/auto-allocate/preview",
            json!({ "amount": 500 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["items"][0]["goal_id"], json!("a"));
    assert_eq!(payload["items"][1]["amount_to_allocate"].as_f64(), Some(200.0));
    assert_eq!(payload["leftover"].as_f64(), Some(0.0));
    assert!(store.history().is_empty());
}

#[tokio::test]
async fn auto_allocate_handler_reports_partial_failure() {
    let store = Arc::new(MemoryStore::with_goals(owner(), scenario_goals()).failing_on("b"));
    let service = Arc::new(GoalPlanningService::new(store.clone()));

    let response = router::auto_allocate_handler(
        State(service),
        Path("household-1".to_string()),
        axum::Json(AllocationRequest {
            amount: dec!(500),
            date: Some(as_of()),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["report"]["succeeded"], json!(1));
    assert_eq!(payload["report"]["failed"], json!(1));
    assert!(payload["report"]["first_error"]
        .as_str()
        .is_some_and(|message| message.contains("timed out")));
    assert_eq!(store.history().len(), 1);
}
