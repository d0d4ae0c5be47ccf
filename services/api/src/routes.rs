use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use savings_planner::planning::{planning_router, GoalPlanningService, GoalStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_planning_routes<S>(service: Arc<GoalPlanningService<S>>) -> axum::Router
where
    S: GoalStore + 'static,
{
    planning_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryGoalStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::NaiveDate;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use rust_decimal_macros::dec;
    use savings_planner::planning::{Goal, GoalId, OwnerId};
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    fn seeded_app(state: AppState) -> (axum::Router, InMemoryGoalStore) {
        let store = InMemoryGoalStore::default();
        store
            .seed(
                OwnerId("demo".to_string()),
                vec![
                    Goal {
                        id: GoalId("rainy-day".to_string()),
                        name: "Rainy day".to_string(),
                        target_amount: dec!(900),
                        current_amount: dec!(300),
                        deadline: NaiveDate::from_ymd_opt(2025, 7, 1),
                        priority: Some(1),
                    },
                    Goal {
                        id: GoalId("console".to_string()),
                        name: "Console".to_string(),
                        target_amount: dec!(500),
                        current_amount: dec!(0),
                        deadline: None,
                        priority: None,
                    },
                ],
            )
            .expect("store seeded");

        let service = Arc::new(GoalPlanningService::new(Arc::new(store.clone())));
        let app = with_planning_routes(service).layer(Extension(state));
        (app, store)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let state = app_state(false);
        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn projection_route_is_mounted_next_to_probes() {
        let (app, _) = seeded_app(app_state(true));

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/owners/demo/goals/projection")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"amount_per_period": 200, "as_of": "2025-01-01"}"#,
            ))
            .expect("request builds");
        let response = app.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["goals"][0]["goal_id"], "rainy-day");
        assert_eq!(body["goals"][0]["projected_periods"], 3);
        assert_eq!(body["goals"][1]["projected_periods"], 6);
        assert_eq!(body["verdict"]["all_met_on_time"], true);
    }

    #[tokio::test]
    async fn auto_allocate_route_commits_into_memory_store() {
        let (app, store) = seeded_app(app_state(true));

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/owners/demo/goals/auto-allocate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"amount": 700, "date": "2025-02-01"}"#))
            .expect("request builds");
        let response = app.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["report"]["succeeded"], 2);
        assert_eq!(body["report"]["failed"], 0);

        let history = store
            .contributions(&OwnerId("demo".to_string()), &GoalId("console".to_string()))
            .expect("history readable");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, dec!(100));
    }
}
