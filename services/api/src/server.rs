use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryGoalStore};
use crate::routes::with_planning_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use savings_planner::config::{AppConfig, PlannerConfig};
use savings_planner::error::AppError;
use savings_planner::planning::{read_goals_from_path, GoalPlanningService};
use savings_planner::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let log_filter = telemetry::init(&config.telemetry)?;
    info!(
        source = ?log_filter.source,
        directives = %log_filter.directives,
        "telemetry initialized"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(seeded_store(&config.planner)?);
    let planning_service = Arc::new(
        GoalPlanningService::new(store).with_default_frequency(config.planner.default_frequency),
    );

    let app = with_planning_routes(planning_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "savings planner ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn seeded_store(planner: &PlannerConfig) -> Result<InMemoryGoalStore, AppError> {
    let store = InMemoryGoalStore::default();

    if let Some(path) = &planner.seed_csv {
        let goals = read_goals_from_path(path)?;
        info!(
            owner = %planner.seed_owner,
            goals = goals.len(),
            path = %path.display(),
            "seeded goal store"
        );
        store.seed(planner.seed_owner.clone(), goals)?;
    }

    Ok(store)
}
