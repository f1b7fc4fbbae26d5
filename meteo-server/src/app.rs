use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::Settings;
use crate::handles::*;
use crate::services::DashboardHandle;

pub fn create_app(settings: &Settings, dashboard: DashboardHandle) -> Router {
    let page = Router::new()
        .route("/", get(get_dashboard))
        .with_state(PageState::new(&settings.dashboard));

    let api = Router::new()
        .route("/snapshot", get(get_snapshot))
        .route("/events", get(sse_handler))
        .route("/actuator", post(set_actuator))
        .route("/actuator/sync", post(toggle_sync))
        .route("/transport/connect", post(connect_transport))
        .route("/transport/disconnect", post(disconnect_transport))
        .with_state(DashboardState { dashboard });

    Router::new()
        .merge(page)
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
