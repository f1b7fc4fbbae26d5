use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use meteo_api::restful::TransportResponse;

use crate::errors::ApiError;

use super::DashboardState;

pub async fn connect_transport(State(state): State<DashboardState>) -> Result<impl IntoResponse, ApiError> {
    let transport = state.dashboard.connect().await?;

    Ok(Json(TransportResponse { transport }))
}

/// Always succeeds once the dashboard task is running; release failures are only logged.
pub async fn disconnect_transport(State(state): State<DashboardState>) -> Result<impl IntoResponse, ApiError> {
    let transport = state.dashboard.disconnect().await?;

    Ok(Json(TransportResponse { transport }))
}
