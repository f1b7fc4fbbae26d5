use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use meteo_api::restful::ActuatorBody;

use crate::errors::ApiError;

use super::DashboardState;

pub async fn set_actuator(
    State(state): State<DashboardState>,
    Json(body): Json<ActuatorBody>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .dashboard
        .set_actuator(body.on, body.r as i64, body.g as i64, body.b as i64)
        .await?;

    Ok(Json(response))
}

pub async fn toggle_sync(State(state): State<DashboardState>) -> Result<impl IntoResponse, ApiError> {
    let response = state.dashboard.toggle_sync().await?;

    Ok(Json(response))
}
