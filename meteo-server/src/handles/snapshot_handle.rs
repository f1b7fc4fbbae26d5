use anyhow::Context;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::errors::ApiError;

use super::DashboardState;

pub async fn get_snapshot(State(state): State<DashboardState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.dashboard.refresh().await?;

    // Encoded here so a failure gets the JSON error body instead of axum's plain 500.
    let body = serde_json::to_value(&snapshot).context("Failed to encode snapshot")?;

    Ok(Json(body))
}
