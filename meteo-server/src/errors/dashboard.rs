use axum::http::StatusCode;

use super::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Dashboard task stopped")]
    Stopped,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Stopped => StatusCode::SERVICE_UNAVAILABLE,
            DashboardError::Transport(e) => e.status_code(),
        }
    }
}
