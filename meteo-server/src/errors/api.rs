use super::DashboardError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Dashboard error: {0}")]
    DashboardError(#[from] DashboardError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
