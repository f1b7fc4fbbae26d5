use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Transport not connected")]
    NotConnected,

    #[error("Transport already connected")]
    AlreadyConnected,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Disconnect failed: {0}")]
    Disconnect(String),

    #[error("Encoding failed: {0}")]
    Encode(#[from] meteo_api::protocols::Error),
}

impl TransportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TransportError::NotConnected => StatusCode::SERVICE_UNAVAILABLE,
            TransportError::AlreadyConnected => StatusCode::CONFLICT,
            TransportError::Connect(_) => StatusCode::BAD_GATEWAY,
            TransportError::Publish(_) => StatusCode::BAD_GATEWAY,
            TransportError::Disconnect(_) => StatusCode::BAD_GATEWAY,
            TransportError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
