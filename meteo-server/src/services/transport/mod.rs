mod mqtt;

pub use mqtt::*;

use async_trait::async_trait;
use meteo_api::{InboundMessage, TransportStatus};
use tokio::sync::mpsc::UnboundedSender;

use crate::errors::TransportError;

/// Queue the background listener feeds; the dashboard task is the only consumer.
pub type InboundSender = UnboundedSender<InboundMessage>;

/// An established broker session.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Publish a command payload on the command topic.
    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Release the session and stop the listener.
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// Whether the listener is still receiving.
    fn is_alive(&self) -> bool;
}

/// Opens broker sessions whose listener enqueues decoded messages on `inbound`.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, inbound: InboundSender) -> Result<Box<dyn Transport>, TransportError>;

    /// Broker address and topics, reported with the connection state.
    fn describe(&self) -> TransportStatus;
}
