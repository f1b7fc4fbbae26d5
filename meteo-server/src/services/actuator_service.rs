use meteo_api::{ActuatorState, CommandSchema, OutboundCommand};

use crate::errors::TransportError;
use crate::services::transport::Transport;

/// Desired LED configuration and the last one the node was told about.
#[derive(Debug, Clone)]
pub struct ActuatorService {
    desired: ActuatorState,
    last_published: ActuatorState,
    sync: bool,
    schema: CommandSchema,
}

impl ActuatorService {
    pub fn new(schema: CommandSchema) -> Self {
        Self {
            desired: ActuatorState::default(),
            last_published: ActuatorState::default(),
            sync: false,
            schema,
        }
    }

    pub fn apply_user_input(&mut self, on: bool, red: i64, green: i64, blue: i64) -> ActuatorState {
        self.desired = ActuatorState::clamped(on, red, green, blue);
        self.desired
    }

    pub fn desired(&self) -> ActuatorState {
        self.desired
    }

    pub fn sync(&self) -> bool {
        self.sync
    }

    pub fn is_dirty(&self) -> bool {
        self.desired != self.last_published
    }

    /// Publishes the desired state when it differs from the last published one.
    ///
    /// A failed publish keeps the state dirty, so the next call retries the same diff.
    pub async fn maybe_publish(&mut self, transport: Option<&dyn Transport>) -> Result<bool, TransportError> {
        if !self.is_dirty() {
            return Ok(false);
        }

        let transport = transport.ok_or(TransportError::NotConnected)?;
        let payload = OutboundCommand::diffed(&self.desired, self.schema, self.sync).encode()?;

        transport.publish(payload).await?;
        self.last_published = self.desired;

        tracing::info!("Published actuator state {:?}", self.desired);

        Ok(true)
    }

    /// Flips the sync flag and broadcasts the current state, changed or not.
    ///
    /// The flag flips even when the broadcast fails.
    pub async fn toggle_sync(&mut self, transport: Option<&dyn Transport>) -> Result<bool, TransportError> {
        self.sync = !self.sync;

        let transport = transport.ok_or(TransportError::NotConnected)?;
        let payload = OutboundCommand::sync(&self.desired, self.sync).encode()?;

        transport.publish(payload).await?;
        self.last_published = self.desired;

        tracing::info!("Broadcast sync {} with {:?}", self.sync, self.desired);

        Ok(self.sync)
    }
}

impl Default for ActuatorService {
    fn default() -> Self {
        Self::new(CommandSchema::default())
    }
}
