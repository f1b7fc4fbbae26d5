use serde::{Deserialize, Serialize};

use crate::{ActuatorState, TransportStatus};

/// User input from the LED controls. Any JSON number is accepted per colour:
/// fractions are truncated and values outside 0-255 are clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorBody {
    pub on: bool,
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorResponse {
    /// Whether a command left for the node
    pub published: bool,
    /// Stored actuator state after clamping
    pub actuator: ActuatorState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Synchronised mode after the toggle
    pub sync: bool,
    pub actuator: ActuatorState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportResponse {
    pub transport: TransportStatus,
}
