use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ActuatorState;

/// Redraw-ready view of the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Number of redraw cycles since start
    pub refresh: u64,
    /// Time of the last redraw cycle that applied new data
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_update: Option<OffsetDateTime>,
    /// Latest valid sensor values
    pub latest: LatestValues,
    /// Actuator state as reported by the node
    pub reported: ReportedActuator,
    /// Actuator state requested from the dashboard
    pub actuator: ActuatorState,
    /// Synchronised mode flag
    pub sync: bool,
    /// Derived labels
    pub labels: DerivedLabels,
    /// Histories right-aligned for charting
    pub series: AlignedSeries,
    /// Last few values per channel
    pub recent: RecentValues,
    /// Broker connection status
    pub transport: TransportStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestValues {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub luminosity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedActuator {
    pub led: Option<bool>,
    pub r: Option<i64>,
    pub g: Option<i64>,
    pub b: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedLabels {
    /// Feels-like label from temperature
    pub ressenti: String,
    /// Period of day from luminosity
    pub periode: String,
    /// Weather condition from all three readings
    pub temps: String,
    /// LED status line
    pub led: String,
    /// Synchronisation mode line
    pub mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    /// Common length of every series
    pub length: usize,
    pub temperature: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub luminosity: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentValues {
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub luminosity: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportStatus {
    pub connected: bool,
    /// Broker address as `host:port`
    pub broker: String,
    pub subscribe_topic: String,
    pub publish_topic: String,
    /// Last connection or publish failure
    pub last_error: Option<String>,
}
