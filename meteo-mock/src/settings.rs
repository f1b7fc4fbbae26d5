use std::error::Error;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

/// Broker endpoint shared with the dashboard. The node publishes readings on the
/// dashboard's subscribe topic and listens on its publish topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gateway {
    pub host: String,
    pub port: u16,
    pub subscribe_topic: String,
    pub publish_topic: String,
    pub keep_alive_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mock {
    pub client_id: String,
    pub sensor_id: String,
    pub interval_secs: u64,
    /// Length of one simulated day
    pub day_length_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub gateway: Gateway,
    pub mock: Mock,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::parse(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/default.toml"
        )))
    }

    pub fn parse(source: &str) -> Result<Self, Box<dyn Error>> {
        let settings: Settings = toml::from_str(source)?;

        if settings.mock.interval_secs == 0 || settings.mock.day_length_secs == 0 {
            return Err("mock.interval_secs and mock.day_length_secs must be positive".into());
        }

        Ok(settings)
    }
}
