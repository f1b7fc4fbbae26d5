use std::env;

use config::{Config, ConfigError, Environment, File};
use meteo_api::CommandSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gateway {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub subscribe_topic: String,
    pub publish_topic: String,
    pub keep_alive_secs: u64,
    pub auto_connect: bool,
}

/// How the LED on/off control is drawn on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedControl {
    #[default]
    Toggle,
    Checkbox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub title: String,
    pub led_control: LedControl,
    pub command_schema: CommandSchema,
    pub history_len: usize,
    pub recent_len: usize,
    pub refresh_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub gateway: Gateway,
    pub dashboard: Dashboard,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("METEO").separator("__"))
            .build()?
            .try_deserialize()?;

        if settings.dashboard.history_len == 0 {
            return Err(ConfigError::Message("dashboard.history_len must be at least 1".into()));
        }

        if settings.dashboard.refresh_interval_ms == 0 {
            return Err(ConfigError::Message("dashboard.refresh_interval_ms must be positive".into()));
        }

        Ok(settings)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            title: String::from("Station Météo (MQTT)"),
            led_control: LedControl::Toggle,
            command_schema: CommandSchema::Compact,
            history_len: 50,
            recent_len: 10,
            refresh_interval_ms: 3000,
        }
    }
}
