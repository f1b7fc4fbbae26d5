use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use meteo_api::LedCommand;
use rand::Rng;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use serde::{Deserialize, Serialize};
use serde_json::to_vec;
use tokio::time::{self, Instant};

use crate::command::CommandHandler;
use crate::settings::Settings;
use crate::simulate::{simulated_humidity, simulated_luminosity, simulated_temperature};

mod command;
pub mod settings;
mod simulate;

/// Reading in the shape the dashboard ingests.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SensorPayload {
    pub temperature: f64,
    pub humidity: f64,
    pub luminosity: f64,
}

impl SensorPayload {
    pub fn simulate(day_fraction: f64, rng: &mut impl Rng) -> Self {
        Self {
            temperature: round1(simulated_temperature(day_fraction) + rng.random_range(-0.3..0.3)),
            humidity: round1((simulated_humidity(day_fraction) + rng.random_range(-1.0..1.0)).clamp(0.0, 100.0)),
            luminosity: round1(simulated_luminosity(day_fraction)),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Position within the compressed simulated day, in `[0, 1)`.
pub fn day_fraction(elapsed: Duration, day_length: Duration) -> f64 {
    let day = day_length.as_secs_f64().max(1.0);

    (elapsed.as_secs_f64() % day) / day
}

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let gateway = &settings.gateway;

    let mut options = MqttOptions::new(&settings.mock.client_id, &gateway.host, gateway.port);
    options.set_keep_alive(Duration::from_secs(gateway.keep_alive_secs));

    let (client, event_loop) = AsyncClient::new(options, 10);

    let mut command_handler = CommandHandler::new();
    command_handler.start_command_processor(client.clone(), event_loop, gateway.publish_topic.clone());

    tracing::info!(
        "Sensor {} publishing to {}:{} on {}",
        settings.mock.sensor_id,
        gateway.host,
        gateway.port,
        gateway.subscribe_topic
    );

    let day_length = Duration::from_secs(settings.mock.day_length_secs);
    let started = Instant::now();
    let mut interval = time::interval(Duration::from_secs(settings.mock.interval_secs));

    loop {
        tokio::select! {
            Some(command) = command_handler.cmd_rx.recv() => {
                let actuator = command.actuator();
                tracing::info!(
                    "LED {} rgb({}, {}, {})",
                    if actuator.on { "on" } else { "off" },
                    actuator.red,
                    actuator.green,
                    actuator.blue
                );

                // Report the applied state back like the node firmware does.
                let echo = LedCommand { led: actuator.on, r: actuator.red, g: actuator.green, b: actuator.blue };
                publish(&client, &gateway.subscribe_topic, to_vec(&echo)?).await;
            },
            _ = interval.tick() => {
                let fraction = day_fraction(started.elapsed(), day_length);
                let payload = SensorPayload::simulate(fraction, &mut rand::rng());

                publish(&client, &gateway.subscribe_topic, to_vec(&payload)?).await;
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    if let Err(e) = client.disconnect().await {
        tracing::warn!("Failed to disconnect: {}", e);
    }

    Ok(())
}

async fn publish(client: &AsyncClient, topic: &str, payload: Vec<u8>) {
    tracing::debug!("Send: {}", String::from_utf8_lossy(&payload));

    if let Err(e) = client.publish(topic, QoS::AtLeastOnce, false, payload).await {
        tracing::error!("Failed to publish on {}: {}", topic, e);
    }
}
