use meteo_api::OutboundCommand;
use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Drives the MQTT event loop and forwards every decoded dashboard command.
pub struct CommandHandler {
    pub cmd_tx: mpsc::Sender<OutboundCommand>,
    pub cmd_rx: mpsc::Receiver<OutboundCommand>,
}

impl CommandHandler {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        CommandHandler { cmd_tx, cmd_rx }
    }

    pub fn start_command_processor(&self, client: AsyncClient, mut event_loop: EventLoop, topic: String) -> JoinHandle<()> {
        let cmd_tx = self.cmd_tx.clone();

        tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!("Connected, listening on {}", topic);
                        // Subscriptions do not survive a clean session reconnect.
                        if let Err(e) = client.subscribe(&topic, QoS::AtLeastOnce).await {
                            tracing::error!("Failed to subscribe: {}", e);
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        match OutboundCommand::decode(&publish.payload) {
                            Ok(command) => {
                                tracing::debug!("Receive: {:?}", command);
                                if cmd_tx.send(command).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!("Ignoring payload on {}: {}", publish.topic, e),
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("MQTT error: {}", e);
                        time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        })
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
