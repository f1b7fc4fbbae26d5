use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use meteo_api::{InboundMessage, TransportStatus};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::configs::Gateway;
use crate::errors::TransportError;

use super::{Connector, InboundSender, Transport};

const LISTENER_GRACE: Duration = Duration::from_secs(1);

pub struct MqttConnector {
    gateway: Gateway,
}

impl MqttConnector {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Connector for MqttConnector {
    async fn connect(&self, inbound: InboundSender) -> Result<Box<dyn Transport>, TransportError> {
        let mut options = MqttOptions::new(&self.gateway.client_id, &self.gateway.host, self.gateway.port);
        options.set_keep_alive(Duration::from_secs(self.gateway.keep_alive_secs));

        let (client, mut event_loop) = AsyncClient::new(options, 10);

        // Surface refused or unreachable brokers to the caller instead of the listener.
        loop {
            match event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => break,
                Ok(_) => {}
                Err(e) => return Err(TransportError::Connect(e.to_string())),
            }
        }

        client
            .subscribe(&self.gateway.subscribe_topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        tracing::info!(
            "Connected to {}:{}, subscribed to {}",
            self.gateway.host,
            self.gateway.port,
            self.gateway.subscribe_topic
        );

        let alive = Arc::new(AtomicBool::new(true));
        let listener = tokio::spawn(listen(event_loop, inbound, Arc::clone(&alive)));

        Ok(Box::new(MqttTransport {
            client,
            topic: self.gateway.publish_topic.clone(),
            alive,
            listener: Mutex::new(Some(listener)),
        }))
    }

    fn describe(&self) -> TransportStatus {
        TransportStatus {
            connected: false,
            broker: format!("{}:{}", self.gateway.host, self.gateway.port),
            subscribe_topic: self.gateway.subscribe_topic.clone(),
            publish_topic: self.gateway.publish_topic.clone(),
            last_error: None,
        }
    }
}

pub struct MqttTransport {
    client: AsyncClient,
    topic: String,
    alive: Arc<AtomicBool>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

#[async_trait]
impl Transport for MqttTransport {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError> {
        // A dead event loop never drains the request queue.
        if !self.is_alive() {
            return Err(TransportError::NotConnected);
        }

        tracing::debug!("Send on {}: {}", self.topic, String::from_utf8_lossy(&payload));

        self.client
            .publish(&self.topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| TransportError::Publish(e.to_string()))
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        let result = self
            .client
            .disconnect()
            .await
            .map_err(|e| TransportError::Disconnect(e.to_string()));

        if let Some(listener) = self.listener.lock().await.take() {
            let abort = listener.abort_handle();
            if tokio::time::timeout(LISTENER_GRACE, listener).await.is_err() {
                abort.abort();
            }
        }

        self.alive.store(false, Ordering::Release);

        result
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Drop for MqttTransport {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.get_mut().take() {
            listener.abort();
        }
    }
}

/// Background listener: decodes every publish and enqueues it, never touches state.
async fn listen(mut event_loop: EventLoop, inbound: InboundSender, alive: Arc<AtomicBool>) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if !forward(&publish.payload, &publish.topic, &inbound) {
                    tracing::warn!("Inbound queue closed, stopping listener");
                    break;
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::info!("MQTT session closed");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("MQTT error: {}", e);
                break;
            }
        }
    }

    alive.store(false, Ordering::Release);
}

/// Decodes one payload and enqueues it. An undecodable payload is dropped and
/// logged. Returns false once the queue is closed.
fn forward(payload: &[u8], topic: &str, inbound: &InboundSender) -> bool {
    match InboundMessage::decode(payload) {
        Ok(message) => {
            tracing::debug!("Receive on {}: {:?}", topic, message);
            inbound.send(message).is_ok()
        }
        Err(e) => {
            tracing::warn!("Dropping message on {}: {}", topic, e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> Gateway {
        Gateway {
            host: String::from("127.0.0.1"),
            port: 1883,
            client_id: String::from("test"),
            subscribe_topic: String::from("ESP32/Streamlit"),
            publish_topic: String::from("ESP32/Station 1"),
            keep_alive_secs: 60,
            auto_connect: false,
        }
    }

    #[test]
    fn test_describe_reports_configured_endpoint() {
        let status = MqttConnector::new(gateway()).describe();

        assert!(!status.connected);
        assert_eq!(status.broker, "127.0.0.1:1883");
        assert_eq!(status.subscribe_topic, "ESP32/Streamlit");
        assert_eq!(status.publish_topic, "ESP32/Station 1");
    }

    #[test]
    fn test_forward_skips_undecodable_payloads() {
        let (inbound, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        let topic = "ESP32/Streamlit";

        assert!(forward(br#"{"temperature": 21}"#, topic, &inbound));
        assert!(forward(b"not json", topic, &inbound));
        assert!(forward(b"[1]", topic, &inbound));
        assert!(forward(br#"{"humidity": 55}"#, topic, &inbound));

        let first = receiver.try_recv().unwrap();
        let second = receiver.try_recv().unwrap();

        assert_eq!(first.temperature, Some(serde_json::json!(21)));
        assert_eq!(second.humidity, Some(serde_json::json!(55)));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_forward_reports_closed_queue() {
        let (inbound, receiver) = tokio::sync::mpsc::unbounded_channel();
        drop(receiver);

        assert!(!forward(br#"{"temperature": 21}"#, "ESP32/Streamlit", &inbound));
        assert!(forward(b"not json", "ESP32/Streamlit", &inbound));
    }

    #[tokio::test]
    async fn test_connect_refused_is_reported() {
        let mut unreachable = gateway();
        unreachable.port = 1;

        let (inbound, _receiver) = tokio::sync::mpsc::unbounded_channel();
        let result = MqttConnector::new(unreachable).connect(inbound).await;

        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
