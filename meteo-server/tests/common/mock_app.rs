use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use meteo_api::{InboundMessage, TransportStatus};
use serde_json::Value;

use meteo_server::app::create_app;
use meteo_server::configs::{Dashboard, Gateway, Logger, Server, Settings};
use meteo_server::errors::TransportError;
use meteo_server::services::{Connector, DashboardHandle, DashboardService, InboundSender, Transport};

/// Broker stand-in shared by the connector and every transport it opens.
#[derive(Default)]
pub struct MockBroker {
    pub published: Mutex<Vec<Value>>,
    pub inbound: Mutex<Option<InboundSender>>,
    pub alive: AtomicBool,
    pub refuse_connect: AtomicBool,
    pub fail_publish: AtomicBool,
}

impl MockBroker {
    pub fn published(&self) -> Vec<Value> {
        self.published.lock().unwrap().clone()
    }

    /// Delivers a payload as if the sensor node had published it.
    pub fn deliver(&self, payload: &str) {
        let message = InboundMessage::decode(payload.as_bytes()).unwrap();
        self.inbound.lock().unwrap().as_ref().unwrap().send(message).unwrap();
    }
}

pub struct MockTransport(Arc<MockBroker>);

#[async_trait]
impl Transport for MockTransport {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError> {
        if self.0.fail_publish.load(Ordering::SeqCst) {
            return Err(TransportError::Publish(String::from("broker unreachable")));
        }
        self.0.published.lock().unwrap().push(serde_json::from_slice(&payload).unwrap());
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.0.alive.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_alive(&self) -> bool {
        self.0.alive.load(Ordering::SeqCst)
    }
}

pub struct MockConnector(pub Arc<MockBroker>);

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, inbound: InboundSender) -> Result<Box<dyn Transport>, TransportError> {
        if self.0.refuse_connect.load(Ordering::SeqCst) {
            return Err(TransportError::Connect(String::from("connection refused")));
        }
        *self.0.inbound.lock().unwrap() = Some(inbound);
        self.0.alive.store(true, Ordering::SeqCst);
        Ok(Box::new(MockTransport(Arc::clone(&self.0))))
    }

    fn describe(&self) -> TransportStatus {
        TransportStatus {
            connected: false,
            broker: String::from("mock:1883"),
            subscribe_topic: String::from("ESP32/Streamlit"),
            publish_topic: String::from("ESP32/Station 1"),
            last_error: None,
        }
    }
}

pub struct MockApp {
    pub router: Router,
    pub broker: Arc<MockBroker>,
    pub dashboard: DashboardHandle,
}

impl MockApp {
    pub fn new() -> Self {
        let settings = Settings {
            server: Server {
                host: String::from("127.0.0.1"),
                port: 0,
            },
            logger: Logger {
                level: String::from("debug"),
            },
            gateway: Gateway {
                host: String::from("mock"),
                port: 1883,
                client_id: String::from("test"),
                subscribe_topic: String::from("ESP32/Streamlit"),
                publish_topic: String::from("ESP32/Station 1"),
                keep_alive_secs: 60,
                auto_connect: false,
            },
            dashboard: Dashboard {
                title: String::from("Station Test"),
                refresh_interval_ms: 60_000,
                ..Dashboard::default()
            },
        };

        let broker = Arc::new(MockBroker::default());
        let (service, dashboard) = DashboardService::new(&settings.dashboard, Arc::new(MockConnector(Arc::clone(&broker))));
        service.spawn();

        Self {
            router: create_app(&settings, dashboard.clone()),
            broker,
            dashboard,
        }
    }

    pub async fn connected() -> Self {
        let app = Self::new();
        app.dashboard.connect().await.unwrap();
        app
    }
}
