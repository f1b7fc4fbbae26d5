use std::sync::Arc;
use std::time::Duration;

use meteo_api::restful::{ActuatorResponse, SyncResponse};
use meteo_api::{DashboardSnapshot, InboundMessage, TransportStatus};
use time::OffsetDateTime;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::configs::Dashboard;
use crate::errors::{DashboardError, TransportError};
use crate::services::actuator_service::ActuatorService;
use crate::services::sensor_service::SensorService;
use crate::services::transport::{Connector, InboundSender, Transport};
use crate::services::view_service::{RefreshInfo, ViewService};

const REQUEST_QUEUE: usize = 32;
const SNAPSHOT_QUEUE: usize = 16;

/// Everything the dashboard mutates. Owned by the dashboard task alone.
pub struct AppState {
    pub sensors: SensorService,
    pub actuator: ActuatorService,
    pub transport: Option<Box<dyn Transport>>,
    pub last_error: Option<String>,
    pub info: RefreshInfo,
}

impl AppState {
    pub fn new(settings: &Dashboard) -> Self {
        Self {
            sensors: SensorService::new(settings.history_len),
            actuator: ActuatorService::new(settings.command_schema),
            transport: None,
            last_error: None,
            info: RefreshInfo::default(),
        }
    }
}

pub enum ControlRequest {
    Refresh {
        reply: oneshot::Sender<DashboardSnapshot>,
    },
    SetActuator {
        on: bool,
        r: i64,
        g: i64,
        b: i64,
        reply: oneshot::Sender<Result<ActuatorResponse, TransportError>>,
    },
    ToggleSync {
        reply: oneshot::Sender<Result<SyncResponse, TransportError>>,
    },
    Connect {
        reply: oneshot::Sender<Result<TransportStatus, TransportError>>,
    },
    Disconnect {
        reply: oneshot::Sender<TransportStatus>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable entry point into the dashboard task.
#[derive(Clone)]
pub struct DashboardHandle {
    sender: mpsc::Sender<ControlRequest>,
    snapshots: broadcast::Sender<DashboardSnapshot>,
}

impl DashboardHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ControlRequest,
    ) -> Result<T, DashboardError> {
        let (reply, receiver) = oneshot::channel();

        self.sender
            .send(build(reply))
            .await
            .map_err(|_| DashboardError::Stopped)?;

        receiver.await.map_err(|_| DashboardError::Stopped)
    }

    /// Runs a redraw cycle and returns its snapshot.
    pub async fn refresh(&self) -> Result<DashboardSnapshot, DashboardError> {
        self.request(|reply| ControlRequest::Refresh { reply }).await
    }

    pub async fn set_actuator(&self, on: bool, r: i64, g: i64, b: i64) -> Result<ActuatorResponse, DashboardError> {
        Ok(self
            .request(|reply| ControlRequest::SetActuator { on, r, g, b, reply })
            .await??)
    }

    pub async fn toggle_sync(&self) -> Result<SyncResponse, DashboardError> {
        Ok(self.request(|reply| ControlRequest::ToggleSync { reply }).await??)
    }

    pub async fn connect(&self) -> Result<TransportStatus, DashboardError> {
        Ok(self.request(|reply| ControlRequest::Connect { reply }).await??)
    }

    pub async fn disconnect(&self) -> Result<TransportStatus, DashboardError> {
        self.request(|reply| ControlRequest::Disconnect { reply }).await
    }

    pub async fn shutdown(&self) -> Result<(), DashboardError> {
        self.request(|reply| ControlRequest::Shutdown { reply }).await
    }

    /// Snapshots broadcast after every redraw cycle.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardSnapshot> {
        self.snapshots.subscribe()
    }
}

/// The foreground context: sole mutator of [`AppState`].
///
/// Redraws on every timer tick and after every control request. The transport
/// listener only feeds the inbound queue, which is drained at the start of each
/// redraw.
pub struct DashboardService {
    state: AppState,
    view: ViewService,
    connector: Arc<dyn Connector>,
    inbound_sender: InboundSender,
    inbound: UnboundedReceiver<InboundMessage>,
    requests: mpsc::Receiver<ControlRequest>,
    snapshots: broadcast::Sender<DashboardSnapshot>,
    interval: Duration,
}

impl DashboardService {
    pub fn new(settings: &Dashboard, connector: Arc<dyn Connector>) -> (Self, DashboardHandle) {
        let (sender, requests) = mpsc::channel(REQUEST_QUEUE);
        let (snapshots, _) = broadcast::channel(SNAPSHOT_QUEUE);
        let (inbound_sender, inbound) = mpsc::unbounded_channel();

        let service = Self {
            state: AppState::new(settings),
            view: ViewService::new(settings.recent_len),
            connector,
            inbound_sender,
            inbound,
            requests,
            snapshots: snapshots.clone(),
            interval: Duration::from_millis(settings.refresh_interval_ms.max(1)),
        };

        (service, DashboardHandle { sender, snapshots })
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Dashboard task started, redraw every {:?}", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.redraw();
                }
                request = self.requests.recv() => {
                    match request {
                        Some(ControlRequest::Shutdown { reply }) => {
                            self.release().await;
                            let _ = reply.send(());
                            break;
                        }
                        Some(request) => {
                            self.handle(request).await;
                        }
                        None => {
                            self.release().await;
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("Dashboard task stopped");
    }

    async fn handle(&mut self, request: ControlRequest) {
        match request {
            ControlRequest::Refresh { reply } => {
                let _ = reply.send(self.redraw());
            }
            ControlRequest::SetActuator { on, r, g, b, reply } => {
                let actuator = self.state.actuator.apply_user_input(on, r, g, b);
                let result = self
                    .state
                    .actuator
                    .maybe_publish(self.state.transport.as_deref())
                    .await
                    .map(|published| ActuatorResponse { published, actuator });

                self.note_publish(result.as_ref().map(|response| response.published));
                self.redraw();
                let _ = reply.send(result);
            }
            ControlRequest::ToggleSync { reply } => {
                let result = self
                    .state
                    .actuator
                    .toggle_sync(self.state.transport.as_deref())
                    .await;
                let actuator = self.state.actuator.desired();
                let result = result.map(|sync| SyncResponse { sync, actuator });

                self.note_publish(result.as_ref().map(|_| true));
                self.redraw();
                let _ = reply.send(result);
            }
            ControlRequest::Connect { reply } => {
                let result = self.connect().await.map(|_| self.transport_status());
                self.redraw();
                let _ = reply.send(result);
            }
            ControlRequest::Disconnect { reply } => {
                self.release().await;
                self.redraw();
                let _ = reply.send(self.transport_status());
            }
            ControlRequest::Shutdown { reply } => {
                self.release().await;
                let _ = reply.send(());
            }
        }
    }

    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.state.transport.as_ref().is_some_and(|transport| transport.is_alive()) {
            return Err(TransportError::AlreadyConnected);
        }

        // A stopped listener leaves a dead session behind.
        self.release().await;

        match self.connector.connect(self.inbound_sender.clone()).await {
            Ok(transport) => {
                self.state.transport = Some(transport);
                self.state.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to connect: {}", e);
                self.state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Best-effort release of the current session.
    async fn release(&mut self) {
        if let Some(transport) = self.state.transport.take() {
            match transport.disconnect().await {
                Ok(()) => tracing::info!("Transport released"),
                Err(e) => tracing::warn!("Failed to release transport: {}", e),
            }
        }
    }

    /// A delivered command clears the previous failure, a skipped one keeps it.
    fn note_publish(&mut self, outcome: Result<bool, &TransportError>) {
        match outcome {
            Ok(true) => self.state.last_error = None,
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Failed to publish command: {}", e);
                self.state.last_error = Some(e.to_string());
            }
        }
    }

    fn transport_status(&self) -> TransportStatus {
        let mut status = self.connector.describe();
        status.connected = self.state.transport.as_ref().is_some_and(|transport| transport.is_alive());
        status.last_error = self.state.last_error.clone();
        status
    }

    fn redraw(&mut self) -> DashboardSnapshot {
        if self.state.transport.as_ref().is_some_and(|transport| !transport.is_alive()) {
            tracing::warn!("Listener stopped, marking transport disconnected");
            self.state.last_error = Some(String::from("Connection lost"));
            self.state.transport = None;
        }

        let updated = self.state.sensors.drain_channel(&mut self.inbound);

        self.state.info.refresh += 1;
        if updated {
            self.state.info.last_update = Some(OffsetDateTime::now_utc());
        }

        let snapshot = self.view.assemble(
            &self.state.sensors,
            &self.state.actuator,
            self.transport_status(),
            self.state.info,
        );

        // No subscriber is not an error.
        let _ = self.snapshots.send(snapshot.clone());

        snapshot
    }
}
