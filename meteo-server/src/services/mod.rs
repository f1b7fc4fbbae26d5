pub mod actuator_service;
pub mod classifier;
pub mod dashboard_service;
pub mod history;
pub mod sensor_service;
pub mod transport;
pub mod view_service;

pub use actuator_service::ActuatorService;
pub use dashboard_service::{AppState, ControlRequest, DashboardHandle, DashboardService};
pub use sensor_service::SensorService;
pub use transport::{Connector, InboundSender, MqttConnector, MqttTransport, Transport};
pub use view_service::ViewService;
