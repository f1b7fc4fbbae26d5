mod actuator_handle;
mod dashboard_handle;
mod snapshot_handle;
mod sse_handle;
mod transport_handle;

pub use actuator_handle::*;
pub use dashboard_handle::*;
pub use snapshot_handle::*;
pub use sse_handle::*;
pub use transport_handle::*;

use crate::services::DashboardHandle;

#[derive(Clone)]
pub struct DashboardState {
    pub dashboard: DashboardHandle,
}
