use meteo_api::{AlignedSeries, Channel, DashboardSnapshot, DerivedLabels, RecentValues, TransportStatus};
use time::OffsetDateTime;

use crate::services::actuator_service::ActuatorService;
use crate::services::classifier::{period_of_day, ressenti, weather_condition};
use crate::services::history::to_aligned_series;
use crate::services::sensor_service::SensorService;

/// Redraw bookkeeping carried into every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshInfo {
    pub refresh: u64,
    pub last_update: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct ViewService {
    recent_len: usize,
}

impl ViewService {
    pub fn new(recent_len: usize) -> Self {
        Self { recent_len }
    }

    /// Builds the snapshot from current state. Pure: nothing is mutated.
    pub fn assemble(
        &self,
        sensors: &SensorService,
        actuator: &ActuatorService,
        transport: TransportStatus,
        info: RefreshInfo,
    ) -> DashboardSnapshot {
        let latest = sensors.latest();
        let desired = actuator.desired();

        let labels = DerivedLabels {
            ressenti: ressenti(latest.temperature).to_string(),
            periode: period_of_day(latest.luminosity).to_string(),
            temps: weather_condition(latest.temperature, latest.humidity, latest.luminosity).to_string(),
            led: led_label(desired.on).to_string(),
            mode: mode_label(actuator.sync()).to_string(),
        };

        let histories = sensors.histories();
        let (mut series, length) = to_aligned_series(
            &Channel::ALL.map(|channel| histories.get(channel)),
            None,
            |reading| Some(reading.value),
        );
        let luminosity = series.pop().unwrap_or_default();
        let humidity = series.pop().unwrap_or_default();
        let temperature = series.pop().unwrap_or_default();

        let recent = |channel: Channel| -> Vec<f64> {
            histories
                .get(channel)
                .recent(self.recent_len)
                .map(|reading| reading.value)
                .collect()
        };

        DashboardSnapshot {
            refresh: info.refresh,
            last_update: info.last_update,
            latest: latest.values(),
            reported: latest.reported.clone(),
            actuator: desired,
            sync: actuator.sync(),
            labels,
            series: AlignedSeries {
                length,
                temperature,
                humidity,
                luminosity,
            },
            recent: RecentValues {
                temperature: recent(Channel::Temperature),
                humidity: recent(Channel::Humidity),
                luminosity: recent(Channel::Luminosity),
            },
            transport,
        }
    }
}

fn led_label(on: bool) -> &'static str {
    if on { "LED ON" } else { "LED OFF" }
}

fn mode_label(sync: bool) -> &'static str {
    if sync { "Mode synchronisé" } else { "Mode local" }
}
