use meteo_api::{Channel, InboundMessage, LatestValues, ReportedActuator};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;

use crate::errors::CoerceError;
use crate::services::history::BoundedHistory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub channel: Channel,
    pub value: f64,
    /// Arrival sequence number, strictly increasing across channels
    pub received_at: u64,
}

/// Most recent valid value of every channel, plus the LED state the node reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestState {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub luminosity: Option<f64>,
    pub reported: ReportedActuator,
}

impl LatestState {
    pub fn get(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Luminosity => self.luminosity,
        }
    }

    fn set(&mut self, channel: Channel, value: f64) {
        match channel {
            Channel::Temperature => self.temperature = Some(value),
            Channel::Humidity => self.humidity = Some(value),
            Channel::Luminosity => self.luminosity = Some(value),
        }
    }

    pub fn values(&self) -> LatestValues {
        LatestValues {
            temperature: self.temperature,
            humidity: self.humidity,
            luminosity: self.luminosity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SensorHistories {
    temperature: BoundedHistory<SensorReading>,
    humidity: BoundedHistory<SensorReading>,
    luminosity: BoundedHistory<SensorReading>,
}

impl SensorHistories {
    pub fn new(capacity: usize) -> Self {
        Self {
            temperature: BoundedHistory::new(capacity),
            humidity: BoundedHistory::new(capacity),
            luminosity: BoundedHistory::new(capacity),
        }
    }

    pub fn get(&self, channel: Channel) -> &BoundedHistory<SensorReading> {
        match channel {
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
            Channel::Luminosity => &self.luminosity,
        }
    }

    fn get_mut(&mut self, channel: Channel) -> &mut BoundedHistory<SensorReading> {
        match channel {
            Channel::Temperature => &mut self.temperature,
            Channel::Humidity => &mut self.humidity,
            Channel::Luminosity => &mut self.luminosity,
        }
    }
}

/// Ingestion pipeline: turns queued inbound messages into latest values and history.
///
/// Coercion is per field. A malformed field is logged and skipped while the other
/// fields of the same message still apply.
#[derive(Debug, Clone)]
pub struct SensorService {
    latest: LatestState,
    histories: SensorHistories,
    sequence: u64,
}

impl SensorService {
    pub fn new(history_len: usize) -> Self {
        Self {
            latest: LatestState::default(),
            histories: SensorHistories::new(history_len),
            sequence: 0,
        }
    }

    pub fn latest(&self) -> &LatestState {
        &self.latest
    }

    pub fn histories(&self) -> &SensorHistories {
        &self.histories
    }

    /// Applies every message in order. Returns whether any field was applied.
    pub fn drain<I>(&mut self, messages: I) -> bool
    where
        I: IntoIterator<Item = InboundMessage>,
    {
        messages
            .into_iter()
            .fold(false, |updated, message| self.apply(&message) | updated)
    }

    /// Drains what is queued right now without waiting for more. Messages that
    /// arrive while draining are left for the next call.
    pub fn drain_channel(&mut self, receiver: &mut UnboundedReceiver<InboundMessage>) -> bool {
        let pending = receiver.len();
        let (count, updated) = self.drain_pending(receiver, pending);

        if count > 0 {
            tracing::debug!("Drained {} inbound messages (updated: {})", count, updated);
        }

        updated
    }

    /// Applies at most `pending` queued messages. Returns how many were taken and
    /// whether any field was applied.
    fn drain_pending(&mut self, receiver: &mut UnboundedReceiver<InboundMessage>, pending: usize) -> (usize, bool) {
        let mut updated = false;
        let mut count = 0usize;

        while count < pending {
            match receiver.try_recv() {
                Ok(message) => {
                    updated |= self.apply(&message);
                    count += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        (count, updated)
    }

    pub fn apply(&mut self, message: &InboundMessage) -> bool {
        let mut updated = false;

        for channel in Channel::ALL {
            if let Some(raw) = message.reading(channel) {
                match coerce_reading(raw) {
                    Ok(value) => {
                        self.record(channel, value);
                        updated = true;
                    }
                    Err(e) => tracing::warn!("Skipping {} field: {}", channel, e),
                }
            }
        }

        if let Some(raw) = &message.led {
            match coerce_flag(raw) {
                Ok(led) => {
                    self.latest.reported.led = Some(led);
                    updated = true;
                }
                Err(e) => tracing::warn!("Skipping led field: {}", e),
            }
        }

        let reported = &mut self.latest.reported;
        for (key, raw, slot) in [
            ("r", &message.r, &mut reported.r),
            ("g", &message.g, &mut reported.g),
            ("b", &message.b, &mut reported.b),
        ] {
            if let Some(raw) = raw {
                match coerce_integer(raw) {
                    Ok(value) => {
                        *slot = Some(value);
                        updated = true;
                    }
                    Err(e) => tracing::warn!("Skipping {} field: {}", key, e),
                }
            }
        }

        updated
    }

    fn record(&mut self, channel: Channel, value: f64) {
        self.sequence += 1;
        self.latest.set(channel, value);
        self.histories.get_mut(channel).push(SensorReading {
            channel,
            value,
            received_at: self.sequence,
        });
    }
}

/// Numbers, numeric strings and booleans; NaN and infinities are rejected.
pub fn coerce_reading(raw: &Value) -> Result<f64, CoerceError> {
    let value = match raw {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| CoerceError::NotANumber(number.to_string()))?,
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| CoerceError::NotANumber(text.clone()))?,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        other => return Err(CoerceError::NotANumber(other.to_string())),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoerceError::NonFinite(value))
    }
}

/// Digit strings are read as integers (so `"12"` is on), other values by truthiness.
pub fn coerce_flag(raw: &Value) -> Result<bool, CoerceError> {
    match raw {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => Ok(number.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(text.bytes().any(|b| b != b'0'))
        }
        Value::String(text) => Ok(!text.is_empty()),
        other => Err(CoerceError::NotAFlag(other.to_string())),
    }
}

/// Integers, floats truncated toward zero, integer strings and booleans. No clamping.
pub fn coerce_integer(raw: &Value) -> Result<i64, CoerceError> {
    match raw {
        Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                Ok(value)
            } else {
                number
                    .as_f64()
                    .filter(|value| value.is_finite() && value.abs() < i64::MAX as f64)
                    .map(|value| value.trunc() as i64)
                    .ok_or_else(|| CoerceError::NotAnInteger(number.to_string()))
            }
        }
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| CoerceError::NotAnInteger(text.clone())),
        Value::Bool(flag) => Ok(i64::from(*flag)),
        other => Err(CoerceError::NotAnInteger(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;

    fn message(value: Value) -> InboundMessage {
        serde_json::from_value(value).unwrap()
    }

    fn values(service: &SensorService, channel: Channel) -> Vec<f64> {
        service.histories().get(channel).iter().map(|r| r.value).collect()
    }

    #[test]
    fn test_malformed_field_does_not_reject_message() {
        let mut service = SensorService::new(50);

        let updated = service.drain(vec![
            message(json!({"temperature": "abc", "humidity": 55, "luminosity": "30.5"})),
            message(json!({"humidity": 60})),
            message(json!({"luminosity": 70, "temperature": 18})),
        ]);

        assert!(updated);
        assert_eq!(service.latest().temperature, Some(18.0));
        assert_eq!(service.latest().humidity, Some(60.0));
        assert_eq!(service.latest().luminosity, Some(70.0));
        assert_eq!(values(&service, Channel::Temperature), vec![18.0]);
        assert_eq!(values(&service, Channel::Humidity), vec![55.0, 60.0]);
        assert_eq!(values(&service, Channel::Luminosity), vec![30.5, 70.0]);
    }

    #[test]
    fn test_same_message_twice_appends_twice() {
        let mut service = SensorService::new(50);
        let payload = message(json!({"temperature": 21.0}));

        service.apply(&payload);
        let first = service.latest().clone();
        service.apply(&payload);

        assert_eq!(service.latest(), &first);
        assert_eq!(values(&service, Channel::Temperature), vec![21.0, 21.0]);
    }

    #[test]
    fn test_nothing_applied() {
        let mut service = SensorService::new(50);

        assert!(!service.drain(Vec::new()));
        assert!(!service.drain(vec![message(json!({"temperature": [1]}))]));
        assert!(!service.drain(vec![InboundMessage::default()]));
        assert_eq!(service.latest(), &LatestState::default());
    }

    #[test]
    fn test_sequence_is_shared_across_channels() {
        let mut service = SensorService::new(50);

        service.apply(&message(json!({"temperature": 1, "humidity": 2})));
        service.apply(&message(json!({"temperature": 3})));

        let temperature: Vec<_> = service.histories().get(Channel::Temperature).iter().map(|r| r.received_at).collect();
        let humidity: Vec<_> = service.histories().get(Channel::Humidity).iter().map(|r| r.received_at).collect();

        assert_eq!(temperature, vec![1, 3]);
        assert_eq!(humidity, vec![2]);
    }

    #[test]
    fn test_history_bounded_by_capacity() {
        let mut service = SensorService::new(50);

        service.drain((0..60).map(|i| message(json!({"luminosity": i}))));

        let history = values(&service, Channel::Luminosity);
        assert_eq!(history.len(), 50);
        assert_eq!(history.first(), Some(&10.0));
        assert_eq!(history.last(), Some(&59.0));
    }

    #[test]
    fn test_reported_actuator_fields() {
        let mut service = SensorService::new(50);

        let updated = service.apply(&message(json!({"led": "1", "r": 300, "g": "12", "b": "blue"})));

        assert!(updated);
        assert_eq!(
            service.latest().reported,
            ReportedActuator { led: Some(true), r: Some(300), g: Some(12), b: None }
        );
    }

    #[test]
    fn test_coerce_reading() {
        assert_eq!(coerce_reading(&json!(21.5)), Ok(21.5));
        assert_eq!(coerce_reading(&json!(" 42 ")), Ok(42.0));
        assert_eq!(coerce_reading(&json!(true)), Ok(1.0));
        assert!(coerce_reading(&json!("abc")).is_err());
        assert!(coerce_reading(&json!("NaN")).is_err());
        assert!(coerce_reading(&json!("inf")).is_err());
        assert!(coerce_reading(&json!({"value": 1})).is_err());
    }

    #[test]
    fn test_coerce_flag() {
        assert_eq!(coerce_flag(&json!("0")), Ok(false));
        assert_eq!(coerce_flag(&json!("1")), Ok(true));
        assert_eq!(coerce_flag(&json!("12")), Ok(true));
        assert_eq!(coerce_flag(&json!("000")), Ok(false));
        assert_eq!(coerce_flag(&json!(true)), Ok(true));
        assert_eq!(coerce_flag(&json!(0)), Ok(false));
        assert_eq!(coerce_flag(&json!(0.5)), Ok(true));
        assert_eq!(coerce_flag(&json!("abc")), Ok(true));
        assert_eq!(coerce_flag(&json!("")), Ok(false));
        assert!(coerce_flag(&json!([])).is_err());
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer(&json!(12)), Ok(12));
        assert_eq!(coerce_integer(&json!(-3)), Ok(-3));
        assert_eq!(coerce_integer(&json!(12.9)), Ok(12));
        assert_eq!(coerce_integer(&json!("255")), Ok(255));
        assert_eq!(coerce_integer(&json!(false)), Ok(0));
        assert!(coerce_integer(&json!("12.5")).is_err());
        assert!(coerce_integer(&json!(1e300)).is_err());
    }

    #[test]
    fn test_drain_channel_is_non_blocking() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut service = SensorService::new(50);

        assert!(!service.drain_channel(&mut receiver));

        sender.send(message(json!({"temperature": 20}))).unwrap();
        sender.send(message(json!({"humidity": 80}))).unwrap();

        assert!(service.drain_channel(&mut receiver));
        assert!(!service.drain_channel(&mut receiver));
        assert_eq!(service.latest().humidity, Some(80.0));

        drop(sender);
        assert!(!service.drain_channel(&mut receiver));
    }

    #[test]
    fn test_drain_stops_at_messages_queued_on_entry() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut service = SensorService::new(50);

        for i in 0..10 {
            sender.send(message(json!({"luminosity": i}))).unwrap();
        }

        let stop = Arc::new(AtomicBool::new(false));
        let producer = thread::spawn({
            let stop = Arc::clone(&stop);
            move || {
                while !stop.load(Ordering::Relaxed) {
                    if sender.send(message(json!({"temperature": 1}))).is_err() {
                        break;
                    }
                }
            }
        });

        let pending = receiver.len();
        let (drained, updated) = service.drain_pending(&mut receiver, pending);
        // Returns while the producer is still sending.
        service.drain_channel(&mut receiver);

        stop.store(true, Ordering::Relaxed);
        producer.join().unwrap();

        assert!(updated);
        assert_eq!(drained, pending);
        assert_eq!(values(&service, Channel::Luminosity), (0..10).map(f64::from).collect::<Vec<_>>());
    }
}
