mod command;
mod inbound;
mod snapshot;

pub use command::*;
pub use inbound::*;
pub use snapshot::*;

use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Air temperature in Celsius
    Temperature,
    /// Relative humidity percentage
    Humidity,
    /// Light level percentage
    Luminosity,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Humidity, Channel::Luminosity];

    /// Key of the channel inside inbound payloads.
    pub fn key(&self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Luminosity => "luminosity",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Desired configuration of the RGB LED on the sensor node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActuatorState {
    /// LED switched on
    pub on: bool,
    /// Red channel (0-255)
    pub red: u8,
    /// Green channel (0-255)
    pub green: u8,
    /// Blue channel (0-255)
    pub blue: u8,
}

impl ActuatorState {
    /// Builds a state from raw user input, clamping each colour to 0-255.
    pub fn clamped(on: bool, red: i64, green: i64, blue: i64) -> Self {
        Self {
            on,
            red: clamp_channel(red),
            green: clamp_channel(green),
            blue: clamp_channel(blue),
        }
    }
}

fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, u8::MAX as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_actuator_state() {
        let state = ActuatorState::clamped(true, -20, 128, 999);

        assert!(state.on);
        assert_eq!(state.red, 0);
        assert_eq!(state.green, 128);
        assert_eq!(state.blue, 255);
    }

    #[test]
    fn test_channel_keys() {
        let keys: Vec<_> = Channel::ALL.iter().map(Channel::key).collect();

        assert_eq!(keys, vec!["temperature", "humidity", "luminosity"]);
        assert_eq!(serde_json::to_string(&Channel::Luminosity).unwrap(), "\"luminosity\"");
    }
}
