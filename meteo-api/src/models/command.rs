use serde::{Deserialize, Serialize};

use crate::protocols::{Result, json};

use super::ActuatorState;

/// Key schema used for diffed actuator updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandSchema {
    /// `{"led", "r", "g", "b"}`
    #[default]
    Compact,
    /// `{"Synchro", "LED", "R", "G", "B"}`
    Synchro,
}

/// Diffed LED update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedCommand {
    #[serde(with = "flag")]
    pub led: bool,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Forced synchronisation broadcast, also usable as a diffed update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCommand {
    #[serde(rename = "Synchro", with = "flag")]
    pub synchro: bool,
    #[serde(rename = "LED", with = "flag")]
    pub led: bool,
    #[serde(rename = "R")]
    pub r: u8,
    #[serde(rename = "G")]
    pub g: u8,
    #[serde(rename = "B")]
    pub b: u8,
}

/// Any command the dashboard publishes on the command topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundCommand {
    Sync(SyncCommand),
    Led(LedCommand),
}

impl OutboundCommand {
    pub fn diffed(state: &ActuatorState, schema: CommandSchema, synchro: bool) -> Self {
        match schema {
            CommandSchema::Compact => Self::Led(LedCommand {
                led: state.on,
                r: state.red,
                g: state.green,
                b: state.blue,
            }),
            CommandSchema::Synchro => Self::sync(state, synchro),
        }
    }

    pub fn sync(state: &ActuatorState, synchro: bool) -> Self {
        Self::Sync(SyncCommand {
            synchro,
            led: state.on,
            r: state.red,
            g: state.green,
            b: state.blue,
        })
    }

    /// Actuator configuration carried by the command.
    pub fn actuator(&self) -> ActuatorState {
        match *self {
            Self::Sync(SyncCommand { led, r, g, b, .. }) | Self::Led(LedCommand { led, r, g, b }) => {
                ActuatorState { on: led, red: r, green: g, blue: b }
            }
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        json::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        json::decode(bytes)
    }
}

/// Booleans travel as `0`/`1` on the wire; `true`/`false` is accepted when reading.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Flag::deserialize(deserializer)? {
            Flag::Bool(value) => value,
            Flag::Int(value) => value != 0,
        })
    }
}
