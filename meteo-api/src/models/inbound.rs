use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocols::{Result, json};

use super::Channel;

/// Partial update published by the sensor node.
///
/// Every field is optional and kept as raw JSON so that a malformed field can be
/// rejected on its own without discarding the rest of the message. A JSON `null`
/// is treated like an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luminosity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<Value>,
}

impl InboundMessage {
    /// Decodes a raw broker payload. Anything that is not a JSON object fails.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        json::decode(bytes)
    }

    pub fn reading(&self, channel: Channel) -> Option<&Value> {
        match channel {
            Channel::Temperature => self.temperature.as_ref(),
            Channel::Humidity => self.humidity.as_ref(),
            Channel::Luminosity => self.luminosity.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_partial_message() {
        let message = InboundMessage::decode(br#"{"temperature": 21.5, "led": "1", "extra": true}"#).unwrap();

        assert_eq!(message.reading(Channel::Temperature), Some(&json!(21.5)));
        assert_eq!(message.led, Some(json!("1")));
        assert_eq!(message.humidity, None);
        assert_eq!(message.r, None);
    }

    #[test]
    fn test_decode_null_as_absent() {
        let message = InboundMessage::decode(br#"{"humidity": null}"#).unwrap();

        assert_eq!(message, InboundMessage::default());
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(InboundMessage::decode(b"[1, 2, 3]").is_err());
        assert!(InboundMessage::decode(b"42").is_err());
        assert!(InboundMessage::decode(b"not json").is_err());
        assert!(InboundMessage::decode(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_malformed_field_survives_decoding() {
        let message = InboundMessage::decode(br#"{"temperature": "abc", "humidity": 40}"#).unwrap();

        assert_eq!(message.temperature, Some(json!("abc")));
        assert_eq!(message.humidity, Some(json!(40)));
    }
}
