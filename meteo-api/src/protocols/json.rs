use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Error, Result};

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|e| Error::decode(e, payload))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::protocols::PREVIEW_LEN;

    #[test]
    fn test_encode_is_compact() {
        assert_eq!(encode(&json!({"led": 1})).unwrap(), br#"{"led":1}"#.to_vec());
    }

    #[test]
    fn test_decode_error_quotes_payload() {
        let error = decode::<Value>(b"{\"led\":").unwrap_err();

        assert!(matches!(&error, Error::Decode { preview, .. } if preview == "{\"led\":"));
        assert!(error.to_string().starts_with(r#"cannot decode "{\"led\":": "#));
    }

    #[test]
    fn test_decode_error_truncates_long_payloads() {
        let payload = "x".repeat(PREVIEW_LEN * 2);

        let Error::Decode { preview, .. } = decode::<Value>(payload.as_bytes()).unwrap_err() else {
            panic!("expected a decode error");
        };

        assert_eq!(preview, format!("{}...", "x".repeat(PREVIEW_LEN)));
    }

    #[test]
    fn test_decode_error_on_invalid_utf8() {
        let Error::Decode { preview, .. } = decode::<Value>(&[0xff, 0xfe]).unwrap_err() else {
            panic!("expected a decode error");
        };

        assert_eq!(preview, "\u{fffd}\u{fffd}");
    }
}
