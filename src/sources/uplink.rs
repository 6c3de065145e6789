//! LoRaWAN uplink payload normalization

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::CanonicalPosition;

/// Why an uplink message did not produce a position
#[derive(Debug, Error)]
pub enum Rejected {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("no decoded payload")]
    MissingDecodedPayload,
}

/// Decoded application payload
///
/// Payload decoders do not agree on names, so every known alias is decoded
/// and resolved in [`DecodedPayload::position`].
#[derive(Debug, Default, Deserialize)]
struct DecodedPayload {
    #[serde(default, deserialize_with = "lenient_number")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    long: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    battery: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    speed: Option<f64>,
}

impl DecodedPayload {
    fn position(&self) -> CanonicalPosition {
        CanonicalPosition {
            latitude: self.latitude.or(self.lat).unwrap_or(0.0),
            longitude: self
                .longitude
                .or(self.lon)
                .or(self.long)
                .unwrap_or(0.0),
            battery: self.battery.unwrap_or(0.0),
            speed: self.speed.unwrap_or(0.0),
        }
    }
}

/// Numbers and numeric strings, anything else counts as missing
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Convert a raw uplink message into a canonical position
///
/// Only `uplink_message.decoded_payload` is read. Coordinates are not range
/// checked.
pub fn normalize(raw: &[u8]) -> Result<CanonicalPosition, Rejected> {
    let message: Value = serde_json::from_slice(raw)?;

    let decoded = message
        .get("uplink_message")
        .and_then(|uplink| uplink.get("decoded_payload"));

    match decoded {
        None | Some(Value::Null) => Err(Rejected::MissingDecodedPayload),
        Some(payload @ Value::Object(_)) => Ok(DecodedPayload::deserialize(payload)
            .unwrap_or_default()
            .position()),
        // present but not an object, none of the fields can be found
        Some(_) => Ok(DecodedPayload::default().position()),
    }
}
