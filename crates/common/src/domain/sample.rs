use crate::domain::result::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One decoded telemetry reading.
///
/// Immutable after decode; the window buffer holds clones for display and the
/// engine consumes it once per evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    pub temp: f64,
    pub humidity: f64,
    pub flow: f64,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawReading {
    temp: f64,
    humidity: f64,
    flow: f64,
}

impl TelemetrySample {
    /// Decode one inbound message payload.
    ///
    /// All three readings must be present and numeric; anything else rejects
    /// the message whole, never partially applied.
    pub fn decode(payload: &[u8]) -> DomainResult<Self> {
        let raw: RawReading = serde_json::from_slice(payload)
            .map_err(|e| DomainError::MalformedPayload(e.to_string()))?;

        Ok(Self {
            temp: raw.temp,
            humidity: raw.humidity,
            flow: raw.flow,
            received_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_payload() {
        let sample = TelemetrySample::decode(br#"{"temp":24.5,"humidity":55.0,"flow":12.3}"#)
            .expect("payload should decode");

        assert_eq!(sample.temp, 24.5);
        assert_eq!(sample.humidity, 55.0);
        assert_eq!(sample.flow, 12.3);
    }

    #[test]
    fn test_decode_integer_readings() {
        let sample = TelemetrySample::decode(br#"{"temp":24,"humidity":55,"flow":12}"#)
            .expect("integer readings are numeric");

        assert_eq!(sample.temp, 24.0);
    }

    #[test]
    fn test_decode_missing_field_rejected() {
        let result = TelemetrySample::decode(br#"{"temp":24.5,"humidity":55.0}"#);
        assert!(matches!(result, Err(DomainError::MalformedPayload(_))));
    }

    #[test]
    fn test_decode_non_numeric_reading_rejected() {
        let result = TelemetrySample::decode(br#"{"temp":"hot","humidity":55.0,"flow":12.3}"#);
        assert!(matches!(result, Err(DomainError::MalformedPayload(_))));
    }

    #[test]
    fn test_decode_non_json_rejected() {
        let result = TelemetrySample::decode(b"ACT1:ON");
        assert!(matches!(result, Err(DomainError::MalformedPayload(_))));
    }

    #[test]
    fn test_decode_empty_payload_rejected() {
        let result = TelemetrySample::decode(b"");
        assert!(matches!(result, Err(DomainError::MalformedPayload(_))));
    }
}
