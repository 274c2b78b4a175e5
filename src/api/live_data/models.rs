use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{LiveDataPoint, LiveSeries};

/// Envelope used by the dashboard's JSON API (`{"success": ..., "data": ...}`)
#[derive(Debug, Clone, Deserialize)]
pub struct LiveDataEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<LiveDataPoint>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Every way a fetch-and-decode cycle can fail
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, connect or timeout failure
    #[error("Request Error: {0}")]
    Request(#[from] reqwest::Error),
    /// Any non-2xx status
    #[error("HTTP Error ({status}): {body}")]
    Http { status: u16, body: String },
    /// Body is not JSON or not a series of `{timestamp, value}` records
    #[error("Deserialization Error: {0}")]
    Decode(String),
    /// The envelope came back with `success: false`
    #[error("Upstream Error: {0}")]
    Upstream(String),
}

/// Decode a response body into a series.
///
/// Accepts a bare array of points or the `success`/`data` envelope. A single
/// malformed record rejects the whole body.
pub fn decode_live_data(body: &str) -> Result<LiveSeries, ApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::Decode(format!("Response is not JSON: {}", e)))?;

    let points = match value {
        Value::Array(_) => serde_json::from_value::<Vec<LiveDataPoint>>(value)
            .map_err(|e| ApiError::Decode(format!("Invalid live data record: {}", e)))?,
        Value::Object(_) => {
            let envelope: LiveDataEnvelope = serde_json::from_value(value)
                .map_err(|e| ApiError::Decode(format!("Invalid response envelope: {}", e)))?;

            if !envelope.success {
                return Err(ApiError::Upstream(
                    envelope.error.unwrap_or_else(|| "unknown error".to_string()),
                ));
            }

            envelope
                .data
                .ok_or_else(|| ApiError::Decode("Envelope has no data".to_string()))?
        }
        other => {
            return Err(ApiError::Decode(format!(
                "Expected an array of records, got {}",
                other
            )))
        }
    };

    Ok(LiveSeries::from(points))
}
