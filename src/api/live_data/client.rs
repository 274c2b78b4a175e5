use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use super::models::{decode_live_data, ApiError};
use super::LiveDataSource;
use crate::models::LiveSeries;

/// HTTP client for the dashboard's live data endpoint
pub struct LiveDataClient {
    http_client: HttpClient,
    base_url: String,
}

impl LiveDataClient {
    /// Path of the live data endpoint, relative to the dashboard host
    pub const LIVE_DATA_PATH: &'static str = "/api/live-data";

    /// Create a client for the dashboard at `base_url`.
    ///
    /// Every request gives up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, Self::LIVE_DATA_PATH)
    }

    /// GET /api/live-data
    ///
    /// # Returns
    /// * `Ok(LiveSeries)` - Labels and values in response order
    /// * `Err(ApiError)` - Transport failure, non-2xx status or malformed body
    pub async fn get_live_data(&self) -> Result<LiveSeries, ApiError> {
        let url = self.url();
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Live data endpoint returned {}", status);
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let series = decode_live_data(&body)?;
        debug!("Decoded {} live data points", series.len());

        Ok(series)
    }
}

#[async_trait]
impl LiveDataSource for LiveDataClient {
    async fn fetch(&self) -> Result<LiveSeries, ApiError> {
        self.get_live_data().await
    }
}
