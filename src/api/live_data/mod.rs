pub mod client;
pub mod models;

use async_trait::async_trait;

use crate::models::LiveSeries;

pub use client::LiveDataClient;
pub use models::ApiError;

/// Where a refresh cycle gets its series from
#[async_trait]
pub trait LiveDataSource: Send + Sync {
    async fn fetch(&self) -> Result<LiveSeries, ApiError>;
}
