use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_OUTPUT: &str = "live_chart.png";
const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 400;
/// Largest accepted image side; the bitmap buffer is width x height x 3 bytes
const MAX_DIMENSION: u32 = 8192;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be an integer between 1 and 8192, got '{value}'")]
    InvalidDimension { key: &'static str, value: String },
    #[error("LIVE_CHART_BASE_URL must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Dashboard host serving `/api/live-data`
    pub base_url: String,
    /// PNG file rewritten on every redraw
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset or blank keys use defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("LIVE_CHART_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }

        let output = get("LIVE_CHART_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let width = parse_dimension("LIVE_CHART_WIDTH", get("LIVE_CHART_WIDTH"), DEFAULT_WIDTH)?;
        let height =
            parse_dimension("LIVE_CHART_HEIGHT", get("LIVE_CHART_HEIGHT"), DEFAULT_HEIGHT)?;

        Ok(Self {
            base_url,
            output,
            width,
            height,
        })
    }
}

fn parse_dimension(
    key: &'static str,
    value: Option<String>,
    default: u32,
) -> Result<u32, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(n) if (1..=MAX_DIMENSION).contains(&n) => Ok(n),
            _ => Err(ConfigError::InvalidDimension { key, value: raw }),
        },
    }
}
