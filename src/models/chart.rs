//! Chart state and live data models

use serde::Deserialize;

/// A single point of the live series as returned by `/api/live-data`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveDataPoint {
    pub timestamp: String,
    pub value: f64,
}

/// Labels and values projected from one decoded response, position for position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl LiveSeries {
    #[cfg(test)]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[cfg(test)]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<f64>) {
        (self.labels, self.values)
    }
}

impl From<Vec<LiveDataPoint>> for LiveSeries {
    fn from(points: Vec<LiveDataPoint>) -> Self {
        let (labels, values) = points
            .into_iter()
            .map(|p| (p.timestamp, p.value))
            .unzip();
        Self { labels, values }
    }
}

/// What is currently drawn on the chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartState {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Fixed visual configuration of the line chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub dataset_label: String,
    /// Line colour as RGB
    pub line_color: (u8, u8, u8),
    pub line_width: u32,
    pub begin_at_zero: bool,
    pub width: u32,
    pub height: u32,
}

impl ChartStyle {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            dataset_label: "Live Streaming Data".to_string(),
            line_color: (75, 192, 192),
            line_width: 1,
            begin_at_zero: true,
            width: 800,
            height: 400,
        }
    }
}
