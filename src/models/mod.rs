//! Data models for the live chart
//!
//! Chart state and style, plus the transient points decoded from the live data endpoint.

pub mod chart;

pub use chart::{ChartState, ChartStyle, LiveDataPoint, LiveSeries};
