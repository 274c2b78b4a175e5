use std::path::PathBuf;

use chrono::{DateTime, Utc};
use plotters::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::models::{ChartState, ChartStyle, LiveSeries};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render Error: {0}")]
    Draw(String),
}

/// Paints the chart from its in-memory state
pub trait ChartRenderer: Send {
    fn redraw(
        &mut self,
        state: &ChartState,
        style: &ChartStyle,
        caption: &str,
    ) -> Result<(), RenderError>;
}

/// The live chart: state, fixed style and the renderer that paints them
pub struct Chart<R: ChartRenderer> {
    state: ChartState,
    style: ChartStyle,
    renderer: R,
    last_updated: Option<DateTime<Utc>>,
}

impl<R: ChartRenderer> Chart<R> {
    /// Create a chart with no data
    pub fn new(style: ChartStyle, renderer: R) -> Self {
        Self {
            state: ChartState::default(),
            style,
            renderer,
            last_updated: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Replace labels and values with `series`, then redraw once.
    ///
    /// The state is replaced even if the redraw fails.
    pub fn refresh(&mut self, series: LiveSeries) -> Result<(), RenderError> {
        let (labels, values) = series.into_parts();
        self.state.labels = labels;
        self.state.values = values;
        self.last_updated = Some(Utc::now());

        debug!("Chart refreshed with {} points", self.state.values.len());
        self.redraw()
    }

    /// Repaint from the current state
    pub fn redraw(&mut self) -> Result<(), RenderError> {
        let caption = self.caption();
        self.renderer.redraw(&self.state, &self.style, &caption)
    }

    fn caption(&self) -> String {
        match self.last_updated {
            Some(at) => format!(
                "{} (updated {} UTC)",
                self.style.dataset_label,
                at.format("%H:%M:%S")
            ),
            None => self.style.dataset_label.clone(),
        }
    }
}

/// Y axis bounds: zero-based when asked, with 10% head-room above the data
pub fn y_range(values: &[f64], begin_at_zero: bool) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 1.0);
    }

    let mut min_value = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if begin_at_zero {
        min_value = min_value.min(0.0);
        max_value = max_value.max(0.0);
    }

    // Avoid a zero-height axis
    let range = (max_value - min_value).max(1e-8);
    let padding = range * 0.1;
    let y_min = if begin_at_zero && min_value >= 0.0 {
        0.0
    } else {
        min_value - padding
    };

    (y_min, max_value + padding)
}

/// Upper bound of the index axis; at least 1 so a single point still has a range
pub fn x_extent(points: usize) -> usize {
    points.saturating_sub(1).max(1)
}

/// Renders the chart as a PNG file, rewritten on every redraw
pub struct PngRenderer {
    path: PathBuf,
}

impl PngRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChartRenderer for PngRenderer {
    fn redraw(
        &mut self,
        state: &ChartState,
        style: &ChartStyle,
        caption: &str,
    ) -> Result<(), RenderError> {
        let backend = BitMapBackend::new(&self.path, (style.width, style.height));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::Draw(format!("Failed to fill canvas: {}", e)))?;

        let (y_min, y_max) = y_range(&state.values, style.begin_at_zero);
        let x_max = x_extent(state.values.len());
        let (r, g, b) = style.line_color;
        let color = RGBColor(r, g, b);
        let labels = &state.labels;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 24.0).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0usize..x_max, y_min..y_max)
            .map_err(|e| RenderError::Draw(format!("Failed to build chart: {}", e)))?;

        chart
            .configure_mesh()
            .x_labels(labels.len().clamp(1, 10))
            .x_label_formatter(&|i: &usize| labels.get(*i).cloned().unwrap_or_default())
            .x_desc("Time")
            .draw()
            .map_err(|e| RenderError::Draw(format!("Failed to draw mesh: {}", e)))?;

        let line_style = ShapeStyle {
            color: color.to_rgba(),
            filled: false,
            stroke_width: style.line_width,
        };
        let points = state.values.iter().copied().enumerate();

        chart
            .draw_series(LineSeries::new(points, line_style))
            .map_err(|e| RenderError::Draw(format!("Failed to draw line: {}", e)))?
            .label(style.dataset_label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| RenderError::Draw(format!("Failed to draw legend: {}", e)))?;

        root.present()
            .map_err(|e| RenderError::Draw(format!("Failed to render chart: {}", e)))?;

        Ok(())
    }
}
