#[cfg(test)]
mod tests;

// Log-log scaling charts: measured timings against a reference curve.

pub mod backend;
pub mod chart;
pub mod error;
pub mod render;
pub mod series;
pub mod surface;

pub use backend::PlotBackend;
pub use chart::{Axis, AxisScale, ChartConfig, Rgb, SeriesStyle};
pub use error::PlotError;
pub use render::ScalingPlotRenderer;
pub use series::{MeasurementSeries, ReferenceSeries};
pub use surface::{PlotSurface, SurfaceConfig, SurfaceKind};
