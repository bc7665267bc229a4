// The calls the renderer makes against a plotting library.

use crate::chart::{Axis, AxisScale, SeriesStyle};
use crate::error::PlotError;

/// A chart under construction.
///
/// Settings apply to this chart only. Nothing is drawn until [`show`]
/// is called, so calls may arrive in any order.
///
/// [`show`]: PlotBackend::show
pub trait PlotBackend {
    /// Font size of the tick labels on both axes.
    fn set_tick_label_size(&mut self, size: u32) -> Result<(), PlotError>;

    /// Add a series. `x` and `y` have equal length.
    fn plot(&mut self, x: &[f64], y: &[f64], style: &SeriesStyle) -> Result<(), PlotError>;

    fn set_scale(&mut self, axis: Axis, scale: AxisScale) -> Result<(), PlotError>;

    fn set_label(&mut self, axis: Axis, text: &str, font_size: u32) -> Result<(), PlotError>;

    /// Visible range of the x axis.
    fn set_x_limits(&mut self, min: f64, max: f64) -> Result<(), PlotError>;

    fn set_grid(&mut self, visible: bool) -> Result<(), PlotError>;

    /// Draw the chart and present it. Blocks until presentation is done.
    fn show(&mut self) -> Result<(), PlotError>;
}
