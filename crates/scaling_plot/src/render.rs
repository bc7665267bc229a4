// Renders measured timings against a reference scaling curve on log-log axes.

use crate::backend::PlotBackend;
use crate::chart::{Axis, ChartConfig};
use crate::error::PlotError;
use crate::series::{MeasurementSeries, ReferenceSeries};

/// Draws a [`MeasurementSeries`] and a [`ReferenceSeries`] on one chart.
#[derive(Debug, Clone)]
pub struct ScalingPlotRenderer {
    measurement: MeasurementSeries,
    reference: ReferenceSeries,
    config: ChartConfig,
}

impl Default for ScalingPlotRenderer {
    /// The published transaction scaling timings with the linear reference.
    fn default() -> Self {
        Self::new(
            MeasurementSeries::transaction_scaling(),
            ReferenceSeries::linear_scaling(),
        )
    }
}

impl ScalingPlotRenderer {
    pub fn new(measurement: MeasurementSeries, reference: ReferenceSeries) -> Self {
        Self {
            measurement,
            reference,
            config: ChartConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    pub fn measurement(&self) -> &MeasurementSeries {
        &self.measurement
    }

    pub fn reference(&self) -> &ReferenceSeries {
        &self.reference
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Build the chart on `backend` and present it.
    ///
    /// Fails with [`PlotError::DimensionMismatch`] before touching the
    /// backend if the two series have different point counts.
    pub fn render<B: PlotBackend>(&self, backend: &mut B) -> Result<(), PlotError> {
        if self.measurement.len() != self.reference.len() {
            return Err(PlotError::DimensionMismatch {
                measurement: self.measurement.len(),
                reference: self.reference.len(),
            });
        }

        let config = &self.config;

        // both series share the measurement's x positions
        let x = self.measurement.x().to_vec();
        let y = self.measurement.y().to_vec();
        let reference = self.reference.y().to_vec();

        backend.set_tick_label_size(config.tick_label_size)?;

        backend.plot(&x, &y, &config.measurement_style)?;
        backend.plot(&x, &reference, &config.reference_style)?;

        backend.set_scale(Axis::X, config.x_scale)?;
        backend.set_scale(Axis::Y, config.y_scale)?;

        backend.set_label(Axis::X, &config.x_label, config.axis_label_size)?;
        backend.set_label(Axis::Y, &config.y_label, config.axis_label_size)?;

        let (x_min, x_max) = self.measurement.x_bounds();
        backend.set_x_limits(x_min, x_max)?;

        backend.set_grid(config.grid)?;

        log::debug!(
            "rendering {} points, x range [{}, {}]",
            self.measurement.len(),
            x_min,
            x_max
        );

        backend.show()
    }
}
