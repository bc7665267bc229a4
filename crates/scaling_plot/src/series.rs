// Measured timings and the reference curve drawn against them.

use ndarray::Array1;

use crate::error::PlotError;

/// Transaction counts of the published scaling run.
pub const TRANSACTIONS: [f64; 5] = [1e3, 1e4, 1e5, 1e6, 1e7];

/// Mining time in seconds for each entry of [`TRANSACTIONS`].
pub const TIMES: [f64; 5] = [10.125, 37.37, 307.769, 2829.759, 31902.483];

/// Ideal linear scaling curve drawn over [`TRANSACTIONS`].
pub const LINEAR_TIMES: [f64; 5] = [1e1, 1e2, 1e3, 1e4, 1e5];

/// Ordered (transaction count, elapsed seconds) pairs.
///
/// The constructor guarantees at least two points, equal column lengths,
/// finite positive values and strictly increasing counts, so the series can
/// always be drawn on log axes.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl MeasurementSeries {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, PlotError> {
        if x.len() != y.len() {
            return Err(PlotError::InvalidSeries(format!(
                "{} transaction counts but {} timings",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(PlotError::InvalidSeries(format!(
                "need at least two points, got {}",
                x.len()
            )));
        }
        check_positive("transaction count", &x)?;
        check_positive("timing", &y)?;

        if let Some(w) = x.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PlotError::InvalidSeries(format!(
                "transaction counts must increase strictly, found {} before {}",
                w[0], w[1]
            )));
        }

        Ok(Self {
            x: Array1::from_vec(x),
            y: Array1::from_vec(y),
        })
    }

    /// The timings from the published transaction scaling run.
    pub fn transaction_scaling() -> Self {
        Self {
            x: Array1::from_iter(TRANSACTIONS),
            y: Array1::from_iter(TIMES),
        }
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Visible x range, `[min(x), max(x)]`.
    pub fn x_bounds(&self) -> (f64, f64) {
        // x is strictly increasing, so the ends are the extremes
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Reference curve values, drawn at the x positions of a measurement series.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSeries {
    y: Array1<f64>,
}

impl ReferenceSeries {
    pub fn new(y: Vec<f64>) -> Result<Self, PlotError> {
        if y.is_empty() {
            return Err(PlotError::InvalidSeries("empty reference series".into()));
        }
        check_positive("reference value", &y)?;
        Ok(Self {
            y: Array1::from_vec(y),
        })
    }

    /// Linear scaling curve that accompanies the published timings.
    pub fn linear_scaling() -> Self {
        Self {
            y: Array1::from_iter(LINEAR_TIMES),
        }
    }

    /// Ideal linear scaling through the first measured point:
    /// `y_i = y_0 * x_i / x_0`.
    pub fn proportional_to(measurement: &MeasurementSeries) -> Self {
        let rate = measurement.y[0] / measurement.x[0];
        Self {
            y: measurement.x.mapv(|x| x * rate),
        }
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

fn check_positive(what: &str, values: &[f64]) -> Result<(), PlotError> {
    match values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
        Some(v) => Err(PlotError::InvalidSeries(format!(
            "{what} must be finite and positive, got {v}"
        ))),
        None => Ok(()),
    }
}
