// Error type shared by the renderer and the plot surfaces.

/// Errors that can occur while building series or rendering a chart.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Measurement and reference series have different point counts.
    #[error("series length mismatch: measurement has {measurement} points, reference has {reference}")]
    DimensionMismatch { measurement: usize, reference: usize },

    /// Series values that can't be drawn, e.g. non-positive values on a log axis.
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    /// The output surface could not be created.
    #[error("plot surface unavailable: {0}")]
    BackendUnavailable(String),

    /// Failure reported by the plotting library while drawing.
    #[error("drawing error: {0}")]
    Drawing(String),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Flatten a plotters error into a `PlotError`; the plotters error types are
/// generic over the backend so we keep only the message.
pub(crate) fn drawing_error<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Drawing(err.to_string())
}
