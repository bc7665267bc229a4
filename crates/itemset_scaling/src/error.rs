// Errors of the scaling experiment.

use scaling_plot::PlotError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generator or miner parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The generator could not produce what was asked for.
    #[error("generation failed: {0}")]
    Generation(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("plot error: {0}")]
    Plot(#[from] PlotError),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
