use thiserror::Error;

use crate::{plot, results::Method};

/// Everything that can go wrong while turning a results table into a
/// chart.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("no row with Method = {0}")]
    MissingMethod(Method),

    #[error("invalid thread count {value:?} on line {line}")]
    InvalidThreads { line: usize, value: String },

    #[error(transparent)]
    Plot(#[from] plot::Error),
}
