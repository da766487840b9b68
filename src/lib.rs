//! Render thread-count benchmark results as a chart.
//!
//! A results table lists, for each benchmark run, the execution
//! strategy (`Sequential`, `ParallelStream` or `Parallel`), the number
//! of threads and the elapsed time.  [`report::plot_results`] draws the
//! `Parallel` times against their thread counts and adds the
//! `Sequential` and `ParallelStream` times as horizontal reference
//! lines, using [Matplotlib][] through the [`plot`] binding.
//!
//! [Matplotlib]: https://matplotlib.org/

pub mod error;
pub mod logger;
pub mod plot;
pub mod report;
pub mod results;

pub use error::Error;
pub use report::{plot_results, plot_results_with, ChartOptions, Outcome};
pub use results::{Method, ResultsTable};

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
