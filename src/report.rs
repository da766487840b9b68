//! Turn a results table into a performance chart.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    plot,
    results::{Method, ResultsTable},
};

pub const DEFAULT_SOURCE: &str = "test3_results.csv";
pub const DEFAULT_OUTPUT: &str = "performance_graph.png";

const PARALLEL_LABEL: &str = "Parallel (Threads)";
const X_LABEL: &str = "Number of Threads";
const Y_LABEL: &str = "Time (ms)";

/// Size and resolution of the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Inches.
    pub width: f64,
    /// Inches.
    pub height: f64,
    /// Matplotlib's default when `None`.
    pub dpi: Option<f64>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions { width: 10., height: 6., dpi: None }
    }
}

/// Result of one [`plot_results`] run.  Its `Display` is the status
/// line printed on standard output.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Saved(PathBuf),
    NotFound(PathBuf),
    Failed { source: PathBuf, error: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Saved(output) =>
                write!(f, "Graph saved to {}", output.display()),
            Outcome::NotFound(source) =>
                write!(f, "File {} not found.", source.display()),
            Outcome::Failed { source, error } =>
                write!(f, "Error plotting {}: {}", source.display(), error),
        }
    }
}

/// Render `source` into `output` with the default chart options.
/// See [`plot_results_with`].
pub fn plot_results(source: impl AsRef<Path>, output: impl AsRef<Path>)
                    -> Outcome {
    plot_results_with(source, output, &ChartOptions::default())
}

/// Render the results table at `source` into the image `output`,
/// print a status line and return it.  Failures are reported, never
/// propagated.
pub fn plot_results_with(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ChartOptions,
) -> Outcome {
    let source = source.as_ref();
    let output = output.as_ref();
    let outcome = if !source.exists() {
        log::warn!("results file {} does not exist", source.display());
        Outcome::NotFound(source.to_path_buf())
    } else {
        match render(source, output, options) {
            Ok(()) => Outcome::Saved(output.to_path_buf()),
            Err(e) => {
                log::warn!("plotting {} failed: {e:?}", source.display());
                Outcome::Failed { source: source.to_path_buf(),
                                  error: e.to_string() }
            }
        }
    };
    println!("{outcome}");
    outcome
}

/// Render the results table at `source` into the image `output`.
///
/// The figure is released on every path, including failures after it
/// was created.
pub fn render(source: &Path, output: &Path, options: &ChartOptions)
              -> Result<(), Error> {
    let table = ResultsTable::from_path(source)?;
    let sequential = table.time_of(Method::Sequential)?;
    let parallel_stream = table.time_of(Method::ParallelStream)?;
    let series = table.parallel_series()?;
    log::info!("plotting {} parallel runs from {}",
               series.times.len(), source.display());

    let fig = plot::figure_with_size(options.width, options.height)?;
    let [[mut ax]] = fig.subplots()?;
    ax.xy(&series.threads, &series.times)
        .marker("o")
        .label(PARALLEL_LABEL)
        .plot()?;
    ax.axhline(sequential)
        .color("r")
        .linestyle("--")
        .label(&reference_label(Method::Sequential, sequential))
        .plot()?;
    ax.axhline(parallel_stream)
        .color("g")
        .linestyle("-.")
        .label(&reference_label(Method::ParallelStream, parallel_stream))
        .plot()?;
    ax.set_title(&title(source))?
        .set_xlabel(X_LABEL)?
        .set_ylabel(Y_LABEL)?
        .legend()?
        .grid()?;

    let mut save = fig.save();
    if let Some(dpi) = options.dpi {
        save.dpi(dpi);
    }
    save.to_file(output)?;
    fig.close()?;
    Ok(())
}

fn reference_label(method: Method, time_ms: f64) -> String {
    format!("{method} ({time_ms:.2} ms)")
}

fn title(source: &Path) -> String {
    format!("Performance Analysis: {}", source.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn labels_use_two_decimals() {
        assert_eq!(reference_label(Method::Sequential, 100.),
                   "Sequential (100.00 ms)");
        assert_eq!(reference_label(Method::ParallelStream, 33.3333),
                   "ParallelStream (33.33 ms)");
        assert_eq!(reference_label(Method::Sequential, 2.5),
                   "Sequential (2.50 ms)");
    }

    #[test]
    fn title_names_the_source() {
        assert_eq!(title(Path::new("test3_results.csv")),
                   "Performance Analysis: test3_results.csv");
    }

    #[test]
    fn default_chart_is_ten_by_six() {
        let opts = ChartOptions::default();
        assert_eq!((opts.width, opts.height, opts.dpi), (10., 6., None));
    }

    #[test]
    fn missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("absent.csv");
        let output = dir.path().join("out.png");
        let outcome = plot_results(&source, &output);
        assert_eq!(outcome, Outcome::NotFound(source.clone()));
        assert_eq!(outcome.to_string(),
                   format!("File {} not found.", source.display()));
        assert!(!output.exists());
    }

    #[test]
    fn missing_sequential_row() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bench.csv");
        fs::write(&source, "Method,NumThreads,TimeMs\n\
                            ParallelStream,AUTO,50\n\
                            Parallel,2,60\n").unwrap();
        let output = dir.path().join("out.png");
        let outcome = plot_results(&source, &output);
        match &outcome {
            Outcome::Failed { source: s, error } => {
                assert_eq!(s, &source);
                assert!(error.contains("Sequential"), "{error}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(outcome.to_string()
                .starts_with(&format!("Error plotting {}: ", source.display())));
        assert!(!output.exists());
    }
}
