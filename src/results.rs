//! Benchmark results table.
//!
//! The table is a comma separated file with a header row naming the
//! columns `Method`, `NumThreads` and `TimeMs`, one row per benchmark
//! run.  Extra columns are ignored.

use std::{fmt, io::Read, path::Path};
use ndarray::Array1;
use serde::Deserialize;

use crate::error::Error;

/// Execution strategy a row was measured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Method {
    Sequential,
    ParallelStream,
    Parallel,
    /// Any other label; such rows take no part in the report.
    #[serde(other)]
    Other,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Sequential => "Sequential",
            Method::ParallelStream => "ParallelStream",
            Method::Parallel => "Parallel",
            Method::Other => "Other",
        };
        f.write_str(name)
    }
}

/// One benchmark run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    pub method: Method,
    /// Kept as text: only `Parallel` rows carry a real thread count,
    /// the others may hold placeholders such as `AUTO`.
    pub num_threads: String,
    pub time_ms: f64,
}

/// Thread counts and times of the `Parallel` rows, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelSeries {
    pub threads: Array1<f64>,
    pub times: Array1<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    rows: Vec<Row>,
}

impl ResultsTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        log::debug!("loading results from {}", path.display());
        let rdr = reader_builder().from_path(path)?;
        Self::collect(rdr)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        Self::collect(reader_builder().from_reader(reader))
    }

    fn collect<R: Read>(mut rdr: csv::Reader<R>) -> Result<Self, Error> {
        let rows = rdr.deserialize().collect::<Result<Vec<Row>, _>>()?;
        log::debug!("loaded {} result rows", rows.len());
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// `TimeMs` of the first row measured with `method`.
    pub fn time_of(&self, method: Method) -> Result<f64, Error> {
        self.rows.iter()
            .find(|r| r.method == method)
            .map(|r| r.time_ms)
            .ok_or(Error::MissingMethod(method))
    }

    /// Pair `NumThreads` with `TimeMs` for every `Parallel` row.
    /// Rows sharing a thread count are all kept.
    pub fn parallel_series(&self) -> Result<ParallelSeries, Error> {
        let mut threads = Vec::new();
        let mut times = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if row.method != Method::Parallel {
                continue;
            }
            let n = match row.num_threads.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(Error::InvalidThreads {
                    // Header is line 1.
                    line: i + 2,
                    value: row.num_threads.clone(),
                }),
            };
            threads.push(f64::from(n));
            times.push(row.time_ms);
        }
        Ok(ParallelSeries {
            threads: Array1::from(threads),
            times: Array1::from(times),
        })
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::All);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const BENCH: &str = "\
Method,NumThreads,TimeMs
Sequential,1,100.00
Sequential,1,120.00
Parallel,1,90.00
Parallel,2,60.00
Parallel,4,40.00
ParallelStream,AUTO,50.00
";

    #[test]
    fn loads_rows_in_order() {
        let table = ResultsTable::from_reader(BENCH.as_bytes()).unwrap();
        assert_eq!(table.rows().len(), 6);
        assert_eq!(table.rows()[0].method, Method::Sequential);
        assert_eq!(table.rows()[5].num_threads, "AUTO");
        assert_eq!(table.rows()[5].time_ms, 50.);
    }

    #[test]
    fn first_match_wins() {
        let table = ResultsTable::from_reader(BENCH.as_bytes()).unwrap();
        assert_eq!(table.time_of(Method::Sequential).unwrap(), 100.);
        assert_eq!(table.time_of(Method::ParallelStream).unwrap(), 50.);
    }

    #[test]
    fn missing_method_is_an_error() {
        let csv = "Method,NumThreads,TimeMs\nParallel,2,10.5\n";
        let table = ResultsTable::from_reader(csv.as_bytes()).unwrap();
        match table.time_of(Method::Sequential) {
            Err(Error::MissingMethod(Method::Sequential)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parallel_series_keeps_order_and_duplicates() {
        let csv = "\
Method,NumThreads,TimeMs
Parallel,4,40
Sequential,1,100
Parallel,2,60
Parallel,2,65
";
        let table = ResultsTable::from_reader(csv.as_bytes()).unwrap();
        let series = table.parallel_series().unwrap();
        assert_eq!(series.threads, array![4., 2., 2.]);
        assert_eq!(series.times, array![40., 60., 65.]);
    }

    #[test]
    fn unknown_methods_are_ignored() {
        let csv = "Method,NumThreads,TimeMs\nGpu,8,3.5\nParallel,8,7\n";
        let table = ResultsTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].method, Method::Other);
        assert_eq!(table.parallel_series().unwrap().times, array![7.]);
    }

    #[test]
    fn invalid_thread_count() {
        let csv = "Method,NumThreads,TimeMs\nParallel,1,9\nParallel,AUTO,7\n";
        let table = ResultsTable::from_reader(csv.as_bytes()).unwrap();
        match table.parallel_series() {
            Err(Error::InvalidThreads { line: 3, value }) =>
                assert_eq!(value, "AUTO"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_column() {
        let csv = "Method,NumThreads\nSequential,1\n";
        assert!(matches!(ResultsTable::from_reader(csv.as_bytes()),
                         Err(Error::Csv(_))));
    }

    #[test]
    fn malformed_time() {
        let csv = "Method,NumThreads,TimeMs\nSequential,1,fast\n";
        assert!(matches!(ResultsTable::from_reader(csv.as_bytes()),
                         Err(Error::Csv(_))));
    }

    #[test]
    fn crlf_and_padding() {
        let csv = "Method, NumThreads, TimeMs\r\nSequential, 1, 12.5\r\n";
        let table = ResultsTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.time_of(Method::Sequential).unwrap(), 12.5);
    }
}
