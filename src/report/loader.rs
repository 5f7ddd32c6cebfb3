//! Locating and reading the two Caliper CSV reports of an operation.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::errors::ReportError;
use super::normalize::coerce_numeric;
use crate::common::constants::{MONITOR_CSV_FILE, PERFORMANCE_CSV_FILE};

/// Expected report files for one operation: `<base>/<operation>/*.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub report_dir: PathBuf,
    pub performance_csv: PathBuf,
    pub monitor_csv: PathBuf,
}

impl ReportPaths {
    pub fn for_operation(base_dir: &Path, operation: &str) -> Self {
        let report_dir = base_dir.join(operation);
        Self {
            performance_csv: report_dir.join(PERFORMANCE_CSV_FILE),
            monitor_csv: report_dir.join(MONITOR_CSV_FILE),
            report_dir,
        }
    }

    /// Expected files that do not exist on disk, in performance, monitor order.
    pub fn missing(&self) -> Vec<PathBuf> {
        [&self.performance_csv, &self.monitor_csv]
            .into_iter()
            .filter(|path| !path.exists())
            .cloned()
            .collect()
    }
}

/// A CSV file held as raw string cells, addressed by header name.
///
/// Cells stay untyped until a caller asks for a column through
/// [`CsvTable::numeric_column`], so unknown columns cost nothing and
/// malformed values never fail the load.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl CsvTable {
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        let file = File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), rows = table.len(), columns = table.headers.len(), "Loaded CSV report");
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect();

        let rows = csv_reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    // First match wins when a header is duplicated
    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Column coerced to numbers, or `None` when the header is absent.
    ///
    /// Short rows and cells that do not parse as a number yield `None`
    /// entries rather than errors.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).and_then(coerce_numeric))
                .collect(),
        )
    }

    /// Like [`numeric_column`](Self::numeric_column) but an absent column
    /// reads as all-missing, one entry per row.
    pub fn numeric_column_or_missing(&self, name: &str) -> Vec<Option<f64>> {
        self.numeric_column(name)
            .unwrap_or_else(|| vec![None; self.rows.len()])
    }
}
