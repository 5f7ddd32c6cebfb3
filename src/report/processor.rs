//! Per-operation pipeline: locate, load, normalize, group and join.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::aggregate::{group_monitor, group_performance, inner_join};
use super::errors::ReportError;
use super::loader::{CsvTable, ReportPaths};
use super::normalize::{monitor_records, performance_records, select_memory_column};
use super::structs::{ProcessOutcome, SummaryTable};
use crate::common::constants::LOAD_KEY_COL;

/// Aggregates the Caliper reports found under one base directory.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    base_dir: PathBuf,
}

impl ReportAggregator {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    /// Build the joined summary for `operation`.
    ///
    /// Missing report files and unusable memory data come back as skip
    /// outcomes. Only I/O and CSV framing failures on files that do exist
    /// are errors.
    pub fn process(&self, operation: &str) -> Result<ProcessOutcome, ReportError> {
        let paths = ReportPaths::for_operation(&self.base_dir, operation);

        let missing = paths.missing();
        if !missing.is_empty() {
            warn!(
                operation,
                report_dir = %paths.report_dir.display(),
                missing = missing.len(),
                "CSV reports not found, skipping operation"
            );
            return Ok(ProcessOutcome::MissingFiles {
                report_dir: paths.report_dir,
                missing,
            });
        }

        let performance_table = CsvTable::from_path(&paths.performance_csv)?;
        let monitor_table = CsvTable::from_path(&paths.monitor_csv)?;

        for (name, table) in [("performance", &performance_table), ("monitor", &monitor_table)] {
            if !table.has_column(LOAD_KEY_COL) {
                warn!(operation, report = name, column = LOAD_KEY_COL, "Load key column absent, no rows can be grouped");
            }
        }

        let performance = performance_records(&performance_table);
        let monitor = monitor_records(&monitor_table);

        let Some((memory_source, samples)) = select_memory_column(&monitor) else {
            warn!(operation, "No usable memory column found, skipping operation");
            return Ok(ProcessOutcome::NoMemoryData);
        };
        debug!(operation, ?memory_source, "Selected memory column");

        let performance_grouped = group_performance(&performance);
        let monitor_grouped = group_monitor(&samples);
        let (rows, join_stats) = inner_join(&performance_grouped, &monitor_grouped);

        if join_stats.dropped() > 0 {
            warn!(
                operation,
                performance_only = join_stats.performance_only.len(),
                monitor_only = join_stats.monitor_only.len(),
                "Load keys without a counterpart were dropped from the summary"
            );
        }

        info!(
            operation,
            performance_rows = performance.len(),
            monitor_rows = samples.len(),
            summary_rows = rows.len(),
            "Aggregated operation reports"
        );

        Ok(ProcessOutcome::Summary(SummaryTable {
            operation: operation.to_string(),
            rows,
            memory_source,
            join_stats,
        }))
    }
}
