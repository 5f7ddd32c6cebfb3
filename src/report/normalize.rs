//! Numeric coercion of report columns and canonical memory selection.

use super::loader::CsvTable;
use super::structs::{LoadKey, MemorySource, MonitorRecord, MonitorSample, PerformanceRecord};
use crate::common::constants::{
    AVG_LATENCY_COL, CPU_AVG_COL, LOAD_KEY_COL, MAX_LATENCY_COL, MB_PER_GB, MEMORY_GB_COL, MEMORY_MB_COL,
    MIN_LATENCY_COL, SEND_RATE_COL, THROUGHPUT_COL,
};

/// Parse a cell as a number. Empty, non-numeric and NaN cells are missing.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| !value.is_nan())
}

fn load_keys(table: &CsvTable) -> Vec<Option<LoadKey>> {
    table
        .numeric_column_or_missing(LOAD_KEY_COL)
        .into_iter()
        .map(|value| value.and_then(LoadKey::new))
        .collect()
}

pub fn performance_records(table: &CsvTable) -> Vec<PerformanceRecord> {
    let keys = load_keys(table);
    let send_rate = table.numeric_column_or_missing(SEND_RATE_COL);
    let min_latency = table.numeric_column_or_missing(MIN_LATENCY_COL);
    let avg_latency = table.numeric_column_or_missing(AVG_LATENCY_COL);
    let max_latency = table.numeric_column_or_missing(MAX_LATENCY_COL);
    let throughput = table.numeric_column_or_missing(THROUGHPUT_COL);

    (0..table.len())
        .map(|i| PerformanceRecord {
            load_key: keys[i],
            send_rate: send_rate[i],
            min_latency: min_latency[i],
            avg_latency: avg_latency[i],
            max_latency: max_latency[i],
            throughput: throughput[i],
        })
        .collect()
}

pub fn monitor_records(table: &CsvTable) -> Vec<MonitorRecord> {
    let keys = load_keys(table);
    let cpu = table.numeric_column_or_missing(CPU_AVG_COL);
    let memory_gb = table.numeric_column_or_missing(MEMORY_GB_COL);
    let memory_mb = table.numeric_column_or_missing(MEMORY_MB_COL);

    (0..table.len())
        .map(|i| MonitorRecord {
            load_key: keys[i],
            cpu_avg_percent: cpu[i],
            memory_avg_gb: memory_gb[i],
            memory_avg_mb: memory_mb[i],
        })
        .collect()
}

/// Pick the canonical memory column for a monitor report.
///
/// The GB column wins when it holds at least one value; otherwise the MB
/// column is used divided by 1024. `None` when neither holds any value.
pub fn select_memory_column(records: &[MonitorRecord]) -> Option<(MemorySource, Vec<MonitorSample>)> {
    let source = if records.iter().any(|r| r.memory_avg_gb.is_some()) {
        MemorySource::Gigabytes
    } else if records.iter().any(|r| r.memory_avg_mb.is_some()) {
        MemorySource::Megabytes
    } else {
        return None;
    };

    let samples = records
        .iter()
        .map(|record| MonitorSample {
            load_key: record.load_key,
            memory_used_gb: match source {
                MemorySource::Gigabytes => record.memory_avg_gb,
                MemorySource::Megabytes => record.memory_avg_mb.map(|mb| mb / MB_PER_GB),
            },
            cpu_avg_percent: record.cpu_avg_percent,
        })
        .collect();

    Some((source, samples))
}
