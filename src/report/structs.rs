use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Target submission rate a benchmark round was driven at.
///
/// Wraps an `f64` with a total order so it can key a `BTreeMap`. NaN never
/// becomes a key: a missing load key means the row belongs to no group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadKey(f64);

impl LoadKey {
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        // -0.0 and 0.0 must land in the same group
        Some(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_integral(self) -> bool {
        self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() < 1e15
    }
}

impl PartialEq for LoadKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LoadKey {}

impl PartialOrd for LoadKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LoadKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for LoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// One row of `caliper_performance_metrics.csv` after numeric coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceRecord {
    pub load_key: Option<LoadKey>,
    pub send_rate: Option<f64>,
    pub min_latency: Option<f64>,
    pub avg_latency: Option<f64>,
    pub max_latency: Option<f64>,
    pub throughput: Option<f64>,
}

/// One row of `caliper_monitor_metrics.csv` after numeric coercion.
///
/// Both memory columns are kept as read; `normalize::select_memory_column`
/// decides which one becomes the canonical GB value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorRecord {
    pub load_key: Option<LoadKey>,
    pub cpu_avg_percent: Option<f64>,
    pub memory_avg_gb: Option<f64>,
    pub memory_avg_mb: Option<f64>,
}

/// Monitor row with memory canonicalized to gigabytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorSample {
    pub load_key: Option<LoadKey>,
    pub memory_used_gb: Option<f64>,
    pub cpu_avg_percent: Option<f64>,
}

/// Which source column the canonical memory value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemorySource {
    Gigabytes,
    Megabytes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceMeans {
    pub send_rate: Option<f64>,
    pub min_latency: Option<f64>,
    pub avg_latency: Option<f64>,
    pub max_latency: Option<f64>,
    pub throughput: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorMeans {
    pub memory_used_gb: Option<f64>,
    pub cpu_avg_percent: Option<f64>,
}

/// Joined per-load-key averages. Field order is the printed column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "TPS")]
    pub load_key: LoadKey,
    #[serde(rename = "Send Rate (TPS)")]
    pub send_rate: Option<f64>,
    #[serde(rename = "Min Latency (s)")]
    pub min_latency: Option<f64>,
    #[serde(rename = "Avg Latency (s)")]
    pub avg_latency: Option<f64>,
    #[serde(rename = "Max Latency (s)")]
    pub max_latency: Option<f64>,
    #[serde(rename = "Throughput (TPS)")]
    pub throughput: Option<f64>,
    #[serde(rename = "Memory_used_GB")]
    pub memory_used_gb: Option<f64>,
    #[serde(rename = "CPU%(avg)")]
    pub cpu_avg_percent: Option<f64>,
}

/// Load keys the inner join discarded, per side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinStats {
    pub performance_only: Vec<LoadKey>,
    pub monitor_only: Vec<LoadKey>,
}

impl JoinStats {
    pub fn dropped(&self) -> usize {
        self.performance_only.len() + self.monitor_only.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub operation: String,
    pub rows: Vec<SummaryRow>,
    pub memory_source: MemorySource,
    pub join_stats: JoinStats,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn load_keys(&self) -> Vec<LoadKey> {
        self.rows.iter().map(|row| row.load_key).collect()
    }
}

/// Result of processing one operation directory.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Summary(SummaryTable),
    /// One or both report files are absent; `missing` lists which.
    MissingFiles { report_dir: PathBuf, missing: Vec<PathBuf> },
    /// Neither memory column carries a single usable value.
    NoMemoryData,
}

impl ProcessOutcome {
    pub fn summary(&self) -> Option<&SummaryTable> {
        match self {
            ProcessOutcome::Summary(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        !matches!(self, ProcessOutcome::Summary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_key_rejects_nan() {
        assert!(LoadKey::new(f64::NAN).is_none());
        assert!(LoadKey::new(10.0).is_some());
    }

    #[test]
    fn test_load_key_ordering_and_zero() {
        let a = LoadKey::new(5.0).unwrap();
        let b = LoadKey::new(50.0).unwrap();
        assert!(a < b);
        assert_eq!(LoadKey::new(-0.0), LoadKey::new(0.0));
    }

    #[test]
    fn test_load_key_display() {
        assert_eq!(LoadKey::new(100.0).unwrap().to_string(), "100");
        assert_eq!(LoadKey::new(12.5).unwrap().to_string(), "12.5");
    }

    #[test]
    fn test_join_stats_dropped_count() {
        let stats = JoinStats {
            performance_only: vec![LoadKey::new(20.0).unwrap()],
            monitor_only: vec![LoadKey::new(30.0).unwrap(), LoadKey::new(40.0).unwrap()],
        };
        assert_eq!(stats.dropped(), 3);
    }
}
