//! Per-load-key means and the inner join of the two grouped reports.

use std::collections::BTreeMap;

use super::structs::{
    JoinStats, LoadKey, MonitorMeans, MonitorSample, PerformanceMeans, PerformanceRecord, SummaryRow,
};

/// Running mean that ignores missing values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    /// `None` when no value was ever pushed.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Default)]
struct PerformanceGroup {
    send_rate: MeanAccumulator,
    min_latency: MeanAccumulator,
    avg_latency: MeanAccumulator,
    max_latency: MeanAccumulator,
    throughput: MeanAccumulator,
}

#[derive(Debug, Default)]
struct MonitorGroup {
    memory_used_gb: MeanAccumulator,
    cpu_avg_percent: MeanAccumulator,
}

/// Group performance rows by load key, ascending. Keyless rows are dropped.
pub fn group_performance(records: &[PerformanceRecord]) -> BTreeMap<LoadKey, PerformanceMeans> {
    let mut groups: BTreeMap<LoadKey, PerformanceGroup> = BTreeMap::new();

    for record in records {
        let Some(key) = record.load_key else { continue };
        let group = groups.entry(key).or_default();
        group.send_rate.push(record.send_rate);
        group.min_latency.push(record.min_latency);
        group.avg_latency.push(record.avg_latency);
        group.max_latency.push(record.max_latency);
        group.throughput.push(record.throughput);
    }

    groups
        .into_iter()
        .map(|(key, group)| {
            (
                key,
                PerformanceMeans {
                    send_rate: group.send_rate.mean(),
                    min_latency: group.min_latency.mean(),
                    avg_latency: group.avg_latency.mean(),
                    max_latency: group.max_latency.mean(),
                    throughput: group.throughput.mean(),
                },
            )
        })
        .collect()
}

/// Group monitor samples by load key, ascending. Keyless rows are dropped.
pub fn group_monitor(samples: &[MonitorSample]) -> BTreeMap<LoadKey, MonitorMeans> {
    let mut groups: BTreeMap<LoadKey, MonitorGroup> = BTreeMap::new();

    for sample in samples {
        let Some(key) = sample.load_key else { continue };
        let group = groups.entry(key).or_default();
        group.memory_used_gb.push(sample.memory_used_gb);
        group.cpu_avg_percent.push(sample.cpu_avg_percent);
    }

    groups
        .into_iter()
        .map(|(key, group)| {
            (
                key,
                MonitorMeans {
                    memory_used_gb: group.memory_used_gb.mean(),
                    cpu_avg_percent: group.cpu_avg_percent.mean(),
                },
            )
        })
        .collect()
}

/// Inner join on load key. Rows come out in ascending key order; keys seen
/// on only one side are reported in the returned [`JoinStats`].
pub fn inner_join(
    performance: &BTreeMap<LoadKey, PerformanceMeans>,
    monitor: &BTreeMap<LoadKey, MonitorMeans>,
) -> (Vec<SummaryRow>, JoinStats) {
    let mut rows = Vec::with_capacity(performance.len().min(monitor.len()));
    let mut stats = JoinStats::default();

    for (key, perf) in performance {
        match monitor.get(key) {
            Some(mon) => rows.push(SummaryRow {
                load_key: *key,
                send_rate: perf.send_rate,
                min_latency: perf.min_latency,
                avg_latency: perf.avg_latency,
                max_latency: perf.max_latency,
                throughput: perf.throughput,
                memory_used_gb: mon.memory_used_gb,
                cpu_avg_percent: mon.cpu_avg_percent,
            }),
            None => stats.performance_only.push(*key),
        }
    }

    stats.monitor_only = monitor
        .keys()
        .filter(|key| !performance.contains_key(key))
        .copied()
        .collect();

    (rows, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: f64) -> LoadKey {
        LoadKey::new(value).unwrap()
    }

    fn perf(tps: f64, avg_latency: Option<f64>) -> PerformanceRecord {
        PerformanceRecord {
            load_key: Some(key(tps)),
            avg_latency,
            ..Default::default()
        }
    }

    fn mon(tps: f64, memory_used_gb: f64, cpu: f64) -> MonitorSample {
        MonitorSample {
            load_key: Some(key(tps)),
            memory_used_gb: Some(memory_used_gb),
            cpu_avg_percent: Some(cpu),
        }
    }

    #[test]
    fn test_mean_accumulator_skips_missing() {
        let mut acc = MeanAccumulator::default();
        assert_eq!(acc.mean(), None);
        acc.push(Some(1.0));
        acc.push(None);
        acc.push(Some(3.0));
        assert_eq!(acc.mean(), Some(2.0));
    }

    #[test]
    fn test_group_performance_means_per_key() {
        let grouped = group_performance(&[perf(10.0, Some(0.5)), perf(10.0, Some(0.7))]);
        assert_eq!(grouped.len(), 1);
        let avg = grouped[&key(10.0)].avg_latency.unwrap();
        assert!((avg - 0.6).abs() < 1e-12);
        assert_eq!(grouped[&key(10.0)].send_rate, None);
    }

    #[test]
    fn test_group_ignores_malformed_and_keyless_rows() {
        let keyless = PerformanceRecord {
            load_key: None,
            avg_latency: Some(99.0),
            ..Default::default()
        };
        let grouped = group_performance(&[perf(10.0, Some(0.4)), perf(10.0, None), keyless]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&key(10.0)].avg_latency, Some(0.4));
    }

    #[test]
    fn test_groups_are_ascending() {
        let grouped = group_monitor(&[mon(50.0, 1.0, 10.0), mon(5.0, 2.0, 20.0), mon(25.0, 3.0, 30.0)]);
        let keys: Vec<f64> = grouped.keys().map(|k| k.value()).collect();
        assert_eq!(keys, vec![5.0, 25.0, 50.0]);
    }

    #[test]
    fn test_inner_join_drops_one_sided_keys() {
        let performance = group_performance(&[perf(10.0, Some(0.5)), perf(20.0, Some(0.9))]);
        let monitor = group_monitor(&[mon(10.0, 1.5, 40.0), mon(30.0, 2.5, 60.0)]);

        let (rows, stats) = inner_join(&performance, &monitor);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].load_key, key(10.0));
        assert_eq!(rows[0].avg_latency, Some(0.5));
        assert_eq!(rows[0].memory_used_gb, Some(1.5));
        assert_eq!(rows[0].cpu_avg_percent, Some(40.0));
        assert_eq!(stats.performance_only, vec![key(20.0)]);
        assert_eq!(stats.monitor_only, vec![key(30.0)]);
    }
}
