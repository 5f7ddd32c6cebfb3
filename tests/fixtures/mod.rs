use std::path::{Path, PathBuf};

use caliper_report::config::{ChartFormat, ReportConfig};

pub const PERFORMANCE_CSV: &str = "\
Name,Succ,Fail,TPS,Send Rate (TPS),Max Latency (s),Min Latency (s),Avg Latency (s),Throughput (TPS)
round-1,500,0,50,50.1,0.31,0.02,0.10,49.8
round-2,500,0,50,49.9,0.29,0.04,0.12,50.2
round-3,1000,0,100,100.3,0.80,0.03,0.25,98.1
round-4,1000,0,150,151.0,2.10,0.05,0.90,120.4
";

pub const MONITOR_GB_CSV: &str = "\
Name,TPS,CPU%(max),CPU%(avg),Memory(max) [GB],Memory(avg) [GB]
peer0.org1,50,30.5,20.0,1.20,1.00
peer0.org2,50,32.5,24.0,1.40,1.20
peer0.org1,100,55.0,40.0,1.60,1.50
peer0.org1,200,90.0,85.0,2.00,1.90
";

pub const MONITOR_MB_CSV: &str = "\
Name,TPS,CPU%(avg),Memory(avg) [MB]
peer0.org1,50,20.0,512
peer0.org1,100,40.0,1024
peer0.org1,150,60.0,3072
";

/// Write one operation's report pair under `base`; `None` leaves a file out.
pub fn write_operation(base: &Path, operation: &str, performance: Option<&str>, monitor: Option<&str>) -> PathBuf {
    let dir = base.join(operation);
    std::fs::create_dir_all(&dir).expect("Failed to create operation dir");
    if let Some(content) = performance {
        std::fs::write(dir.join("caliper_performance_metrics.csv"), content).expect("Failed to write performance CSV");
    }
    if let Some(content) = monitor {
        std::fs::write(dir.join("caliper_monitor_metrics.csv"), content).expect("Failed to write monitor CSV");
    }
    dir
}

/// Config reading from `base` and writing artifacts to `output`.
pub fn create_test_config(base: &Path, output: &Path, chart_format: ChartFormat) -> ReportConfig {
    ReportConfig {
        base_dir: base.to_path_buf(),
        output_dir: output.to_path_buf(),
        chart_format,
        ..ReportConfig::default()
    }
}
