/// Report layout and column constants

// Default run configuration
pub const DEFAULT_BASE_DIR: &str = "./6nos5bps2510/reports_csv";
pub const DEFAULT_OPERATIONS: [&str; 3] = ["open", "query", "transfer"];
pub const DEFAULT_OUTPUT_DIR: &str = "report_output";
pub const DEFAULT_CONFIG_FILE: &str = "report.toml";
pub const CONFIG_PATH_ENV: &str = "CALIPER_REPORT_CONFIG";

// File names inside each operation directory
pub const PERFORMANCE_CSV_FILE: &str = "caliper_performance_metrics.csv";
pub const MONITOR_CSV_FILE: &str = "caliper_monitor_metrics.csv";
pub const SUMMARY_CSV_FILE: &str = "summary.csv";

// Shared load key column
pub const LOAD_KEY_COL: &str = "TPS";

// Performance report columns
pub const SEND_RATE_COL: &str = "Send Rate (TPS)";
pub const MAX_LATENCY_COL: &str = "Max Latency (s)";
pub const MIN_LATENCY_COL: &str = "Min Latency (s)";
pub const AVG_LATENCY_COL: &str = "Avg Latency (s)";
pub const THROUGHPUT_COL: &str = "Throughput (TPS)";

// Monitor report columns
pub const CPU_AVG_COL: &str = "CPU%(avg)";
pub const MEMORY_GB_COL: &str = "Memory(avg) [GB]";
pub const MEMORY_MB_COL: &str = "Memory(avg) [MB]";

// Derived canonical memory column
pub const MEMORY_USED_GB_COL: &str = "Memory_used_GB";

pub const MB_PER_GB: f64 = 1024.0;

// Summary presentation
pub const SUMMARY_DECIMALS: usize = 4;
pub const MISSING_VALUE_DISPLAY: &str = "NaN";
