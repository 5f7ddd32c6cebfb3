use caliper_report::config::ReportConfig;
use caliper_report::logging::{init_logging, log_system_info};
use caliper_report::report::run;
use tracing::{error, info};

fn main() {
    // Optional config path; no argument means report.toml or built-in defaults
    let config = match ReportConfig::load(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    let _log_guard = match init_logging(&config.logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(2);
        }
    };
    log_system_info();

    info!(
        base_dir = %config.base_dir.display(),
        operations = ?config.operations,
        output_dir = %config.output_dir.display(),
        chart_format = ?config.chart_format,
        "Starting Caliper report aggregation"
    );

    let stdout = std::io::stdout();
    let summary = run(&config, &mut stdout.lock());

    if !summary.failed.is_empty() {
        error!(failed = ?summary.failed, "Some operations could not be processed");
    }
}
