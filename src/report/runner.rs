//! Drives the configured operations through the aggregator and presents
//! each summary: printed table, optional CSV export, charts.

use std::io::Write;
use std::path::PathBuf;

use tracing::{error, info};

use super::chart::{build_charts, ChartSink, JsonChartSink, SvgChartSink};
use super::errors::ReportError;
use super::processor::ReportAggregator;
use super::structs::{ProcessOutcome, SummaryTable};
use super::table::{render_summary, write_summary_csv};
use crate::config::{ChartFormat, ReportConfig};

/// How each operation ended up, plus the files the run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub artifacts: Vec<PathBuf>,
}

/// Files produced while presenting one summary table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    pub summary_csv: Option<PathBuf>,
    pub charts: Vec<PathBuf>,
}

pub fn chart_sink_for(config: &ReportConfig) -> Option<Box<dyn ChartSink>> {
    match config.chart_format {
        ChartFormat::Svg => Some(Box::new(SvgChartSink::new(&config.output_dir))),
        ChartFormat::Json => Some(Box::new(JsonChartSink::new(&config.output_dir))),
        ChartFormat::None => None,
    }
}

/// Print the table to `out` and export it as CSV when enabled.
pub fn present(table: &SummaryTable, config: &ReportConfig, out: &mut dyn Write) -> Result<Presentation, ReportError> {
    writeln!(out, "\nAverages by TPS - {}:", table.operation.to_uppercase())?;
    writeln!(out, "{}", render_summary(table))?;

    let mut presentation = Presentation::default();

    if config.write_summary_csv {
        let path = write_summary_csv(table, &config.output_dir.join(&table.operation))?;
        info!(operation = %table.operation, path = %path.display(), "Wrote summary CSV");
        presentation.summary_csv = Some(path);
    }

    Ok(presentation)
}

/// Render the four diagnostic charts of `table` into `sink`.
pub fn render_charts(table: &SummaryTable, sink: &mut dyn ChartSink) -> Result<Vec<PathBuf>, ReportError> {
    let paths = build_charts(table)
        .iter()
        .map(|chart| sink.render(&table.operation, chart))
        .collect::<Result<Vec<_>, _>>()?;
    info!(operation = %table.operation, charts = paths.len(), "Rendered charts");
    Ok(paths)
}

fn present_outcome(
    outcome: ProcessOutcome,
    config: &ReportConfig,
    sink: Option<&mut Box<dyn ChartSink>>,
    out: &mut dyn Write,
) -> Result<Option<Presentation>, ReportError> {
    let table = match outcome {
        ProcessOutcome::Summary(table) => table,
        ProcessOutcome::MissingFiles { .. } | ProcessOutcome::NoMemoryData => return Ok(None),
    };

    let mut presentation = present(&table, config, out)?;
    if let Some(sink) = sink {
        presentation.charts = render_charts(&table, sink.as_mut())?;
    }
    Ok(Some(presentation))
}

/// Process every configured operation in order. Failures are logged and do
/// not stop the remaining operations.
pub fn run(config: &ReportConfig, out: &mut dyn Write) -> RunSummary {
    let aggregator = ReportAggregator::new(&config.base_dir);
    let mut sink = chart_sink_for(config);
    let mut summary = RunSummary::default();

    for operation in &config.operations {
        info!(operation = %operation, "Processing operation");

        let result = aggregator
            .process(operation)
            .and_then(|outcome| present_outcome(outcome, config, sink.as_mut(), &mut *out));

        match result {
            Ok(Some(presentation)) => {
                summary.processed.push(operation.clone());
                summary.artifacts.extend(presentation.summary_csv);
                summary.artifacts.extend(presentation.charts);
            }
            Ok(None) => summary.skipped.push(operation.clone()),
            Err(e) => {
                error!(operation = %operation, error = %e, "Failed to process operation");
                summary.failed.push(operation.clone());
            }
        }
    }

    info!(
        processed = summary.processed.len(),
        skipped = summary.skipped.len(),
        failed = summary.failed.len(),
        artifacts = summary.artifacts.len(),
        "Report run complete"
    );

    summary
}
