//! Console rendering and CSV export of a summary table.

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::ReportError;
use super::structs::{LoadKey, SummaryRow, SummaryTable};
use crate::common::constants::{
    AVG_LATENCY_COL, CPU_AVG_COL, LOAD_KEY_COL, MAX_LATENCY_COL, MEMORY_USED_GB_COL, MIN_LATENCY_COL,
    MISSING_VALUE_DISPLAY, SEND_RATE_COL, SUMMARY_CSV_FILE, SUMMARY_DECIMALS, THROUGHPUT_COL,
};
use crate::common::error_utils::ErrorContext;

pub const SUMMARY_COLUMNS: [&str; 8] = [
    LOAD_KEY_COL,
    SEND_RATE_COL,
    MIN_LATENCY_COL,
    AVG_LATENCY_COL,
    MAX_LATENCY_COL,
    THROUGHPUT_COL,
    MEMORY_USED_GB_COL,
    CPU_AVG_COL,
];

/// Format with a fixed number of decimals and `,` thousands separators.
pub fn format_metric(value: Option<f64>) -> String {
    let Some(value) = value else {
        return MISSING_VALUE_DISPLAY.to_string();
    };
    if value.is_nan() {
        return MISSING_VALUE_DISPLAY.to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-inf".to_string() } else { "inf".to_string() };
    }

    let fixed = format!("{:.*}", SUMMARY_DECIMALS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

fn format_load_key(key: LoadKey) -> String {
    if key.is_integral() {
        key.to_string()
    } else {
        format_metric(Some(key.value()))
    }
}

fn row_cells(row: &SummaryRow) -> [String; 8] {
    [
        format_load_key(row.load_key),
        format_metric(row.send_rate),
        format_metric(row.min_latency),
        format_metric(row.avg_latency),
        format_metric(row.max_latency),
        format_metric(row.throughput),
        format_metric(row.memory_used_gb),
        format_metric(row.cpu_avg_percent),
    ]
}

fn format_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(value, &width)| format!("{value:>width$}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the table as right-aligned, space separated columns with a header
/// line. An empty table renders the header only.
pub fn render_summary(table: &SummaryTable) -> String {
    let cells: Vec<[String; 8]> = table.rows.iter().map(row_cells).collect();

    let widths: Vec<usize> = SUMMARY_COLUMNS
        .iter()
        .enumerate()
        .map(|(col, header)| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(format_line(SUMMARY_COLUMNS.iter().copied(), &widths));
    for row in &cells {
        lines.push(format_line(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

/// Write the summary rows to `<dir>/summary.csv` and return the path.
pub fn write_summary_csv(table: &SummaryTable, dir: &Path) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).with_dir_context(dir)?;
    let path = dir.join(SUMMARY_CSV_FILE);

    let mut writer = csv::Writer::from_path(&path)?;
    if table.rows.is_empty() {
        writer.write_record(SUMMARY_COLUMNS)?;
    }
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush().with_render_context(&path)?;

    Ok(path)
}
