//! Diagnostic line charts built from a summary table.
//!
//! [`build_charts`] turns a [`SummaryTable`] into four [`ChartSpec`]s; a
//! [`ChartSink`] decides how they are materialized. Two file sinks ship with
//! the crate: [`SvgChartSink`] draws a standalone SVG per chart and
//! [`JsonChartSink`] dumps the chart description for external plotting tools.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::errors::ReportError;
use super::structs::{SummaryRow, SummaryTable};
use crate::common::error_utils::ErrorContext;

const CHART_WIDTH: f64 = 1000.0;
const CHART_HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const TICK_COUNT: usize = 5;
const DEFAULT_COLORS: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: Option<String>,
    pub dashed: bool,
    /// `(load key, value)` pairs; missing and non-finite values are left out.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// File name without extension, unique per operation.
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_legend: bool,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|series| series.points.is_empty())
    }
}

fn series(
    rows: &[SummaryRow],
    label: &str,
    color: Option<&str>,
    dashed: bool,
    value: impl Fn(&SummaryRow) -> Option<f64>,
) -> Series {
    Series {
        label: label.to_string(),
        color: color.map(str::to_string),
        dashed,
        points: rows
            .iter()
            .filter_map(|row| value(row).map(|v| (row.load_key.value(), v)))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect(),
    }
}

/// Latency overlay, send rate vs throughput, CPU and memory, in that order.
pub fn build_charts(table: &SummaryTable) -> Vec<ChartSpec> {
    let op = table.operation.to_uppercase();
    let rows = &table.rows;

    vec![
        ChartSpec {
            name: "latency".to_string(),
            title: format!("{op} - TPS × Latencies (s)"),
            x_label: "TPS".to_string(),
            y_label: "Time (s)".to_string(),
            show_legend: true,
            series: vec![
                series(rows, "Avg Latency", None, false, |r| r.avg_latency),
                series(rows, "Max Latency", None, true, |r| r.max_latency),
                series(rows, "Min Latency", None, true, |r| r.min_latency),
            ],
        },
        ChartSpec {
            name: "throughput".to_string(),
            title: format!("{op} - TPS × Send Rate / Throughput"),
            x_label: "TPS".to_string(),
            y_label: "TPS".to_string(),
            show_legend: true,
            series: vec![
                series(rows, "Send Rate (TPS)", Some("orange"), false, |r| r.send_rate),
                series(rows, "Throughput (TPS)", Some("green"), false, |r| r.throughput),
            ],
        },
        ChartSpec {
            name: "cpu".to_string(),
            title: format!("{op} - TPS × Avg CPU (%)"),
            x_label: "TPS".to_string(),
            y_label: "Avg CPU (%)".to_string(),
            show_legend: false,
            series: vec![series(rows, "CPU%(avg)", Some("red"), false, |r| r.cpu_avg_percent)],
        },
        ChartSpec {
            name: "memory".to_string(),
            title: format!("{op} - TPS × Avg Memory (GB)"),
            x_label: "TPS".to_string(),
            y_label: "Avg Memory (GB)".to_string(),
            show_legend: false,
            series: vec![series(rows, "Memory_used_GB", Some("purple"), false, |r| r.memory_used_gb)],
        },
    ]
}

/// Destination for rendered charts.
pub trait ChartSink {
    /// Render one chart for `operation`, returning where it ended up.
    fn render(&mut self, operation: &str, chart: &ChartSpec) -> Result<PathBuf, ReportError>;
}

fn chart_path(output_dir: &Path, operation: &str, chart: &ChartSpec, extension: &str) -> Result<PathBuf, ReportError> {
    let dir = output_dir.join(operation);
    fs::create_dir_all(&dir).with_dir_context(&dir)?;
    Ok(dir.join(format!("{}.{}", chart.name, extension)))
}

/// Writes `<output_dir>/<operation>/<chart>.svg`.
#[derive(Debug, Clone)]
pub struct SvgChartSink {
    output_dir: PathBuf,
}

impl SvgChartSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }
}

impl ChartSink for SvgChartSink {
    fn render(&mut self, operation: &str, chart: &ChartSpec) -> Result<PathBuf, ReportError> {
        let path = chart_path(&self.output_dir, operation, chart, "svg")?;
        fs::write(&path, render_svg(chart)).with_render_context(&path)?;
        debug!(chart = %chart.name, path = %path.display(), "Wrote SVG chart");
        Ok(path)
    }
}

/// Writes `<output_dir>/<operation>/<chart>.json`.
#[derive(Debug, Clone)]
pub struct JsonChartSink {
    output_dir: PathBuf,
}

impl JsonChartSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }
}

impl ChartSink for JsonChartSink {
    fn render(&mut self, operation: &str, chart: &ChartSpec) -> Result<PathBuf, ReportError> {
        let path = chart_path(&self.output_dir, operation, chart, "json")?;
        let json = serde_json::to_string_pretty(chart)?;
        fs::write(&path, json).with_render_context(&path)?;
        debug!(chart = %chart.name, path = %path.display(), "Wrote chart description");
        Ok(path)
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Axis bounds over all points, padded when the data is flat.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return (min - pad, max + pad);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn tick_label(value: f64) -> String {
    if value.abs() >= 100.0 || value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.3}")
    }
}

/// Draw a chart as a standalone SVG document.
pub fn render_svg(chart: &ChartSpec) -> String {
    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = write_svg(&mut svg, chart);
    svg
}

fn write_svg(svg: &mut String, chart: &ChartSpec) -> fmt::Result {
    let points = || chart.series.iter().flat_map(|s| s.points.iter());
    let (x_min, x_max) = bounds(points().map(|p| p.0));
    let (y_min, y_max) = bounds(points().map(|p| p.1));

    let plot_w = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let sx = |x: f64| MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
    let sy = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / (y_max - y_min) * plot_h;

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CHART_WIDTH}" height="{CHART_HEIGHT}" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" font-family="sans-serif">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="18">{}</text>"#,
        CHART_WIDTH / 2.0,
        MARGIN_TOP / 2.0,
        escape_xml(&chart.title)
    )?;

    // Grid and ticks
    for i in 0..=TICK_COUNT {
        let t = i as f64 / TICK_COUNT as f64;
        let x_val = x_min + t * (x_max - x_min);
        let y_val = y_min + t * (y_max - y_min);
        let (x, y) = (sx(x_val), sy(y_val));
        writeln!(
            svg,
            r##"<line x1="{x:.1}" y1="{MARGIN_TOP}" x2="{x:.1}" y2="{:.1}" stroke="#dddddd"/>"##,
            MARGIN_TOP + plot_h
        )?;
        writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
            MARGIN_LEFT + plot_w
        )?;
        writeln!(
            svg,
            r#"<text x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
            MARGIN_TOP + plot_h + 18.0,
            tick_label(x_val)
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{}</text>"#,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            tick_label(y_val)
        )?;
    }

    writeln!(
        svg,
        r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{plot_w}" height="{plot_h}" fill="none" stroke="black"/>"#
    )?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        CHART_HEIGHT - 20.0,
        escape_xml(&chart.x_label)
    )?;
    writeln!(
        svg,
        r#"<text x="20" y="{0:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {0:.1})">{1}</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        escape_xml(&chart.y_label)
    )?;

    for (i, s) in chart.series.iter().enumerate() {
        let color = s
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_COLORS[i % DEFAULT_COLORS.len()].to_string());
        let dash = if s.dashed { r#" stroke-dasharray="8 5""# } else { "" };
        let coords: Vec<String> = s
            .points
            .iter()
            .map(|&(x, y)| format!("{:.1},{:.1}", sx(x), sy(y)))
            .collect();

        if coords.len() > 1 {
            writeln!(
                svg,
                r#"<polyline fill="none" stroke="{color}" stroke-width="2"{dash} points="{}"/>"#,
                coords.join(" ")
            )?;
        }
        for &(x, y) in &s.points {
            writeln!(svg, r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{color}"/>"#, sx(x), sy(y))?;
        }

        if chart.show_legend {
            let ly = MARGIN_TOP + 20.0 + i as f64 * 20.0;
            let lx = MARGIN_LEFT + plot_w - 180.0;
            writeln!(
                svg,
                r#"<line x1="{lx:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" stroke="{color}" stroke-width="2"{dash}/>"#,
                lx + 30.0
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                lx + 38.0,
                ly + 4.0,
                escape_xml(&s.label)
            )?;
        }
    }

    svg.push_str("</svg>\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::structs::{JoinStats, LoadKey, MemorySource};
    use tempfile::TempDir;

    fn row(tps: f64, avg: Option<f64>) -> SummaryRow {
        SummaryRow {
            load_key: LoadKey::new(tps).unwrap(),
            send_rate: Some(tps),
            min_latency: Some(0.1),
            avg_latency: avg,
            max_latency: Some(1.0),
            throughput: Some(tps * 0.9),
            memory_used_gb: Some(2.0),
            cpu_avg_percent: Some(30.0),
        }
    }

    fn table() -> SummaryTable {
        SummaryTable {
            operation: "transfer".to_string(),
            rows: vec![row(10.0, Some(0.5)), row(20.0, None), row(30.0, Some(0.8))],
            memory_source: MemorySource::Gigabytes,
            join_stats: JoinStats::default(),
        }
    }

    #[test]
    fn test_build_charts_titles_and_series() {
        let charts = build_charts(&table());
        let names: Vec<&str> = charts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["latency", "throughput", "cpu", "memory"]);

        assert_eq!(charts[0].title, "TRANSFER - TPS × Latencies (s)");
        assert_eq!(charts[0].series.len(), 3);
        assert!(charts[0].series[1].dashed && charts[0].series[2].dashed);
        assert_eq!(charts[1].series.len(), 2);
        assert_eq!(charts[2].series.len(), 1);
        assert_eq!(charts[3].y_label, "Avg Memory (GB)");
    }

    #[test]
    fn test_series_skips_missing_values() {
        let charts = build_charts(&table());
        assert_eq!(charts[0].series[0].points, vec![(10.0, 0.5), (30.0, 0.8)]);
        assert_eq!(charts[0].series[1].points.len(), 3);
    }

    #[test]
    fn test_render_svg_contains_series() {
        let charts = build_charts(&table());
        let svg = render_svg(&charts[1]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("stroke=\"orange\""));
        assert!(svg.contains("Send Rate (TPS)"));
    }

    #[test]
    fn test_render_svg_handles_empty_and_flat_data() {
        let mut empty = table();
        empty.rows.clear();
        let charts = build_charts(&empty);
        assert!(charts[0].is_empty());
        assert!(!render_svg(&charts[0]).contains("NaN"));

        let flat = build_charts(&table());
        assert!(!render_svg(&flat[3]).contains("NaN"));
    }

    #[test]
    fn test_file_sinks_write_per_operation() {
        let temp_dir = TempDir::new().unwrap();
        let charts = build_charts(&table());

        let mut svg_sink = SvgChartSink::new(temp_dir.path());
        let svg_path = svg_sink.render("transfer", &charts[0]).unwrap();
        assert_eq!(svg_path, temp_dir.path().join("transfer").join("latency.svg"));
        assert!(svg_path.exists());

        let mut json_sink = JsonChartSink::new(temp_dir.path());
        let json_path = json_sink.render("transfer", &charts[2]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(value["title"], "TRANSFER - TPS × Avg CPU (%)");
        assert_eq!(value["series"][0]["points"][0][1], 30.0);
    }
}
