//! Console reports for each pipeline stage

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::DataFrame;

use crate::pipeline::{ColumnSummary, GroupedMeans, InspectionReport, TableSummary};
use crate::views::ViewOutcome;

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn print_section(title: &str) {
    println!();
    println!("    {}", style(title).white().bold());
}

fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "NaN".to_string(),
    }
}

fn numeric_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Print the first rows of the table.
pub fn display_preview(df: &DataFrame) {
    print_section(&format!("First {} rows of the dataset:", df.height()));

    let mut header = vec![String::new()];
    header.extend(df.get_column_names().iter().map(|s| s.to_string()));
    let mut table = new_table(header);

    for row in 0..df.height() {
        let mut cells = vec![Cell::new(row).fg(Color::DarkGrey)];
        for col in df.get_columns() {
            let text = col
                .get(row)
                .map(|v| v.to_string())
                .unwrap_or_else(|_| "?".to_string());
            cells.push(Cell::new(text.trim_matches('"')));
        }
        table.add_row(cells);
    }
    print_indented(&table);
}

/// Print shape, column types and missing counts.
pub fn display_inspection(report: &InspectionReport) {
    print_section("Dataset info:");
    println!("      Rows: {}", report.rows);
    println!("      Columns: {}", report.columns);

    let mut table = new_table(vec![
        "Column".to_string(),
        "Dtype".to_string(),
        "Non-missing".to_string(),
        "Missing".to_string(),
    ]);
    for col in &report.column_reports {
        table.add_row(vec![
            Cell::new(&col.name),
            Cell::new(&col.dtype),
            numeric_cell(col.non_missing.to_string()),
            numeric_cell(col.missing.to_string()).fg(if col.missing > 0 {
                Color::Red
            } else {
                Color::White
            }),
        ]);
    }
    print_indented(&table);
}

/// Print the describe-style summary: one column per numeric field.
pub fn display_describe(summary: &TableSummary) {
    print_section("Summary statistics:");

    let mut header = vec![String::new()];
    header.extend(summary.columns.iter().map(|c| c.column.clone()));
    let mut table = new_table(header);

    let rows: [(&str, fn(&ColumnSummary) -> String); 8] = [
        ("count", |c: &ColumnSummary| format!("{:.6}", c.count as f64)),
        ("mean", |c: &ColumnSummary| format_stat(c.mean)),
        ("std", |c: &ColumnSummary| format_stat(c.std)),
        ("min", |c: &ColumnSummary| format_stat(c.min)),
        ("25%", |c: &ColumnSummary| format_stat(c.q25)),
        ("50%", |c: &ColumnSummary| format_stat(c.median)),
        ("75%", |c: &ColumnSummary| format_stat(c.q75)),
        ("max", |c: &ColumnSummary| format_stat(c.max)),
    ];

    for (name, stat) in rows.iter() {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(summary.columns.iter().map(|c| numeric_cell(stat(c))));
        table.add_row(cells);
    }
    print_indented(&table);
}

/// Print grouped means: one row per category.
pub fn display_grouped_means(grouped: &GroupedMeans) {
    print_section(&format!("Mean values per {}:", grouped.label_column));

    let mut header = vec![grouped.label_column.clone()];
    header.extend(grouped.columns.iter().cloned());
    let mut table = new_table(header);

    for group in &grouped.groups {
        let mut cells = vec![Cell::new(&group.category).fg(Color::Cyan)];
        cells.extend(group.means.iter().map(|m| numeric_cell(format_stat(*m))));
        table.add_row(cells);
    }
    print_indented(&table);
}

/// Print which category has the largest mean for each column.
pub fn display_insights(grouped: &GroupedMeans) {
    print_section("Observations:");
    let insights = grouped.insights();
    if insights.is_empty() {
        println!("      {}", style("No category means to compare").dim());
    }
    for insight in insights {
        println!(
            "      {} {} has the largest average {} ({:.3})",
            style("•").dim(),
            style(&insight.category).cyan().bold(),
            insight.column,
            insight.mean
        );
    }
}

/// Print the outcome of every chart.
pub fn display_view_outcomes(outcomes: &[ViewOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(path) => println!(
                "      {} {:<16} {}",
                style("✓").green().bold(),
                outcome.kind.to_string(),
                style(path.display()).dim()
            ),
            Err(e) => println!(
                "      {} {:<16} {}",
                style("✗").red().bold(),
                outcome.kind.to_string(),
                style(format!("{:#}", e)).red()
            ),
        }
    }
}

/// Summary of one exploration run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows: usize,
    pub columns: usize,
    pub categories: usize,
    pub missing_before: usize,
    pub missing_after: usize,
    pub charts_rendered: usize,
    pub charts_failed: usize,
    pub load_time: Duration,
    pub inspect_time: Duration,
    pub aggregate_time: Duration,
    pub chart_time: Duration,
}

impl RunSummary {
    pub fn new(rows: usize, columns: usize, categories: usize) -> Self {
        Self {
            rows,
            columns,
            categories,
            ..Default::default()
        }
    }

    pub fn set_missing(&mut self, before: usize, after: usize) {
        self.missing_before = before;
        self.missing_after = after;
    }

    pub fn add_chart_outcomes(&mut self, outcomes: &[ViewOutcome]) {
        self.charts_rendered = outcomes.iter().filter(|o| o.is_ok()).count();
        self.charts_failed = outcomes.len() - self.charts_rendered;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.inspect_time + self.aggregate_time + self.chart_time
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("EXPLORATION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = new_table(vec!["Metric".to_string(), "Value".to_string()]);

        table.add_row(vec![Cell::new("📏 Rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("📐 Columns"), Cell::new(self.columns)]);
        table.add_row(vec![Cell::new("🏷️  Categories"), Cell::new(self.categories)]);
        table.add_row(vec![
            Cell::new("🕳️  Missing (before fill)"),
            Cell::new(self.missing_before).fg(if self.missing_before == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("🩹 Missing (after fill)"),
            Cell::new(self.missing_after).fg(if self.missing_after == 0 {
                Color::Green
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("📊 Charts rendered"),
            Cell::new(self.charts_rendered)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        if self.charts_failed > 0 {
            table.add_row(vec![
                Cell::new("⚠️  Charts failed"),
                Cell::new(self.charts_failed).fg(Color::Red),
            ]);
        }
        table.add_row(vec![
            Cell::new("⏱️  Total time"),
            Cell::new(format!("{:.2?}", self.total_time())),
        ]);

        print_indented(&table);
    }
}
