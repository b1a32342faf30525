//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::ObservationTable;
use crate::views::{ViewOptions, DEFAULT_BINS};

/// Tabscope - Explore a labeled numeric dataset with summary statistics and charts
#[derive(Parser, Debug)]
#[command(name = "tabscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet).
    /// If not provided, the bundled Iris dataset is used.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Categorical column of the input file.
    /// Every other column is treated as a numeric measurement.
    #[arg(long, default_value = "species")]
    pub label_column: String,

    /// Directory the chart SVG files are written to
    #[arg(short, long, default_value = "charts")]
    pub output_dir: PathBuf,

    /// Column plotted as a cumulative line.
    /// Chart columns left unset use the Iris field when the table has it,
    /// otherwise the first measurement column (the second for scatter-y).
    #[arg(long)]
    pub line_column: Option<String>,

    /// Column whose per-category mean is plotted as bars
    #[arg(long)]
    pub bar_column: Option<String>,

    /// Column plotted as a histogram
    #[arg(long)]
    pub hist_column: Option<String>,

    /// Scatter plot x-axis column
    #[arg(long)]
    pub scatter_x: Option<String>,

    /// Scatter plot y-axis column
    #[arg(long)]
    pub scatter_y: Option<String>,

    /// Number of histogram bins
    #[arg(long, default_value_t = DEFAULT_BINS, value_parser = validate_bins)]
    pub bins: usize,

    /// Number of leading rows to preview
    #[arg(long, default_value = "5")]
    pub head: usize,

    /// Write the inspection, summary and grouped means to this JSON file
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long, default_value = "false")]
    pub no_charts: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Log pipeline details to stderr (overridden by RUST_LOG)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Cli {
    /// Column choices for the four charts, unset ones resolved against `table`.
    pub fn view_options(&self, table: &ObservationTable) -> ViewOptions {
        let defaults = ViewOptions::for_table(table);
        ViewOptions {
            line_column: self.line_column.clone().unwrap_or(defaults.line_column),
            bar_column: self.bar_column.clone().unwrap_or(defaults.bar_column),
            hist_column: self.hist_column.clone().unwrap_or(defaults.hist_column),
            scatter_x: self.scatter_x.clone().unwrap_or(defaults.scatter_x),
            scatter_y: self.scatter_y.clone().unwrap_or(defaults.scatter_y),
            bins: self.bins,
        }
    }

    /// Chart directory, or `None` when charts are disabled.
    pub fn chart_dir(&self) -> Option<&PathBuf> {
        if self.no_charts {
            None
        } else {
            Some(&self.output_dir)
        }
    }
}

/// Validator for the bins parameter
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bin count", s))?;

    if value == 0 {
        Err("bins must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
