//! Views module - the four descriptive charts
//!
//! Every view is built and rendered on its own. A view that cannot be
//! built (unknown column) or drawn (I/O error) is reported and the
//! remaining views are still attempted.

pub mod model;
pub mod render;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::pipeline::{GroupedMeans, ObservationTable};

pub use model::*;
pub use render::*;

/// Number of histogram bins unless configured otherwise
pub const DEFAULT_BINS: usize = 10;

/// The four chart kinds, in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    CumulativeLine,
    GroupedBar,
    Histogram,
    Scatter,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::CumulativeLine,
        ViewKind::GroupedBar,
        ViewKind::Histogram,
        ViewKind::Scatter,
    ];

    /// Output file name inside the chart directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::CumulativeLine => "cumulative_line.svg",
            Self::GroupedBar => "grouped_bar.svg",
            Self::Histogram => "histogram.svg",
            Self::Scatter => "scatter.svg",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CumulativeLine => "Cumulative line",
            Self::GroupedBar => "Grouped bar",
            Self::Histogram => "Histogram",
            Self::Scatter => "Scatter",
        };
        f.write_str(name)
    }
}

/// Which columns each chart uses
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub line_column: String,
    pub bar_column: String,
    pub hist_column: String,
    pub scatter_x: String,
    pub scatter_y: String,
    pub bins: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            line_column: "sepal length (cm)".to_string(),
            bar_column: "petal length (cm)".to_string(),
            hist_column: "sepal width (cm)".to_string(),
            scatter_x: "sepal length (cm)".to_string(),
            scatter_y: "petal length (cm)".to_string(),
            bins: DEFAULT_BINS,
        }
    }
}

impl ViewOptions {
    /// Default columns for `table`.
    ///
    /// Each chart keeps its Iris field when the table has that column;
    /// otherwise it falls back to the first measurement column, or the
    /// second for the scatter y-axis.
    pub fn for_table(table: &ObservationTable) -> Self {
        let measurements = table.measurement_columns();
        let pick = |preferred: String, fallback: Option<&String>| {
            if measurements.contains(&preferred) {
                preferred
            } else {
                fallback.cloned().unwrap_or(preferred)
            }
        };
        let first = measurements.first();
        let second = measurements.get(1).or(first);

        let defaults = Self::default();
        Self {
            line_column: pick(defaults.line_column, first),
            bar_column: pick(defaults.bar_column, first),
            hist_column: pick(defaults.hist_column, first),
            scatter_x: pick(defaults.scatter_x, first),
            scatter_y: pick(defaults.scatter_y, second),
            bins: defaults.bins,
        }
    }
}

/// Result of attempting one chart
#[derive(Debug)]
pub struct ViewOutcome {
    pub kind: ViewKind,
    pub result: Result<PathBuf>,
}

impl ViewOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Build and render one chart into `out_dir`.
pub fn render_view(
    kind: ViewKind,
    table: &ObservationTable,
    grouped: &GroupedMeans,
    options: &ViewOptions,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join(kind.file_name());

    let rendered = match kind {
        ViewKind::CumulativeLine => {
            let view = cumulative_line(table, &options.line_column)?;
            render_line(&view, &path)
        }
        ViewKind::GroupedBar => {
            let view = grouped_bar(grouped, &options.bar_column)?;
            render_bar(&view, &path)
        }
        ViewKind::Histogram => {
            let view = histogram(table, &options.hist_column, options.bins)?;
            render_histogram(&view, &path)
        }
        ViewKind::Scatter => {
            let view = scatter(table, &options.scatter_x, &options.scatter_y)?;
            render_scatter(&view, &path)
        }
    };
    rendered.with_context(|| format!("Failed to render {} chart", kind))?;

    Ok(path)
}

/// Attempt every chart; one failure never stops the others.
pub fn render_all(
    table: &ObservationTable,
    grouped: &GroupedMeans,
    options: &ViewOptions,
    out_dir: &Path,
) -> Vec<ViewOutcome> {
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        log::warn!("Could not create {}: {}", out_dir.display(), e);
    }

    ViewKind::ALL
        .iter()
        .map(|&kind| {
            let result = render_view(kind, table, grouped, options, out_dir);
            match &result {
                Ok(path) => log::info!("{} chart saved: {}", kind, path.display()),
                Err(e) => log::warn!("{:#}", e),
            }
            ViewOutcome { kind, result }
        })
        .collect()
}
