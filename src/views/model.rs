//! Chart view construction
//!
//! Each function turns the table (or the grouped means) into the data one
//! chart needs. Nothing here draws; see [`super::render`].

use serde::Serialize;

use crate::pipeline::{GroupedMeans, ObservationTable, PipelineError, PipelineResult};

/// Running sum of one column against row index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    pub column: String,
    /// (row index, running sum); rows with a missing or non-finite cell
    /// have no point, nor does a sum that overflowed
    pub points: Vec<(usize, f64)>,
}

/// One bar of a [`BarView`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub category: String,
    pub value: Option<f64>,
}

/// Grouped mean of one column, one bar per category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarView {
    pub column: String,
    pub label_column: String,
    pub bars: Vec<Bar>,
}

/// Binned frequency distribution of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramView {
    pub column: String,
    /// `counts.len() + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// Non-finite values that fall in no bin
    pub skipped: usize,
}

impl HistogramView {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Index into [`ScatterView::legend`]
    pub code: usize,
}

/// One column against another, coloured by category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterView {
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<ScatterPoint>,
    /// Category names indexed by code
    pub legend: Vec<String>,
}

impl ScatterView {
    /// Points of one category
    pub fn series(&self, code: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .filter(move |p| p.code == code)
            .map(|p| (p.x, p.y))
    }
}

/// Prefix sum of `column` plotted against row index.
///
/// Infinite cells are skipped like missing ones.
pub fn cumulative_line(table: &ObservationTable, column: &str) -> PipelineResult<LineView> {
    let values = table.numeric_values(column)?;

    let mut running = 0.0;
    let points = values
        .iter()
        .enumerate()
        .filter_map(|(row, value)| {
            let v = value.filter(|v| v.is_finite())?;
            running += v;
            running.is_finite().then_some((row, running))
        })
        .collect();

    Ok(LineView {
        column: column.to_string(),
        points,
    })
}

/// One bar per category, in grouped-means order.
pub fn grouped_bar(grouped: &GroupedMeans, column: &str) -> PipelineResult<BarView> {
    let means = grouped
        .column(column)
        .ok_or_else(|| PipelineError::ColumnNotFound(column.to_string()))?;

    Ok(BarView {
        column: column.to_string(),
        label_column: grouped.label_column.clone(),
        bars: means
            .into_iter()
            .map(|(category, value)| Bar {
                category: category.to_string(),
                value,
            })
            .collect(),
    })
}

/// Equal-width histogram of the non-missing values of `column`.
pub fn histogram(
    table: &ObservationTable,
    column: &str,
    bins: usize,
) -> PipelineResult<HistogramView> {
    let values: Vec<f64> = table.numeric_values(column)?.into_iter().flatten().collect();
    let (edges, counts) = bin_values(&values, bins);
    let skipped = values.iter().filter(|v| !v.is_finite()).count();
    if skipped > 0 {
        log::warn!(
            "{} non-finite value(s) of '{}' left out of the histogram",
            skipped,
            column
        );
    }

    Ok(HistogramView {
        column: column.to_string(),
        edges,
        counts,
        skipped,
    })
}

/// Count `values` into `bins` equal-width bins spanning their range.
///
/// Bins are half-open except the last, which also holds the maximum.
/// A constant sample spans [v - 0.5, v + 0.5]; an empty one [0, 1].
/// Non-finite values are not counted. Spans wider than `f64::MAX` are
/// handled without overflow.
pub fn bin_values(values: &[f64], bins: usize) -> (Vec<f64>, Vec<usize>) {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    let (mut low, mut high) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if finite.is_empty() {
        low = 0.0;
        high = 1.0;
    } else if low == high {
        // at least a few ulps so huge constants still get a non-empty span
        let pad = 0.5f64.max(low.abs() * f64::EPSILON * 4.0);
        low = (low - pad).max(f64::MIN);
        high = (high + pad).min(f64::MAX);
    }

    // high - low may overflow; the quotients never do
    let step = bins as f64;
    let width = high / step - low / step;
    let mut edges: Vec<f64> = (0..bins).map(|i| low + width * i as f64).collect();
    edges.push(high);

    let mut counts = vec![0usize; bins];
    for &v in &finite {
        let offset = v - low;
        let position = if offset.is_finite() {
            offset / width
        } else {
            v / width - low / width
        };
        let idx = (position.floor().max(0.0) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    (edges, counts)
}

/// `x` against `y`, one point per row with both values finite and a label.
pub fn scatter(table: &ObservationTable, x: &str, y: &str) -> PipelineResult<ScatterView> {
    let xs = table.numeric_values(x)?;
    let ys = table.numeric_values(y)?;
    let codes = table.category_codes()?;

    let points = xs
        .iter()
        .zip(&ys)
        .zip(&codes)
        .filter_map(|((x, y), code)| {
            Some(ScatterPoint {
                x: x.filter(|v| v.is_finite())?,
                y: y.filter(|v| v.is_finite())?,
                code: (*code)?,
            })
        })
        .collect();

    Ok(ScatterView {
        x_column: x.to_string(),
        y_column: y.to_string(),
        points,
        legend: table.categories().to_vec(),
    })
}
