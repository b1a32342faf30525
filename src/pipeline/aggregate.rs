//! Descriptive statistics and per-category grouped means

use serde::Serialize;

use super::error::PipelineResult;
use super::frame::ObservationTable;

/// Describe-style statistics of one numeric column.
///
/// Statistics that are undefined for the available values are `None`:
/// everything but `count` for an all-missing column, `std` below two values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Whole-table summary, one entry per numeric column in table order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Means of every numeric column within one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub category: String,
    /// Rows in this partition
    pub count: usize,
    /// One mean per entry of [`GroupedMeans::columns`]
    pub means: Vec<Option<f64>>,
}

/// Per-category means, in the table's category order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedMeans {
    pub label_column: String,
    pub columns: Vec<String>,
    pub groups: Vec<GroupMean>,
}

/// The category with the largest mean for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub column: String,
    pub category: String,
    pub mean: f64,
}

impl GroupedMeans {
    pub fn categories(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.category.as_str()).collect()
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Mean of `column` within `category`
    pub fn mean(&self, category: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.groups
            .iter()
            .find(|g| g.category == category)
            .and_then(|g| g.means[idx])
    }

    /// Per-category means of one column, in group order.
    /// Returns `None` if the column was not aggregated.
    pub fn column(&self, column: &str) -> Option<Vec<(&str, Option<f64>)>> {
        let idx = self.column_index(column)?;
        Some(
            self.groups
                .iter()
                .map(|g| (g.category.as_str(), g.means[idx]))
                .collect(),
        )
    }

    /// Category with the largest mean for `column`; ties go to the first in order.
    pub fn largest_mean(&self, column: &str) -> Option<(&str, f64)> {
        self.column(column)?
            .into_iter()
            .filter_map(|(category, mean)| mean.map(|m| (category, m)))
            .fold(None, |best: Option<(&str, f64)>, (category, mean)| match best {
                Some((_, best_mean)) if best_mean >= mean => best,
                _ => Some((category, mean)),
            })
    }

    /// Largest-mean category for every aggregated column
    pub fn insights(&self) -> Vec<Insight> {
        self.columns
            .iter()
            .filter_map(|column| {
                self.largest_mean(column).map(|(category, mean)| Insight {
                    column: column.clone(),
                    category: category.to_string(),
                    mean,
                })
            })
            .collect()
    }
}

/// Both aggregation results for one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub summary: TableSummary,
    pub grouped: GroupedMeans,
}

/// Compute the whole-table summary and the grouped means.
pub fn aggregate(table: &ObservationTable) -> PipelineResult<Aggregation> {
    Ok(Aggregation {
        summary: describe(table)?,
        grouped: grouped_means(table)?,
    })
}

/// Describe every numeric column of the table.
pub fn describe(table: &ObservationTable) -> PipelineResult<TableSummary> {
    let columns = table
        .measurement_columns()
        .iter()
        .map(|name| {
            let values = table.numeric_values(name)?;
            Ok(summarize_values(name, &values))
        })
        .collect::<PipelineResult<Vec<_>>>()?;

    Ok(TableSummary { columns })
}

/// Describe-style statistics over the non-missing values of one column.
pub fn summarize_values(column: &str, values: &[Option<f64>]) -> ColumnSummary {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(|a, b| a.total_cmp(b));

    ColumnSummary {
        column: column.to_string(),
        count: present.len(),
        mean: mean(&present),
        std: sample_std(&present),
        min: present.first().copied(),
        q25: quantile(&present, 0.25),
        median: quantile(&present, 0.5),
        q75: quantile(&present, 0.75),
        max: present.last().copied(),
    }
}

/// Arithmetic mean, `None` for no values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Quantile of ascending-sorted values with linear interpolation.
///
/// The quantile sits at fractional position `q * (n - 1)` and is
/// interpolated between the two neighbouring order statistics.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Partition rows by label and average every numeric column per partition.
///
/// Rows with a missing label belong to no partition. Missing cells are
/// skipped within a partition.
pub fn grouped_means(table: &ObservationTable) -> PipelineResult<GroupedMeans> {
    let codes = table.category_codes()?;
    let columns = table.measurement_columns();
    let values = columns
        .iter()
        .map(|name| table.numeric_values(name))
        .collect::<PipelineResult<Vec<_>>>()?;

    let mut partitions: Vec<Vec<usize>> = vec![Vec::new(); table.categories().len()];
    for (row, code) in codes.iter().enumerate() {
        if let Some(code) = code {
            partitions[*code].push(row);
        }
    }

    // Groups follow the table's category order
    let groups = table
        .categories()
        .iter()
        .zip(partitions)
        .filter(|(_, rows)| !rows.is_empty())
        .map(|(category, rows)| {
            let means = values
                .iter()
                .map(|column| {
                    let present: Vec<f64> = rows.iter().filter_map(|&row| column[row]).collect();
                    mean(&present)
                })
                .collect();
            GroupMean {
                category: category.clone(),
                count: rows.len(),
                means,
            }
        })
        .collect();

    Ok(GroupedMeans {
        label_column: table.label_column().to_string(),
        columns,
        groups,
    })
}
