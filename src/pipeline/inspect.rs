//! Table inspection and missing value remediation

use polars::prelude::*;
use serde::Serialize;

use super::error::PipelineResult;
use super::frame::ObservationTable;

/// Declared type and missing count of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub dtype: String,
    pub missing: usize,
    pub non_missing: usize,
}

/// Shape and per-column report of an observation table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionReport {
    pub rows: usize,
    pub columns: usize,
    pub column_reports: Vec<ColumnReport>,
}

impl InspectionReport {
    pub fn total_missing(&self) -> usize {
        self.column_reports.iter().map(|c| c.missing).sum()
    }

    /// Names of columns with at least one missing cell
    pub fn columns_with_missing(&self) -> Vec<&str> {
        self.column_reports
            .iter()
            .filter(|c| c.missing > 0)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn missing_for(&self, column: &str) -> Option<usize> {
        self.column_reports
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.missing)
    }
}

/// Report shape, column types and missing counts.
pub fn inspect(table: &ObservationTable) -> InspectionReport {
    let (rows, columns) = table.shape();

    let column_reports = table
        .frame()
        .get_columns()
        .iter()
        .map(|col| {
            let missing = col.null_count();
            ColumnReport {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                missing,
                non_missing: col.len() - missing,
            }
        })
        .collect();

    let report = InspectionReport {
        rows,
        columns,
        column_reports,
    };
    log::info!(
        "Inspected table: {} rows, {} columns, {} missing cells",
        report.rows,
        report.columns,
        report.total_missing()
    );
    report
}

/// Forward-fill missing cells in every column.
///
/// Each missing cell takes the nearest preceding non-missing value of the
/// same column. Cells before a column's first value stay missing: there is
/// nothing to carry forward. Applying this twice equals applying it once.
pub fn remediate(table: ObservationTable) -> PipelineResult<ObservationTable> {
    let filled = table
        .frame()
        .get_columns()
        .iter()
        .map(|col| {
            if col.null_count() == 0 {
                return Ok(col.clone());
            }
            col.as_materialized_series()
                .fill_null(FillNullStrategy::Forward(None))
                .map(Column::from)
        })
        .collect::<PolarsResult<Vec<Column>>>()?;

    let remediated = table.with_frame(DataFrame::new(filled)?)?;
    log::info!(
        "Forward-filled missing cells: {} remain",
        remediated
            .frame()
            .get_columns()
            .iter()
            .map(|c| c.null_count())
            .sum::<usize>()
    );
    Ok(remediated)
}

/// First `n` rows of the table.
pub fn preview(table: &ObservationTable, n: usize) -> DataFrame {
    table.frame().head(Some(n))
}
