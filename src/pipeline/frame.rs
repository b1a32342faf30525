//! Observation table: measurements plus one categorical label column

use std::collections::BTreeSet;

use polars::prelude::*;

use super::error::{PipelineError, PipelineResult};
use super::loader::RawDataset;

/// A rectangular table of measurement columns followed by a label column.
///
/// The table owns its `DataFrame`. Transformations such as
/// [`remediate`](super::remediate) consume a table and return a new one.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    frame: DataFrame,
    label_column: String,
    categories: Vec<String>,
}

/// Assemble the loader outputs into one observation table.
///
/// Columns are the measurement fields in loader order, then the label
/// column holding category names resolved from each row's code.
/// Inputs that are not rectangular are refused rather than truncated.
/// Category names that no row uses are left out of the table's categories.
pub fn build_frame(raw: &RawDataset) -> PipelineResult<ObservationTable> {
    let rows = raw.n_observations();
    let width = raw.n_features();

    if raw.codes.len() != rows {
        return Err(PipelineError::ShapeMismatch(format!(
            "{} observation rows but {} category codes",
            rows,
            raw.codes.len()
        )));
    }
    if let Some((row, values)) = raw
        .values
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != width)
    {
        return Err(PipelineError::ShapeMismatch(format!(
            "row {} has {} values but {} field names were supplied",
            row,
            values.len(),
            width
        )));
    }

    let labels: Vec<Option<&str>> = raw
        .codes
        .iter()
        .enumerate()
        .map(|(row, code)| match code {
            None => Ok(None),
            Some(code) => raw
                .category_names
                .get(*code)
                .map(|name| Some(name.as_str()))
                .ok_or(PipelineError::UnknownCategoryCode {
                    row,
                    code: *code,
                    available: raw.category_names.len(),
                }),
        })
        .collect::<PipelineResult<_>>()?;

    // The category set is the labels actually present, in code order
    let present: BTreeSet<usize> = raw.codes.iter().flatten().copied().collect();
    let categories: Vec<String> = present
        .iter()
        .filter_map(|&code| raw.category_names.get(code).cloned())
        .collect();
    if categories.len() < raw.category_names.len() {
        log::debug!(
            "Dropped {} category name(s) with no rows",
            raw.category_names.len() - categories.len()
        );
    }

    let mut columns: Vec<Column> = Vec::with_capacity(width + 1);
    for (idx, name) in raw.feature_names.iter().enumerate() {
        let values: Vec<Option<f64>> = raw.values.iter().map(|row| row[idx]).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    columns.push(Column::new(raw.label_name.as_str().into(), labels));

    let frame = DataFrame::new(columns)?;
    log::debug!("Built observation table with shape {:?}", frame.shape());

    Ok(ObservationTable {
        frame,
        label_column: raw.label_name.clone(),
        categories,
    })
}

impl ObservationTable {
    /// Replace the underlying frame, keeping label column and categories.
    pub(crate) fn with_frame(&self, frame: DataFrame) -> PipelineResult<Self> {
        if frame.column(&self.label_column).is_err() {
            return Err(PipelineError::ColumnNotFound(self.label_column.clone()));
        }
        Ok(Self {
            frame,
            label_column: self.label_column.clone(),
            categories: self.categories.clone(),
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// The ordered category set; a category's index is its code.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Numeric columns other than the label, in table order.
    pub fn measurement_columns(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|col| {
                col.name().as_str() != self.label_column && col.dtype().is_primitive_numeric()
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Values of one measurement column as `f64`, `None` for missing cells.
    pub fn numeric_values(&self, column: &str) -> PipelineResult<Vec<Option<f64>>> {
        let col = self
            .frame
            .column(column)
            .map_err(|_| PipelineError::ColumnNotFound(column.to_string()))?;

        if column == self.label_column || !col.dtype().is_primitive_numeric() {
            return Err(PipelineError::NotNumeric {
                column: column.to_string(),
                dtype: col.dtype().to_string(),
            });
        }

        let floats = col.as_materialized_series().cast(&DataType::Float64)?;
        Ok(floats.f64()?.into_iter().collect())
    }

    /// Label of every row, `None` for missing labels.
    pub fn labels(&self) -> PipelineResult<Vec<Option<String>>> {
        let col = self
            .frame
            .column(&self.label_column)
            .map_err(|_| PipelineError::ColumnNotFound(self.label_column.clone()))?;
        let strings = col.as_materialized_series().cast(&DataType::String)?;
        Ok(strings
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    /// Category code of every row, resolved against [`categories`](Self::categories).
    pub fn category_codes(&self) -> PipelineResult<Vec<Option<usize>>> {
        Ok(self
            .labels()?
            .iter()
            .map(|label| {
                label
                    .as_ref()
                    .and_then(|l| self.categories.iter().position(|c| c == l))
            })
            .collect())
    }
}
