//! Dataset loader for the bundled reference dataset and CSV/Parquet files

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, PipelineResult};
use super::iris;

/// Loader output: a numeric matrix plus one category code per row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    /// Observations, one inner vector of measurements per row
    pub values: Vec<Vec<Option<f64>>>,
    /// Measurement names, one per inner-vector position
    pub feature_names: Vec<String>,
    /// Category code per row; `None` is a missing label
    pub codes: Vec<Option<usize>>,
    /// Category names indexed by code
    pub category_names: Vec<String>,
    /// Name of the categorical column
    pub label_name: String,
}

impl RawDataset {
    pub fn n_observations(&self) -> usize {
        self.values.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Where a dataset came from, recorded in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetSource {
    Bundled { name: String },
    File { path: PathBuf },
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled { name } => write!(f, "{} (bundled)", name),
            Self::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Load the bundled Iris dataset. This path cannot fail.
pub fn load_bundled() -> RawDataset {
    iris::dataset()
}

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// Every column except `label_column` is a measurement column and must be
/// numeric. The label column may hold any type; its values are read as
/// strings and the category list is the sorted set of distinct labels.
///
/// # Errors
/// * `NotFound` if `path` does not exist
/// * `Io` if the file exists but cannot be opened
/// * `UnsupportedFormat` for extensions other than csv/parquet
/// * `ParseFailure` if the content is not a labeled numeric table
pub fn load_file(
    path: &Path,
    label_column: &str,
    infer_schema_length: usize,
) -> PipelineResult<RawDataset> {
    let file = open_source(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match extension.as_str() {
        "csv" => read_csv(file, path, infer_schema_length)?,
        "parquet" => read_parquet(file, path)?,
        _ => return Err(PipelineError::UnsupportedFormat { extension }),
    };

    log::debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    raw_from_frame(&df, label_column).map_err(|reason| PipelineError::ParseFailure {
        path: path.to_path_buf(),
        reason,
    })
}

/// Load either the file at `input` or, when absent, the bundled dataset.
pub fn load_source(
    input: Option<&Path>,
    label_column: &str,
    infer_schema_length: usize,
) -> PipelineResult<(RawDataset, DatasetSource)> {
    match input {
        Some(path) => {
            let raw = load_file(path, label_column, infer_schema_length)?;
            Ok((
                raw,
                DatasetSource::File {
                    path: path.to_path_buf(),
                },
            ))
        }
        None => Ok((
            load_bundled(),
            DatasetSource::Bundled {
                name: "iris".to_string(),
            },
        )),
    }
}

/// Open the source file; only a missing file is `NotFound`.
fn open_source(path: &Path) -> PipelineResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PipelineError::NotFound(path.to_path_buf()),
        _ => PipelineError::Io(e),
    })
}

fn read_csv(file: File, path: &Path, infer_schema_length: usize) -> PipelineResult<DataFrame> {
    // 0 means a full table scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| PipelineError::ParseFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn read_parquet(file: File, path: &Path) -> PipelineResult<DataFrame> {
    ParquetReader::new(file)
        .finish()
        .map_err(|e| PipelineError::ParseFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Split a freshly read frame into measurements and category codes.
fn raw_from_frame(df: &DataFrame, label_column: &str) -> Result<RawDataset, String> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    if !column_names.iter().any(|name| name == label_column) {
        return Err(format!(
            "label column '{}' not found. Available columns: {:?}",
            label_column, column_names
        ));
    }
    if df.height() == 0 {
        return Err("file contains no data rows".to_string());
    }

    let feature_names: Vec<String> = column_names
        .iter()
        .filter(|name| name.as_str() != label_column)
        .cloned()
        .collect();
    if feature_names.is_empty() {
        return Err(format!(
            "no measurement columns besides label column '{}'",
            label_column
        ));
    }

    let mut feature_values: Vec<Vec<Option<f64>>> = Vec::with_capacity(feature_names.len());
    for name in &feature_names {
        let column = df.column(name).map_err(|e| e.to_string())?;
        if !column.dtype().is_primitive_numeric() {
            return Err(format!(
                "column '{}' is not numeric (found {})",
                name,
                column.dtype()
            ));
        }
        let floats = column
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|e| e.to_string())?;
        let values: Vec<Option<f64>> = floats
            .f64()
            .map_err(|e| e.to_string())?
            .into_iter()
            // NaN is treated as a missing cell, like a null
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        feature_values.push(values);
    }

    let labels = df
        .column(label_column)
        .map_err(|e| e.to_string())?
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| e.to_string())?;
    let labels: Vec<Option<String>> = labels
        .str()
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();

    let category_names: Vec<String> = labels
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();

    let codes: Vec<Option<usize>> = labels
        .iter()
        .map(|label| {
            label
                .as_ref()
                .and_then(|l| category_names.binary_search(l).ok())
        })
        .collect();

    let values: Vec<Vec<Option<f64>>> = (0..df.height())
        .map(|row| feature_values.iter().map(|col| col[row]).collect())
        .collect();

    Ok(RawDataset {
        values,
        feature_names,
        codes,
        category_names,
        label_name: label_column.to_string(),
    })
}
