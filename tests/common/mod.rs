//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use polars::prelude::*;
use rand::Rng;
use tabscope::pipeline::{build_frame, ObservationTable, RawDataset};
use tempfile::TempDir;

/// Build a raw dataset from named columns and per-row labels.
///
/// Categories are the sorted distinct labels, as the file loader produces them.
pub fn raw_from_columns(
    columns: &[(&str, Vec<Option<f64>>)],
    labels: &[Option<&str>],
) -> RawDataset {
    let mut category_names: Vec<String> = labels.iter().flatten().map(|s| s.to_string()).collect();
    category_names.sort();
    category_names.dedup();

    let rows = labels.len();
    RawDataset {
        values: (0..rows)
            .map(|row| columns.iter().map(|(_, col)| col[row]).collect())
            .collect(),
        feature_names: columns.iter().map(|(name, _)| name.to_string()).collect(),
        codes: labels
            .iter()
            .map(|l| l.and_then(|l| category_names.iter().position(|c| c == l)))
            .collect(),
        category_names,
        label_name: "label".to_string(),
    }
}

/// Build an observation table from named columns and per-row labels.
pub fn table_from_columns(
    columns: &[(&str, Vec<Option<f64>>)],
    labels: &[Option<&str>],
) -> ObservationTable {
    build_frame(&raw_from_columns(columns, labels)).unwrap()
}

/// Three rows: x = [1, 2, 3], label = [A, A, B]
pub fn create_scenario_table() -> ObservationTable {
    table_from_columns(
        &[("x", vec![Some(1.0), Some(2.0), Some(3.0)])],
        &[Some("A"), Some("A"), Some("B")],
    )
}

/// A table with gaps in the middle and at the start of columns
///
/// - `x`: [1, -, -, 4] (interior gap)
/// - `y`: [-, 2, -, 8] (leading gap)
/// - label: [A, -, B, B]
pub fn create_missing_table() -> ObservationTable {
    table_from_columns(
        &[
            ("x", vec![Some(1.0), None, None, Some(4.0)]),
            ("y", vec![None, Some(2.0), None, Some(8.0)]),
        ],
        &[Some("A"), None, Some("B"), Some("B")],
    )
}

/// A random raw dataset with roughly `missing_rate` of cells missing.
pub fn create_random_raw(
    rows: usize,
    cols: usize,
    categories: usize,
    missing_rate: f64,
) -> RawDataset {
    let mut rng = rand::thread_rng();

    RawDataset {
        values: (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| {
                        if rng.gen::<f64>() < missing_rate {
                            None
                        } else {
                            Some(rng.gen_range(0.0..100.0))
                        }
                    })
                    .collect()
            })
            .collect(),
        feature_names: (0..cols).map(|i| format!("feature_{}", i)).collect(),
        codes: (0..rows)
            .map(|_| {
                if rng.gen::<f64>() < missing_rate {
                    None
                } else {
                    Some(rng.gen_range(0..categories))
                }
            })
            .collect(),
        category_names: (0..categories).map(|i| format!("class_{}", i)).collect(),
        label_name: "label".to_string(),
    }
}

/// Write `lines` to a CSV file in a fresh temporary directory
pub fn create_temp_csv_lines(name: &str, lines: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&csv_path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    drop(file);

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a table has expected shape
pub fn assert_shape(table: &ObservationTable, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = table.shape();
    assert_eq!(
        rows, expected_rows,
        "Row count mismatch: expected {}, got {}",
        expected_rows, rows
    );
    assert_eq!(
        cols, expected_cols,
        "Column count mismatch: expected {}, got {}",
        expected_cols, cols
    );
}

/// Assert two floats are equal within `1e-6`
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
