//! Unit tests for the dataset loader

use polars::prelude::*;
use tabscope::pipeline::{
    build_frame, load_bundled, load_file, load_source, DatasetSource, PipelineError,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_bundled_dataset_shape() {
    let raw = load_bundled();

    assert_eq!(raw.n_observations(), 150);
    assert_eq!(raw.n_features(), 4);
    assert_eq!(raw.codes.len(), 150);
    assert_eq!(
        raw.feature_names,
        vec![
            "sepal length (cm)",
            "sepal width (cm)",
            "petal length (cm)",
            "petal width (cm)"
        ]
    );
    assert_eq!(raw.category_names, vec!["setosa", "versicolor", "virginica"]);
    assert_eq!(raw.label_name, "species");
    assert!(raw.values.iter().all(|row| row.len() == 4));
}

#[test]
fn test_bundled_dataset_fifty_per_species() {
    let raw = load_bundled();

    for code in 0..3 {
        let count = raw.codes.iter().filter(|c| **c == Some(code)).count();
        assert_eq!(count, 50, "species {} should have 50 rows", code);
    }
    assert!(raw.values.iter().flatten().all(|v| v.is_some()));
}

#[test]
fn test_load_csv_file() {
    let (_temp_dir, csv_path) = create_temp_csv_lines(
        "flowers.csv",
        &[
            "length,width,species",
            "1.5,0.2,setosa",
            "4.7,1.4,versicolor",
            "6.0,2.5,virginica",
            "1.4,0.2,setosa",
        ],
    );

    let raw = load_file(&csv_path, "species", 100).unwrap();

    assert_eq!(raw.n_observations(), 4);
    assert_eq!(raw.feature_names, vec!["length", "width"]);
    assert_eq!(raw.category_names, vec!["setosa", "versicolor", "virginica"]);
    assert_eq!(raw.codes, vec![Some(0), Some(1), Some(2), Some(0)]);
    assert_eq!(raw.values[1], vec![Some(4.7), Some(1.4)]);
    assert_eq!(raw.label_name, "species");
}

#[test]
fn test_label_column_anywhere_in_file() {
    let (_temp_dir, csv_path) = create_temp_csv_lines(
        "label_first.csv",
        &["kind,a,b", "y,1,2", "x,3,4"],
    );

    let raw = load_file(&csv_path, "kind", 100).unwrap();

    assert_eq!(raw.feature_names, vec!["a", "b"]);
    assert_eq!(raw.category_names, vec!["x", "y"], "categories are sorted");
    assert_eq!(raw.codes, vec![Some(1), Some(0)]);
}

#[test]
fn test_csv_with_missing_values() {
    let (_temp_dir, csv_path) = create_temp_csv_lines(
        "missing.csv",
        &["a,b,label", "1,,A", ",2,", "4,5,B"],
    );

    let raw = load_file(&csv_path, "label", 100).unwrap();

    assert_eq!(raw.values[0], vec![Some(1.0), None]);
    assert_eq!(raw.values[1], vec![None, Some(2.0)]);
    assert_eq!(raw.codes, vec![Some(0), None, Some(1)]);
}

#[test]
fn test_numeric_label_column() {
    let (_temp_dir, csv_path) =
        create_temp_csv_lines("numeric_label.csv", &["x,target", "1.0,0", "2.0,1", "3.0,1"]);

    let raw = load_file(&csv_path, "target", 100).unwrap();

    assert_eq!(raw.category_names, vec!["0", "1"]);
    assert_eq!(raw.codes, vec![Some(0), Some(1), Some(1)]);
}

#[test]
fn test_integer_measurements_are_read_as_floats() {
    let (_temp_dir, csv_path) =
        create_temp_csv_lines("ints.csv", &["count,label", "3,A", "5,B"]);

    let raw = load_file(&csv_path, "label", 100).unwrap();

    assert_eq!(raw.values, vec![vec![Some(3.0)], vec![Some(5.0)]]);
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/file.csv");

    let result = load_file(path, "species", 100);

    assert!(
        matches!(result, Err(PipelineError::NotFound(ref p)) if p == path),
        "Nonexistent file should return NotFound, got {:?}",
        result
    );
}

#[test]
fn test_nonexistent_file_builds_no_table() {
    let path = std::path::Path::new("/nonexistent/data.csv");

    let table = load_file(path, "species", 100).and_then(|raw| build_frame(&raw));

    assert!(matches!(table, Err(PipelineError::NotFound(_))));
}

#[test]
fn test_unsupported_format() {
    let (_temp_dir, path) = create_temp_csv_lines("test.xlsx", &["a,label", "1,A"]);

    let result = load_file(&path, "label", 100);

    match result {
        Err(PipelineError::UnsupportedFormat { extension }) => assert_eq!(extension, "xlsx"),
        other => panic!("Expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn test_missing_label_column_is_parse_failure() {
    let (_temp_dir, csv_path) = create_temp_csv_lines("no_label.csv", &["a,b", "1,2"]);

    let result = load_file(&csv_path, "species", 100);

    match result {
        Err(PipelineError::ParseFailure { reason, .. }) => {
            assert!(reason.contains("species"), "reason should name the column: {}", reason)
        }
        other => panic!("Expected ParseFailure, got {:?}", other),
    }
}

#[test]
fn test_non_numeric_measurement_is_parse_failure() {
    let (_temp_dir, csv_path) = create_temp_csv_lines(
        "text.csv",
        &["a,comment,label", "1,hello,A", "2,world,B"],
    );

    let result = load_file(&csv_path, "label", 100);

    match result {
        Err(PipelineError::ParseFailure { reason, .. }) => {
            assert!(reason.contains("comment"), "reason should name the column: {}", reason)
        }
        other => panic!("Expected ParseFailure, got {:?}", other),
    }
}

#[test]
fn test_label_only_file_is_parse_failure() {
    let (_temp_dir, csv_path) = create_temp_csv_lines("labels.csv", &["label", "A", "B"]);

    let result = load_file(&csv_path, "label", 100);

    assert!(matches!(result, Err(PipelineError::ParseFailure { .. })));
}

#[test]
fn test_empty_file_is_parse_failure() {
    let (_temp_dir, csv_path) = create_temp_csv_lines("empty.csv", &[]);

    let result = load_file(&csv_path, "label", 100);

    assert!(
        matches!(result, Err(PipelineError::ParseFailure { .. })),
        "Empty file should be a parse failure, got {:?}",
        result
    );
}

#[test]
fn test_not_found_and_parse_failure_are_distinct() {
    let missing = load_file(std::path::Path::new("/nope/x.csv"), "label", 100).unwrap_err();
    let (_temp_dir, bad_path) = create_temp_csv_lines("bad.csv", &["a,label", "oops,A"]);
    let malformed = load_file(&bad_path, "label", 100).unwrap_err();

    assert!(matches!(missing, PipelineError::NotFound(_)));
    assert!(matches!(malformed, PipelineError::ParseFailure { .. }));
    assert_ne!(missing.hint(), malformed.hint());
}

#[test]
fn test_load_parquet_file() {
    let mut df = df! {
        "x" => [1.0f64, 2.0, 3.0],
        "y" => [4i32, 5, 6],
        "group" => ["b", "a", "b"],
    }
    .unwrap();
    let (_temp_dir, parquet_path) = create_temp_parquet(&mut df);

    let raw = load_file(&parquet_path, "group", 100).unwrap();

    assert_eq!(raw.n_observations(), 3);
    assert_eq!(raw.feature_names, vec!["x", "y"]);
    assert_eq!(raw.category_names, vec!["a", "b"]);
    assert_eq!(raw.codes, vec![Some(1), Some(0), Some(1)]);
    assert_eq!(raw.values[2], vec![Some(3.0), Some(6.0)]);
}

#[test]
fn test_load_source_defaults_to_bundled() {
    let (raw, source) = load_source(None, "ignored", 100).unwrap();

    assert_eq!(raw.n_observations(), 150);
    assert_eq!(
        source,
        DatasetSource::Bundled {
            name: "iris".to_string()
        }
    );
}

#[test]
fn test_load_source_with_file() {
    let (_temp_dir, csv_path) = create_temp_csv_lines("src.csv", &["a,label", "1,A"]);

    let (raw, source) = load_source(Some(csv_path.as_path()), "label", 100).unwrap();

    assert_eq!(raw.n_observations(), 1);
    assert_eq!(source, DatasetSource::File { path: csv_path });
}

#[test]
fn test_unopenable_path_is_io_error_not_parse_failure() {
    let (_temp_dir, csv_path) = create_temp_csv_lines("data.csv", &["a,label", "1,A"]);
    // A regular file cannot be a directory component
    let path = csv_path.join("inner.csv");

    let result = load_file(&path, "label", 100);

    assert!(
        matches!(result, Err(PipelineError::Io(_))),
        "An existing but unopenable path should be an I/O error, got {:?}",
        result
    );
}

#[test]
fn test_nonexistent_parquet_file_is_not_found() {
    let path = std::path::Path::new("/nonexistent/data.parquet");

    let result = load_file(path, "label", 100);

    assert!(matches!(result, Err(PipelineError::NotFound(_))));
}
