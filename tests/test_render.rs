//! Tests for chart rendering

use tabscope::pipeline::{build_frame, grouped_means, load_bundled, remediate};
use tabscope::views::{render_all, render_view, ViewKind, ViewOptions};
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_render_all_writes_four_svg_files() {
    let temp_dir = TempDir::new().unwrap();
    let table = build_frame(&load_bundled()).unwrap();
    let grouped = grouped_means(&table).unwrap();

    let outcomes = render_all(&table, &grouped, &ViewOptions::default(), temp_dir.path());

    assert_eq!(outcomes.len(), 4);
    for outcome in &outcomes {
        let path = outcome.result.as_ref().unwrap();
        assert_eq!(path, &temp_dir.path().join(outcome.kind.file_name()));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("<svg"), "{} is not an SVG", path.display());
    }
}

#[test]
fn test_render_all_creates_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("nested").join("charts");
    let table = build_frame(&load_bundled()).unwrap();
    let grouped = grouped_means(&table).unwrap();

    let outcomes = render_all(&table, &grouped, &ViewOptions::default(), &out_dir);

    assert!(outcomes.iter().all(|o| o.is_ok()));
    assert!(out_dir.join("histogram.svg").exists());
}

#[test]
fn test_scatter_legend_names_categories() {
    let temp_dir = TempDir::new().unwrap();
    let table = build_frame(&load_bundled()).unwrap();
    let grouped = grouped_means(&table).unwrap();

    let path = render_view(
        ViewKind::Scatter,
        &table,
        &grouped,
        &ViewOptions::default(),
        temp_dir.path(),
    )
    .unwrap();

    let content = std::fs::read_to_string(path).unwrap();
    for name in ["setosa", "versicolor", "virginica"] {
        assert!(content.contains(name), "legend is missing {}", name);
    }
}

#[test]
fn test_one_bad_column_fails_only_its_chart() {
    let temp_dir = TempDir::new().unwrap();
    let table = build_frame(&load_bundled()).unwrap();
    let grouped = grouped_means(&table).unwrap();
    let options = ViewOptions {
        hist_column: "no such column".to_string(),
        ..ViewOptions::default()
    };

    let outcomes = render_all(&table, &grouped, &options, temp_dir.path());

    let failed: Vec<ViewKind> = outcomes
        .iter()
        .filter(|o| !o.is_ok())
        .map(|o| o.kind)
        .collect();
    assert_eq!(failed, vec![ViewKind::Histogram]);
    assert!(!temp_dir.path().join("histogram.svg").exists());
    assert!(temp_dir.path().join("scatter.svg").exists());
}

#[test]
fn test_render_table_with_gaps() {
    let temp_dir = TempDir::new().unwrap();
    let table = remediate(create_missing_table()).unwrap();
    let grouped = grouped_means(&table).unwrap();
    let options = ViewOptions {
        line_column: "x".to_string(),
        bar_column: "x".to_string(),
        hist_column: "y".to_string(),
        scatter_x: "x".to_string(),
        scatter_y: "y".to_string(),
        bins: 3,
    };

    let outcomes = render_all(&table, &grouped, &options, temp_dir.path());

    assert!(
        outcomes.iter().all(|o| o.is_ok()),
        "{:?}",
        outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| format!("{:#}", e)))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_view_kind_file_names_are_distinct() {
    let mut names: Vec<&str> = ViewKind::ALL.iter().map(|k| k.file_name()).collect();
    names.sort();
    names.dedup();

    assert_eq!(names.len(), 4);
    assert!(names.iter().all(|n| n.ends_with(".svg")));
}

#[test]
fn test_non_finite_and_extreme_values_never_stall_rendering() {
    let temp_dir = TempDir::new().unwrap();
    let table = table_from_columns(
        &[
            ("inf", vec![Some(1.0), Some(f64::INFINITY), Some(2.0)]),
            ("huge", vec![Some(-1e308), Some(1e308), Some(0.0)]),
            ("b", vec![Some(1.0), Some(2.0), Some(3.0)]),
        ],
        &[Some("A"), Some("B"), Some("A")],
    );
    let grouped = grouped_means(&table).unwrap();
    let options = ViewOptions {
        line_column: "inf".to_string(),
        bar_column: "inf".to_string(),
        hist_column: "huge".to_string(),
        scatter_x: "huge".to_string(),
        scatter_y: "b".to_string(),
        bins: 10,
    };

    let outcomes = render_all(&table, &grouped, &options, temp_dir.path());

    let failed: Vec<ViewKind> = outcomes
        .iter()
        .filter(|o| !o.is_ok())
        .map(|o| o.kind)
        .collect();
    assert_eq!(failed, vec![ViewKind::Histogram, ViewKind::Scatter]);
    for outcome in outcomes.iter().filter(|o| !o.is_ok()) {
        let message = format!("{:#}", outcome.result.as_ref().unwrap_err());
        assert!(message.contains("too wide to plot"), "{}", message);
        assert!(!temp_dir.path().join(outcome.kind.file_name()).exists());
    }
}

#[test]
fn test_histogram_with_infinite_value_renders() {
    let temp_dir = TempDir::new().unwrap();
    let table = table_from_columns(
        &[("a", vec![Some(1.0), Some(f64::INFINITY), Some(2.0)])],
        &[Some("A"), Some("B"), Some("A")],
    );
    let grouped = grouped_means(&table).unwrap();
    let options = ViewOptions {
        hist_column: "a".to_string(),
        ..ViewOptions::for_table(&table)
    };

    let path = render_view(
        ViewKind::Histogram,
        &table,
        &grouped,
        &options,
        temp_dir.path(),
    )
    .unwrap();

    assert!(std::fs::read_to_string(path).unwrap().contains("<svg"));
}

#[test]
fn test_view_options_for_table() {
    let bundled = build_frame(&load_bundled()).unwrap();
    assert_eq!(ViewOptions::for_table(&bundled), ViewOptions::default());

    let single = table_from_columns(&[("only", vec![Some(1.0)])], &[Some("A")]);
    let options = ViewOptions::for_table(&single);
    assert_eq!(options.scatter_x, "only");
    assert_eq!(options.scatter_y, "only");
}
