//! Tabscope: Tabular Exploration CLI Tool
//!
//! Loads a labeled dataset, reports its shape and missing values,
//! forward-fills gaps, summarizes it and renders four charts.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use tabscope::cli::Cli;
use tabscope::pipeline::{
    aggregate, build_frame, inspect, load_source, preview, remediate, PipelineError,
};
use tabscope::report::{
    display_describe, display_grouped_means, display_insights, display_inspection,
    display_preview, display_view_outcomes, export_analysis, ExportParams, RunSummary,
};
use tabscope::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};
use tabscope::views::render_all;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        if let Some(hint) = e.downcast_ref::<PipelineError>().and_then(|pe| pe.hint()) {
            print_warning(hint);
        }
        return Err(e);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));

    let source_label = cli
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "iris (bundled)".to_string());
    print_config(
        &source_label,
        &cli.label_column,
        cli.chart_dir().map(|p| p.as_path()),
        cli.bins,
    );

    // Step 1: Load dataset and build the observation table
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let (raw, source) = match load_source(
        cli.input.as_deref(),
        &cli.label_column,
        cli.infer_schema_length,
    ) {
        Ok(loaded) => loaded,
        Err(e) => {
            finish_with_warning(&spinner, "Dataset could not be loaded");
            return Err(e).context("Failed to load dataset");
        }
    };
    let table = match build_frame(&raw) {
        Ok(table) => table,
        Err(e) => {
            finish_with_warning(&spinner, "Observation table could not be built");
            return Err(e).context("Failed to build observation table");
        }
    };
    finish_with_success(&spinner, &format!("Loaded {}", source));

    let (rows, cols) = table.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!(
        "      Categories: {}",
        style(table.categories().join(", ")).cyan()
    );

    let mut summary = RunSummary::new(rows, cols, table.categories().len());
    summary.load_time = step_start.elapsed();
    print_step_time(summary.load_time);

    // Step 2: Inspect and forward-fill missing values
    print_step_header(2, "Inspect & Remediate");

    let step_start = Instant::now();
    display_preview(&preview(&table, cli.head));
    let inspection = inspect(&table);
    display_inspection(&inspection);

    println!();
    let missing_before = inspection.total_missing();
    if missing_before == 0 {
        print_info("No missing values found");
    } else {
        print_count(
            "missing cell(s)",
            missing_before,
            Some(&format!("in {}", inspection.columns_with_missing().join(", "))),
        );
    }

    let table = remediate(table).context("Failed to forward-fill missing values")?;
    let missing_after = inspect(&table).total_missing();
    if missing_before > 0 {
        if missing_after == 0 {
            print_success("Forward-filled all missing values");
        } else {
            print_warning(&format!(
                "{} leading missing cell(s) have no preceding value and remain missing",
                missing_after
            ));
        }
    }
    summary.set_missing(missing_before, missing_after);
    summary.inspect_time = step_start.elapsed();
    print_step_time(summary.inspect_time);

    // Step 3: Descriptive statistics and grouped means
    print_step_header(3, "Basic Data Analysis");

    let step_start = Instant::now();
    let aggregation = aggregate(&table).context("Failed to aggregate dataset")?;
    display_describe(&aggregation.summary);
    display_grouped_means(&aggregation.grouped);
    display_insights(&aggregation.grouped);
    summary.aggregate_time = step_start.elapsed();
    print_step_time(summary.aggregate_time);

    // Step 4: Charts
    print_step_header(4, "Data Visualization");

    let step_start = Instant::now();
    let outcomes = match cli.chart_dir() {
        Some(dir) => {
            let spinner = create_spinner("Rendering charts...");
            let outcomes = render_all(&table, &aggregation.grouped, &cli.view_options(&table), dir);
            let rendered = outcomes.iter().filter(|o| o.is_ok()).count();
            if rendered == outcomes.len() {
                finish_with_success(&spinner, &format!("Rendered {} charts", rendered));
            } else {
                finish_with_warning(
                    &spinner,
                    &format!("Rendered {} of {} charts", rendered, outcomes.len()),
                );
            }
            display_view_outcomes(&outcomes);
            outcomes
        }
        None => {
            print_info("Chart rendering disabled (--no-charts)");
            Vec::new()
        }
    };
    summary.add_chart_outcomes(&outcomes);
    summary.chart_time = step_start.elapsed();
    print_step_time(summary.chart_time);

    // Optional JSON export
    if let Some(path) = &cli.summary_json {
        export_analysis(
            path,
            &ExportParams {
                source: &source,
                table: &table,
                inspection: &inspection,
                missing_after_fill: missing_after,
                summary: &aggregation.summary,
                grouped: &aggregation.grouped,
            },
        )?;
        println!();
        print_success(&format!("Analysis saved to {}", path.display()));
    }

    summary.display();

    if !outcomes.is_empty() && summary.charts_rendered == 0 {
        anyhow::bail!("No chart could be rendered");
    }

    print_completion();
    Ok(())
}
