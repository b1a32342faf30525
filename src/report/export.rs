//! Analysis export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    DatasetSource, GroupedMeans, InspectionReport, Insight, ObservationTable, TableSummary,
};

/// Metadata about the exploration run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// Tabscope version
    pub tabscope_version: String,
    /// Where the dataset came from
    pub source: DatasetSource,
    /// Categorical column name
    pub label_column: String,
    /// Ordered category set
    pub categories: Vec<String>,
    pub rows: usize,
    pub columns: usize,
}

/// Complete analysis export
#[derive(Serialize)]
pub struct AnalysisExport<'a> {
    pub metadata: ExportMetadata,
    /// Inspection before forward-fill
    pub inspection: &'a InspectionReport,
    /// Missing cells left after forward-fill
    pub missing_after_fill: usize,
    pub summary: &'a TableSummary,
    pub grouped_means: &'a GroupedMeans,
    pub insights: Vec<Insight>,
}

/// Inputs of an analysis export
pub struct ExportParams<'a> {
    pub source: &'a DatasetSource,
    pub table: &'a ObservationTable,
    pub inspection: &'a InspectionReport,
    pub missing_after_fill: usize,
    pub summary: &'a TableSummary,
    pub grouped: &'a GroupedMeans,
}

/// Build the export document.
pub fn build_export<'a>(params: &ExportParams<'a>) -> AnalysisExport<'a> {
    let (rows, columns) = params.table.shape();

    AnalysisExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            tabscope_version: env!("CARGO_PKG_VERSION").to_string(),
            source: params.source.clone(),
            label_column: params.table.label_column().to_string(),
            categories: params.table.categories().to_vec(),
            rows,
            columns,
        },
        inspection: params.inspection,
        missing_after_fill: params.missing_after_fill,
        summary: params.summary,
        grouped_means: params.grouped,
        insights: params.grouped.insights(),
    }
}

/// Export the analysis results to a JSON file.
///
/// Undefined statistics serialize as `null`.
pub fn export_analysis(path: &Path, params: &ExportParams<'_>) -> Result<()> {
    let export = build_export(params);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize analysis to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write analysis file: {}", path.display()))?;

    log::info!("Analysis exported to {}", path.display());
    Ok(())
}
