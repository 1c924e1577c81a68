mod json;
mod yaml;

pub use json::{to_json, to_json_compact};
pub use yaml::to_yaml;

use crate::models::{AnalysisResult, WorkspaceReport};
use std::collections::BTreeSet;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Summary,
}

/// Format a single notebook's analysis
pub fn format_output(result: &AnalysisResult, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Yaml => to_yaml(result),
        OutputFormat::Summary => Ok(format_summary(result)),
    }
}

/// Format the report of a directory scan
pub fn format_workspace_output(
    report: &WorkspaceReport,
    format: OutputFormat,
) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Yaml => to_yaml(report),
        OutputFormat::Summary => Ok(format_workspace_summary(report)),
    }
}

fn push_list(output: &mut String, title: &str, items: &BTreeSet<String>) {
    output.push_str(&format!("{} ({}):\n", title, items.len()));
    for item in items {
        output.push_str(&format!("  {}\n", item));
    }
    output.push('\n');
}

/// Generate a human-readable summary of one notebook
pub fn format_summary(result: &AnalysisResult) -> String {
    let mut output = String::new();
    let stats = result.stats();

    output.push_str(&format!(
        "Notebook Analysis Summary\n\
         =========================\n\
         Cells: {} (code: {}, markdown: {}, unparsed: {})\n\n",
        result.cells.len(),
        stats.code_cells,
        stats.markdown_cells,
        stats.unparsed_cells
    ));

    if !result.unparsed_cells.is_empty() {
        let positions: Vec<String> = result.unparsed_cells.iter().map(|p| p.to_string()).collect();
        output.push_str(&format!("Unparsed Cells: {}\n\n", positions.join(", ")));
    }

    push_list(&mut output, "Imports", &result.imports);
    push_list(&mut output, "Files Read", &result.files_read);
    push_list(&mut output, "Files Written", &result.files_written);

    output
}

/// Generate a human-readable summary of a directory scan
pub fn format_workspace_summary(report: &WorkspaceReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Notebook Scan Summary\n\
         =====================\n\
         Root: {}\n\n\
         Notebooks: {} (failed: {})\n\
         Cells: code {}, markdown {}, unparsed {}\n\n",
        report.root.display(),
        report.stats.total_notebooks,
        report.stats.failed_notebooks,
        report.stats.cells.code_cells,
        report.stats.cells.markdown_cells,
        report.stats.cells.unparsed_cells
    ));

    for notebook in &report.notebooks {
        output.push_str(&format!(
            "  {} ({} imports, {} read, {} written)\n",
            notebook.path.display(),
            notebook.analysis.imports.len(),
            notebook.analysis.files_read.len(),
            notebook.analysis.files_written.len()
        ));
    }
    output.push('\n');

    if !report.failed.is_empty() {
        output.push_str("Failed Notebooks:\n");
        for failed in &report.failed {
            output.push_str(&format!("  {}: {}\n", failed.path.display(), failed.error));
        }
        output.push('\n');
    }

    push_list(&mut output, "Imports", &report.imports);
    push_list(&mut output, "Files Read", &report.files_read);
    push_list(&mut output, "Files Written", &report.files_written);

    output.push_str(&format!(
        "Scan Duration: {}ms ({:.2} notebooks/sec)\n\
         Timestamp: {}\n\
         Tool Version: {}\n",
        report.metadata.scan_duration_ms,
        report.metadata.notebooks_per_second,
        report.metadata.timestamp,
        report.metadata.tool_version
    ));

    output
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
