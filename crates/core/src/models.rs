use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Kind of a notebook cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Executable source code
    Code,
    /// Narrative text
    Markdown,
    /// Raw, unrendered text
    Raw,
    /// Anything the loader did not recognize
    #[serde(other)]
    Unknown,
}

/// A single cell as read from the notebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// 0-based index in the notebook
    pub position: usize,
    pub kind: CellKind,
    pub source: String,
}

/// Ordered cells of one notebook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notebook {
    pub cells: Vec<Cell>,
}

/// Pass-through record emitted for every code or markdown cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "index")]
    pub position: usize,
    #[serde(rename = "type")]
    pub kind: CellKind,
    pub source: String,
}

/// Findings extracted from a single code cell, before deduplication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFindings {
    pub imports: Vec<String>,
    pub files_read: Vec<String>,
    pub files_written: Vec<String>,
}

impl CellFindings {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.files_read.is_empty() && self.files_written.is_empty()
    }
}

/// Result of analyzing one code cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    /// The source parsed; these are its findings
    Analyzed(CellFindings),
    /// The source did not parse and contributes nothing
    Skipped { reason: String },
}

/// Analysis of a whole notebook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub cells: Vec<CellRecord>,
    pub imports: BTreeSet<String>,
    pub files_read: BTreeSet<String>,
    pub files_written: BTreeSet<String>,
    /// Positions of code cells that failed to parse
    #[serde(skip)]
    pub unparsed_cells: Vec<usize>,
}

impl AnalysisResult {
    pub fn stats(&self) -> CellStats {
        let mut stats = CellStats::default();
        for cell in &self.cells {
            match cell.kind {
                CellKind::Code => stats.code_cells += 1,
                CellKind::Markdown => stats.markdown_cells += 1,
                CellKind::Raw | CellKind::Unknown => {}
            }
        }
        stats.unparsed_cells = self.unparsed_cells.len();
        stats
    }
}

/// Cell counts for a notebook or a whole scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStats {
    pub code_cells: usize,
    pub markdown_cells: usize,
    /// Code cells that failed to parse
    pub unparsed_cells: usize,
}

impl CellStats {
    pub fn add(&mut self, other: &CellStats) {
        self.code_cells += other.code_cells;
        self.markdown_cells += other.markdown_cells;
        self.unparsed_cells += other.unparsed_cells;
    }
}

/// One notebook found during a directory scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookReport {
    /// Relative path from the scan root
    pub path: PathBuf,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

/// A notebook that could not be loaded during a directory scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedNotebook {
    pub path: PathBuf,
    pub error: String,
}

/// Aggregated results of scanning a directory of notebooks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceReport {
    /// Scan root
    pub root: PathBuf,
    pub notebooks: Vec<NotebookReport>,
    /// Union of imports across all notebooks
    pub imports: BTreeSet<String>,
    pub files_read: BTreeSet<String>,
    pub files_written: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedNotebook>,
    pub stats: WorkspaceStats,
    pub metadata: ScanMetadata,
}

/// Statistics about a directory scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceStats {
    pub total_notebooks: usize,
    pub failed_notebooks: usize,
    #[serde(flatten)]
    pub cells: CellStats,
}

/// Scan metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub scan_duration_ms: u64,
    pub notebooks_per_second: f64,
    pub timestamp: String,
    pub tool_version: String,
}

impl Default for ScanMetadata {
    fn default() -> Self {
        Self {
            scan_duration_ms: 0,
            notebooks_per_second: 0.0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_record_uses_legacy_keys() {
        let record = CellRecord {
            position: 2,
            kind: CellKind::Markdown,
            source: "# intro".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["index"], 2);
        assert_eq!(json["type"], "markdown");
        assert_eq!(json["source"], "# intro");
    }

    #[test]
    fn test_unknown_cell_kind() {
        let kind: CellKind = serde_json::from_str("\"heading\"").unwrap();
        assert_eq!(kind, CellKind::Unknown);
    }

    #[test]
    fn test_analysis_result_has_four_fields() {
        let result = AnalysisResult {
            unparsed_cells: vec![1],
            ..Default::default()
        };

        let json = serde_json::to_value(&result).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert!(json.get("cells").is_some());
        assert!(json.get("imports").is_some());
        assert!(json.get("files_read").is_some());
        assert!(json.get("files_written").is_some());
    }

    #[test]
    fn test_stats() {
        let result = AnalysisResult {
            cells: vec![
                CellRecord {
                    position: 0,
                    kind: CellKind::Markdown,
                    source: String::new(),
                },
                CellRecord {
                    position: 1,
                    kind: CellKind::Code,
                    source: String::new(),
                },
                CellRecord {
                    position: 2,
                    kind: CellKind::Code,
                    source: String::new(),
                },
            ],
            unparsed_cells: vec![2],
            ..Default::default()
        };

        let stats = result.stats();
        assert_eq!(stats.code_cells, 2);
        assert_eq!(stats.markdown_cells, 1);
        assert_eq!(stats.unparsed_cells, 1);
    }
}
