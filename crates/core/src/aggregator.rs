use crate::models::{AnalysisResult, CellFindings, CellRecord};
use std::collections::BTreeSet;

/// Accumulates per-cell findings during a notebook pass
#[derive(Debug, Default)]
pub struct FindingsAggregator {
    cells: Vec<CellRecord>,
    imports: Vec<String>,
    files_read: Vec<String>,
    files_written: Vec<String>,
    unparsed_cells: Vec<usize>,
}

impl FindingsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_cell(&mut self, record: CellRecord) {
        self.cells.push(record);
    }

    pub fn add_findings(&mut self, findings: CellFindings) {
        self.imports.extend(findings.imports);
        self.files_read.extend(findings.files_read);
        self.files_written.extend(findings.files_written);
    }

    pub fn mark_unparsed(&mut self, position: usize) {
        self.unparsed_cells.push(position);
    }

    /// Collapse duplicates and build the final result
    pub fn finish(self) -> AnalysisResult {
        AnalysisResult {
            cells: self.cells,
            imports: self.imports.into_iter().collect::<BTreeSet<_>>(),
            files_read: self.files_read.into_iter().collect(),
            files_written: self.files_written.into_iter().collect(),
            unparsed_cells: self.unparsed_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn findings(imports: &[&str], read: &[&str], written: &[&str]) -> CellFindings {
        CellFindings {
            imports: owned(imports),
            files_read: owned(read),
            files_written: owned(written),
        }
    }

    #[test]
    fn test_deduplicates_across_cells() {
        let mut aggregator = FindingsAggregator::new();
        aggregator.add_findings(findings(&["pandas", "numpy"], &["a.csv"], &[]));
        aggregator.add_findings(findings(&["pandas"], &["a.csv", "b.csv"], &["a.csv"]));

        let result = aggregator.finish();
        assert_eq!(result.imports.len(), 2);
        assert_eq!(result.files_read.len(), 2);
        assert!(result.files_written.contains("a.csv"));
    }

    #[test]
    fn test_no_normalization() {
        let mut aggregator = FindingsAggregator::new();
        aggregator.add_findings(findings(&[], &["Data.csv", "data.csv", "./data.csv"], &[]));

        let result = aggregator.finish();
        assert_eq!(result.files_read.len(), 3);
    }

    #[test]
    fn test_empty() {
        let result = FindingsAggregator::new().finish();
        assert_eq!(result, AnalysisResult::default());
    }
}
