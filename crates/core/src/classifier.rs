//! Cell classification and the notebook pass
//!
//! Walks the cells in order, keeps a record for every code and markdown
//! cell, and routes code cells through the source analyzer.

use crate::aggregator::FindingsAggregator;
use crate::analyzer::analyze_source;
use crate::heuristics::AccessPatterns;
use crate::models::{AnalysisResult, Cell, CellKind, CellOutcome, CellRecord, Notebook};
use crate::parsers::CellParser;
use tracing::debug;

/// What the pass does with a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRoute {
    /// Recorded and analyzed
    Analyze,
    /// Recorded verbatim
    PassThrough,
    /// Left out of the result
    Drop,
}

pub fn route(kind: CellKind) -> CellRoute {
    match kind {
        CellKind::Code => CellRoute::Analyze,
        CellKind::Markdown => CellRoute::PassThrough,
        CellKind::Raw | CellKind::Unknown => CellRoute::Drop,
    }
}

fn record(cell: &Cell) -> CellRecord {
    CellRecord {
        position: cell.position,
        kind: cell.kind,
        source: cell.source.clone(),
    }
}

/// Run the analysis pass over a loaded notebook
pub fn analyze_notebook(
    notebook: &Notebook,
    parser: &mut dyn CellParser,
    patterns: &AccessPatterns,
) -> AnalysisResult {
    let mut aggregator = FindingsAggregator::new();

    for cell in &notebook.cells {
        match route(cell.kind) {
            CellRoute::Analyze => {
                aggregator.push_cell(record(cell));
                match analyze_source(parser, patterns, &cell.source) {
                    CellOutcome::Analyzed(findings) => aggregator.add_findings(findings),
                    CellOutcome::Skipped { reason } => {
                        debug!(cell = cell.position, %reason, "skipping unparseable cell");
                        aggregator.mark_unparsed(cell.position);
                    }
                }
            }
            CellRoute::PassThrough => aggregator.push_cell(record(cell)),
            CellRoute::Drop => {
                debug!(cell = cell.position, kind = ?cell.kind, "dropping cell");
            }
        }
    }

    let result = aggregator.finish();
    debug!(
        cells = result.cells.len(),
        imports = result.imports.len(),
        files_read = result.files_read.len(),
        files_written = result.files_written.len(),
        "notebook analyzed"
    );
    result
}
