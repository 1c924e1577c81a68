//! Per-cell source analysis
//!
//! Parses one code cell and walks its nodes, recording imported modules and
//! the literal targets of file reads and writes.

use crate::heuristics::{is_write_mode, AccessPatterns, OPEN_FUNCTION};
use crate::models::{CellFindings, CellOutcome};
use crate::parsers::CellParser;
use crate::syntax::{walk, Callee, Expr, ImportName, SyntaxNode, Visitor};

/// Collects findings from the nodes of one cell
pub struct FindingsVisitor<'a> {
    patterns: &'a AccessPatterns,
    findings: CellFindings,
}

impl<'a> FindingsVisitor<'a> {
    pub fn new(patterns: &'a AccessPatterns) -> Self {
        Self {
            patterns,
            findings: CellFindings::default(),
        }
    }

    pub fn into_findings(self) -> CellFindings {
        self.findings
    }

    fn record_from_import(&mut self, module: Option<&str>, names: &[ImportName]) {
        for name in names {
            let reference = match module {
                Some(module) if !module.is_empty() => format!("{}.{}", module, name.name),
                _ => name.name.clone(),
            };
            self.findings.imports.push(reference);
        }
    }

    fn record_call(&mut self, callee: &Callee, args: &[Expr]) {
        let Some(target) = args.first().and_then(Expr::as_str) else {
            return;
        };

        match callee {
            Callee::Attribute { method } => {
                let access = self.patterns.classify_method(method);
                if access.read {
                    self.findings.files_read.push(target.to_string());
                }
                if access.write {
                    self.findings.files_written.push(target.to_string());
                }
            }
            Callee::Name(name) if name == OPEN_FUNCTION => {
                let mode = args.get(1).and_then(Expr::as_str);
                if is_write_mode(mode) {
                    self.findings.files_written.push(target.to_string());
                } else {
                    self.findings.files_read.push(target.to_string());
                }
            }
            _ => {}
        }
    }
}

impl Visitor for FindingsVisitor<'_> {
    fn visit(&mut self, node: &SyntaxNode) {
        match node {
            SyntaxNode::Import { names } => {
                self.findings
                    .imports
                    .extend(names.iter().map(|n| n.name.clone()));
            }
            SyntaxNode::FromImport { module, names } => {
                self.record_from_import(module.as_deref(), names);
            }
            SyntaxNode::Call { callee, args } => self.record_call(callee, args),
            SyntaxNode::Other => {}
        }
    }
}

/// Analyze one code cell. A cell that fails to parse is skipped, not an error.
pub fn analyze_source(
    parser: &mut dyn CellParser,
    patterns: &AccessPatterns,
    source: &str,
) -> CellOutcome {
    match parser.parse(source) {
        Ok(nodes) => {
            let mut visitor = FindingsVisitor::new(patterns);
            walk(&nodes, &mut visitor);
            CellOutcome::Analyzed(visitor.into_findings())
        }
        Err(e) => CellOutcome::Skipped {
            reason: e.to_string(),
        },
    }
}
