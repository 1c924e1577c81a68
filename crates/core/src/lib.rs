//! MTA Rust NbDeps Core Library
//!
//! This library statically analyzes Jupyter notebooks and reports what they
//! depend on: the modules they import and the files they read or write.
//! Nothing is executed.
//!
//! # Features
//!
//! - Load nbformat 4 notebooks (`.ipynb`)
//! - Parse code cells with tree-sitter; unparseable cells are skipped, not fatal
//! - Extract `import x` / `from m import x` references
//! - Classify calls like `pd.read_csv("a.csv")` or `open("out.txt", "w")` as file reads or writes
//! - Scan a single notebook or a whole directory of notebooks
//! - Output results in JSON, YAML or a human-readable summary
//!
//! # Example
//!
//! ```no_run
//! use mta_rust_nbdeps_core::{format_output, NotebookScanner, OutputFormat, ScanConfig};
//! use std::path::PathBuf;
//!
//! let config = ScanConfig::new(PathBuf::from("analysis.ipynb"));
//! let scanner = NotebookScanner::new(config).unwrap();
//! let result = scanner.scan_notebook().unwrap();
//!
//! let json = format_output(&result, OutputFormat::Json).unwrap();
//! println!("{}", json);
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod heuristics;
pub mod models;
pub mod notebook;
pub mod output;
pub mod parsers;
pub mod scanner;
pub mod syntax;

// Re-exports for convenience
pub use classifier::analyze_notebook;
pub use config::ScanConfig;
pub use heuristics::AccessPatterns;
pub use models::*;
pub use notebook::{load_notebook, parse_notebook, NotebookError};
pub use output::{
    format_output, format_summary, format_workspace_output, format_workspace_summary,
    OutputFormat,
};
pub use scanner::{NotebookScanner, ScanError};
