use crate::classifier::analyze_notebook;
use crate::config::{IgnoreFilter, ScanConfig};
use crate::models::{
    AnalysisResult, CellStats, FailedNotebook, NotebookReport, ScanMetadata, WorkspaceReport,
    WorkspaceStats,
};
use crate::notebook::load_notebook;
use crate::parsers::create_parser;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
    #[error("Parser error: {0}")]
    ParserError(#[from] crate::parsers::ParserError),
    #[error("{path}: {source}")]
    NotebookError {
        path: PathBuf,
        #[source]
        source: crate::notebook::NotebookError,
    },
}

type FileOutcome = (PathBuf, Result<AnalysisResult, ScanError>);

/// Scanner for one notebook or a directory of notebooks
pub struct NotebookScanner {
    config: ScanConfig,
    ignore_filter: IgnoreFilter,
}

impl NotebookScanner {
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let ignore_filter = IgnoreFilter::new(&config)?;
        Ok(Self {
            config,
            ignore_filter,
        })
    }

    /// Analyze the notebook at the configured root
    pub fn scan_notebook(&self) -> Result<AnalysisResult, ScanError> {
        self.analyze_file(&self.config.root)
    }

    /// Load and analyze a single notebook file
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, ScanError> {
        let notebook = load_notebook(path).map_err(|source| ScanError::NotebookError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut parser = create_parser()?;
        Ok(analyze_notebook(
            &notebook,
            parser.as_mut(),
            &self.config.patterns,
        ))
    }

    /// Analyze every notebook under the configured root
    pub fn scan_directory(&self) -> Result<WorkspaceReport, ScanError> {
        let start = Instant::now();

        let paths = self.find_notebooks()?;

        let outcomes: Vec<FileOutcome> = if self.config.threads == 1 {
            paths
                .into_iter()
                .map(|path| {
                    let outcome = self.analyze_file(&path);
                    (path, outcome)
                })
                .collect()
        } else {
            let pool = if self.config.threads > 0 {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(self.config.threads)
                    .build()
                    .ok()
            } else {
                None
            };

            let analyze_all = || -> Vec<FileOutcome> {
                paths
                    .par_iter()
                    .map(|path| (path.clone(), self.analyze_file(path)))
                    .collect()
            };

            match pool {
                Some(pool) => pool.install(analyze_all),
                None => analyze_all(),
            }
        };

        let mut notebooks = Vec::new();
        let mut failed = Vec::new();
        for (path, outcome) in outcomes {
            let relative_path = path
                .strip_prefix(&self.config.root)
                .unwrap_or(&path)
                .to_path_buf();
            match outcome {
                Ok(analysis) => notebooks.push(NotebookReport {
                    path: relative_path,
                    analysis,
                }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping notebook");
                    failed.push(FailedNotebook {
                        path: relative_path,
                        error: e.to_string(),
                    });
                }
            }
        }

        let duration = start.elapsed();
        let report = Self::build_report(self.config.root.clone(), notebooks, failed, duration);
        info!(
            notebooks = report.stats.total_notebooks,
            failed = report.stats.failed_notebooks,
            duration_ms = report.metadata.scan_duration_ms,
            "directory scan complete"
        );
        Ok(report)
    }

    /// Find all notebooks beneath the root, in a stable order
    fn find_notebooks(&self) -> Result<Vec<PathBuf>, ScanError> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.config.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !self
                        .ignore_filter
                        .should_ignore(e.path(), e.file_type().is_dir())
            });

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if entry.file_type().is_dir() {
                continue;
            }

            if self.ignore_filter.is_notebook(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    fn build_report(
        root: PathBuf,
        notebooks: Vec<NotebookReport>,
        failed: Vec<FailedNotebook>,
        duration: std::time::Duration,
    ) -> WorkspaceReport {
        let mut imports = BTreeSet::new();
        let mut files_read = BTreeSet::new();
        let mut files_written = BTreeSet::new();
        let mut cells = CellStats::default();

        for notebook in &notebooks {
            imports.extend(notebook.analysis.imports.iter().cloned());
            files_read.extend(notebook.analysis.files_read.iter().cloned());
            files_written.extend(notebook.analysis.files_written.iter().cloned());
            cells.add(&notebook.analysis.stats());
        }

        let total = notebooks.len() + failed.len();
        let metadata = ScanMetadata {
            scan_duration_ms: duration.as_millis() as u64,
            notebooks_per_second: if duration.as_secs_f64() > 0.0 {
                total as f64 / duration.as_secs_f64()
            } else {
                0.0
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        WorkspaceReport {
            root,
            stats: WorkspaceStats {
                total_notebooks: total,
                failed_notebooks: failed.len(),
                cells,
            },
            notebooks,
            imports,
            files_read,
            files_written,
            failed,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const NOTEBOOK: &str = r##"{"cells": [
        {"cell_type": "markdown", "source": "# intro"},
        {"cell_type": "code", "source": ["import pandas as pd\n", "df = pd.read_csv(\"a.csv\")"]}
    ]}"##;

    #[test]
    fn test_scanner_creation() {
        let config = ScanConfig::default();
        let scanner = NotebookScanner::new(config);
        assert!(scanner.is_ok());
    }

    #[test]
    fn test_scan_notebook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.ipynb");
        fs::write(&path, NOTEBOOK).unwrap();

        let scanner = NotebookScanner::new(ScanConfig::new(path)).unwrap();
        let result = scanner.scan_notebook().unwrap();
        assert!(result.imports.contains("pandas"));
        assert!(result.files_read.contains("a.csv"));
    }

    #[test]
    fn test_missing_notebook_is_fatal() {
        let scanner = NotebookScanner::new(ScanConfig::new(PathBuf::from("/no/such.ipynb"))).unwrap();
        assert!(matches!(
            scanner.scan_notebook(),
            Err(ScanError::NotebookError { .. })
        ));
    }

    #[test]
    fn test_scan_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.ipynb"), NOTEBOOK).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(
            dir.path().join("sub/b.ipynb"),
            r#"{"cells": [{"cell_type": "code", "source": "import numpy\nimport pandas\nnp.save('out.npy', x)"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.ipynb"), "{").unwrap();
        fs::write(dir.path().join("notes.py"), "import os").unwrap();
        fs::create_dir(dir.path().join(".ipynb_checkpoints")).unwrap();
        fs::write(dir.path().join(".ipynb_checkpoints/a-checkpoint.ipynb"), NOTEBOOK).unwrap();

        let config = ScanConfig::new(dir.path().to_path_buf()).with_threads(2);
        let report = NotebookScanner::new(config).unwrap().scan_directory().unwrap();

        assert_eq!(report.notebooks.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, PathBuf::from("broken.ipynb"));
        assert_eq!(report.stats.total_notebooks, 3);
        assert_eq!(report.stats.cells.code_cells, 2);
        assert_eq!(report.stats.cells.markdown_cells, 1);
        assert_eq!(
            report.imports.iter().collect::<Vec<_>>(),
            vec!["numpy", "pandas"]
        );
        assert!(report.files_read.contains("a.csv"));
        assert!(report.files_written.contains("out.npy"));

        let paths: Vec<PathBuf> = report.notebooks.iter().map(|n| n.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a.ipynb"), PathBuf::from("sub/b.ipynb")]);
    }

    #[test]
    fn test_gitignored_directory_is_pruned() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "scratch/\n").unwrap();
        fs::write(dir.path().join("a.ipynb"), NOTEBOOK).unwrap();
        fs::create_dir_all(dir.path().join("scratch/deep")).unwrap();
        fs::write(dir.path().join("scratch/x.ipynb"), NOTEBOOK).unwrap();
        fs::write(dir.path().join("scratch/deep/y.ipynb"), NOTEBOOK).unwrap();

        let config = ScanConfig::new(dir.path().to_path_buf()).with_threads(1);
        let report = NotebookScanner::new(config).unwrap().scan_directory().unwrap();

        let paths: Vec<PathBuf> = report.notebooks.iter().map(|n| n.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a.ipynb")]);
        assert_eq!(report.stats.total_notebooks, 1);
    }
}
