use crate::heuristics::AccessPatterns;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extension of Jupyter notebooks
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to build glob pattern: {0}")]
    GlobError(#[from] globset::Error),
    #[error("Failed to parse gitignore: {0}")]
    GitignoreError(#[from] ignore::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Configuration for scanning
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Notebook file or directory to scan
    pub root: PathBuf,
    /// Read/write indicator substrings
    pub patterns: AccessPatterns,
    /// Additional ignore patterns (glob style)
    pub ignore_patterns: Vec<String>,
    /// Custom ignore file path
    pub ignore_file: Option<PathBuf>,
    /// Number of threads (0 = auto)
    pub threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            patterns: AccessPatterns::default(),
            ignore_patterns: vec![],
            ignore_file: None,
            threads: 0,
        }
    }
}

/// On-disk config file layout
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    patterns: Option<AccessPatterns>,
}

impl ScanConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    pub fn with_read_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns.extend_read(patterns);
        self
    }

    pub fn with_write_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns.extend_write(patterns);
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn with_ignore_file(mut self, path: PathBuf) -> Self {
        self.ignore_file = Some(path);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Merge extra patterns from a TOML config file.
    ///
    /// ```toml
    /// [patterns]
    /// read = ["fetch"]
    /// write = ["dump"]
    /// ```
    pub fn with_config_file(self, path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        self.with_config_str(&content)
    }

    pub fn with_config_str(mut self, content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        if let Some(patterns) = file.patterns {
            self.patterns.extend_read(patterns.read);
            self.patterns.extend_write(patterns.write);
        }
        Ok(self)
    }
}

/// Filter for ignoring files and directories during a directory scan
pub struct IgnoreFilter {
    gitignore: Option<Gitignore>,
    custom_globs: GlobSet,
    default_ignores: GlobSet,
}

impl IgnoreFilter {
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        // Load .gitignore if present
        let gitignore = if let Some(ref ignore_file) = config.ignore_file {
            let mut builder = GitignoreBuilder::new(&config.root);
            if let Some(err) = builder.add(ignore_file) {
                return Err(err.into());
            }
            Some(builder.build()?)
        } else {
            let gitignore_path = config.root.join(".gitignore");
            if gitignore_path.exists() {
                let mut builder = GitignoreBuilder::new(&config.root);
                builder.add(&gitignore_path);
                Some(builder.build()?)
            } else {
                None
            }
        };

        let mut custom_builder = GlobSetBuilder::new();
        for pattern in &config.ignore_patterns {
            custom_builder.add(Glob::new(pattern)?);
        }
        let custom_globs = custom_builder.build()?;

        let mut default_builder = GlobSetBuilder::new();
        default_builder.add(Glob::new("**/.ipynb_checkpoints/**")?);
        default_builder.add(Glob::new("**/node_modules/**")?);
        default_builder.add(Glob::new("**/.venv/**")?);
        default_builder.add(Glob::new("**/venv/**")?);
        default_builder.add(Glob::new("**/__pycache__/**")?);
        default_builder.add(Glob::new("**/.git/**")?);
        default_builder.add(Glob::new("**/target/**")?);
        let default_ignores = default_builder.build()?;

        Ok(Self {
            gitignore,
            custom_globs,
            default_ignores,
        })
    }

    /// Check if a path should be ignored
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        let path_str = path.to_string_lossy();

        if self.default_ignores.is_match(&*path_str) {
            return true;
        }

        if self.custom_globs.is_match(&*path_str) {
            return true;
        }

        if let Some(ref gi) = self.gitignore {
            // parent lookup requires a path under the matcher's root
            let matched = if path.starts_with(gi.path()) {
                gi.matched_path_or_any_parents(path, is_dir)
            } else {
                gi.matched(path, is_dir)
            };
            if matched.is_ignore() {
                return true;
            }
        }

        false
    }

    /// Check if a path names a notebook
    pub fn is_notebook(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(NOTEBOOK_EXTENSION))
            .unwrap_or(false)
    }
}
