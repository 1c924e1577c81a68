//! Jupyter notebook loading
//!
//! Reads the nbformat 4 JSON container and turns it into an ordered list of
//! [`Cell`]s. Only the fields the analysis needs are deserialized; outputs,
//! metadata and attachments are ignored.

use crate::models::{Cell, CellKind, Notebook};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("Failed to read notebook: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse notebook JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid notebook format: {0}")]
    InvalidFormat(String),
}

/// Cell source is either a single string or a list of lines
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for RawSource {
    fn default() -> Self {
        RawSource::Text(String::new())
    }
}

impl RawSource {
    fn into_text(self) -> String {
        match self {
            RawSource::Text(text) => text,
            RawSource::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCell {
    cell_type: CellKind,
    #[serde(default)]
    source: RawSource,
}

#[derive(Debug, Deserialize)]
struct RawNotebook {
    cells: Option<Vec<RawCell>>,
}

/// Load a notebook from disk
pub fn load_notebook(path: &Path) -> Result<Notebook, NotebookError> {
    let content = fs::read_to_string(path)?;
    parse_notebook(&content)
}

/// Parse notebook JSON text
pub fn parse_notebook(content: &str) -> Result<Notebook, NotebookError> {
    let raw: RawNotebook = serde_json::from_str(content)?;
    let cells = raw
        .cells
        .ok_or_else(|| NotebookError::InvalidFormat("missing \"cells\" array".to_string()))?;

    let cells = cells
        .into_iter()
        .enumerate()
        .map(|(position, cell)| Cell {
            position,
            kind: cell.cell_type,
            source: cell.source.into_text(),
        })
        .collect();

    Ok(Notebook { cells })
}
