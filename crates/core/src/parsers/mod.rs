mod literal;
mod python;

pub use literal::{decode_escapes, parse_string_literal, StringLiteral};
pub use python::PythonParser;

use crate::syntax::SyntaxNode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to initialize parser: {0}")]
    InitError(String),
    #[error("Failed to parse source code: {0}")]
    ParseError(String),
}

/// Trait for parsers that lower a code cell into syntax nodes
pub trait CellParser {
    /// Parse source code and return every relevant node, or fail if the
    /// source is not valid in the cell's language
    fn parse(&mut self, source: &str) -> Result<Vec<SyntaxNode>, ParserError>;
}

/// Create a parser for notebook code cells
pub fn create_parser() -> Result<Box<dyn CellParser>, ParserError> {
    Ok(Box::new(PythonParser::new()?))
}
