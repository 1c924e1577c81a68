//! WASM bindings for MTA Rust NbDeps
//!
//! Exposes the notebook analyzer to JavaScript hosts such as editor
//! extensions. Callers pass file contents; there is no filesystem access.

use mta_rust_nbdeps_core::analyzer::analyze_source;
use mta_rust_nbdeps_core::output::to_json_compact;
use mta_rust_nbdeps_core::parsers::create_parser;
use mta_rust_nbdeps_core::{analyze_notebook, parse_notebook, AccessPatterns, CellOutcome};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Result envelope returned to JavaScript
#[derive(Serialize, Deserialize)]
pub struct WasmScanResult {
    pub success: bool,
    pub data: Option<String>,
    pub error: Option<String>,
}

impl WasmScanResult {
    fn ok(data: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    fn into_js(self) -> JsValue {
        serde_wasm_bindgen::to_value(&self).unwrap_or(JsValue::NULL)
    }
}

/// Analyze notebook JSON and return the result as JSON
pub fn analyze_notebook_str(content: &str) -> WasmScanResult {
    let notebook = match parse_notebook(content) {
        Ok(notebook) => notebook,
        Err(e) => return WasmScanResult::err(e.to_string()),
    };
    let mut parser = match create_parser() {
        Ok(parser) => parser,
        Err(e) => return WasmScanResult::err(e.to_string()),
    };

    let result = analyze_notebook(&notebook, parser.as_mut(), &AccessPatterns::default());
    match to_json_compact(&result) {
        Ok(json) => WasmScanResult::ok(json),
        Err(e) => WasmScanResult::err(e.to_string()),
    }
}

/// Analyze a single code cell and return its findings as JSON
pub fn analyze_cell_str(source: &str) -> WasmScanResult {
    let mut parser = match create_parser() {
        Ok(parser) => parser,
        Err(e) => return WasmScanResult::err(e.to_string()),
    };

    match analyze_source(parser.as_mut(), &AccessPatterns::default(), source) {
        CellOutcome::Analyzed(findings) => match serde_json::to_string(&findings) {
            Ok(json) => WasmScanResult::ok(json),
            Err(e) => WasmScanResult::err(e.to_string()),
        },
        CellOutcome::Skipped { reason } => WasmScanResult::err(reason),
    }
}

/// Analyze the text of an `.ipynb` file
#[wasm_bindgen]
pub fn analyze_notebook_json(content: &str) -> JsValue {
    analyze_notebook_str(content).into_js()
}

/// Analyze the source of one code cell
#[wasm_bindgen]
pub fn analyze_cell_source(source: &str) -> JsValue {
    analyze_cell_str(source).into_js()
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
