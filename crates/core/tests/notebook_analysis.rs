use mta_rust_nbdeps_core::parsers::create_parser;
use mta_rust_nbdeps_core::{
    analyze_notebook, format_output, parse_notebook, CellKind, NotebookScanner, OutputFormat,
    ScanConfig,
};
use std::fs;
use tempfile::TempDir;

const PIPELINE: &str = r##"{
 "cells": [
  {"cell_type": "markdown", "metadata": {}, "source": ["# Single-cell pipeline\n", "Loads counts and writes figures."]},
  {"cell_type": "code", "execution_count": 1, "metadata": {}, "outputs": [],
   "source": ["import scanpy as sc\n", "import pandas as pd\n", "from matplotlib import pyplot as plt\n", "adata = sc.read_10x_h5(\"filtered.h5\")"]},
  {"cell_type": "code", "execution_count": 2, "metadata": {}, "outputs": [],
   "source": ["%matplotlib inline\n", "import seaborn"]},
  {"cell_type": "raw", "metadata": {}, "source": "ignored"},
  {"cell_type": "code", "execution_count": 3, "metadata": {}, "outputs": [],
   "source": ["meta = pd.read_csv(\"meta.csv\")\n", "meta.to_csv(\"meta_clean.csv\")\n", "plt.savefig(\"umap.png\")\n", "with open(\"log.txt\", \"a\") as fh:\n", "    fh.write(out_name)\n"]},
  {"cell_type": "code", "execution_count": 4, "metadata": {}, "outputs": [],
   "source": "import pandas as pd\nmeta = pd.read_csv(\"meta.csv\")"}
 ],
 "metadata": {"kernelspec": {"name": "python3", "display_name": "Python 3", "language": "python"}},
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

fn write_notebook(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_pipeline_notebook() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(&dir, "pipeline.ipynb", PIPELINE);

    let scanner = NotebookScanner::new(ScanConfig::new(path)).unwrap();
    let result = scanner.scan_notebook().unwrap();

    let imports: Vec<&str> = result.imports.iter().map(String::as_str).collect();
    assert_eq!(imports, vec!["matplotlib.pyplot", "pandas", "scanpy"]);

    let read: Vec<&str> = result.files_read.iter().map(String::as_str).collect();
    assert_eq!(read, vec!["filtered.h5", "meta.csv"]);

    let written: Vec<&str> = result.files_written.iter().map(String::as_str).collect();
    assert_eq!(written, vec!["log.txt", "meta_clean.csv", "umap.png"]);

    let positions: Vec<usize> = result.cells.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 4, 5]);
    assert_eq!(result.cells[0].kind, CellKind::Markdown);
    assert_eq!(
        result.cells[0].source,
        "# Single-cell pipeline\nLoads counts and writes figures."
    );
    assert_eq!(result.unparsed_cells, vec![2]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let notebook = parse_notebook(PIPELINE).unwrap();
    let config = ScanConfig::default();

    let mut first_parser = create_parser().unwrap();
    let mut second_parser = create_parser().unwrap();
    let first = analyze_notebook(&notebook, first_parser.as_mut(), &config.patterns);
    let second = analyze_notebook(&notebook, second_parser.as_mut(), &config.patterns);

    assert_eq!(first, second);
    assert_eq!(
        format_output(&first, OutputFormat::Json).unwrap(),
        format_output(&second, OutputFormat::Json).unwrap()
    );
}

#[test]
fn test_json_output_contract() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(
        &dir,
        "intro.ipynb",
        r##"{"cells": [
            {"cell_type": "markdown", "source": "# intro"},
            {"cell_type": "code", "source": "import pandas as pd\ndf = pd.read_csv(\"a.csv\")"},
            {"cell_type": "code", "source": "df.to_csv(\"b.csv\")"}
        ]}"##,
    );

    let result = NotebookScanner::new(ScanConfig::new(path))
        .unwrap()
        .scan_notebook()
        .unwrap();
    let json = format_output(&result, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 4);
    assert_eq!(value["imports"], serde_json::json!(["pandas"]));
    assert_eq!(value["files_read"], serde_json::json!(["a.csv"]));
    assert_eq!(value["files_written"], serde_json::json!(["b.csv"]));
    assert_eq!(
        value["cells"],
        serde_json::json!([
            {"index": 0, "type": "markdown", "source": "# intro"},
            {"index": 1, "type": "code", "source": "import pandas as pd\ndf = pd.read_csv(\"a.csv\")"},
            {"index": 2, "type": "code", "source": "df.to_csv(\"b.csv\")"}
        ])
    );
}

#[test]
fn test_custom_patterns_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("nbdeps.toml");
    fs::write(&config_path, "[patterns]\nread = [\"fetch\"]\nwrite = [\"dump\"]\n").unwrap();
    let path = write_notebook(
        &dir,
        "custom.ipynb",
        r#"{"cells": [{"cell_type": "code", "source": "client.fetch('remote.csv')\njoblib.dump('model.pkl')"}]}"#,
    );

    let config = ScanConfig::new(path).with_config_file(&config_path).unwrap();
    let result = NotebookScanner::new(config).unwrap().scan_notebook().unwrap();

    assert!(result.files_read.contains("remote.csv"));
    assert!(result.files_written.contains("model.pkl"));
}
