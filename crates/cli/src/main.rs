use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mta_rust_nbdeps_core::{
    format_output, format_workspace_output, NotebookScanner, OutputFormat, ScanConfig,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nbdeps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract imports and file reads/writes from Jupyter notebooks")]
#[command(long_about = "Statically analyzes a Jupyter notebook (.ipynb) without executing it. \
    Reports the cells, the modules imported by code cells, and the literal file paths passed to \
    read-like calls (read_csv, load, open(..., 'r')) and write-like calls (to_csv, savefig, \
    open(..., 'w')). Cells that do not parse as Python are skipped.\n\n\
    When PATH is a directory, every notebook beneath it is analyzed.")]
pub struct Args {
    /// Notebook file or directory of notebooks
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Json)]
    pub format: OutputFormatArg,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extra method-name substring marking a read (repeatable)
    #[arg(long = "read-pattern", action = clap::ArgAction::Append)]
    pub read_patterns: Vec<String>,

    /// Extra method-name substring marking a write (repeatable)
    #[arg(long = "write-pattern", action = clap::ArgAction::Append)]
    pub write_patterns: Vec<String>,

    /// TOML file with extra [patterns] read/write lists
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Additional ignore globs for directory scans
    #[arg(long, action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Ignore file path (defaults to .gitignore)
    #[arg(long)]
    pub ignore_file: Option<PathBuf>,

    /// Show verbose progress and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Parallel threads for directory scans (0 = auto)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Build config
    let mut config = ScanConfig::new(args.path.clone())
        .with_read_patterns(args.read_patterns.clone())
        .with_write_patterns(args.write_patterns.clone())
        .with_ignore_patterns(args.ignore.clone())
        .with_threads(args.threads);

    if let Some(config_file) = &args.config {
        config = config.with_config_file(config_file)?;
    }

    if let Some(ignore_file) = args.ignore_file {
        config = config.with_ignore_file(ignore_file);
    }

    let scanner = NotebookScanner::new(config)?;

    let output = if args.path.is_dir() {
        // Show progress if verbose
        let spinner = if args.verbose {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message("Scanning notebooks...");
            Some(pb)
        } else {
            None
        };

        let report = scanner.scan_directory()?;

        if let Some(ref pb) = spinner {
            pb.finish_with_message(format!(
                "Scanned {} notebooks in {}ms",
                report.stats.total_notebooks, report.metadata.scan_duration_ms
            ));
        }

        format_workspace_output(&report, args.format.into())?
    } else {
        let result = scanner.scan_notebook()?;
        format_output(&result, args.format.into())?
    };

    // Write output
    if let Some(path) = args.output {
        fs::write(&path, &output)?;
        if args.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{}", output);
    }

    Ok(())
}
