//! strata - Turn filesystems, files and source code into labeled property graphs.
//!
//! Usage:
//!   strata fs [PATH]         Scan a directory tree
//!   strata file PATH         Read one file with its content
//!   strata text PATH         Analyze a text file
//!   strata code PATH         Read struct, enum and function declarations
//!   strata struct PATH       Read struct declarations only
//!   strata enum PATH         Read enum declarations only
//!   strata env               Capture the process environment
//!
//! The graph is printed as JSON; `--ir` prints the extracted data instead.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use strata_core::{EntryStats, ScanConfig};
use strata_graph::GraphSource;
use strata_scan::Scanner;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "STRATA_LOG";

#[derive(Parser)]
#[command(
    name = "strata",
    version,
    about = "Turn filesystems, files and source code into labeled property graphs",
    long_about = "strata reads a source (a directory tree, a file, source code or the \
                  environment) and prints it as a graph of labeled nodes and edges in JSON."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print compact JSON
    #[arg(long, global = true)]
    min: bool,

    /// Print the extracted data instead of the graph
    #[arg(long, global = true)]
    ir: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a directory tree
    Fs {
        /// Path to scan (overrides `root` from the config file)
        path: Option<PathBuf>,

        /// Scan configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Include dot-entries
        #[arg(long, overrides_with = "no_hidden")]
        hidden: bool,

        /// Skip dot-entries other than `.git`
        #[arg(long, overrides_with = "hidden")]
        no_hidden: bool,

        /// Glob pattern of entry names to omit (repeatable)
        #[arg(short, long, value_name = "GLOB")]
        ignore: Vec<String>,

        /// List directories no deeper than this
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Skip git repository detection
        #[arg(long)]
        no_git: bool,

        /// Skip owner and group lookup
        #[arg(long)]
        no_owners: bool,
    },

    /// Read one file with its metadata and content
    File { path: PathBuf },

    /// Analyze a text file
    Text { path: PathBuf },

    /// Read struct, enum and function declarations from source code
    Code { path: PathBuf },

    /// Read struct declarations from source code
    Struct { path: PathBuf },

    /// Read enum declarations from source code
    Enum { path: PathBuf },

    /// Capture the process environment
    Env,
}

/// Scan flags that override the config file.
struct ScanOverrides {
    path: Option<PathBuf>,
    hidden: Option<bool>,
    ignore: Vec<String>,
    max_depth: Option<u32>,
    no_git: bool,
    no_owners: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = Output {
        min: cli.min,
        ir: cli.ir,
        path: cli.output,
    };

    match cli.command {
        Command::Fs {
            path,
            config,
            hidden,
            no_hidden,
            ignore,
            max_depth,
            no_git,
            no_owners,
        } => {
            let hidden = match (hidden, no_hidden) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let overrides = ScanOverrides {
                path,
                hidden,
                ignore,
                max_depth,
                no_git,
                no_owners,
            };
            let config = scan_config(config.as_deref(), overrides)?;
            run_fs(config, &output)?;
        }
        Command::File { path } => {
            let entry = strata_extract::read_file(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            output.emit(&entry)?;
        }
        Command::Text { path } => {
            let analysis = strata_extract::read_text(&path)
                .with_context(|| format!("Failed to analyze {}", path.display()))?;
            output.emit(&analysis)?;
        }
        Command::Code { path } => {
            let info = strata_extract::read_code(&path)
                .with_context(|| format!("Failed to read code from {}", path.display()))?;
            output.emit(&info)?;
        }
        Command::Struct { path } => {
            let structs = strata_extract::read_structs(&path)
                .with_context(|| format!("Failed to read structs from {}", path.display()))?;
            output.emit(&structs)?;
        }
        Command::Enum { path } => {
            let enums = strata_extract::read_enums(&path)
                .with_context(|| format!("Failed to read enums from {}", path.display()))?;
            output.emit(&enums)?;
        }
        Command::Env => {
            output.emit(&strata_extract::read_env())?;
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `STRATA_LOG` (default `warn`).
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the scan configuration from an optional TOML file and CLI flags.
fn scan_config(file: Option<&Path>, overrides: ScanOverrides) -> Result<ScanConfig> {
    let mut config = match file {
        Some(file) => {
            let text = fs::read_to_string(file)
                .with_context(|| format!("Failed to read config {}", file.display()))?;
            toml::from_str::<ScanConfig>(&text)
                .with_context(|| format!("Invalid config {}", file.display()))?
        }
        None => ScanConfig::default(),
    };

    if let Some(path) = overrides.path {
        config.root = path;
    }
    if let Some(hidden) = overrides.hidden {
        config.include_hidden = hidden;
    }
    config.ignore_patterns.extend(overrides.ignore);
    if overrides.max_depth.is_some() {
        config.max_depth = overrides.max_depth;
    }
    if overrides.no_git {
        config.detect_git = false;
    }
    if overrides.no_owners {
        config.resolve_owners = false;
    }

    Ok(config)
}

/// Scan a directory tree and print it.
fn run_fs(config: ScanConfig, output: &Output) -> Result<()> {
    let root = config.root.clone();
    let scanner = Scanner::new(config);
    let tree = scanner
        .scan()
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    let stats = EntryStats::from_entry(&tree);
    debug!(
        files = stats.files,
        dirs = stats.dirs,
        symlinks = stats.symlinks,
        errors = stats.errors,
        total_bytes = stats.total_bytes,
        max_depth = stats.max_depth,
        "scan summary"
    );

    output.emit(&tree)
}

/// Where and how results are printed.
struct Output {
    min: bool,
    ir: bool,
    path: Option<PathBuf>,
}

impl Output {
    /// Print `value` as graph JSON, or as IR JSON with `--ir`.
    fn emit<T: GraphSource + Serialize>(&self, value: &T) -> Result<()> {
        let json = if self.ir {
            self.encode(value)?
        } else {
            let graph = strata_graph::ingest(value).context("Failed to build graph")?;
            self.encode(&graph)?
        };

        match &self.path {
            Some(path) => {
                fs::write(path, json + "\n")
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Wrote {}", path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.min {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json)
    }
}
