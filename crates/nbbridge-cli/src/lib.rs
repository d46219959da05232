//! Command-line converters between Databricks source notebooks and Jupyter
//! notebooks
//!
//! This crate builds two binaries:
//!
//! ```bash
//! # Source notebook -> ipynb (prints JSON when OUTPUT is omitted)
//! flat_to_structured etl.py etl.ipynb
//!
//! # ipynb -> source notebook (prints the source when OUTPUT is omitted)
//! structured_to_flat etl.ipynb etl.py
//! ```
//!
//! # Configuration
//!
//! Output settings are read from `.nbbridge.toml` in the current directory,
//! then `~/.nbbridge.toml`, or from the file given with `--config`:
//!
//! ```toml
//! [ipynb]
//! indent = 2
//!
//! [source]
//! trailing_newline = false
//! ```
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Conversion failed, or invalid arguments

pub mod config;

use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub use config::Config;

/// Prefix of the single line reported when a conversion fails
pub const ERROR_PREFIX: &str = "Error converting notebook:";

/// Arguments shared by both converters
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Notebook to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the converted notebook (default: print to stdout)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Configuration file (default: ./.nbbridge.toml, then ~/.nbbridge.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Verbosity selected by the flags
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Load the configuration these arguments point at
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `--config` file is unusable.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        Config::load(self.config.as_deref())
    }
}

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    #[must_use]
    pub const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Default `env_logger` filter for this level
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }

    /// Report a written output file
    pub fn confirm_saved(self, path: &Path) {
        if self.should_show_output() {
            println!("Converted notebook saved to {}", path.display());
        }
    }
}

/// Initialize logging to stderr; `RUST_LOG` overrides the verbosity default
pub fn init_logging(verbosity: Verbosity) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(verbosity.log_filter()),
    )
    .target(env_logger::Target::Stderr)
    .format_timestamp(None)
    .init();
}

/// Print the failure line and produce the failure exit status
pub fn report_failure(err: &anyhow::Error) -> ExitCode {
    println!("{ERROR_PREFIX} {err}");
    ExitCode::FAILURE
}

/// Print clap's help, version or usage message
///
/// Help and version succeed; argument errors exit with status 1 like any
/// other failure.
pub fn report_usage(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
