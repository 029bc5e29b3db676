//! CLI argument parsing and configuration

use clap::Parser;
use std::path::PathBuf;

/// dawdash - Tempo and key overview for your DAW project folders
///
/// Walks a directory for project files of one DAW, reads tempo, scale and
/// track counts out of each, and prints or exports the result as CSV/JSON.
#[derive(Parser, Debug)]
#[command(name = "dawdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory to scan (or a single project file)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Project format to look for
    #[arg(short, long, value_name = "EXT")]
    #[arg(value_parser = ["als", "bwproject", "song", "cpr", "xpj"])]
    pub format: String,

    /// Directory to write the CSV (and JSON) export into; omit to only print
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Also write a JSON export
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Add scale and track-count columns to the CSV export
    #[arg(long, default_value = "false")]
    pub extended_csv: bool,

    /// Extra directory name or path suffix to skip (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Keep descending into folders that already contain a project file
    #[arg(long, default_value = "false")]
    pub descend_into_projects: bool,

    /// Sort the listing
    #[arg(long, value_name = "KEY")]
    #[arg(value_parser = ["name", "date", "tempo", "path", "format"])]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, default_value = "false")]
    pub desc: bool,

    /// Only keep projects whose name contains this text
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Print a folder tree instead of a table
    #[arg(long, default_value = "false")]
    pub tree: bool,

    /// Number of worker threads (defaults to CPU count - 1)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
