use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cloud-filter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Print list of files with the desired cloud coverage or clean up the directory from the undesired ones"
)]
#[command(
    long_about = "cloud-filter reads the cloud coverage recorded in the XML header (*HDR) of every \
                  scene in a directory and reports, deletes or extracts scenes depending on whether \
                  the coverage falls inside an inclusive percentage window."
)]
#[command(after_help = "EXAMPLES:\n  \
    cloud-filter --data_dir ./venus --cloud_max 50\n  \
    cloud-filter --data_dir ./venus --cloud_min 60 --operation delete\n  \
    cloud-filter --data_dir ./venus --cloud_max 20 --operation extract --delete no\n  \
    cloud-filter --data_dir ./venus --operation extract --dry-run -v")]
pub struct Cli {
    /// Path to the directory containing the scenes
    #[arg(
        long = "data_dir",
        alias = "data-dir",
        value_name = "DIR",
        required_unless_present = "generate_config"
    )]
    pub data_dir: Option<PathBuf>,

    /// Minimal desired cloud coverage in percents (inclusive)
    #[arg(long = "cloud_min", alias = "cloud-min", value_name = "PERCENT")]
    pub cloud_min: Option<i64>,

    /// Maximal desired cloud coverage in percents (inclusive)
    #[arg(long = "cloud_max", alias = "cloud-max", value_name = "PERCENT")]
    pub cloud_max: Option<i64>,

    /// What to do with the scenes
    #[arg(long, value_enum, default_value_t = Operation::Report)]
    pub operation: Operation,

    /// Whether extract also deletes the scenes outside the window (true/false, yes/no, 1/0)
    #[arg(long, value_name = "BOOL", value_parser = parse_bool_flag)]
    pub delete: Option<bool>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be deleted or extracted without doing it)
    #[arg(long, help = "Show what would be deleted or extracted without touching any file")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Print the matching scenes on the standard output
    Report,
    /// Delete the scenes outside the coverage window
    Delete,
    /// Extract the archives of the matching scenes
    Extract,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Report => "report",
            Operation::Delete => "delete",
            Operation::Extract => "extract",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_cloud_min(self.cloud_min)
            .with_cloud_max(self.cloud_max)
            .with_delete_unmatched(self.delete)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Parses a boolean-looking string.
///
/// clap's plain `bool` would only accept `true`/`false`, while scene scripts
/// in the wild pass `yes`, `Y` or `0`.
pub fn parse_bool_flag(s: &str) -> std::result::Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "t" | "y" | "1" => Ok(true),
        "false" | "no" | "f" | "n" | "0" => Ok(false),
        _ => Err(format!("Boolean value expected, got {:?}", s)),
    }
}
