use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bom_inspector::inspection::domain::InspectionProperty;

/// Snapshot file used when `--snapshot` is not given
pub const DEFAULT_SNAPSHOT: &str = "bom-inspector.snapshot.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!(
                "Invalid log format: {}. Please specify 'pretty' or 'json'",
                s
            )),
        }
    }
}

/// Parses a persisted property key such as `policyStatus` or `bomsync.policyStatus`
fn parse_property(s: &str) -> Result<InspectionProperty, String> {
    InspectionProperty::from_key(s).ok_or_else(|| format!("Unknown inspection property: {}", s))
}

/// Reconcile repository artifacts with a remote BOM scanning service
#[derive(Parser, Debug)]
#[command(name = "bom-inspector")]
#[command(version)]
#[command(
    about = "Reconcile repository artifacts with a remote BOM scanning service",
    long_about = None
)]
pub struct Args {
    /// Configuration file (defaults to bom-inspector.config.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository snapshot holding items and their properties
    #[arg(short, long, global = true, default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: PathBuf,

    /// Log filter when RUST_LOG is not set (e.g. info, debug, bom_inspector=trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Log output format: pretty or json
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the initial scan of repositories
    Initialize {
        /// Repository key (defaults to every configured repository)
        #[arg(short, long = "repo", value_name = "KEY")]
        repos: Vec<String>,
    },
    /// Register new and previously failed artifacts against the BOM
    InspectDelta {
        #[arg(short, long = "repo", value_name = "KEY")]
        repos: Vec<String>,
    },
    /// Apply policy and vulnerability notifications since the last checkpoint
    UpdateMetadata {
        #[arg(short, long = "repo", value_name = "KEY")]
        repos: Vec<String>,
    },
    /// Put failed artifacts back under inspection
    Reinspect {
        /// Property to clear (defaults to every inspection property)
        #[arg(short, long = "property", value_name = "KEY", value_parser = parse_property)]
        properties: Vec<InspectionProperty>,
    },
    /// Remove inspection properties from repositories
    DeleteProperties {
        #[arg(short, long = "repo", value_name = "KEY")]
        repos: Vec<String>,
        #[arg(short, long = "property", value_name = "KEY", value_parser = parse_property)]
        properties: Vec<InspectionProperty>,
    },
    /// Handle a created, copied or moved item
    ArtifactEvent {
        /// Item path as repo-key/path/to/file
        path: String,
    },
    /// Decide whether an item may be downloaded
    CheckDownload {
        /// Item path as repo-key/path/to/file
        path: String,
    },
    /// Show per-module configuration status
    Status,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
