//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// Serve the bundled FileKey app with per-path cache policy
#[derive(Debug, Clone, Parser)]
#[command(name = "filekey-server", version, about)]
pub struct Cli {
    /// Port to listen on [default: 8080, overridden by $PORT]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Number of runtime worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Configuration file (TOML); a missing file is not an error
    #[arg(short, long, default_value = "filekey.toml")]
    pub config: PathBuf,
}
