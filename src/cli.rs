//! Command-line interface definitions using clap

use clap::Parser;

/// Shortleak - URL shortener with accounts and visit analytics
#[derive(Parser, Debug)]
#[command(name = "shortleak")]
#[command(version)]
#[command(about = "URL shortener with user accounts and visit analytics", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Print a sample config file and exit
    #[arg(long)]
    pub generate_config: bool,
}
