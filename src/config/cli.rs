use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "multisite")]
#[command(about = "Serves the multi-domain site: hostname routing plus flat-file content")]
pub struct CliConfig {
    /// Path to the TOML site configuration
    #[arg(short, long, default_value = "site.toml")]
    pub config: String,

    /// Override the bind address from the configuration
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,
}
