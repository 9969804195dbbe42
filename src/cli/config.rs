use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "screenwire",
    version,
    about = "Server-driven UI protocol driver"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Include internal error detail in 500-class responses
    #[arg(long, global = true)]
    pub dev: bool,

    /// Path to the dispatch trace JSONL file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Path to config file (default: screenwire.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a context's UI tree and print its wire form
    Render {
        /// Registered context name
        #[arg(long)]
        context: String,

        /// Instance scope (default from config)
        #[arg(long)]
        scope: Option<u8>,
    },

    /// Run one event through the router and print the response
    Dispatch {
        /// Path to an event JSON file (reads stdin when omitted)
        #[arg(long)]
        file: Option<String>,
    },

    /// List registered contexts and their indexes
    Contexts,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `screenwire.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Include internal error detail in 500-class responses
    #[serde(default)]
    pub dev_mode: bool,

    /// Dispatch trace JSONL path; tracing is off when absent
    #[serde(default)]
    pub trace_path: Option<String>,

    /// Instance scope used when the CLI does not pass one
    #[serde(default)]
    pub default_scope: u8,
}

/// Load config from a YAML file. Returns defaults if file is missing or
/// malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("screenwire.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
