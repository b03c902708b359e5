//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// syncstore - Local cache for messaging sync responses
///
/// Inspect, seed and clear the cached sync response a client resumes from
/// after restart.
#[derive(Parser, Debug)]
#[command(name = "syncstore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SYNCSTORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// User whose cache to open (default: identity.user_id from config)
    #[arg(short, long, global = true, env = "SYNCSTORE_USER")]
    pub user: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show cache location and contents overview
    Status,

    /// Print the cached sync response
    Show(ShowArgs),

    /// Merge a sync response into the cache
    Merge(MergeArgs),

    /// Delete the cached sync response
    Clear(ClearArgs),

    /// Look up an event in a cached room
    Event(EventArgs),

    /// Show the derived name of an invited room
    Summary(SummaryArgs),

    /// List cached rooms
    Rooms(RoomsArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the merge command
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// JSON file holding a sync response, or - for stdin
    pub input: PathBuf,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the event command
#[derive(Parser, Debug)]
pub struct EventArgs {
    /// Room id
    pub room_id: String,

    /// Event id
    pub event_id: String,
}

/// Arguments for the summary command
#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// Room id of an invited room
    pub room_id: String,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the rooms command
#[derive(Parser, Debug)]
pub struct RoomsArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., identity.user_id)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
