//! CLI command definitions for the `tacoline` binary.

pub mod chat;
pub mod menu;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// LINE ordering assistant for a taco shop.
#[derive(Parser)]
#[command(name = "tacoline", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Shop configuration file.
    #[arg(long, global = true, env = "TACOLINE_CONFIG", default_value = "tacoline.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the LINE webhook server.
    Serve {
        /// Port to listen on.
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,

        /// Host to bind to.
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// LINE channel secret, used to verify webhook signatures.
        #[arg(long, env = "LINE_CHANNEL_SECRET", hide_env_values = true)]
        channel_secret: Option<String>,

        /// LINE channel access token, used to send replies.
        #[arg(long, env = "LINE_CHANNEL_ACCESS_TOKEN", hide_env_values = true)]
        channel_access_token: Option<String>,

        /// Log replies instead of sending them to LINE.
        #[arg(long)]
        dry_run: bool,

        /// Export tracing spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Order interactively in the terminal.
    Chat {
        /// User id the conversation runs as.
        #[arg(long, default_value = "local-user")]
        user: String,
    },

    /// Print the menu.
    Menu,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
