//! CLI command definitions and dispatch for the `confcentral` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `confcentral list conferences`, `confcentral key issue`).

pub mod conference;
pub mod key;
pub mod session;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Run and inspect a Conference Central server.
#[derive(Parser)]
#[command(name = "confcentral", version, about, long_about = None)]
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

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage API keys.
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Show details of a conference.
    Show {
        /// Conference key.
        key: String,
    },

    /// System status dashboard.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Issue an API key for a user. The key is printed once.
    Issue {
        /// Email of the user the key belongs to.
        #[arg(long)]
        email: String,

        /// Nickname used as the default profile display name.
        #[arg(long, default_value = "")]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List all conferences.
    Conferences,

    /// List the sessions of a conference.
    Sessions {
        /// Conference key.
        key: String,
    },
}
