//! CLI command definitions for the `intervu` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod credits;

use clap::{Parser, Subcommand};

use intervu_observe::LogFormat;

/// AI mock-interview server.
#[derive(Parser)]
#[command(name = "intervu", version, about, long_about = None)]
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

    /// Log line format.
    #[arg(long, global = true, default_value = "text", env = "INTERVU_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Also export spans to stdout through OpenTelemetry.
    #[arg(long, global = true, env = "INTERVU_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API and realtime gateway.
    Serve {
        /// Port to listen on (defaults to `server.port` from config.toml).
        #[arg(short, long, env = "INTERVU_PORT")]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` from config.toml).
        #[arg(long, env = "INTERVU_HOST")]
        host: Option<String>,
    },

    /// Manage interview credits.
    Credits {
        #[command(subcommand)]
        action: credits::CreditsCommand,
    },

    /// Create the database and apply pending migrations.
    Migrate,
}
