// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the run and stop subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eosup")]
#[command(about = "Run and manage a local EOS development node in Docker")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an EOS node container, creating or reusing it as needed
    Run {
        /// Instance name (default: eosio)
        instance_name: Option<String>,

        /// Docker image to run (default: eosio/eos-dev:latest)
        #[arg(short = 'm', long)]
        image: Option<String>,

        /// Host port bound to the node's HTTP port (default: 8888)
        #[arg(short, long)]
        port: Option<String>,

        /// Comma-separated bind mounts (hostPath:containerPath)
        #[arg(short, long)]
        volumes: Option<String>,
    },

    /// Stop a running node container
    Stop {
        /// Instance name (default: eosio)
        instance_name: Option<String>,
    },
}
