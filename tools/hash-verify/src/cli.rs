//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// State file checked when `verify` gets no path
pub const DEFAULT_STATE_FILE: &str = ".kanban/state/current.json";

/// hash-verify: SHA-Infinity state integrity checks
#[derive(Parser, Debug)]
#[command(name = "hash-verify")]
#[command(about = "Create and verify SHA-Infinity integrity records for JSON state files")]
#[command(version)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level (overrides SI_LOG_LEVEL)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Verify a state file against its embedded integrity record
    Verify {
        /// State file (JSON)
        #[arg(default_value = DEFAULT_STATE_FILE)]
        file: PathBuf,
    },

    /// Create an integrity record for a state file
    Create {
        /// State file (JSON)
        file: PathBuf,

        /// Chain depth (1-256)
        #[arg(short, long)]
        depth: Option<u32>,

        /// Embed the record into the file under `integrity`
        #[arg(short, long)]
        write: bool,
    },

    /// SHA-Infinity digest of a string
    Chain {
        data: String,

        /// Chain depth (1-256)
        #[arg(short, long)]
        depth: Option<u32>,

        /// Hash without the salt prefix
        #[arg(long)]
        no_salt: bool,

        /// Skip the final depth binding step
        #[arg(long)]
        no_depth_binding: bool,
    },

    /// Merkle root of hex-encoded digests
    Merkle {
        /// Digests in order (64 hex characters each)
        hashes: Vec<String>,

        /// Chain depth (1-256)
        #[arg(short, long)]
        depth: Option<u32>,
    },

    /// Search for a proof-of-work nonce
    Pow {
        data: String,

        /// Required leading zero hex characters
        #[arg(long)]
        difficulty: Option<usize>,

        /// Chain depth (1-256)
        #[arg(short, long)]
        depth: Option<u32>,

        /// Attempt budget (overrides SI_POW_MAX_ATTEMPTS)
        #[arg(long)]
        max_attempts: Option<u64>,
    },

    /// Append an audit-trail link to a previous digest
    Link {
        /// Previous link digest (64 hex characters)
        previous: String,

        data: String,

        /// Chain depth (1-256)
        #[arg(short, long)]
        depth: Option<u32>,
    },
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::Verify { .. } => "verify",
            Command::Create { .. } => "create",
            Command::Chain { .. } => "chain",
            Command::Merkle { .. } => "merkle",
            Command::Pow { .. } => "pow",
            Command::Link { .. } => "link",
        }
    }
}
