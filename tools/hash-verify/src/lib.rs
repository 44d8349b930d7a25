//! hash-verify: operator CLI for SHA-Infinity state integrity
//!
//! Creates and checks integrity records for JSON state files, and exposes
//! the chained hash, Merkle root, proof-of-work and audit-link operations
//! for scripting.
//!
//! Exit status is 0 on success, 1 when a verification or proof-of-work
//! search fails, and 2 on errors (unreadable files, invalid arguments).

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::{Cli, Command, DEFAULT_STATE_FILE};
pub use commands::{load_state, run};
