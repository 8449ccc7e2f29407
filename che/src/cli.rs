// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "che")]
#[command(about = "Boot, inspect and tear down a directory-scoped Eclipse Che instance")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Display in verbose mode
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Initialize the directory (.che folder, instance id, default Chefile)
    Init {
        /// Target project directory (defaults to the current directory)
        path: Option<PathBuf>,
    },
    /// Boot the server and provision the workspace
    Up {
        path: Option<PathBuf>,
    },
    /// Stop the running server
    Down {
        path: Option<PathBuf>,
    },
    /// Delete the remote workspace, then stop the server
    Destroy {
        path: Option<PathBuf>,
    },
    /// Open an interactive shell inside the workspace machine
    Ssh {
        path: Option<PathBuf>,
    },
    /// Show workspace name, IDE url and instance id
    Status {
        path: Option<PathBuf>,
    },
    /// Export the current configuration as a factory descriptor
    Factory {
        path: Option<PathBuf>,
    },
}

impl Command {
    /// Target directory argument shared by every subcommand.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Command::Init { path }
            | Command::Up { path }
            | Command::Down { path }
            | Command::Destroy { path }
            | Command::Ssh { path }
            | Command::Status { path }
            | Command::Factory { path } => path.as_ref(),
        }
    }

    /// Name used in "not initialized" style messages.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init { .. } => "init",
            Command::Up { .. } => "up",
            Command::Down { .. } => "down",
            Command::Destroy { .. } => "destroy",
            Command::Ssh { .. } => "ssh",
            Command::Status { .. } => "status",
            Command::Factory { .. } => "factory",
        }
    }
}
