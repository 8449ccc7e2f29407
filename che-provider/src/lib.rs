//! Container-runtime provider for the che directory tool.
//!
//! Wraps every interaction with the local `docker` CLI: booting and
//! stopping the server launcher, probing the running release tag,
//! generating SSH keys in a throwaway sandbox, building machine recipes
//! and opening interactive SSH sessions.

use che_core::error::Result;

pub mod docker;
pub mod launcher;
pub mod recipe;
pub mod remote_ip;
pub mod ssh_keys;
pub mod ssh_session;
pub mod version;

pub use launcher::DockerLauncher;
pub use recipe::RecipeBuilder;
pub use ssh_keys::{SshKeyPair, SshKeyProvisioner};

/// Boots and stops the local server container.
///
/// The orchestrator depends on this trait so lifecycle tests can run
/// against a mock instead of a real container runtime.
pub trait ServerLauncher: Send + Sync {
    /// Blocking boot; success is exit code 0 of the launcher process.
    fn boot(&self) -> Result<()>;

    /// Blocking stop; same exit-code contract as [`ServerLauncher::boot`].
    fn stop(&self) -> Result<()>;
}
