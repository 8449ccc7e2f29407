//! Interactive SSH session against a workspace machine.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use che_core::che_println;
use che_core::error::{CheError, Result};
use che_messages::messages::MESSAGES;

/// Spawns the `ssh` client with the controlling terminal attached.
///
/// Host key checking is disabled: these are local, ephemeral instances
/// whose host keys change on every boot. Blocks until the session ends;
/// no retry on failure.
pub fn open_session(ip: &str, port: u16, private_key: &Path) -> Result<()> {
    let destination = format!("user@{ip}");
    debug!("Opening ssh session to {} port {}", destination, port);

    let status = Command::new("ssh")
        .arg("-o")
        .arg("UserKnownHostsFile=/dev/null")
        .arg("-o")
        .arg("StrictHostKeyChecking=no")
        .arg(&destination)
        .arg("-p")
        .arg(port.to_string())
        .arg("-i")
        .arg(private_key)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| CheError::Process(format!("Failed to spawn ssh: {e}")))?;

    debug!("ssh exited with status {}", status);
    che_println!("{}", MESSAGES.ssh_connection_closed);
    Ok(())
}
