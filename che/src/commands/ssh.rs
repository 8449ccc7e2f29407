//! `ssh`: opens an interactive shell inside the workspace machine.

use che_api::dto::{DEV_MACHINE_NAME, SSH_AGENT_ID};
use che_core::error::{CheError, Result};
use che_messages::messages::MESSAGES;
use che_messages::msg;
use che_provider::{ssh_session, SshKeyProvisioner};

use crate::commands::CommandCtx;

pub async fn handle_ssh(ctx: &CommandCtx) -> Result<()> {
    ctx.ensure_initialized("ssh")?;
    ctx.ensure_running().await?;
    let workspace = ctx.require_workspace().await?;

    let has_agent = workspace
        .config
        .environments
        .get(&workspace.config.default_env)
        .and_then(|env| env.machines.get(DEV_MACHINE_NAME))
        .is_some_and(|machine| machine.agents.iter().any(|a| a == SSH_AGENT_ID));
    if !has_agent {
        return Err(CheError::Precondition(msg!(
            MESSAGES.ssh_agent_disabled,
            agent = SSH_AGENT_ID
        )));
    }

    let port = workspace
        .ssh_port()
        .ok_or_else(|| CheError::Api(MESSAGES.ssh_no_port.to_string()))?;

    SshKeyProvisioner::new(&ctx.layout).ensure_key_pair()?;
    ssh_session::open_session(&ctx.server.ip, port, &ctx.layout.ssh_private_key())
}
